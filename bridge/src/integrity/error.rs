// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

use strum::AsRefStr;
use thiserror::Error;

use super::code::ErrorCategory;

pub type Result<T> = std::result::Result<T, Error>;

/// Terminal failures of a bridged `requestIntegrityToken` call.
///
/// Exactly one of these is relayed per invocation. Callers branch on
/// [`Error::code`] rather than matching message text.
#[derive(Error, AsRefStr, Debug)]
pub enum Error {
    /// Rejected locally, before any provider call is made.
    #[error("{message}")]
    InvalidArguments { message: String },

    /// Categorized failure reported by the platform service.
    #[error("{}", .category.message())]
    Service {
        category: ErrorCategory,
        detail: Option<String>,
    },

    /// The platform call failed without a recognized category.
    #[error("{message}")]
    Failure { message: String },

    /// Raised while preparing or issuing the request.
    #[error("{source}")]
    Exception {
        #[source]
        source: anyhow::Error,
    },

    /// The provider backend could not be brought up.
    #[error("Failed to initialize integrity provider")]
    Initialization {
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Machine-readable category for the failure envelope.
    pub fn code(&self) -> String {
        match self {
            Error::InvalidArguments { .. } => "INVALID_ARGS".to_string(),
            Error::Service { category, .. } => format!("INTEGRITY_ERROR_{category}"),
            Error::Failure { .. } => "INTEGRITY_FAILURE".to_string(),
            Error::Exception { .. } | Error::Initialization { .. } => "EXCEPTION".to_string(),
        }
    }

    /// Raw underlying diagnostic, when the platform supplied one.
    pub fn detail(&self) -> Option<String> {
        match self {
            Error::Service { detail, .. } => detail.clone(),
            _ => None,
        }
    }
}

/// Outcome of submitting a request to a provider backend.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Categorized failure from the integrity service.
    #[error("{}", .category.message())]
    Service {
        category: ErrorCategory,
        detail: Option<String>,
    },

    /// Transport or protocol failure with no usable category.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}
