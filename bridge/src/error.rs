// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! This Error type helps to work with Actix-web

use actix_web::{body::BoxBody, HttpResponse, ResponseError};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::integrity;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure envelope relayed to the caller. `detail` carries the raw
/// underlying diagnostic when the platform supplied one.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ErrorReply {
    pub code: String,
    pub message: String,
    pub detail: Option<String>,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP initialization failed")]
    HTTPFailed {
        #[source]
        source: anyhow::Error,
    },

    #[error("HTTPS initialization failed")]
    HTTPSFailed {
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Integrity(#[from] integrity::Error),

    #[error("Request path {path} is invalid")]
    InvalidRequestPath { path: String },

    #[error("Method {method} is not implemented")]
    MethodNotImplemented { method: String },

    #[error("Prometheus error")]
    PrometheusError {
        #[from]
        source: prometheus::Error,
    },
}

impl Error {
    /// Machine-readable category of the failure envelope.
    pub fn code(&self) -> String {
        match self {
            Error::Integrity(inner) => inner.code(),
            Error::InvalidRequestPath { .. } => "INVALID_REQUEST_PATH".to_string(),
            Error::MethodNotImplemented { .. } => "NOT_IMPLEMENTED".to_string(),
            _ => "INTERNAL".to_string(),
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            Error::Integrity(inner) => inner.detail(),
            _ => None,
        }
    }
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        let reply = ErrorReply {
            code: self.code(),
            message: self.to_string(),
            detail: self.detail(),
        };

        // All the fields inside the reply are printable characters, so this
        // error cannot happen. A test covering the error types is given to
        // ensure this.
        let body = serde_json::to_string(&reply).expect("Failed to serialize error");

        let mut res = match self {
            Error::InvalidRequestPath { .. } | Error::MethodNotImplemented { .. } => {
                HttpResponse::NotFound()
            }
            Error::Integrity(inner) => match inner {
                integrity::Error::InvalidArguments { .. } => HttpResponse::BadRequest(),
                integrity::Error::Service { .. } | integrity::Error::Failure { .. } => {
                    HttpResponse::BadGateway()
                }
                integrity::Error::Exception { .. } | integrity::Error::Initialization { .. } => {
                    HttpResponse::InternalServerError()
                }
            },
            _ => HttpResponse::InternalServerError(),
        };

        error!("{self:?}");

        res.body(BoxBody::new(body))
    }
}
