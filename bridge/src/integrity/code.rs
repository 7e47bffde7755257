// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Typed failure categories of the platform integrity service.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use strum::{Display, EnumIter, FromRepr};

/// Failure categories published by the platform integrity SDK.
///
/// Discriminants match the SDK's numeric error-code constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum IntegrityErrorCode {
    ApiNotAvailable = -1,
    PlayStoreNotFound = -2,
    NoNetwork = -3,
    PlayStoreAccountNotFound = -4,
    AppNotInstalled = -5,
    PlayServicesNotFound = -6,
    AppUidMismatch = -7,
    TooManyRequests = -8,
    CannotBindToService = -9,
    NonceTooShort = -10,
    NonceTooLong = -11,
    GoogleServerUnavailable = -12,
    NonceIsNotBase64 = -13,
    PlayStoreVersionOutdated = -14,
    CloudProjectNumberIsInvalid = -16,
}

lazy_static! {
    /// Fixed human-readable text for each published category.
    static ref ERROR_MESSAGES: HashMap<IntegrityErrorCode, &'static str> = HashMap::from([
        (IntegrityErrorCode::ApiNotAvailable, "Integrity API is not available."),
        (IntegrityErrorCode::NoNetwork, "No network connection."),
        (IntegrityErrorCode::PlayStoreNotFound, "Play Store not found."),
        (IntegrityErrorCode::PlayStoreVersionOutdated, "Play Store version is outdated."),
        (IntegrityErrorCode::AppNotInstalled, "App is not installed."),
        (IntegrityErrorCode::PlayServicesNotFound, "Play Services not found."),
        (IntegrityErrorCode::AppUidMismatch, "App UID mismatch."),
        (IntegrityErrorCode::TooManyRequests, "Too many requests."),
        (IntegrityErrorCode::CannotBindToService, "Cannot bind to service."),
        (IntegrityErrorCode::GoogleServerUnavailable, "Google server unavailable."),
        (IntegrityErrorCode::PlayStoreAccountNotFound, "Play Store account not found."),
        (IntegrityErrorCode::CloudProjectNumberIsInvalid, "Cloud project number is invalid."),
        (IntegrityErrorCode::NonceIsNotBase64, "Nonce is not Base64."),
        (IntegrityErrorCode::NonceTooLong, "Nonce is too long."),
        (IntegrityErrorCode::NonceTooShort, "Nonce is too short."),
    ]);
}

/// A category value as delivered by the service.
///
/// The wire carries raw integers, so values from a newer SDK than this
/// table knows about must still classify deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Recognized(IntegrityErrorCode),
    Unrecognized(i32),
}

impl From<i32> for ErrorCategory {
    fn from(raw: i32) -> Self {
        IntegrityErrorCode::from_repr(raw)
            .map(Self::Recognized)
            .unwrap_or(Self::Unrecognized(raw))
    }
}

impl From<IntegrityErrorCode> for ErrorCategory {
    fn from(code: IntegrityErrorCode) -> Self {
        Self::Recognized(code)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognized(code) => write!(f, "{code}"),
            Self::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

impl ErrorCategory {
    /// Fixed message for the category, with a deterministic fallback for
    /// values missing from the table.
    pub fn message(&self) -> String {
        match self {
            Self::Recognized(code) => ERROR_MESSAGES
                .get(code)
                .map(|text| (*text).to_string())
                .unwrap_or_else(|| unknown_error(*code as i32)),
            Self::Unrecognized(raw) => unknown_error(*raw),
        }
    }
}

fn unknown_error(code: i32) -> String {
    format!("Unknown error (Code: {code})")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_published_category_has_a_message() {
        for code in IntegrityErrorCode::iter() {
            assert!(ERROR_MESSAGES.contains_key(&code), "{code} has no message");
        }
    }

    #[rstest]
    #[case(-3, "No network connection.")]
    #[case(-8, "Too many requests.")]
    #[case(-13, "Nonce is not Base64.")]
    #[case(-16, "Cloud project number is invalid.")]
    fn numeric_codes_map_to_published_messages(#[case] raw: i32, #[case] expected: &str) {
        assert_eq!(ErrorCategory::from(raw).message(), expected);
    }

    #[test]
    fn unrecognized_category_keeps_its_raw_code() {
        let category = ErrorCategory::from(9999);
        assert_eq!(category.message(), "Unknown error (Code: 9999)");
        assert_eq!(category.to_string(), "9999");
    }

    #[test]
    fn recognized_category_label_is_symbolic() {
        assert_eq!(ErrorCategory::from(-3).to_string(), "NO_NETWORK");
    }
}
