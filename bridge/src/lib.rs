// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Integrity bridge API server

/// Bridge config
pub mod config;
pub use config::BridgeConfig;

pub mod api_server;
pub use api_server::ApiServer;

pub mod error;
pub use error::*;

pub mod http;
pub mod integrity;
pub(crate) mod prometheus;
