// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    config::ProviderConfig,
    error::{Error, ProviderError, Result},
    remote::RemoteProvider,
};

/// An attestation request bound to one project and nonce.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub cloud_project_number: i64,
    pub nonce: String,
}

/// Attestation response of the platform service. The token is opaque and
/// never parsed here.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Interface to the platform integrity token service.
///
/// Provider backends implement this interface; the token issuance itself
/// stays a black box behind it.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Bind an attestation request to the given project and nonce.
    fn build_request(&self, cloud_project_number: i64, nonce: &str)
        -> anyhow::Result<TokenRequest>;

    /// Submit the request and resolve with the token or a typed/untyped
    /// failure. Implementations make exactly one attempt.
    async fn submit(
        &self,
        request: TokenRequest,
    ) -> std::result::Result<TokenResponse, ProviderError>;
}

/// Bridged argument map of `requestIntegrityToken`.
///
/// Both fields are optional at the serde layer so that missing keys are
/// reported as invalid arguments instead of a decode failure.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TokenCallArgs {
    nonce: Option<String>,
    cloud_project_number: Option<String>,
}

/// Integrity request adapter.
#[derive(Clone)]
pub struct IntegrityService {
    /// Provider backend. No other state is held across calls.
    inner: Arc<dyn TokenProvider>,
}

impl IntegrityService {
    /// Create and initialize the configured provider backend.
    pub async fn new(config: ProviderConfig) -> Result<Self> {
        let inner = match config {
            ProviderConfig::Remote(cfg) => {
                info!("using remote integrity provider [{}]", cfg.base_url);
                let remote =
                    RemoteProvider::new(cfg).map_err(|e| Error::Initialization { source: e })?;
                Arc::new(remote) as _
            }
        };

        Ok(Self { inner })
    }

    /// Handle a bridged `requestIntegrityToken` call.
    ///
    /// `body` is the JSON argument map. Returns the attestation token
    /// verbatim, or exactly one of the taxonomy failures. Arguments are
    /// validated in full before the provider is contacted.
    pub async fn request_token(&self, body: &[u8]) -> Result<String> {
        let args: TokenCallArgs =
            serde_json::from_slice(body).map_err(|e| Error::InvalidArguments {
                message: format!("malformed argument map: {e}"),
            })?;

        let (Some(nonce), Some(cloud_project_number)) = (args.nonce, args.cloud_project_number)
        else {
            return Err(Error::InvalidArguments {
                message: "Nonce or Cloud Project Number is missing".to_string(),
            });
        };

        if nonce.is_empty() {
            return Err(Error::InvalidArguments {
                message: "Nonce must not be empty".to_string(),
            });
        }

        let cloud_project_number: i64 =
            cloud_project_number
                .parse()
                .map_err(|_| Error::InvalidArguments {
                    message: format!(
                        "Cloud Project Number {cloud_project_number:?} is not a 64-bit integer"
                    ),
                })?;

        debug!("requesting integrity token for project {cloud_project_number}");

        let request = self
            .inner
            .build_request(cloud_project_number, &nonce)
            .map_err(|source| Error::Exception { source })?;

        match self.inner.submit(request).await {
            Ok(response) => Ok(response.token),
            Err(ProviderError::Service { category, detail }) => {
                Err(Error::Service { category, detail })
            }
            Err(ProviderError::Transport(source)) => Err(Error::Failure {
                message: source.to_string(),
            }),
        }
    }
}
