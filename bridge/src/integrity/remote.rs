// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use async_trait::async_trait;
use derivative::Derivative;
use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;

use super::backend::{TokenProvider, TokenRequest, TokenResponse};
use super::code::ErrorCategory;
use super::error::ProviderError;

const TOKEN_PATH: &str = "/v1/integrity:requestToken";

/// Typed failure body of the remote integrity endpoint.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ServiceErrorBody {
    error_code: i32,
    message: Option<String>,
}

#[derive(Clone, Derivative, Deserialize, PartialEq)]
#[derivative(Debug)]
pub struct RemoteProviderConfig {
    pub base_url: String,
    #[derivative(Debug = "ignore")]
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Provider backend reaching a remote integrity endpoint over HTTP(S).
pub struct RemoteProvider {
    config: RemoteProviderConfig,
    client: reqwest::Client,
}

impl RemoteProvider {
    pub fn new(config: RemoteProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build integrity HTTP client")?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl TokenProvider for RemoteProvider {
    fn build_request(
        &self,
        cloud_project_number: i64,
        nonce: &str,
    ) -> Result<TokenRequest> {
        Ok(TokenRequest {
            cloud_project_number,
            nonce: nonce.to_string(),
        })
    }

    async fn submit(
        &self,
        request: TokenRequest,
    ) -> std::result::Result<TokenResponse, ProviderError> {
        let url = format!("{}{TOKEN_PATH}", self.config.base_url);
        debug!("POST integrity token request to {url}");

        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

        let mut req = self
            .client
            .post(&url)
            .header(USER_AGENT, user_agent)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&request);
        if let Some(api_key) = &self.config.api_key {
            req = req.header("x-api-key", api_key);
        }

        let resp = req
            .send()
            .await
            .context("Failed to POST integrity token request")?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp
                .json::<ServiceErrorBody>()
                .await
                .with_context(|| format!("integrity request failed: response status={status}"))?;

            return Err(ProviderError::Service {
                category: ErrorCategory::from(body.error_code),
                detail: body.message,
            });
        }

        let response = resp
            .json::<TokenResponse>()
            .await
            .context("Failed to decode integrity token response")?;

        Ok(response)
    }
}
