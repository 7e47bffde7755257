// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Result;
use serde_json::json;

use integrity_bridge::config::{BridgeConfig, HttpServerConfig};
use integrity_bridge::integrity::config::ProviderConfig;
use integrity_bridge::integrity::remote::RemoteProviderConfig;
use integrity_bridge::ApiServer;

/// Canned behavior of the stub platform service.
pub enum StubMode {
    /// Resolve every submission with this token.
    Token(&'static str),
    /// Fail every submission with a categorized error body.
    ServiceError { code: i32, message: &'static str },
    /// Fail every submission without a decodable category.
    Garbled,
}

pub struct StubState {
    mode: StubMode,
    submissions: AtomicUsize,
}

async fn stub_token_endpoint(state: web::Data<Arc<StubState>>, _body: web::Bytes) -> HttpResponse {
    state.submissions.fetch_add(1, Ordering::SeqCst);
    match &state.mode {
        StubMode::Token(token) => HttpResponse::Ok().json(json!({ "token": token })),
        StubMode::ServiceError { code, message } => HttpResponse::Conflict().json(json!({
            "errorCode": code,
            "message": message,
        })),
        StubMode::Garbled => HttpResponse::InternalServerError().body("not json"),
    }
}

// Internal state of tests
pub struct TestHarness {
    bridge_url: String,
    stub: Arc<StubState>,
    bridge_server_handle: actix_web::dev::ServerHandle,
    stub_server_handle: actix_web::dev::ServerHandle,
}

fn reserve_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

impl TestHarness {
    pub async fn new(mode: StubMode) -> Result<TestHarness> {
        let stub = Arc::new(StubState {
            mode,
            submissions: AtomicUsize::new(0),
        });

        // Stub platform service standing in for the integrity endpoint.
        let stub_port = reserve_port()?;
        let stub_state = stub.clone();
        let stub_server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(stub_state.clone()))
                .route(
                    "/v1/integrity:requestToken",
                    web::post().to(stub_token_endpoint),
                )
        })
        .bind(("127.0.0.1", stub_port))?
        .run();
        let stub_server_handle = stub_server.handle();
        tokio::spawn(stub_server);

        let bridge_port = reserve_port()?;
        let bridge_config = BridgeConfig {
            integrity: ProviderConfig::Remote(RemoteProviderConfig {
                base_url: format!("http://127.0.0.1:{stub_port}"),
                api_key: None,
            }),
            http_server: HttpServerConfig {
                sockets: vec![format!("127.0.0.1:{bridge_port}").parse()?],
                private_key: None,
                certificate: None,
                insecure_http: true,
                payload_request_size: 2,
            },
        };

        // Spawn the bridge server
        let api_server = ApiServer::new(bridge_config).await?;

        let bridge_server = api_server.server()?;
        let bridge_server_handle = bridge_server.handle();
        tokio::spawn(bridge_server);

        Ok(TestHarness {
            bridge_url: format!("http://127.0.0.1:{bridge_port}"),
            stub,
            bridge_server_handle,
            stub_server_handle,
        })
    }

    /// How often the stub platform service was reached.
    pub fn submissions(&self) -> usize {
        self.stub.submissions.load(Ordering::SeqCst)
    }

    pub async fn call(&self, method: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        let resp = reqwest::Client::new()
            .post(format!("{}/integrity/v0/{method}", self.bridge_url))
            .json(&body)
            .send()
            .await?;

        Ok(resp)
    }

    pub async fn request_token(&self, body: serde_json::Value) -> Result<reqwest::Response> {
        self.call("requestIntegrityToken", body).await
    }

    pub async fn metrics(&self) -> Result<String> {
        let report = reqwest::get(format!("{}/metrics", self.bridge_url))
            .await?
            .text()
            .await?;

        Ok(report)
    }

    pub async fn cleanup(&self) -> Result<()> {
        self.bridge_server_handle.stop(true).await;
        self.stub_server_handle.stop(true).await;

        Ok(())
    }
}
