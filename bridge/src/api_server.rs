// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

use actix_web::{
    http::header::ContentType, middleware, web, App, HttpRequest, HttpResponse, HttpServer,
};
use log::info;

use crate::{
    config::BridgeConfig,
    integrity::IntegrityService,
    prometheus::{
        ACTIVE_CONNECTIONS, BUILD_INFO, REQUEST_DURATION, REQUEST_TOTAL, TOKENS_ISSUED,
        TOKEN_FAILURES, TOKEN_REQUESTS,
    },
    Error, Result,
};

const INTEGRITY_PREFIX: &str = "/integrity/v0";

macro_rules! bridge_path {
    ($path:expr) => {
        format!("{}/{}", INTEGRITY_PREFIX, $path)
    };
}

/// The bridge API server
#[derive(Clone)]
pub struct ApiServer {
    integrity_service: IntegrityService,
    config: BridgeConfig,
}

impl ApiServer {
    pub async fn new(config: BridgeConfig) -> Result<Self> {
        let integrity_service = IntegrityService::new(config.integrity.clone()).await?;

        BUILD_INFO.inc();

        Ok(Self {
            integrity_service,
            config,
        })
    }

    /// Start the HTTP server and serve API requests.
    pub async fn serve(self) -> Result<()> {
        actix::spawn(self.server()?)
            .await
            .map_err(|e| Error::HTTPFailed { source: e.into() })?
            .map_err(|e| Error::HTTPFailed { source: e.into() })
    }

    /// Setup API server
    pub fn server(self) -> Result<actix_web::dev::Server> {
        info!(
            "Starting HTTP{} server at {:?}",
            if !self.config.http_server.insecure_http {
                "S"
            } else {
                ""
            },
            self.config.http_server.sockets
        );

        let http_config = self.config.http_server.clone();

        #[allow(clippy::redundant_closure)]
        let http_server = HttpServer::new({
            move || {
                let api_server = self.clone();
                App::new()
                    .wrap(middleware::Logger::default())
                    .wrap(middleware::from_fn(request_metrics_middleware))
                    .app_data(web::Data::new(api_server))
                    .app_data(web::PayloadConfig::new(
                        (1024 * 1024 * http_config.payload_request_size) as usize,
                    ))
                    .service(web::resource([bridge_path!("{method}")]).route(web::post().to(api)))
                    .service(
                        web::resource("/metrics")
                            .route(web::get().to(metrics_handler))
                            .route(web::post().to(|| HttpResponse::MethodNotAllowed())),
                    )
            }
        });

        if !http_config.insecure_http {
            let tls_server = http_server
                .bind_openssl(
                    &http_config.sockets[..],
                    crate::http::tls_config(&http_config)
                        .map_err(|e| Error::HTTPSFailed { source: e })?,
                )
                .map_err(|e| Error::HTTPSFailed { source: e.into() })?;

            return Ok(tls_server.run());
        }

        Ok(http_server
            .bind(&http_config.sockets[..])
            .map_err(|e| Error::HTTPFailed { source: e.into() })?
            .run())
    }
}

/// Bridged method dispatch. One case per supported method; unknown method
/// names are a distinct failure rather than a silent one.
pub(crate) async fn api(
    request: HttpRequest,
    body: web::Bytes,
    core: web::Data<ApiServer>,
) -> Result<HttpResponse> {
    let method = request
        .match_info()
        .get("method")
        .ok_or(Error::InvalidRequestPath {
            path: request.path().to_string(),
        })?;

    match method {
        "requestIntegrityToken" => {
            TOKEN_REQUESTS.inc();
            let token = core
                .integrity_service
                .request_token(&body)
                .await
                .inspect_err(|e| TOKEN_FAILURES.with_label_values(&[e.as_ref()]).inc())?;

            TOKENS_ISSUED.inc();
            Ok(HttpResponse::Ok()
                .content_type(ContentType::plaintext())
                .body(token))
        }
        method => Err(Error::MethodNotImplemented {
            method: method.to_string(),
        }),
    }
}

pub(crate) async fn metrics_handler(
    _request: HttpRequest,
    _core: web::Data<ApiServer>,
) -> Result<HttpResponse> {
    let report =
        crate::prometheus::export_metrics().map_err(|e| Error::PrometheusError { source: e })?;
    Ok(HttpResponse::Ok().body(report))
}

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;

async fn request_metrics_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> std::result::Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let start = actix::clock::Instant::now();

    // Requests like /metrics are left out so they don't distort the
    // bridge's own numbers.
    let is_bridge_req = req.request().path().starts_with(INTEGRITY_PREFIX);
    if is_bridge_req {
        ACTIVE_CONNECTIONS.inc();
        REQUEST_TOTAL.inc();
    }

    let res = next.call(req).await?;

    if is_bridge_req {
        REQUEST_DURATION.observe(start.elapsed().as_secs_f64());
        ACTIVE_CONNECTIONS.dec();
    }

    Ok(res)
}
