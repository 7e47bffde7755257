// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Histogram, HistogramOpts, IntGauge, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Build info of the running bridge.
    pub(crate) static ref BUILD_INFO: Counter = {
        let opts = Opts::new("bridge_build_info", "Build information of the running bridge")
            .const_label("version", env!("CARGO_PKG_VERSION"));
        Counter::with_opts(opts).unwrap()
    };

    /// Bridge Web Server Requests Metrics
    pub(crate) static ref REQUEST_TOTAL: Counter = {
        let requests_opts = Opts::new(
            "http_requests_total",
            "Total HTTP requests count",
        );
        Counter::with_opts(requests_opts).unwrap()
    };

    /// Bridge Web Server Requests Metrics
    pub(crate) static ref REQUEST_DURATION: Histogram = {
        let requests_duration_opts = HistogramOpts::new(
                "http_request_duration_seconds",
                "Distribution of request handling duration",
        ).buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.5, 1.0]);
        Histogram::with_opts(requests_duration_opts).unwrap()
    };

    /// Bridge Web Server In-Flight Requests
    pub(crate) static ref ACTIVE_CONNECTIONS: IntGauge = {
        let opts = Opts::new(
            "http_active_connections",
            "Number of bridge requests currently in flight",
        );
        IntGauge::with_opts(opts).unwrap()
    };

    /// Bridge Token Requests Total
    pub(crate) static ref TOKEN_REQUESTS: Counter = {
        let opts = Opts::new(
            "integrity_token_requests_total",
            "Total count of bridged integrity token requests",
        );
        Counter::with_opts(opts).unwrap()
    };

    /// Bridge Tokens Issued Total
    pub(crate) static ref TOKENS_ISSUED: Counter = {
        let opts = Opts::new(
            "integrity_tokens_issued_total",
            "Total count of attestation tokens relayed to callers",
        );
        Counter::with_opts(opts).unwrap()
    };

    /// Bridge Token Failures Total
    pub(crate) static ref TOKEN_FAILURES: CounterVec = {
        let opts = Opts::new(
            "integrity_token_failures_total",
            "Total count of failed integrity token requests",
        );
        CounterVec::new(opts, &["kind"]).unwrap()
    };

    /// Prometheus instance to get the metrics
    static ref INSTANCE: Registry = {
        let registry = Registry::default();

        registry.register(Box::new(BUILD_INFO.clone())).unwrap();
        registry.register(Box::new(REQUEST_TOTAL.clone())).unwrap();
        registry.register(Box::new(REQUEST_DURATION.clone())).unwrap();
        registry.register(Box::new(ACTIVE_CONNECTIONS.clone())).unwrap();
        registry.register(Box::new(TOKEN_REQUESTS.clone())).unwrap();
        registry.register(Box::new(TOKENS_ISSUED.clone())).unwrap();
        registry.register(Box::new(TOKEN_FAILURES.clone())).unwrap();

        registry
    };
}

pub(crate) fn export_metrics() -> Result<String, prometheus::Error> {
    let mut metrics_buffer = String::new();
    TextEncoder::new().encode_utf8(&INSTANCE.gather(), &mut metrics_buffer)?;
    Ok(metrics_buffer)
}
