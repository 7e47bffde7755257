// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use serde_json::json;

use integrity_bridge::error::ErrorReply;

mod common;

use common::{StubMode, TestHarness};

fn valid_args() -> serde_json::Value {
    json!({ "nonce": "dGVzdA==", "cloudProjectNumber": "123456789" })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn issued_token_is_relayed_verbatim() -> Result<()> {
    let _ = env_logger::try_init_from_env(env_logger::Env::new().default_filter_or("debug"));

    let harness = TestHarness::new(StubMode::Token("T123")).await?;

    let resp = harness.request_token(valid_args()).await?;

    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await?, "T123");
    assert_eq!(harness.submissions(), 1);

    harness.cleanup().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn typed_platform_error_is_translated() -> Result<()> {
    let harness = TestHarness::new(StubMode::ServiceError {
        code: -3,
        message: "binder transaction failed",
    })
    .await?;

    let resp = harness.request_token(valid_args()).await?;

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_GATEWAY);
    let reply = resp.json::<ErrorReply>().await?;
    assert_eq!(
        reply,
        ErrorReply {
            code: "INTEGRITY_ERROR_NO_NETWORK".to_string(),
            message: "No network connection.".to_string(),
            detail: Some("binder transaction failed".to_string()),
        }
    );

    harness.cleanup().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn future_error_category_stays_deterministic() -> Result<()> {
    let harness = TestHarness::new(StubMode::ServiceError {
        code: 9999,
        message: "from the future",
    })
    .await?;

    let resp = harness.request_token(valid_args()).await?;

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_GATEWAY);
    let reply = resp.json::<ErrorReply>().await?;
    assert_eq!(reply.code, "INTEGRITY_ERROR_9999");
    assert_eq!(reply.message, "Unknown error (Code: 9999)");
    assert_eq!(reply.detail, Some("from the future".to_string()));

    harness.cleanup().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn garbled_platform_reply_is_an_untyped_failure() -> Result<()> {
    let harness = TestHarness::new(StubMode::Garbled).await?;

    let resp = harness.request_token(valid_args()).await?;

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_GATEWAY);
    let reply = resp.json::<ErrorReply>().await?;
    assert_eq!(reply.code, "INTEGRITY_FAILURE");
    assert!(reply.message.contains("response status=500"));
    assert_eq!(reply.detail, None);

    harness.cleanup().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn invalid_arguments_never_reach_the_platform() -> Result<()> {
    let harness = TestHarness::new(StubMode::Token("T123")).await?;

    let resp = harness
        .request_token(json!({ "cloudProjectNumber": "123456789" }))
        .await?;

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let reply = resp.json::<ErrorReply>().await?;
    assert_eq!(reply.code, "INVALID_ARGS");
    assert_eq!(harness.submissions(), 0);

    harness.cleanup().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unknown_methods_are_not_implemented() -> Result<()> {
    let harness = TestHarness::new(StubMode::Token("T123")).await?;

    let resp = harness.call("decodeIntegrityToken", valid_args()).await?;

    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let reply = resp.json::<ErrorReply>().await?;
    assert_eq!(reply.code, "NOT_IMPLEMENTED");
    assert_eq!(harness.submissions(), 0);

    harness.cleanup().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn identical_calls_yield_independent_results() -> Result<()> {
    let harness = TestHarness::new(StubMode::Token("T123")).await?;

    let first = harness.request_token(valid_args()).await?;
    let second = harness.request_token(valid_args()).await?;

    assert_eq!(first.text().await?, "T123");
    assert_eq!(second.text().await?, "T123");
    assert_eq!(harness.submissions(), 2);

    harness.cleanup().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn metrics_are_exported() -> Result<()> {
    let harness = TestHarness::new(StubMode::Token("T123")).await?;

    harness.request_token(valid_args()).await?;
    let report = harness.metrics().await?;

    assert!(report.contains("integrity_token_requests_total"));
    assert!(report.contains("http_requests_total"));

    harness.cleanup().await?;
    Ok(())
}
