// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! A simple bridge client for test.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use log::debug;
use rand::{thread_rng, Rng};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

/// Number of bytes in a generated nonce.
const NONCE_SIZE_BYTES: usize = 32;

#[derive(Parser)]
#[clap(name = "Bridge client")]
#[clap(author, version, about = "A command line client tool for the integrity bridge API.", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// The bridge server root URL.
    #[clap(long, value_parser, default_value_t = String::from("http://127.0.0.1:8080"))]
    url: String,

    /// The bridge HTTPS server custom root certificate file path (PEM format)
    #[clap(long, value_parser)]
    cert_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Request an attestation token
    RequestToken {
        /// Base64 nonce to bind into the attestation request.
        ///
        /// If NOT set this argument,
        /// a random 32-byte nonce is generated and encoded internally.
        #[clap(long, value_parser)]
        nonce: Option<String>,

        /// Cloud project number authorized to request attestations.
        #[clap(long, value_parser)]
        cloud_project_number: u64,
    },
}

/// Failure envelope of the bridge API.
#[derive(Deserialize)]
struct ErrorReply {
    code: String,
    message: String,
    detail: Option<String>,
}

/// Create a nonce and return as a base-64 encoded string.
fn make_nonce() -> Result<String> {
    let mut nonce: Vec<u8> = vec![0; NONCE_SIZE_BYTES];

    thread_rng()
        .try_fill(&mut nonce[..])
        .map_err(anyhow::Error::from)?;

    Ok(STANDARD.encode(&nonce))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    let mut builder = reqwest::Client::builder();
    if let Some(cert_file) = &cli.cert_file {
        let cert = std::fs::read(cert_file).context("read custom root certificate")?;
        builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&cert)?);
    }
    let client = builder.build()?;

    match cli.command {
        Commands::RequestToken {
            nonce,
            cloud_project_number,
        } => {
            let nonce = match nonce {
                Some(nonce) => nonce,
                None => make_nonce()?,
            };
            debug!("nonce: {nonce}");

            let resp = client
                .post(format!("{}/integrity/v0/requestIntegrityToken", cli.url))
                .json(&json!({
                    "nonce": nonce,
                    "cloudProjectNumber": cloud_project_number.to_string(),
                }))
                .send()
                .await
                .context("POST requestIntegrityToken")?;

            let status = resp.status();
            if !status.is_success() {
                let reply = resp
                    .json::<ErrorReply>()
                    .await
                    .with_context(|| format!("request failed with status {status}"))?;

                match reply.detail {
                    Some(detail) => bail!("[{}] {} ({detail})", reply.code, reply.message),
                    None => bail!("[{}] {}", reply.code, reply.message),
                }
            }

            let token = resp.text().await?;
            println!("{token}");
        }
    }

    Ok(())
}
