// Copyright (c) 2025 by the Integrity Bridge Authors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Integrity Bridge Service

use anyhow::Result;
use std::path::Path;

use clap::Parser;
use integrity_bridge::{
    config::{BridgeConfig, Cli},
    ApiServer,
};
use log::{debug, info};

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    info!("Using config file {}", cli.config_file);
    let bridge_config = BridgeConfig::try_from(Path::new(&cli.config_file))?;

    debug!("Config (sensitive fields are omitted): {:#?}", bridge_config);

    let api_server = ApiServer::new(bridge_config).await?;

    api_server.serve().await?;
    Ok(())
}
