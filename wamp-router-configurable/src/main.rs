/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

mod config;
mod hosted;

use crate::config::Config;
use crate::hosted::HostedModel;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wamp_router::Router;

#[derive(Parser)]
#[command()]
struct RouterArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    info!("Started wamp-router-configurable");

    let args = RouterArgs::parse();
    let config = Config::load(&args.config)?;

    let router = Router::new(&config.router.name);

    // Models publish only while they are alive.
    let mut models = Vec::new();
    for realm in &config.realms {
        for model_config in &realm.models {
            let model = HostedModel::from_config(model_config);
            router
                .attach_model(&realm.name, &model_config.uri, model.data_model())
                .await?;
            models.push(model);
        }

        for bridge in &realm.bridges {
            router
                .add_target(
                    &realm.name,
                    &bridge.uri,
                    &bridge.target_realm,
                    router.bridge(),
                )
                .await?;
        }
    }

    info!(
        router = router.name(),
        realms = config.realms.len(),
        models = models.len(),
        topics = router.topic_count().await,
        "router ready"
    );

    tokio::signal::ctrl_c().await?;

    info!(router = router.name(), "shutting down");
    Ok(())
}
