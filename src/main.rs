/*
 * Copyright 2026 Mocknest Team
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use anyhow::Context;
use clap::Parser;
use mocknest::config::{Config, ConfigLoader};
use mocknest::mock::MockEngine;
use mocknest::server::run_server;
use mocknest::telemetry::init_tracing;
use mocknest::utils::shutdown_signal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/mocknest.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if args.config.exists() {
        ConfigLoader::from_file(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?
    } else {
        Config::default()
    };

    init_tracing(&config.logging)?;

    if !args.config.exists() {
        warn!(path = ?args.config, "Config file not found, using defaults");
    }

    let engine = Arc::new(MockEngine::new(&config.mock));

    if !config.seeds.is_empty() {
        let seeded = engine
            .registry
            .import(config.seeds.clone())
            .context("Failed to register seed configs")?;
        info!(count = seeded.len(), "Seed configs registered");
    }

    let server = run_server(config, engine).await?;

    info!("Mocknest server is running");
    info!("Press Ctrl+C to shutdown");

    let server_handle = server.handle();
    tokio::select! {
        _ = server => {
            info!("Server stopped");
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
            server_handle.stop(true).await;
            info!("Server shutdown complete");
        }
    }

    Ok(())
}
