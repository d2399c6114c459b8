//! `matsearchctl`: drive a MatSearch server from the terminal.

mod cli;
mod commands;
mod console;
mod render;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use matsearch_client::AppConfig;

use crate::cli::Cli;

fn init_logger() {
    Builder::new()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module("matsearch_client", LevelFilter::Debug)
        .filter_module("matsearchctl", LevelFilter::Debug)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::from_environment().context("loading configuration from environment")?,
    };
    if let Some(server) = &cli.server {
        config = config
            .with_server_url(server.clone())
            .context("invalid --server")?;
    }
    if let Some(timeout) = cli.timeout {
        config = config
            .with_request_timeout(timeout)
            .context("invalid --timeout")?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log::debug!("[matsearchctl] using server {}", config.server_url);

    commands::run(config, cli.command).await
}
