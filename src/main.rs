// Network State - Main Entry Point
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Network State
//!
//! Network state reconciliation engine and connectivity monitor for
//! Linux. Consumes snapshots from the network-management daemon, keeps a
//! consistent in-memory model, and probes internet reachability.

use std::env;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

mod dbus_client;
mod events;
mod models;
mod services;
mod state;

use dbus_client::DaemonClient;
use events::EventBus;
use models::AppConfig;
use services::connectivity::{self, ConnectivityChecker};
use state::NetworkState;

/// Human-readable application name.
pub const APP_NAME: &str = "Network State";

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print version information and exit.
fn print_version() {
    println!("{} {}", APP_NAME, VERSION);
    println!("Copyright (C) 2026 Christos A. Daggas");
    println!("License: MIT");
    println!();
    println!("Network state reconciliation engine and connectivity monitor for Linux.");
}

/// Print help information and exit.
fn print_help() {
    println!(
        "Usage: {} [OPTIONS]",
        env::args().next().unwrap_or_else(|| "network-state".to_string())
    );
    println!();
    println!("Network state reconciliation engine and connectivity monitor for Linux.");
    println!();
    println!("Options:");
    println!("  -h, --help       Show this help message and exit");
    println!("  -v, --version    Show version information and exit");
    println!("  -d, --debug      Enable debug logging");
    println!();
    println!("Environment variables:");
    println!("  RUST_LOG         Set log level (trace, debug, info, warn, error)");
    println!();
    println!("Report bugs to: https://github.com/christosdaggas/network-state/issues");
}

#[tokio::main]
async fn main() {
    // Parse command-line arguments before anything else
    let args: Vec<String> = env::args().collect();
    let mut debug_mode = false;

    for arg in &args[1..] {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-v" | "--version" => {
                print_version();
                return;
            }
            "-d" | "--debug" => {
                debug_mode = true;
            }
            _ => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Try '--help' for more information.");
                std::process::exit(1);
            }
        }
    }

    let config = AppConfig::load_or_default();

    // Initialize logging with appropriate level
    let log_level = if debug_mode {
        tracing::Level::DEBUG
    } else {
        config
            .log_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .init();

    info!("Starting {} v{}", APP_NAME, VERSION);

    // State context: the facade lives on this task; all reconciliation
    // is routed through it.
    let bus = EventBus::new();
    let mut network = NetworkState::new(bus.clone());

    // Probe context: the prober runs on its own worker and reports one
    // boolean per probe back into the state context.
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<bool>(8);
    match ConnectivityChecker::new(&config.connectivity) {
        Ok(checker) => {
            let interval = Duration::from_secs(config.connectivity.check_interval_secs);
            network.attach_prober(connectivity::spawn(checker, interval, outcome_tx));
        }
        Err(e) => {
            warn!("Connectivity prober unavailable: {}", e);
        }
    }

    // Command client for forwarding front-end requests to the daemon.
    let mut client = DaemonClient::new();
    if let Err(e) = client.connect().await {
        if e.is_daemon_not_running() {
            warn!("Network daemon unreachable, commands disabled: {}", e);
        } else {
            warn!("Daemon client setup failed: {}", e);
        }
    }

    // Log all change notifications; front-ends subscribe the same way.
    let mut event_rx = bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            debug!("event: {:?}", event);
        }
    });

    loop {
        tokio::select! {
            outcome = outcome_rx.recv() => {
                match outcome {
                    Some(reachable) => network.set_connectivity(reachable),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }
}
