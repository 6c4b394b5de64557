use ipc_bridge::capabilities::{HeadlessDialog, HeadlessShell};
use ipc_bridge::error::BridgeHostError;
use ipc_bridge::logger::initialize as LoggerInitialize;
use ipc_bridge::paths::{log_dir, resolve_config_dir};
use ipc_bridge::smoke;

use bridge_core::app::IpcApp;
use bridge_core::config::BridgeConfig;
use bridge_core::host::{IpcHost, IpcHostOptions};
use bridge_core::loopback::loopback_pair;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The logger may not be up yet.
            eprintln!("{e}");
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), BridgeHostError> {
    let config_dir = resolve_config_dir()?;
    let config = BridgeConfig::load(&config_dir)?;

    let log_dir = log_dir(&config_dir);
    create_dir_all(&log_dir).map_err(|e| BridgeHostError::Host {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir, &config.logging)?;

    info!("ipc-bridge starting");
    info!("Config directory: {}", config_dir.display());

    let (backend, frontend) = loopback_pair();
    let shell = Arc::new(HeadlessShell::default());

    let host = IpcHost::new();
    host.startup(
        IpcHostOptions::new(Arc::new(backend.clone()))
            .with_versions(config.host.process_versions())
            .with_dialog(Arc::new(HeadlessDialog))
            .with_window_controller(shell.clone())
            .with_tray_controller(shell.clone())
            .with_update_checker(shell.clone()),
    )?;

    let app = IpcApp::new();
    app.startup(Arc::new(frontend))?;

    let report = smoke::run(&host, &app, config.app.invoke_timeout()).await;

    app.shutdown();
    host.shutdown();
    backend.disconnect_all();

    let report = report?;
    info!(
        "Bridge ok: {} version entries, message box answered {}, {} app notification(s), {} update check(s)",
        report.versions.len(),
        report.message_box.response,
        report.app_notifications,
        shell.update_checks()
    );
    Ok(())
}
