//! Start-up exchange proving both directions of the bridge work.

use crate::error::BridgeHostError;

use bridge_core::app::IpcApp;
use bridge_core::error::ipc::IpcError;
use bridge_core::host::IpcHost;
use bridge_core::socket::IpcListener;

use common::ErrorLocation;
use models::dialog::{MessageBoxOptions, MessageBoxReturnValue};
use models::{AppNotification, HostNotification, IpcAppChannel, ProcessVersions};

use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use log::info;
use serde_json::json;

pub const SMOKE_MESSAGE: &str = "ipc-bridge is running";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    pub versions: ProcessVersions,
    pub message_box: MessageBoxReturnValue,
    /// `ipcApp-notify` messages the app saw during the exchange.
    pub app_notifications: usize,
}

/// Runs `ping`, a message box, two host notifications and one app notification.
///
/// Every request is bounded by `invoke_timeout` when given.
///
/// # Errors
///
/// [`BridgeHostError::Ipc`] for any failed call, [`BridgeHostError::Timeout`] when one does
/// not answer in time.
pub async fn run(
    host: &IpcHost,
    app: &IpcApp,
    invoke_timeout: Option<Duration>,
) -> Result<SmokeReport, BridgeHostError> {
    let versions = bounded(invoke_timeout, "ping", app.host_functions().ping()).await?;
    info!("Host answered ping: {:?}", versions);

    let message_box = bounded(
        invoke_timeout,
        "showMessageBox",
        app.dialog().show_message_box(MessageBoxOptions {
            message: SMOKE_MESSAGE.to_string(),
            buttons: vec!["OK".to_string()],
            ..MessageBoxOptions::default()
        }),
    )
    .await?;

    app.notify_host(HostNotification::NotifyHost.as_str(), vec![json!("smoke")])?;
    app.notify_host(HostNotification::CheckForUpdates.as_str(), Vec::new())?;

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    let token = app.add_listener(
        IpcAppChannel::AppNotify.as_str(),
        IpcListener::new(move |_event, _args| {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    )?;
    host.notify_frontend(AppNotification::NotifyApp.as_str(), vec![json!("smoke")])?;

    // Replies share the path of earlier messages, so this one arrives after them.
    bounded(invoke_timeout, "ping", app.host_functions().ping()).await?;
    token.remove();

    Ok(SmokeReport {
        versions,
        message_box,
        app_notifications: seen.load(Ordering::SeqCst),
    })
}

async fn bounded<T, F>(
    invoke_timeout: Option<Duration>,
    what: &str,
    call: F,
) -> Result<T, BridgeHostError>
where
    F: Future<Output = Result<T, IpcError>>,
{
    let Some(limit) = invoke_timeout else {
        return Ok(call.await?);
    };

    match tokio::time::timeout(limit, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(BridgeHostError::Timeout {
            message: format!("'{what}' did not answer within {} ms", limit.as_millis()),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
