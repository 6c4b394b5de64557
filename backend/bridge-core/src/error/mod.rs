pub mod config;
pub mod dispatch;
pub mod ipc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Ipc(#[from] ipc::IpcError),

    #[error(transparent)]
    Dispatch(#[from] dispatch::DispatchError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
