//! 统一的错误处理
use shapes_core::{ChainError, ConfigError};
use thiserror::Error;
use tonic::Status;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load config file: {0}")]
    ConfigFile(String),

    #[error("Invalid endpoint uri: {0}")]
    InvalidUri(String),

    #[error("Connection failed: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Interceptor chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("{}", format_status(.0))]
    Rpc(Status),
}

impl From<Status> for ClientError {
    fn from(value: Status) -> Self {
        Self::Rpc(value)
    }
}

impl ClientError {
    /// RPC 返回的 gRPC 状态，本地错误返回 `None`。
    pub fn status(&self) -> Option<&Status> {
        match self {
            ClientError::Rpc(status) => Some(status),
            _ => None,
        }
    }
}

fn format_status(status: &Status) -> String {
    if status.message().is_empty() {
        format!("RPC failed: {:?}", status.code())
    } else {
        format!("RPC failed: {:?}: {}", status.code(), status.message())
    }
}
