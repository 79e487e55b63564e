use std::time::Duration;

use quorum_core::error::RespError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection closed by server")]
    Closed,
    #[error("No reply within {0:?}")]
    Timeout(Duration),
    #[error("Protocol error: {0}")]
    Protocol(#[from] RespError),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Usage error: {0}")]
    Usage(&'static str),
    #[error("Invalid url '{0}'")]
    InvalidUrl(String),
    #[error("No configuration")]
    NoConfig,
}

impl ClientError {
    /// True for failures of the underlying connection.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Io(_) | ClientError::Closed | ClientError::Timeout(_)
        )
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
