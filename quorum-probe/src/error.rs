use quorum_client::error::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Quorum probe failed: {0}")]
    Client(#[from] ClientError),
}
