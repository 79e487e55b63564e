use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RespError {
    #[error("Malformed frame: {0}")]
    Decode(String),
    #[error("Failed to encode request: {0}")]
    Encode(String),
    #[error("Frame too large: {0} bytes buffered")]
    TooLarge(usize),
    #[error("Reply nested too deeply")]
    TooDeep,
    #[error("Expected {expected} reply, got {actual}")]
    UnexpectedReply {
        expected: &'static str,
        actual: &'static str,
    },
}
