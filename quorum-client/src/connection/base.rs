use quorum_core::resp::Reply;

use crate::error::ClientResult;

/// A single request/reply channel to one server.
#[allow(async_fn_in_trait)]
pub trait BasicConnection {
    /// Writes one encoded request frame.
    async fn send(&mut self, frame: &[u8]) -> ClientResult<()>;
    /// Blocks until one complete reply frame has been read.
    async fn read_reply(&mut self) -> ClientResult<Reply>;
    async fn is_healthy(&self) -> bool;
}
