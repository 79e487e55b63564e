use std::{net::SocketAddr, time::Duration};

use bytes::BytesMut;
use quorum_core::resp::Reply;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};
use tracing::{debug, warn};

use crate::{
    connection::base::BasicConnection,
    error::{ClientError, ClientResult},
};

#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    buffer: BytesMut,
    read_timeout: Option<Duration>,
    // Set once an exchange failed midway; the stream can no longer be
    // trusted to pair requests with replies.
    broken: bool,
}

impl TcpConnection {
    pub async fn connect(to: SocketAddr) -> ClientResult<Self> {
        let stream = TcpStream::connect(to).await.map_err(ClientError::Io)?;

        stream.set_nodelay(true)?;
        debug!("Connected to {}", to);

        Ok(TcpConnection {
            stream,
            buffer: BytesMut::with_capacity(4 * 1024),
            read_timeout: None,
            broken: false,
        })
    }

    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn peer_addr(&self) -> ClientResult<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    fn mark_broken<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            warn!("Connection marked broken: {}", e);
            self.broken = true;
        }

        result
    }

    async fn fill_buffer(&mut self) -> ClientResult<()> {
        let read = self.stream.read_buf(&mut self.buffer);

        let n = match self.read_timeout {
            Some(limit) => timeout(limit, read)
                .await
                .map_err(|_| ClientError::Timeout(limit))??,
            None => read.await?,
        };

        if n == 0 {
            return Err(ClientError::Closed);
        }

        Ok(())
    }

    async fn next_reply(&mut self) -> ClientResult<Reply> {
        loop {
            if let Some(reply) = Reply::decode(&mut self.buffer)? {
                debug!("Received {} reply", reply.kind());

                return Ok(reply);
            }

            self.fill_buffer().await?;
        }
    }
}

impl BasicConnection for TcpConnection {
    async fn send(&mut self, frame: &[u8]) -> ClientResult<()> {
        if self.broken {
            return Err(ClientError::Closed);
        }

        let result = self.stream.write_all(frame).await.map_err(ClientError::Io);
        self.mark_broken(result)?;
        debug!("Sent frame of {} bytes", frame.len());

        Ok(())
    }

    async fn read_reply(&mut self) -> ClientResult<Reply> {
        if self.broken {
            return Err(ClientError::Closed);
        }

        let result = self.next_reply().await;
        self.mark_broken(result)
    }

    async fn is_healthy(&self) -> bool {
        !self.broken
            && matches!(self.stream.take_error(), Ok(None))
            && self.stream.peer_addr().is_ok()
    }
}
