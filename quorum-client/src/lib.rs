pub mod connection;
pub mod error;
pub mod quorum;
pub mod url;

use std::{net::SocketAddr, time::Duration};

use crate::{
    connection::{BasicConnection, TcpConnection},
    error::{ClientError, ClientResult},
};
use quorum_core::{
    command::{Command, ProtocolCommand},
    error::RespError,
    resp::{Reply, encode_request},
};
use tracing::debug;

pub use quorum::{QuorumClient, WAIT_QUORUM};

/// Tracks whether replies are read immediately or deferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Pipeline { pending: usize },
    Transaction { queued: usize },
}

pub struct Client<C = TcpConnection> {
    connection: C,
    mode: Mode,
    broken: bool,
}

impl Client<TcpConnection> {
    pub async fn connect<T: Into<SocketAddr>>(server_addr: T) -> ClientResult<Self> {
        ClientBuilder::new()
            .with_server_addr(server_addr)
            .build()
            .await
    }
}

impl<C: BasicConnection> Client<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            mode: Mode::Normal,
            broken: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    /// True once a transport or framing failure left replies unaccounted
    /// for. A broken client refuses every further exchange.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub async fn is_healthy(&self) -> bool {
        !self.broken && self.connection.is_healthy().await
    }

    /// Fails when replies are currently being deferred.
    pub fn ensure_not_batched(&self) -> ClientResult<()> {
        match self.mode {
            Mode::Normal => Ok(()),
            Mode::Pipeline { .. } => {
                Err(ClientError::Usage("command not supported in pipeline mode"))
            }
            Mode::Transaction { .. } => Err(ClientError::Usage(
                "command not supported in transaction mode",
            )),
        }
    }

    pub async fn send_command(
        &mut self,
        command: &dyn ProtocolCommand,
        args: &[&[u8]],
    ) -> ClientResult<()> {
        if self.broken {
            return Err(ClientError::Closed);
        }

        let frame = encode_request(command, args)?;
        debug!(
            "Sending {} with {} argument(s)",
            String::from_utf8_lossy(command.raw()),
            args.len()
        );

        let result = self.connection.send(&frame).await;
        self.track(result)
    }

    pub async fn read_reply(&mut self) -> ClientResult<Reply> {
        if self.broken {
            return Err(ClientError::Closed);
        }

        let result = self.connection.read_reply().await;
        self.track(result)
    }

    fn track<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            debug!("Client terminated after failed exchange: {}", e);
            self.broken = true;
            self.mode = Mode::Normal;
        }

        result
    }

    pub async fn read_integer_reply(&mut self) -> ClientResult<i64> {
        match self.read_reply().await? {
            Reply::Error(message) => Err(ClientError::Server(message)),
            reply => Ok(reply.into_integer()?),
        }
    }

    /// Sends one command and waits for its reply.
    pub async fn execute(
        &mut self,
        command: &dyn ProtocolCommand,
        args: &[&[u8]],
    ) -> ClientResult<Reply> {
        self.ensure_not_batched()?;
        self.send_command(command, args).await?;

        match self.read_reply().await? {
            Reply::Error(message) => Err(ClientError::Server(message)),
            reply => Ok(reply),
        }
    }

    pub async fn ping(&mut self) -> ClientResult<()> {
        match self.execute(&Command::Ping, &[]).await? {
            Reply::Simple(status) if status == "PONG" => Ok(()),
            other => Err(unexpected("PONG", &other)),
        }
    }

    pub async fn select(&mut self, db: i64) -> ClientResult<()> {
        let db = db.to_string();

        match self.execute(&Command::Select, &[db.as_bytes()]).await? {
            Reply::Simple(status) if status == "OK" => Ok(()),
            other => Err(unexpected("OK", &other)),
        }
    }

    pub fn pipeline(&mut self) -> ClientResult<()> {
        self.ensure_not_batched()?;
        self.mode = Mode::Pipeline { pending: 0 };

        Ok(())
    }

    /// Adds a command to the current pipeline or transaction.
    pub async fn queue(
        &mut self,
        command: &dyn ProtocolCommand,
        args: &[&[u8]],
    ) -> ClientResult<()> {
        match self.mode {
            Mode::Normal => Err(ClientError::Usage(
                "queue requires pipeline or transaction mode",
            )),
            Mode::Pipeline { pending } => {
                self.send_command(command, args).await?;
                self.mode = Mode::Pipeline {
                    pending: pending + 1,
                };

                Ok(())
            }
            Mode::Transaction { queued } => {
                self.send_command(command, args).await?;
                self.expect_status("QUEUED").await?;
                self.mode = Mode::Transaction { queued: queued + 1 };

                Ok(())
            }
        }
    }

    /// Reads every deferred pipeline reply in order. Error replies are
    /// returned in place rather than failing the whole batch.
    pub async fn sync(&mut self) -> ClientResult<Vec<Reply>> {
        let Mode::Pipeline { pending } = self.mode else {
            return Err(ClientError::Usage("sync called outside of a pipeline"));
        };
        self.mode = Mode::Normal;

        let mut replies = Vec::with_capacity(pending);
        for _ in 0..pending {
            replies.push(self.read_reply().await?);
        }

        Ok(replies)
    }

    pub async fn multi(&mut self) -> ClientResult<()> {
        self.ensure_not_batched()?;
        self.send_command(&Command::Multi, &[]).await?;
        self.expect_status("OK").await?;
        self.mode = Mode::Transaction { queued: 0 };

        Ok(())
    }

    /// Returns `None` when the server aborted the transaction.
    pub async fn exec(&mut self) -> ClientResult<Option<Vec<Reply>>> {
        self.ensure_transaction("exec called outside of a transaction")?;
        self.send_command(&Command::Exec, &[]).await?;
        self.mode = Mode::Normal;

        match self.read_reply().await? {
            Reply::Array(items) => Ok(Some(items)),
            Reply::Nil => Ok(None),
            Reply::Error(message) => Err(ClientError::Server(message)),
            other => Err(unexpected("array", &other)),
        }
    }

    pub async fn discard(&mut self) -> ClientResult<()> {
        self.ensure_transaction("discard called outside of a transaction")?;
        self.send_command(&Command::Discard, &[]).await?;
        self.mode = Mode::Normal;

        self.expect_status("OK").await
    }

    fn ensure_transaction(&self, message: &'static str) -> ClientResult<()> {
        match self.mode {
            Mode::Transaction { .. } => Ok(()),
            _ => Err(ClientError::Usage(message)),
        }
    }

    async fn expect_status(&mut self, expected: &'static str) -> ClientResult<()> {
        match self.read_reply().await? {
            Reply::Simple(status) if status == expected => Ok(()),
            Reply::Error(message) => Err(ClientError::Server(message)),
            other => Err(unexpected(expected, &other)),
        }
    }
}

fn unexpected(expected: &'static str, actual: &Reply) -> ClientError {
    ClientError::Protocol(RespError::UnexpectedReply {
        expected,
        actual: actual.kind(),
    })
}

#[derive(Default)]
pub struct ClientBuilder {
    server_addr: Option<SocketAddr>,
    url: Option<String>,
    db: Option<i64>,
    read_timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server_addr<T: Into<SocketAddr>>(mut self, server_addr: T) -> Self {
        if self.url.is_some() {
            panic!("You can't set server_addr and url at the same time");
        }

        self.server_addr = Some(server_addr.into());
        self
    }

    pub fn with_url<T: Into<String>>(mut self, url: T) -> Self {
        if self.server_addr.is_some() {
            panic!("You can't set server_addr and url at the same time");
        }

        self.url = Some(url.into());
        self
    }

    /// Overrides the database index given in the url.
    pub fn with_db(mut self, db: i64) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = Some(read_timeout);
        self
    }

    pub async fn build(&self) -> ClientResult<Client<TcpConnection>> {
        let (server_addr, url_db) = match (&self.server_addr, &self.url) {
            (Some(server_addr), _) => (*server_addr, 0),
            (None, Some(url)) => resolve(url).await?,
            (None, None) => return Err(ClientError::NoConfig),
        };

        let connection = TcpConnection::connect(server_addr)
            .await?
            .with_read_timeout(self.read_timeout);
        let mut client = Client::new(connection);

        let db = self.db.unwrap_or(url_db);
        if db != 0 {
            client.select(db).await?;
        }

        Ok(client)
    }
}

async fn resolve(url: &str) -> ClientResult<(SocketAddr, i64)> {
    let info = crate::url::parse_url(url)?;

    let server_addr = tokio::net::lookup_host((info.host.as_str(), info.port))
        .await?
        .next()
        .ok_or_else(|| ClientError::InvalidUrl(url.to_string()))?;

    Ok((server_addr, info.db))
}
