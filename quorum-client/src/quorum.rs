//! The `WAITQUORUM` extension.
//!
//! The server under test answers with a single integer whose meaning is up
//! to the caller; this module hands it back untouched.

use quorum_core::command::CommandDescriptor;
use tracing::debug;

use crate::{
    Client, ClientBuilder,
    connection::{BasicConnection, TcpConnection},
    error::ClientResult,
};

pub const WAIT_QUORUM: CommandDescriptor = CommandDescriptor::new("WAITQUORUM");

pub struct QuorumClient<C = TcpConnection> {
    client: Client<C>,
}

impl QuorumClient<TcpConnection> {
    /// Connects to `redis://host:port`.
    pub async fn connect(url: &str) -> ClientResult<Self> {
        let client = ClientBuilder::new().with_url(url).build().await?;

        Ok(Self::new(client))
    }
}

impl<C: BasicConnection> QuorumClient<C> {
    pub fn new(client: Client<C>) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &Client<C> {
        &self.client
    }

    pub fn inner_mut(&mut self) -> &mut Client<C> {
        &mut self.client
    }

    pub fn into_inner(self) -> Client<C> {
        self.client
    }

    /// Sends `WAITQUORUM` and returns the integer reply.
    ///
    /// Refused with a usage error while a pipeline or transaction is open,
    /// since the reply has to be read right away.
    pub async fn wait_quorum(&mut self) -> ClientResult<i64> {
        self.client.ensure_not_batched()?;
        self.client.send_command(&WAIT_QUORUM, &[]).await?;

        let value = self.client.read_integer_reply().await?;
        debug!("{} replied {}", WAIT_QUORUM, value);

        Ok(value)
    }
}

impl<C: BasicConnection> From<Client<C>> for QuorumClient<C> {
    fn from(client: Client<C>) -> Self {
        Self::new(client)
    }
}
