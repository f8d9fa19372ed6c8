use std::net::SocketAddr;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info};

use crate::{
    command::Command,
    dispatch,
    reply::{Reply, read_request, write_reply},
    service::StoreService,
    store::Storage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Active,
    Closed,
}

/// One client connection, from greeting to close.
#[derive(Debug)]
pub struct Session {
    id: u64,
    peer: SocketAddr,
    state: SessionState,
}

impl Session {
    pub fn new(id: u64, peer: SocketAddr) -> Self {
        Self {
            id,
            peer,
            state: SessionState::Connected,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Greets the peer, then answers one reply per request line until the
    /// peer sends `exit` or closes the stream.
    ///
    /// A transport error ends the session with that error; the session is
    /// `Closed` either way. Commands already handed to the store run to
    /// completion even if the peer has gone.
    pub async fn run<S, R, W>(
        &mut self,
        service: &StoreService<S>,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<()>
    where
        S: Storage,
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let result = self.serve(service, reader, writer).await;
        self.state = SessionState::Closed;
        result
    }

    async fn serve<S, R, W>(
        &mut self,
        service: &StoreService<S>,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<()>
    where
        S: Storage,
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(session = self.id, peer = %self.peer, "client connected");
        write_reply(writer, &Reply::greeting(self.peer)).await?;
        self.state = SessionState::Active;

        while let Some(line) = read_request(reader).await? {
            let reply = self.respond(service, &line).await;
            write_reply(writer, &reply).await?;
            if reply.closes_session() {
                info!(session = self.id, peer = %self.peer, "client exited");
                return Ok(());
            }
        }

        info!(session = self.id, peer = %self.peer, "client disconnected");
        Ok(())
    }

    async fn respond<S: Storage>(&self, service: &StoreService<S>, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(Command::Unknown(text)) => {
                info!(session = self.id, text, "client entered text");
                dispatch::execute(service, Command::Unknown(text)).await
            }
            Ok(command) => {
                debug!(session = self.id, ?command, "dispatching command");
                dispatch::execute(service, command).await
            }
            Err(err) => {
                debug!(session = self.id, error = %err, "rejected command");
                dispatch::reject(err)
            }
        }
    }
}
