use std::{future::Future, net::SocketAddr, sync::Arc};

use anyhow::Result;
use tokio::{
    io::BufReader,
    net::{TcpListener, TcpStream},
    select,
};
use tracing::{debug, info, warn};

use crate::{
    service::StoreService,
    session::Session,
    store::{FileStorage, Storage},
};

/// Accept loop spawning one session task per connection.
pub struct Server<S = FileStorage> {
    listener: TcpListener,
    service: Arc<StoreService<S>>,
}

impl<S> Server<S>
where
    S: Storage + 'static,
{
    pub fn new(listener: TcpListener, service: Arc<StoreService<S>>) -> Self {
        Self { listener, service }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until `shutdown` resolves. Sessions already
    /// running are left to finish on their own.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let Server { listener, service } = self;
        tokio::pin!(shutdown);

        loop {
            select! {
                _ = &mut shutdown => {
                    info!(connections = service.connections(), "server shutting down");
                    break;
                }
                accept_result = listener.accept() => {
                    handle_accept_result(accept_result, &service);
                }
            }
        }

        Ok(())
    }

    pub async fn run_until_ctrl_c(self) -> Result<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = ?err, "failed to install ctrl-c handler");
            }
        })
        .await
    }
}

fn handle_accept_result<S>(
    result: std::io::Result<(TcpStream, SocketAddr)>,
    service: &Arc<StoreService<S>>,
) where
    S: Storage + 'static,
{
    match result {
        Ok((stream, peer)) => spawn_session(stream, peer, service),
        Err(err) => warn!(error = ?err, "failed to accept connection"),
    }
}

fn spawn_session<S>(stream: TcpStream, peer: SocketAddr, service: &Arc<StoreService<S>>)
where
    S: Storage + 'static,
{
    let service = Arc::clone(service);
    let id = service.next_session();
    tokio::spawn(async move {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut session = Session::new(id, peer);
        if let Err(err) = session.run(&service, &mut reader, &mut writer).await {
            debug!(session = id, peer = %peer, error = ?err, "session ended by transport error");
        }
    });
}
