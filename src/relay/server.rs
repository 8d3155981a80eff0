//! UDP event loop driving the [`Registry`].

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::net::UdpSocket;
use tokio::sync::Notify;

use crate::protocol::{Message, MAX_MESSAGE_LEN};
use crate::relay::Registry;

/// The relay process: one socket, one registry, one receive loop.
///
/// Datagrams are processed strictly one at a time (receive, decode, mutate,
/// send replies) so the registry never sees interleaved mutations. A
/// malformed datagram or a failed send is logged and skipped; only the
/// shutdown signal stops the loop.
pub struct RelayServer {
    socket: UdpSocket,
    registry: Registry,
    shutdown: Arc<Notify>,
}

impl RelayServer {
    /// Bind the relay socket. Pass port 0 to let the OS pick one.
    pub async fn bind(addr: &str) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self {
            socket,
            registry: Registry::new(),
            shutdown: Arc::new(Notify::new()),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Handle for stopping the receive loop from another task. The pending
    /// notification is kept, so signalling before the loop reaches its next
    /// await still stops it.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Run the receive loop until the shutdown handle is signalled.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("relay listening on {}", self.socket.local_addr()?);
        let mut buf = [0u8; MAX_MESSAGE_LEN];
        loop {
            tokio::select! {
                _ = self.shutdown.notified() => break,
                received = self.socket.recv_from(&mut buf) => {
                    let (len, from) = match received {
                        Ok(pair) => pair,
                        Err(e) => {
                            warn!("receive failed: {}", e);
                            continue;
                        }
                    };
                    let text = match core::str::from_utf8(&buf[..len]) {
                        Ok(text) => text,
                        Err(_) => {
                            warn!("dropping non-text datagram from {}", from);
                            continue;
                        }
                    };
                    let msg = match Message::decode(text) {
                        Ok(msg) => msg,
                        Err(e) => {
                            warn!("dropping datagram from {}: {}", from, e);
                            continue;
                        }
                    };
                    debug!("received {:?} from {}", text, from);
                    for (dest, reply) in self.registry.handle(from, msg) {
                        let encoded = reply.encode();
                        if encoded.len() > MAX_MESSAGE_LEN {
                            warn!("not sending oversize reply to {}", dest);
                            continue;
                        }
                        match self.socket.send_to(encoded.as_bytes(), dest).await {
                            Ok(_) => debug!("sent {:?} to {}", encoded, dest),
                            Err(e) => warn!("send to {} failed: {}", dest, e),
                        }
                    }
                }
            }
        }
        info!("relay stopped");
        Ok(())
    }
}
