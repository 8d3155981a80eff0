//! Per-player network endpoint talking to the relay.
//!
//! A `PeerLink` owns one ephemeral UDP socket connected to the relay.
//! Receiving runs on its own task so that waiting for a reply never blocks
//! an outbound send; everything that arrives is decoded and handed to the
//! single consumer holding the event receiver.

use std::net::SocketAddr;
use std::sync::Arc;

use log::warn;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, Notify};

use crate::protocol::{validate_username, Message, MAX_MESSAGE_LEN};

/// What the receive task delivers to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A decoded message from the relay.
    Message(Message),
    /// The receive path failed; treat the relay as unreachable.
    ServerOffline,
}

/// Client-side endpoint for one player.
pub struct PeerLink {
    socket: Arc<UdpSocket>,
    shutdown: Arc<Notify>,
}

impl PeerLink {
    /// Bind an ephemeral local port, connect it to the relay, and start the
    /// receive task. Returns the link and the event stream the task feeds.
    pub async fn connect(relay: SocketAddr) -> anyhow::Result<(Self, mpsc::Receiver<LinkEvent>)> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(relay).await?;
        let socket = Arc::new(socket);
        let shutdown = Arc::new(Notify::new());
        let (events_tx, events_rx) = mpsc::channel(32);
        tokio::spawn(receive_loop(
            Arc::clone(&socket),
            Arc::clone(&shutdown),
            events_tx,
        ));
        Ok((Self { socket, shutdown }, events_rx))
    }

    /// Send one message to the relay. Never waits for a reply.
    pub async fn send(&self, msg: &Message) -> anyhow::Result<()> {
        let encoded = msg.encode();
        if encoded.len() > MAX_MESSAGE_LEN {
            return Err(anyhow::anyhow!(
                "message of {} bytes exceeds {}",
                encoded.len(),
                MAX_MESSAGE_LEN
            ));
        }
        self.socket.send(encoded.as_bytes()).await?;
        Ok(())
    }

    /// Validate `username` locally, then register it with the relay. A name
    /// that fails validation is reported without touching the network, so
    /// the caller can re-prompt.
    pub async fn register(&self, username: &str) -> anyhow::Result<()> {
        validate_username(username).map_err(|e| anyhow::anyhow!(e))?;
        self.send(&Message::Init {
            username: username.to_string(),
        })
        .await
    }

    /// Tell the relay this player is leaving, then stop the receive task.
    pub async fn disconnect(&self, username: &str) -> anyhow::Result<()> {
        self.send(&Message::Disconnect {
            username: username.to_string(),
        })
        .await?;
        self.shutdown();
        Ok(())
    }

    /// Stop the receive task without notifying the relay.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

async fn receive_loop(
    socket: Arc<UdpSocket>,
    shutdown: Arc<Notify>,
    events: mpsc::Sender<LinkEvent>,
) {
    let mut buf = [0u8; MAX_MESSAGE_LEN];
    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            received = socket.recv(&mut buf) => match received {
                Ok(len) => {
                    let text = match core::str::from_utf8(&buf[..len]) {
                        Ok(text) => text,
                        Err(_) => {
                            warn!("dropping non-text datagram");
                            continue;
                        }
                    };
                    match Message::decode(text) {
                        Ok(msg) => {
                            if events.send(LinkEvent::Message(msg)).await.is_err() {
                                // Consumer is gone; nothing left to deliver to.
                                break;
                            }
                        }
                        Err(e) => warn!("dropping datagram: {}", e),
                    }
                }
                Err(e) => {
                    warn!("receive failed: {}", e);
                    let _ = events.send(LinkEvent::ServerOffline).await;
                    break;
                }
            }
        }
    }
}
