//! Best-effort UDP sender for CoT events
//!
//! Delivery is fire-and-forget by contract: one datagram per event, no
//! acknowledgment, no retry, no buffering. The sender never learns whether
//! a datagram arrived, and the gateway drops the event either way.

use crate::state::ConnectionMetrics;
use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info, warn};

/// Maximum UDP payload before IP fragmentation (1500 MTU - headers)
const MAX_UDP_PAYLOAD: usize = 1472;

/// Per-datagram send failure. Non-fatal: the gateway logs a warning and
/// moves on to the next message.
#[derive(Debug, Error)]
#[error("failed to send CoT datagram to {dest}: {source}")]
pub struct SendError {
    pub dest: SocketAddr,
    #[source]
    pub source: std::io::Error,
}

/// UDP socket with a destination resolved once at startup.
pub struct CotSender {
    socket: UdpSocket,
    dest: SocketAddr,
    metrics: ConnectionMetrics,
}

impl CotSender {
    /// Resolve the destination and bind a local socket.
    ///
    /// Resolution failure is startup-fatal; there is no point running a
    /// gateway that can never deliver.
    pub async fn bind(destination: &str) -> Result<Self> {
        let dest = lookup_host(destination)
            .await
            .with_context(|| format!("failed to resolve CoT destination {:?}", destination))?
            .next()
            .ok_or_else(|| anyhow!("CoT destination {:?} resolved to no addresses", destination))?;

        let bind_addr = if dest.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .context("failed to bind UDP socket")?;

        info!(dest = %dest, "CoT sender ready");

        Ok(Self {
            socket,
            dest,
            metrics: ConnectionMetrics::new(),
        })
    }

    /// Destination the sender was bound for.
    pub fn dest(&self) -> SocketAddr {
        self.dest
    }

    /// Traffic counters.
    pub fn metrics(&self) -> &ConnectionMetrics {
        &self.metrics
    }

    /// Send one event as a single best-effort datagram.
    pub async fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        if payload.len() > MAX_UDP_PAYLOAD {
            warn!(
                size = payload.len(),
                max_size = MAX_UDP_PAYLOAD,
                "CoT datagram exceeds recommended size, may be fragmented or dropped"
            );
        }

        let sent = self
            .socket
            .send_to(payload, self.dest)
            .await
            .map_err(|source| {
                self.metrics.record_error();
                SendError {
                    dest: self.dest,
                    source,
                }
            })?;

        if sent != payload.len() {
            warn!(expected = payload.len(), actual = sent, "partial UDP datagram sent");
        }

        self.metrics.record_bytes_sent(sent as u64);
        self.metrics.record_message_sent();
        debug!(size = sent, dest = %self.dest, "sent CoT datagram");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_send_delivers_datagram() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let dest = receiver.local_addr().unwrap().to_string();

        let sender = CotSender::bind(&dest).await.unwrap();
        sender.send(b"<event/>").await.unwrap();

        let mut buf = [0u8; 64];
        let (size, _) = timeout(Duration::from_secs(1), receiver.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf[..size], b"<event/>");
        assert_eq!(sender.metrics().messages_sent(), 1);
    }

    #[tokio::test]
    async fn test_send_to_silent_port_is_fire_and_forget() {
        // Nobody listening: an unconnected UDP send still succeeds, which
        // is exactly the documented best-effort contract.
        let probe = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let dest = probe.local_addr().unwrap().to_string();
        drop(probe);

        let sender = CotSender::bind(&dest).await.unwrap();
        assert!(sender.send(b"<event/>").await.is_ok());
    }

    #[tokio::test]
    async fn test_bind_rejects_unresolvable_destination() {
        assert!(CotSender::bind("definitely-not-a-host.invalid:4242")
            .await
            .is_err());
    }
}
