//! TCP client for the signal-cli JSON-RPC daemon

use crate::backoff::{calculate_backoff, ReconnectConfig};
use crate::rpc::{self, IncomingMessage};
use crate::state::{ConnectionState, ConnectionStatus};
use anyhow::{bail, Context, Result};
use bytes::BytesMut;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Frame delimiter for the newline-delimited protocol
const NEWLINE_DELIMITER: u8 = b'\n';

/// Maximum line size (1MB); anything larger is a protocol violation
const MAX_LINE_SIZE: usize = 1024 * 1024;

/// Configuration for the daemon connection
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Daemon address as `host:port`
    pub addr: String,
    /// Connection timeout per attempt
    pub connect_timeout: Duration,
    /// Backoff policy for initial connect and reconnects
    pub reconnect: ReconnectConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            addr: String::new(),
            connect_timeout: Duration::from_secs(10),
            reconnect: ReconnectConfig::default(),
        }
    }
}

/// Connection-level failures surfaced to the gateway. Per-line problems
/// (malformed JSON, unknown notification shapes) never appear here; they
/// are logged and skipped.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Retries exhausted, at startup or mid-run. Fatal to the pipeline.
    #[error("gave up on daemon at {addr} after {attempts} attempts: {reason}")]
    ReconnectExhausted {
        addr: String,
        attempts: u32,
        reason: String,
    },

    /// Explicit operator shutdown; terminal by request, not a failure.
    #[error("daemon client shut down")]
    Shutdown,
}

/// Client owning the TCP connection to the signal-cli daemon.
///
/// Lifecycle: `Disconnected → Connecting → Connected`, with
/// `Reconnecting` entered whenever the stream drops mid-run and the
/// terminal `Shutdown` reached only through [`DaemonClient::shutdown`].
/// Messages are emitted strictly in arrival order on the one stream.
pub struct DaemonClient {
    config: DaemonConfig,
    status: ConnectionStatus,
    stream: Option<TcpStream>,
    buffer: BytesMut,
    next_request_id: u64,
}

impl DaemonClient {
    /// Connect to the daemon and subscribe to receive notifications.
    ///
    /// Retries with backoff per the configured policy; an unreachable
    /// daemon after the final attempt is a startup-fatal error.
    pub async fn connect(config: DaemonConfig) -> Result<Self, DaemonError> {
        let mut client = Self {
            config,
            status: ConnectionStatus::new(),
            stream: None,
            buffer: BytesMut::with_capacity(8192),
            next_request_id: 1,
        };
        client.connect_with_retry().await?;
        Ok(client)
    }

    /// Connection status, shareable with monitoring code.
    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// Block until the next inbound chat message arrives.
    ///
    /// Lines that are not `receive` notifications with text are skipped.
    /// A dropped stream triggers transparent reconnect-and-resubscribe;
    /// only retry exhaustion or shutdown surface as errors. Messages sent
    /// while the connection was down are gone, never replayed.
    pub async fn next_message(&mut self) -> Result<IncomingMessage, DaemonError> {
        loop {
            if self.status.is_shutdown() {
                return Err(DaemonError::Shutdown);
            }

            if self.stream.is_none() {
                self.status.set_state(ConnectionState::Reconnecting);
                self.connect_with_retry().await?;
            }

            match self.read_line().await {
                Ok(Some(line)) => {
                    if let Some(message) = rpc::decode_notification(&line) {
                        self.status.metrics().record_message_received();
                        debug!(sender = %message.sender, "received chat message");
                        return Ok(message);
                    }
                    debug!(line = %line, "ignoring non-message line");
                }
                Ok(None) => {
                    warn!("daemon closed the connection");
                    self.drop_stream();
                }
                Err(e) => {
                    if self.status.is_shutdown() {
                        return Err(DaemonError::Shutdown);
                    }
                    warn!(error = %e, "daemon read failed");
                    self.status.metrics().record_error();
                    self.drop_stream();
                }
            }
        }
    }

    /// Close the connection and move to the terminal `Shutdown` state.
    pub fn shutdown(&mut self) {
        info!("shutting down daemon client");
        self.status.set_state(ConnectionState::Shutdown);
        self.stream = None;
        self.buffer.clear();
    }

    fn drop_stream(&mut self) {
        self.stream = None;
        self.buffer.clear();
        self.status.set_state(ConnectionState::Disconnected);
    }

    /// Connect (or reconnect) with bounded exponential backoff.
    async fn connect_with_retry(&mut self) -> Result<(), DaemonError> {
        let policy = self.config.reconnect.clone();
        let mut attempt = 0u32;

        loop {
            if self.status.is_shutdown() {
                return Err(DaemonError::Shutdown);
            }

            match self.establish().await {
                Ok(()) => {
                    if attempt > 0 {
                        info!(attempt, "reconnected to daemon");
                    }
                    self.status.metrics().reset_reconnect_attempts();
                    return Ok(());
                }
                Err(e) => {
                    attempt += 1;
                    self.status.metrics().record_reconnect();

                    if let Some(max) = policy.max_attempts {
                        if attempt >= max {
                            error!(attempt, error = %e, "max daemon connection attempts reached");
                            return Err(DaemonError::ReconnectExhausted {
                                addr: self.config.addr.clone(),
                                attempts: attempt,
                                reason: e.to_string(),
                            });
                        }
                    }

                    let backoff = calculate_backoff(attempt - 1, &policy);
                    warn!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "daemon connection attempt failed, retrying after backoff"
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// One connection attempt: TCP connect, socket options, subscribe.
    async fn establish(&mut self) -> Result<()> {
        if self.status.state() == ConnectionState::Disconnected {
            self.status.set_state(ConnectionState::Connecting);
        }

        info!("connecting to daemon at {}", self.config.addr);

        let stream = timeout(
            self.config.connect_timeout,
            TcpStream::connect(&self.config.addr),
        )
        .await
        .context("connection timeout")?
        .context("failed to connect")?;

        stream.set_nodelay(true).context("failed to set TCP_NODELAY")?;

        let keepalive = socket2::TcpKeepalive::new().with_time(Duration::from_secs(30));
        socket2::SockRef::from(&stream)
            .set_tcp_keepalive(&keepalive)
            .context("failed to set TCP keepalive")?;

        self.buffer.clear();
        self.stream = Some(stream);
        self.subscribe().await?;

        self.status.set_state(ConnectionState::Connected);
        info!("connected to daemon at {}", self.config.addr);

        Ok(())
    }

    /// Register for receive notifications on the current connection.
    async fn subscribe(&mut self) -> Result<()> {
        let id = self.next_request_id;
        self.next_request_id += 1;

        let line = rpc::subscribe_line(id);
        let stream = self.stream.as_mut().context("not connected")?;
        stream
            .write_all(line.as_bytes())
            .await
            .context("failed to send subscribe request")?;
        stream.flush().await.context("flush error")?;

        self.status.metrics().record_bytes_sent(line.len() as u64);
        debug!(id, "subscribed to receive notifications");
        Ok(())
    }

    /// Read one newline-delimited line, buffering partial reads.
    ///
    /// Returns `Ok(None)` on clean EOF.
    async fn read_line(&mut self) -> Result<Option<String>> {
        let stream = self.stream.as_mut().context("not connected")?;

        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == NEWLINE_DELIMITER) {
                let frame = self.buffer.split_to(pos + 1);
                self.status
                    .metrics()
                    .record_bytes_received(frame.len() as u64);
                let line = String::from_utf8_lossy(&frame[..frame.len() - 1])
                    .trim()
                    .to_string();
                return Ok(Some(line));
            }

            if self.buffer.len() >= MAX_LINE_SIZE {
                bail!("line exceeds {} bytes", MAX_LINE_SIZE);
            }

            let n = stream
                .read_buf(&mut self.buffer)
                .await
                .context("read error")?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                bail!("connection closed mid-line");
            }
        }
    }
}
