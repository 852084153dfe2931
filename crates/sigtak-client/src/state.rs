//! Connection state and counters shared by the gateway's sockets

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Lifecycle of the daemon connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection established
    Disconnected,
    /// Initial connection attempt in progress
    Connecting,
    /// Connected and reading messages
    Connected,
    /// Connection lost, backoff-and-retry in progress
    Reconnecting,
    /// Terminal: operator requested shutdown, resources released
    Shutdown,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Reconnecting => write!(f, "Reconnecting"),
            ConnectionState::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// Counters for a connection's traffic.
#[derive(Debug, Clone, Default)]
pub struct ConnectionMetrics {
    bytes_received: Arc<AtomicU64>,
    bytes_sent: Arc<AtomicU64>,
    messages_received: Arc<AtomicU64>,
    messages_sent: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
    reconnect_attempts: Arc<AtomicUsize>,
}

impl ConnectionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_bytes_received(&self, bytes: u64) {
        self.bytes_received.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_bytes_sent(&self, bytes: u64) {
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_message_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reconnect(&self) {
        self.reconnect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset_reconnect_attempts(&self) {
        self.reconnect_attempts.store(0, Ordering::Relaxed);
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn reconnect_attempts(&self) -> usize {
        self.reconnect_attempts.load(Ordering::Relaxed)
    }
}

/// Combined connection state and metrics.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    state: Arc<RwLock<ConnectionState>>,
    metrics: ConnectionMetrics,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStatus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            metrics: ConnectionMetrics::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Set connection state. Shutdown is terminal; later transitions are
    /// ignored so a racing reconnect cannot resurrect a closed client.
    pub fn set_state(&self, state: ConnectionState) {
        let mut current = self.state.write();
        if *current != ConnectionState::Shutdown {
            *current = state;
        }
    }

    pub fn metrics(&self) -> &ConnectionMetrics {
        &self.metrics
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state(), ConnectionState::Connected)
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self.state(), ConnectionState::Shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Connected.to_string(), "Connected");
        assert_eq!(ConnectionState::Shutdown.to_string(), "Shutdown");
    }

    #[test]
    fn test_metrics_recording() {
        let metrics = ConnectionMetrics::new();

        metrics.record_bytes_received(200);
        metrics.record_message_received();
        metrics.record_message_sent();
        metrics.record_error();
        metrics.record_reconnect();

        assert_eq!(metrics.bytes_received(), 200);
        assert_eq!(metrics.messages_received(), 1);
        assert_eq!(metrics.messages_sent(), 1);
        assert_eq!(metrics.errors(), 1);
        assert_eq!(metrics.reconnect_attempts(), 1);

        metrics.reset_reconnect_attempts();
        assert_eq!(metrics.reconnect_attempts(), 0);
    }

    #[test]
    fn test_status_transitions() {
        let status = ConnectionStatus::new();
        assert_eq!(status.state(), ConnectionState::Disconnected);

        status.set_state(ConnectionState::Connecting);
        status.set_state(ConnectionState::Connected);
        assert!(status.is_connected());

        status.set_state(ConnectionState::Reconnecting);
        assert!(!status.is_connected());
    }

    #[test]
    fn test_shutdown_is_terminal() {
        let status = ConnectionStatus::new();
        status.set_state(ConnectionState::Shutdown);
        status.set_state(ConnectionState::Connected);
        assert!(status.is_shutdown());
    }
}
