//! Network clients for the SigTAK gateway.
//!
//! Two process-lifetime sockets live here:
//!
//! - [`DaemonClient`]: the TCP connection to the signal-cli JSON-RPC
//!   daemon. Reads newline-delimited notifications, decodes inbound chat
//!   messages and re-establishes the connection with bounded exponential
//!   backoff when the stream drops.
//! - [`CotSender`]: a UDP socket that fires CoT event datagrams at the
//!   configured display endpoint, best-effort by design.

pub mod backoff;
pub mod daemon;
pub mod rpc;
pub mod state;
pub mod udp;

pub use backoff::{calculate_backoff, ReconnectConfig};
pub use daemon::{DaemonClient, DaemonConfig, DaemonError};
pub use rpc::IncomingMessage;
pub use state::{ConnectionState, ConnectionStatus};
pub use udp::{CotSender, SendError};
