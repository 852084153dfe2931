//! Pipeline orchestration: daemon messages in, CoT datagrams out.

use anyhow::{Context, Result};
use sigtak_client::daemon::{DaemonClient, DaemonError};
use sigtak_client::rpc::IncomingMessage;
use sigtak_client::udp::CotSender;
use sigtak_cot::event::Event;
use sigtak_cot::message::SpotReport;
use sigtak_cot::registry::Affiliation;
use sigtak_cot::serializer::serialize_event;
use sigtak_cot::validate::validate_event;
use tracing::{debug, info, warn};

/// The gateway owns both process-lifetime sockets and runs the single
/// message pipeline: next_message → parse → build → validate → serialize
/// → send. One message at a time, strictly in arrival order.
pub struct Gateway {
    daemon: DaemonClient,
    sender: CotSender,
    ttl_secs: u64,
}

impl Gateway {
    pub fn new(daemon: DaemonClient, sender: CotSender, ttl_secs: u64) -> Self {
        Self {
            daemon,
            sender,
            ttl_secs,
        }
    }

    /// Run the pipeline until ctrl-c or the daemon connection is lost for
    /// good. Per-message failures never stop the loop.
    pub async fn run(mut self) -> Result<()> {
        info!(ttl_secs = self.ttl_secs, "gateway running");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested");
                    self.daemon.shutdown();
                    break;
                }
                message = self.daemon.next_message() => {
                    match message {
                        Ok(message) => self.handle_message(message).await,
                        Err(DaemonError::Shutdown) => break,
                        Err(e) => {
                            return Err(e).context("daemon connection lost");
                        }
                    }
                }
            }
        }

        info!("gateway stopped");
        Ok(())
    }

    async fn handle_message(&self, message: IncomingMessage) {
        let Some(xml) = build_payload(&message, self.ttl_secs) else {
            return;
        };

        // Fire-and-forget: a failed send drops the event, no retry.
        if let Err(e) = self.sender.send(xml.as_bytes()).await {
            warn!(error = %e, "dropping event");
        }
    }
}

/// Turn one chat message into serialized CoT XML.
///
/// Returns `None` when the message is not a valid spot report or the
/// built event fails its final sanity check; both cases are logged and
/// isolated to this message.
fn build_payload(message: &IncomingMessage, ttl_secs: u64) -> Option<String> {
    let report = match SpotReport::parse(&message.text) {
        Ok(report) => report,
        Err(e) => {
            info!(sender = %message.sender, error = %e, "discarding unparseable message");
            return None;
        }
    };

    let event = Event::from_report(
        &report,
        Affiliation::Hostile,
        Some(&message.sender),
        ttl_secs,
    );

    // Should never fire for parser-validated input.
    if let Err(e) = validate_event(&event) {
        warn!(uid = %event.uid, error = %e, "built event failed validation, dropping");
        return None;
    }

    debug!(uid = %event.uid, entity = %report.entity, "built CoT event");
    Some(serialize_event(&event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(text: &str) -> IncomingMessage {
        IncomingMessage {
            sender: "+15550001111".to_string(),
            text: text.to_string(),
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_report_becomes_cot_xml() {
        let xml = build_payload(&message("48.567123 39.87897 tank"), 120).unwrap();
        assert!(xml.contains(r#"type="a-h-G-U-C-F-M""#));
        assert!(xml.contains(r#"lat="48.567123""#));
        assert!(xml.contains(r#"lon="39.87897""#));
        assert!(xml.contains("<remarks>+15550001111</remarks>"));
    }

    #[test]
    fn test_out_of_range_is_discarded() {
        assert!(build_payload(&message("95.0 10.0 tank"), 120).is_none());
    }

    #[test]
    fn test_unknown_entity_is_discarded() {
        assert!(build_payload(&message("48.5 39.8 spaceship"), 120).is_none());
    }

    #[test]
    fn test_malformed_grammar_is_discarded() {
        assert!(build_payload(&message("tank 48.5 39.8"), 120).is_none());
        assert!(build_payload(&message("hello there"), 120).is_none());
    }
}
