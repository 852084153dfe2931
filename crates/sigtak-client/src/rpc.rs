//! JSON-RPC wire types for the signal-cli daemon
//!
//! The daemon pushes newline-delimited JSON-RPC objects. Only one shape
//! matters to the gateway: a `receive` notification whose envelope carries
//! a data message with text. The structs here model exactly the required
//! fields; everything else on the wire is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message pulled out of a `receive` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Sender identifier (phone number or account uuid)
    pub sender: String,
    /// Raw message text
    pub text: String,
    /// When the gateway saw the message
    pub received_at: DateTime<Utc>,
}

/// Subscription request sent once per (re)connect.
#[derive(Debug, Serialize)]
struct SubscribeRequest<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    id: u64,
}

/// One line registering for receive notifications, newline included.
pub fn subscribe_line(id: u64) -> String {
    let request = SubscribeRequest {
        jsonrpc: "2.0",
        method: "subscribeReceive",
        id,
    };
    // Serialization of a flat struct of strings cannot fail.
    let mut line = serde_json::to_string(&request).unwrap_or_default();
    line.push('\n');
    line
}

#[derive(Debug, Deserialize)]
struct Notification {
    method: Option<String>,
    params: Option<Params>,
}

#[derive(Debug, Deserialize)]
struct Params {
    envelope: Option<Envelope>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "sourceNumber")]
    source_number: Option<String>,
    source: Option<String>,
    #[serde(rename = "dataMessage")]
    data_message: Option<DataMessage>,
}

#[derive(Debug, Deserialize)]
struct DataMessage {
    message: Option<String>,
}

/// Decode one wire line into a chat message.
///
/// Returns `None` for anything that is not a `receive` notification with
/// message text: RPC responses, receipts, typing indicators, other
/// notification methods, or lines that are not JSON at all. None of those
/// are errors; the caller skips them.
pub fn decode_notification(line: &str) -> Option<IncomingMessage> {
    let notification: Notification = serde_json::from_str(line).ok()?;

    if notification.method.as_deref() != Some("receive") {
        return None;
    }

    let envelope = notification.params?.envelope?;
    let text = envelope.data_message?.message?;
    if text.is_empty() {
        return None;
    }

    let sender = envelope
        .source_number
        .or(envelope.source)
        .unwrap_or_else(|| "unknown".to_string());

    Some(IncomingMessage {
        sender,
        text,
        received_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_line_shape() {
        let line = subscribe_line(1);
        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "subscribeReceive");
        assert_eq!(value["id"], 1);
    }

    #[test]
    fn test_decode_receive_notification() {
        let line = r#"{"jsonrpc":"2.0","method":"receive","params":{"account":"+15550001111","envelope":{"source":"+15552223333","sourceNumber":"+15552223333","timestamp":1766180000000,"dataMessage":{"timestamp":1766180000000,"message":"48.567123 39.87897 tank"}}}}"#;
        let msg = decode_notification(line).unwrap();
        assert_eq!(msg.sender, "+15552223333");
        assert_eq!(msg.text, "48.567123 39.87897 tank");
    }

    #[test]
    fn test_decode_falls_back_to_source() {
        let line = r#"{"jsonrpc":"2.0","method":"receive","params":{"envelope":{"source":"uuid-abc","dataMessage":{"message":"hi"}}}}"#;
        let msg = decode_notification(line).unwrap();
        assert_eq!(msg.sender, "uuid-abc");
    }

    #[test]
    fn test_decode_ignores_receipt_envelope() {
        // Delivery receipts have an envelope but no dataMessage.
        let line = r#"{"jsonrpc":"2.0","method":"receive","params":{"envelope":{"sourceNumber":"+15552223333","receiptMessage":{"when":1766180000000,"isDelivery":true}}}}"#;
        assert!(decode_notification(line).is_none());
    }

    #[test]
    fn test_decode_ignores_other_methods() {
        let line = r#"{"jsonrpc":"2.0","method":"somethingElse","params":{}}"#;
        assert!(decode_notification(line).is_none());
    }

    #[test]
    fn test_decode_ignores_rpc_response() {
        let line = r#"{"jsonrpc":"2.0","result":[],"id":1}"#;
        assert!(decode_notification(line).is_none());
    }

    #[test]
    fn test_decode_ignores_garbage() {
        assert!(decode_notification("not json at all").is_none());
        assert!(decode_notification("").is_none());
    }

    #[test]
    fn test_decode_ignores_empty_message() {
        let line = r#"{"jsonrpc":"2.0","method":"receive","params":{"envelope":{"source":"x","dataMessage":{"message":""}}}}"#;
        assert!(decode_notification(line).is_none());
    }
}
