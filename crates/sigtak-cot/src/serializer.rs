//! XML serialization for CoT events

use crate::event::{Detail, Event};
use std::fmt::Write;

/// Serialize an Event to a CoT 2.0 XML document.
///
/// Output is deterministic given the event's fields; the whole document is
/// intended to fit in a single UDP datagram.
pub fn serialize_event(event: &Event) -> String {
    let mut xml = String::new();

    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();

    write!(
        xml,
        r#"<event version="{}" uid="{}" type="{}" time="{}" start="{}" stale="{}" how="{}">"#,
        event.version,
        event.uid,
        event.event_type,
        event.time.to_rfc3339(),
        event.start.to_rfc3339(),
        event.stale.to_rfc3339(),
        event.how
    )
    .unwrap();

    write!(
        xml,
        r#"<point lat="{}" lon="{}" hae="{}" ce="{}" le="{}"/>"#,
        event.point.lat, event.point.lon, event.point.hae, event.point.ce, event.point.le
    )
    .unwrap();

    if let Some(ref detail) = event.detail {
        write!(xml, "<detail>").unwrap();
        serialize_detail(&mut xml, detail);
        write!(xml, "</detail>").unwrap();
    }

    writeln!(xml, "</event>").unwrap();
    xml
}

fn serialize_detail(xml: &mut String, detail: &Detail) {
    if let Some(ref remarks) = detail.remarks {
        // Remarks come from external senders; escape them.
        write!(xml, "<remarks>{}</remarks>", escape_text(remarks)).unwrap();
    }
}

/// Escape XML text content.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
