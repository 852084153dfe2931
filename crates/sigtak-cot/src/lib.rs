//! Cursor on Target (CoT) message construction for the SigTAK gateway.
//!
//! This crate turns free-text spot reports received over chat into CoT 2.0
//! XML events that TAK displays understand. It covers the full path from raw
//! text to wire bytes:
//!
//! - **Registry**: a fixed mapping from entity keywords ("tank", "sam", ...)
//!   to MIL-STD-2525 branch codes.
//! - **Message parsing**: strict `<lat> <lon> <entity>` grammar with range
//!   and keyword validation.
//! - **Event model**: `Event`/`Point`/`Detail` structures with UTC
//!   timestamps and a validity window.
//! - **Serialization**: deterministic XML output.
//! - **Validation**: a final sanity check before events go on the wire.
//!
//! # Example
//!
//! ```
//! use sigtak_cot::message::SpotReport;
//! use sigtak_cot::registry::Affiliation;
//! use sigtak_cot::event::Event;
//! use sigtak_cot::serializer::serialize_event;
//!
//! let report = SpotReport::parse("48.567123 39.87897 tank").unwrap();
//! let event = Event::from_report(&report, Affiliation::Hostile, None, 120);
//! let xml = serialize_event(&event);
//! assert!(xml.contains(r#"type="a-h-G-U-C-F-M""#));
//! ```

pub mod event;
pub mod message;
pub mod registry;
pub mod serializer;
pub mod validate;

pub use event::{Event, Point};
pub use message::{ParseError, SpotReport};
pub use registry::Affiliation;
pub use serializer::serialize_event;
pub use validate::{validate_event, validate_point, ValidationError};
