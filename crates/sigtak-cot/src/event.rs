//! CoT event structures and construction from spot reports

use crate::message::SpotReport;
use crate::registry::Affiliation;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel used for accuracy fields when no real estimate exists.
///
/// TAK displays treat 9999999.0 as "unknown"; the gateway has no error
/// estimate for chat-reported positions, so `ce` and `le` always carry it.
pub const UNKNOWN_ACCURACY: f64 = 9999999.0;

/// `how` value for events derived from manually reported positions.
const HOW_REPORTED: &str = "h-g-i-g-o";

/// CoT Event represents a Cursor on Target message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// CoT version (always "2.0")
    pub version: String,
    /// Unique identifier for this event
    pub uid: String,
    /// CoT type (e.g. "a-h-G-U-C-F-M" for a hostile tank)
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event timestamp
    pub time: DateTime<Utc>,
    /// Event start time
    pub start: DateTime<Utc>,
    /// Event stale time (when the event becomes invalid)
    pub stale: DateTime<Utc>,
    /// How the event was generated
    pub how: String,
    /// Geographic location and accuracy
    pub point: Point,
    /// Optional detail section
    pub detail: Option<Detail>,
}

/// Geographic point with accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lon: f64,
    /// Height above ellipsoid in meters
    pub hae: f64,
    /// Circular error in meters
    pub ce: f64,
    /// Linear error in meters
    pub le: f64,
}

/// Detail section carried by gateway events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Detail {
    /// Free-text remarks (the original sender identifier)
    pub remarks: Option<String>,
}

impl Point {
    /// Create a new Point with the unknown-accuracy sentinel for ce/le
    pub fn new(lat: f64, lon: f64, hae: f64) -> Self {
        Self {
            lat,
            lon,
            hae,
            ce: UNKNOWN_ACCURACY,
            le: UNKNOWN_ACCURACY,
        }
    }

    /// Create a new Point with specified accuracy
    pub fn with_accuracy(lat: f64, lon: f64, hae: f64, ce: f64, le: f64) -> Self {
        Self { lat, lon, hae, ce, le }
    }
}

impl Event {
    /// Build a CoT event from a validated spot report.
    ///
    /// The uid is unique per event (`sigtak-<uuid4>`), `time` and `start`
    /// are the construction instant, and `stale` is exactly `start` plus
    /// the TTL. Chat reports carry no altitude, so `hae` is 0 and the
    /// accuracy fields hold [`UNKNOWN_ACCURACY`]. When a sender id is
    /// given it lands in the detail block as remarks.
    pub fn from_report(
        report: &SpotReport,
        affiliation: Affiliation,
        sender: Option<&str>,
        ttl_secs: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            version: "2.0".to_string(),
            uid: format!("sigtak-{}", Uuid::new_v4()),
            event_type: format!("a-{}-{}", affiliation.code(), report.branch_code()),
            time: now,
            start: now,
            stale: now + Duration::seconds(ttl_secs as i64),
            how: HOW_REPORTED.to_string(),
            point: Point::new(report.lat, report.lon, 0.0),
            detail: sender.map(|s| Detail {
                remarks: Some(s.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::SpotReport;

    fn report() -> SpotReport {
        SpotReport::parse("48.567123 39.87897 tank").unwrap()
    }

    #[test]
    fn test_point_defaults() {
        let point = Point::new(37.7749, -122.4194, 0.0);
        assert_eq!(point.lat, 37.7749);
        assert_eq!(point.lon, -122.4194);
        assert_eq!(point.ce, UNKNOWN_ACCURACY);
        assert_eq!(point.le, UNKNOWN_ACCURACY);
    }

    #[test]
    fn test_event_from_report() {
        let event = Event::from_report(&report(), Affiliation::Hostile, None, 120);
        assert_eq!(event.version, "2.0");
        assert_eq!(event.event_type, "a-h-G-U-C-F-M");
        assert_eq!(event.how, "h-g-i-g-o");
        assert_eq!(event.point.lat, 48.567123);
        assert_eq!(event.point.lon, 39.87897);
        assert_eq!(event.point.hae, 0.0);
        assert!(event.detail.is_none());
    }

    #[test]
    fn test_event_validity_window() {
        let event = Event::from_report(&report(), Affiliation::Hostile, None, 120);
        assert_eq!(event.time, event.start);
        assert_eq!(event.stale - event.start, Duration::seconds(120));
    }

    #[test]
    fn test_event_uid_is_unique() {
        let a = Event::from_report(&report(), Affiliation::Hostile, None, 120);
        let b = Event::from_report(&report(), Affiliation::Hostile, None, 120);
        assert!(a.uid.starts_with("sigtak-"));
        assert_ne!(a.uid, b.uid);
    }

    #[test]
    fn test_event_carries_sender_remarks() {
        let event = Event::from_report(&report(), Affiliation::Hostile, Some("+1555123"), 60);
        assert_eq!(
            event.detail.unwrap().remarks.as_deref(),
            Some("+1555123")
        );
    }
}
