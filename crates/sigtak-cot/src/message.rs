//! Chat spot report parsing
//!
//! Inbound chat messages carry spot reports in a fixed grammar: exactly
//! three whitespace-separated tokens, `<latitude> <longitude> <entity>`,
//! e.g. `48.567123 39.87897 tank`. Anything else is rejected with a reason
//! the gateway can log; a rejected message never produces a CoT event.

use crate::registry;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// Wrong token count or non-numeric coordinates
    #[error("expected '<lat> <lon> <entity>', got {0:?}")]
    MalformedGrammar(String),

    /// Coordinates parsed but fall outside valid ranges
    #[error("coordinate out of range: lat {lat}, lon {lon}")]
    OutOfRange { lat: f64, lon: f64 },

    /// Third token is not a registered entity keyword
    #[error("unknown entity keyword: {0:?}")]
    UnknownEntity(String),
}

/// A validated coordinate-and-entity triple extracted from chat text.
///
/// Invariants: `lat` is within [-90, 90], `lon` within [-180, 180] and
/// `entity` is a lowercased keyword present in the registry. Values only
/// escape [`SpotReport::parse`] when all three hold.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotReport {
    pub lat: f64,
    pub lon: f64,
    pub entity: String,
}

impl SpotReport {
    /// Parse raw chat text into a validated report.
    ///
    /// Validation order is fixed: grammar, then coordinate ranges, then
    /// keyword lookup. An out-of-range coordinate is reported as such even
    /// when the keyword would also have been rejected.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let &[lat, lon, keyword] = tokens.as_slice() else {
            return Err(ParseError::MalformedGrammar(raw.to_string()));
        };

        let lat: f64 = lat
            .parse()
            .map_err(|_| ParseError::MalformedGrammar(raw.to_string()))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| ParseError::MalformedGrammar(raw.to_string()))?;

        // NaN fails both contains() checks and lands here as well.
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ParseError::OutOfRange { lat, lon });
        }

        if registry::lookup(keyword).is_none() {
            return Err(ParseError::UnknownEntity(keyword.to_string()));
        }

        Ok(Self {
            lat,
            lon,
            entity: keyword.to_ascii_lowercase(),
        })
    }

    /// Branch code for this report's entity.
    ///
    /// Cannot fail: `parse` already verified the keyword is registered.
    pub fn branch_code(&self) -> &'static str {
        registry::lookup(&self.entity).unwrap_or("G-U")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_report() {
        let report = SpotReport::parse("48.567123 39.87897 tank").unwrap();
        assert_eq!(report.lat, 48.567123);
        assert_eq!(report.lon, 39.87897);
        assert_eq!(report.entity, "tank");
    }

    #[test]
    fn test_parse_case_folds_keyword() {
        let report = SpotReport::parse("10.0 20.0 TANK").unwrap();
        assert_eq!(report.entity, "tank");
        assert_eq!(report.branch_code(), "G-U-C-F-M");
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let report = SpotReport::parse("-33.8688 -151.2093 drone").unwrap();
        assert_eq!(report.lat, -33.8688);
        assert_eq!(report.lon, -151.2093);
    }

    #[test]
    fn test_parse_boundary_values() {
        assert!(SpotReport::parse("90 180 tank").is_ok());
        assert!(SpotReport::parse("-90 -180 tank").is_ok());
    }

    #[test]
    fn test_latitude_out_of_range() {
        assert!(matches!(
            SpotReport::parse("95.0 10.0 tank"),
            Err(ParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_longitude_out_of_range() {
        assert!(matches!(
            SpotReport::parse("10.0 181.0 tank"),
            Err(ParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_out_of_range_wins_over_unknown_entity() {
        // Range is checked before the keyword, per the validation order.
        assert!(matches!(
            SpotReport::parse("95.0 10.0 spaceship"),
            Err(ParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unknown_entity() {
        assert!(matches!(
            SpotReport::parse("48.5 39.8 spaceship"),
            Err(ParseError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_malformed_token_order() {
        assert!(matches!(
            SpotReport::parse("tank 48.5 39.8"),
            Err(ParseError::MalformedGrammar(_))
        ));
    }

    #[test]
    fn test_malformed_token_count() {
        assert!(matches!(
            SpotReport::parse("48.5 39.8"),
            Err(ParseError::MalformedGrammar(_))
        ));
        assert!(matches!(
            SpotReport::parse("48.5 39.8 tank extra"),
            Err(ParseError::MalformedGrammar(_))
        ));
        assert!(matches!(
            SpotReport::parse(""),
            Err(ParseError::MalformedGrammar(_))
        ));
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(matches!(
            SpotReport::parse("NaN 10.0 tank"),
            Err(ParseError::OutOfRange { .. })
        ));
    }
}
