//! Entity keyword to CoT type code registry

use std::fmt;

/// MIL-STD-2525 branch codes for the entity keywords the gateway accepts.
///
/// The set is closed at build time. Adding a keyword means adding a row
/// here, nothing else changes.
pub const ENTITY_TYPES: &[(&str, &str)] = &[
    ("tank", "G-U-C-F-M"),      // armor, main battle tank
    ("apc", "G-U-C-F-A"),       // armor, APC
    ("infantry", "G-U-C-I"),    // combat infantry
    ("artillery", "G-U-C-F-D"), // field artillery
    ("mlrs", "G-U-C-F-D-M"),    // field artillery, MLRS
    ("sam", "G-U-W-M-S"),       // missile, surface-to-air
    ("radar", "G-U-S-R"),       // sensor, radar
    ("truck", "G-U-S-T"),       // support, transport
    ("helicopter", "A-M-H"),    // air, military helicopter
    ("drone", "A-M-F-Q"),       // air, fixed wing UAV
];

/// Look up the branch code for an entity keyword, case-insensitively.
pub fn lookup(keyword: &str) -> Option<&'static str> {
    ENTITY_TYPES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(keyword))
        .map(|&(_, code)| code)
}

/// MIL-STD-2525 affiliation used when composing the full CoT type field.
///
/// Spot reports carry no affiliation of their own; the gateway tags them
/// according to its configuration (hostile for spotted enemy equipment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affiliation {
    /// Hostile (h)
    Hostile,
    /// Friendly (f)
    Friendly,
    /// Neutral (n)
    Neutral,
    /// Unknown (u)
    Unknown,
}

impl Affiliation {
    /// Single-character code used in the CoT type field.
    pub fn code(self) -> char {
        match self {
            Affiliation::Hostile => 'h',
            Affiliation::Friendly => 'f',
            Affiliation::Neutral => 'n',
            Affiliation::Unknown => 'u',
        }
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Affiliation::Hostile => write!(f, "Hostile"),
            Affiliation::Friendly => write!(f, "Friendly"),
            Affiliation::Neutral => write!(f, "Neutral"),
            Affiliation::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Compose the full CoT type for a keyword, e.g. `a-h-G-U-C-F-M` for a
/// hostile tank. Returns `None` for keywords not in the registry.
pub fn cot_type(keyword: &str, affiliation: Affiliation) -> Option<String> {
    lookup(keyword).map(|branch| format!("a-{}-{}", affiliation.code(), branch))
}
