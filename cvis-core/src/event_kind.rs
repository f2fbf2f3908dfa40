//! Classification of intervention events.
//!
//! Known kinds resolve through one static table carrying the compact code
//! letter, the human readable label and the glyph drawn as a marker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a policy intervention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    EmergencyDeclaration,
    GatheringLimitation,
    BorderClosure,
    SchoolClosure,
    RestaurantClosure,
    TravelRestriction,
    NonEssentialBusinessClosure,
    StayAtHome,
    FaceCovering,
    /// Any classification missing from the table; kept verbatim.
    Other(String),
}

struct KindEntry {
    kind: EventKind,
    code: char,
    label: &'static str,
    glyph: &'static str,
    aliases: &'static [&'static str],
}

static KIND_TABLE: [KindEntry; 9] = [
    KindEntry {
        kind: EventKind::EmergencyDeclaration,
        code: 'e',
        label: "Emergency Declaration",
        glyph: "🚨",
        aliases: &["state of emergency", "state of emergency declaration", "emergency"],
    },
    KindEntry {
        kind: EventKind::GatheringLimitation,
        code: 'g',
        label: "Gathering Limitations",
        glyph: "👥",
        aliases: &["gathering limitation", "banning gatherings of a certain size"],
    },
    KindEntry {
        kind: EventKind::BorderClosure,
        code: 'c',
        label: "Border Closure",
        glyph: "🛂",
        aliases: &["border closure/visitor quarantine", "border control"],
    },
    KindEntry {
        kind: EventKind::SchoolClosure,
        code: 's',
        label: "School Closure",
        glyph: "🏫",
        aliases: &["k-12 school closure", "school closure"],
    },
    KindEntry {
        kind: EventKind::RestaurantClosure,
        code: 'r',
        label: "Restaurant Closure",
        glyph: "🍔",
        aliases: &["bar/restaurant limits", "restaurant limits"],
    },
    KindEntry {
        kind: EventKind::TravelRestriction,
        code: 't',
        label: "Travel Restrictions",
        glyph: "✈️",
        aliases: &["travel restriction"],
    },
    KindEntry {
        kind: EventKind::NonEssentialBusinessClosure,
        code: 'n',
        label: "Non-essential Business Closure",
        glyph: "🏢",
        aliases: &["non-essential businesses closure", "non-essential business closure"],
    },
    KindEntry {
        kind: EventKind::StayAtHome,
        code: 'l',
        label: "Stay-at-home Order",
        glyph: "🏠",
        aliases: &["stay-at-home", "stay at home", "shelter-in-place order", "shelter-in-place", "lockdown"],
    },
    KindEntry {
        kind: EventKind::FaceCovering,
        code: 'f',
        label: "Face Covering Requirement",
        glyph: "😷",
        aliases: &["face covering", "face masks", "mask mandate"],
    },
];

impl EventKind {
    fn entry(&self) -> Option<&'static KindEntry> {
        KIND_TABLE.iter().find(|entry| &entry.kind == self)
    }

    /// Resolve a compact code letter (case-insensitive).
    pub fn from_code(code: char) -> Option<EventKind> {
        let code = code.to_ascii_lowercase();
        KIND_TABLE
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.kind.clone())
    }

    /// Resolve free text: a code letter, a label or a known alias.
    /// Unknown text is kept as [`EventKind::Other`].
    pub fn parse(text: &str) -> EventKind {
        let trimmed = text.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(kind) = EventKind::from_code(c) {
                return kind;
            }
        }
        let lowered = trimmed.to_lowercase();
        KIND_TABLE
            .iter()
            .find(|entry| {
                entry.label.to_lowercase() == lowered || entry.aliases.contains(&lowered.as_str())
            })
            .map(|entry| entry.kind.clone())
            .unwrap_or_else(|| EventKind::Other(trimmed.to_string()))
    }

    pub fn code(&self) -> Option<char> {
        self.entry().map(|entry| entry.code)
    }

    pub fn label(&self) -> &str {
        match self {
            EventKind::Other(text) => text.as_str(),
            known => known.entry().map(|entry| entry.label).unwrap_or_default(),
        }
    }

    /// Marker glyph; unknown kinds have none.
    pub fn glyph(&self) -> Option<&'static str> {
        self.entry().map(|entry| entry.glyph)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        EventKind::parse(value)
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        EventKind::parse(&value)
    }
}

impl From<EventKind> for String {
    fn from(value: EventKind) -> Self {
        value.label().to_string()
    }
}
