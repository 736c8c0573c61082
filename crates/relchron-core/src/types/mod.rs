//! # Core Type Definitions
//!
//! This module contains all value types for the relchron consistency engine:
//! - Marker identity (`MarkerId`)
//! - The entity sum type (`TimeMarker`: `Event`, `Date`, `AbsoluteDateTime`)
//! - Relative time assertions (`RelTimeSpec`)
//! - Error types (`RelchronError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Implement `Ord` where they key a `BTreeMap`/`BTreeSet`
//! - Carry an explicit serde type discriminant through serialization
//! - Distinguish *unknown* (`None`) from *known empty* (`Some(vec![])`)
//!   relation lists, and preserve that distinction across a round trip

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::primitives::{DATE_FORMAT, DATETIME_FORMAT};

// =============================================================================
// MARKER IDENTITY
// =============================================================================

/// Unique identifier for a time marker.
///
/// A random 128-bit identifier; the canonical text form is the hyphenated
/// lowercase UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub Uuid);

impl MarkerId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the canonical text form.
    pub fn parse(text: &str) -> Result<Self, RelchronError> {
        Uuid::parse_str(text)
            .map(Self)
            .map_err(|_| RelchronError::MalformedIdentifier(text.to_string()))
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for MarkerId {
    fn from(raw: Uuid) -> Self {
        Self(raw)
    }
}

// =============================================================================
// RELATIVE TIME ASSERTIONS
// =============================================================================

/// A per-entity set of pairwise ordering assertions against other markers.
///
/// Each list is independently optional: `None` means the relation kind is
/// *unknown*, while `Some(vec![])` means it is *known to be empty*. The
/// serialized form drops absent keys entirely so the distinction survives
/// a serialize → deserialize round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RelTimeSpec {
    /// Markers this entity happens strictly before.
    #[serde(rename = "before", default, skip_serializing_if = "Option::is_none")]
    pub befores: Option<Vec<MarkerId>>,

    /// Markers this entity happens strictly after.
    #[serde(rename = "after", default, skip_serializing_if = "Option::is_none")]
    pub afters: Option<Vec<MarkerId>>,

    /// Markers this entity happens at the same time as.
    #[serde(rename = "same", default, skip_serializing_if = "Option::is_none")]
    pub sames: Option<Vec<MarkerId>>,
}

impl RelTimeSpec {
    /// Create a spec with every relation kind unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert that this entity happens strictly before `target`.
    ///
    /// The first call for the kind transitions the list from *unknown* to
    /// *known* before appending.
    pub fn before(&mut self, target: MarkerId) {
        self.befores.get_or_insert_with(Vec::new).push(target);
    }

    /// Assert that this entity happens strictly after `target`.
    pub fn after(&mut self, target: MarkerId) {
        self.afters.get_or_insert_with(Vec::new).push(target);
    }

    /// Assert that this entity happens at the same time as `target`.
    pub fn same(&mut self, target: MarkerId) {
        self.sames.get_or_insert_with(Vec::new).push(target);
    }

    /// All referenced identifiers, across every relation kind.
    pub fn targets(&self) -> impl Iterator<Item = MarkerId> + '_ {
        self.befores
            .iter()
            .flatten()
            .chain(self.afters.iter().flatten())
            .chain(self.sames.iter().flatten())
            .copied()
    }
}

// =============================================================================
// TIME MARKERS
// =============================================================================

/// A discrete recorded event, ordered only relative to other markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identity of this event.
    pub id: MarkerId,
    /// Required, non-empty.
    pub title: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Relative ordering assertions; `None` when nothing is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timespec: Option<RelTimeSpec>,
}

/// A calendar-date anchor, no time-of-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMarker {
    pub id: MarkerId,
    pub date: NaiveDate,
}

/// A calendar date plus time-of-day anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeMarker {
    pub id: MarkerId,
    pub datetime: NaiveDateTime,
}

/// Any entity that participates in time ordering.
///
/// A closed sum type: the serde discriminant (`type`) and payload (`data`)
/// are exactly what the persisted document carries per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TimeMarker {
    Event(Event),
    Date(DateMarker),
    AbsoluteDateTime(DateTimeMarker),
}

impl TimeMarker {
    /// Build a date anchor.
    #[must_use]
    pub const fn date(id: MarkerId, date: NaiveDate) -> Self {
        Self::Date(DateMarker { id, date })
    }

    /// Build a date anchor from its fixed text form (`%Y-%m-%d`).
    pub fn date_from_str(id: MarkerId, text: &str) -> Result<Self, RelchronError> {
        let date = NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
            RelchronError::Validation(format!("invalid date `{text}`, expected {DATE_FORMAT}"))
        })?;
        Ok(Self::date(id, date))
    }

    /// Build a date + time anchor.
    #[must_use]
    pub const fn datetime(id: MarkerId, datetime: NaiveDateTime) -> Self {
        Self::AbsoluteDateTime(DateTimeMarker { id, datetime })
    }

    /// Build a date + time anchor from its fixed text form (`%Y-%m-%dT%H:%M:%S`).
    pub fn datetime_from_str(id: MarkerId, text: &str) -> Result<Self, RelchronError> {
        let datetime = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map_err(|_| {
            RelchronError::Validation(format!(
                "invalid datetime `{text}`, expected {DATETIME_FORMAT}"
            ))
        })?;
        Ok(Self::datetime(id, datetime))
    }

    /// Stable identity of this marker.
    #[must_use]
    pub const fn id(&self) -> MarkerId {
        match self {
            Self::Event(e) => e.id,
            Self::Date(d) => d.id,
            Self::AbsoluteDateTime(dt) => dt.id,
        }
    }

    /// Event title, when this marker is an event.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Event(e) => Some(&e.title),
            _ => None,
        }
    }

    /// Relative ordering assertions, when present.
    ///
    /// Anchor markers carry none; their ordering comes from the calendar.
    #[must_use]
    pub const fn timespec(&self) -> Option<&RelTimeSpec> {
        match self {
            Self::Event(e) => e.timespec.as_ref(),
            _ => None,
        }
    }

    /// Calendar position, when this marker is an anchor.
    #[must_use]
    pub fn anchor_stamp(&self) -> Option<AnchorStamp> {
        match self {
            Self::Event(_) => None,
            Self::Date(d) => Some(AnchorStamp {
                date: d.date,
                time: None,
            }),
            Self::AbsoluteDateTime(dt) => Some(AnchorStamp {
                date: dt.datetime.date(),
                time: Some(dt.datetime.time()),
            }),
        }
    }
}

// =============================================================================
// ANCHOR COMPARISON
// =============================================================================

/// Calendar position of an anchor marker, with optional time-of-day.
///
/// Comparison between anchors is a *partial* order: a date-only anchor spans
/// its whole day, so it is unordered against any point within that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorStamp {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl AnchorStamp {
    /// Whether this anchor is strictly earlier than `other`.
    ///
    /// Distinct dates compare by date; equal dates compare by time only
    /// when both sides carry one.
    #[must_use]
    pub fn strictly_before(self, other: Self) -> bool {
        if self.date != other.date {
            return self.date < other.date;
        }
        match (self.time, other.time) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the relchron consistency engine.
///
/// These are programming/input errors reported immediately to the caller;
/// nothing is retried internally. Contradictory orderings and dangling
/// references are NOT errors: they are query results
/// (`Collection::conflicts`, `Collection::is_self_contained`).
#[derive(Debug, Error)]
pub enum RelchronError {
    /// A required entity field is missing or malformed.
    #[error("Invalid entity: {0}")]
    Validation(String),

    /// Identifier text that does not parse as the canonical form.
    #[error("Malformed identifier: `{0}`")]
    MalformedIdentifier(String),

    /// An entity with this identifier is already stored.
    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(MarkerId),

    /// Lookup of an identifier that is not stored.
    #[error("Marker not found: {0}")]
    NotFound(MarkerId),

    /// A persisted entry carries an unrecognized type tag.
    #[error("Unknown entity type tag: `{0}`")]
    UnknownType(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error propagated from the storage collaborator.
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
