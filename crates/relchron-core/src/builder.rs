//! # Event Builder
//!
//! Staged construction of [`Event`] markers.
//!
//! Relation targets may be named three ways: by [`MarkerId`], by reference
//! to an already-built marker (its identifier is extracted), or by canonical
//! identifier text. `Option` wrappers are accepted and `None` arguments are
//! no-ops, so callers can thread optional CLI/HTTP fields straight through.
//!
//! Input failures (unparsable identifier text) are recorded and surfaced by
//! [`EventBuilder::build`], so the fluent chain never aborts midway.

use crate::primitives::{MAX_DESC_LENGTH, MAX_RELATION_TARGETS, MAX_TITLE_LENGTH};
use crate::types::{Event, MarkerId, RelTimeSpec, RelchronError, TimeMarker};

// =============================================================================
// TARGET REFERENCES
// =============================================================================

/// A value that can name a relation target.
///
/// Resolution yields `Ok(None)` for absent arguments (a no-op),
/// `Ok(Some(id))` for usable targets, and `Err` for identifier text that
/// does not parse.
pub trait TargetRef {
    /// Resolve to a marker identifier, if one was named.
    fn resolve(self) -> Result<Option<MarkerId>, RelchronError>;
}

impl TargetRef for MarkerId {
    fn resolve(self) -> Result<Option<MarkerId>, RelchronError> {
        Ok(Some(self))
    }
}

impl TargetRef for &TimeMarker {
    fn resolve(self) -> Result<Option<MarkerId>, RelchronError> {
        Ok(Some(self.id()))
    }
}

impl TargetRef for &str {
    fn resolve(self) -> Result<Option<MarkerId>, RelchronError> {
        MarkerId::parse(self).map(Some)
    }
}

impl TargetRef for &String {
    fn resolve(self) -> Result<Option<MarkerId>, RelchronError> {
        MarkerId::parse(self).map(Some)
    }
}

impl<T: TargetRef> TargetRef for Option<T> {
    fn resolve(self) -> Result<Option<MarkerId>, RelchronError> {
        match self {
            None => Ok(None),
            Some(target) => target.resolve(),
        }
    }
}

// =============================================================================
// EVENT BUILDER
// =============================================================================

/// Builder producing a fully-formed [`TimeMarker::Event`] or failing with
/// the first input error encountered.
#[derive(Debug, Default)]
pub struct EventBuilder {
    title: String,
    desc: Option<String>,
    id: Option<MarkerId>,
    timespec: RelTimeSpec,
    deferred: Option<RelchronError>,
}

impl EventBuilder {
    /// Start building an event with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Attach a free-form description.
    #[must_use]
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    /// Use the given identifier instead of generating a fresh one.
    ///
    /// Accepts an id, a marker reference, or canonical text; `None` keeps
    /// the generated identifier.
    #[must_use]
    pub fn id(mut self, id: impl TargetRef) -> Self {
        match id.resolve() {
            Ok(Some(resolved)) => self.id = Some(resolved),
            Ok(None) => {}
            Err(e) => self.defer(e),
        }
        self
    }

    /// Assert this event happens strictly before the target.
    #[must_use]
    pub fn before(mut self, target: impl TargetRef) -> Self {
        match target.resolve() {
            Ok(Some(id)) => self.timespec.before(id),
            Ok(None) => {}
            Err(e) => self.defer(e),
        }
        self
    }

    /// Assert this event happens strictly after the target.
    #[must_use]
    pub fn after(mut self, target: impl TargetRef) -> Self {
        match target.resolve() {
            Ok(Some(id)) => self.timespec.after(id),
            Ok(None) => {}
            Err(e) => self.defer(e),
        }
        self
    }

    /// Assert this event happens at the same time as the target.
    #[must_use]
    pub fn same(mut self, target: impl TargetRef) -> Self {
        match target.resolve() {
            Ok(Some(id)) => self.timespec.same(id),
            Ok(None) => {}
            Err(e) => self.defer(e),
        }
        self
    }

    /// Produce the event, validating required fields and input limits.
    pub fn build(self) -> Result<TimeMarker, RelchronError> {
        if let Some(err) = self.deferred {
            return Err(err);
        }
        if self.title.is_empty() {
            return Err(RelchronError::Validation(
                "event title must be non-empty".to_string(),
            ));
        }
        if self.title.len() > MAX_TITLE_LENGTH {
            return Err(RelchronError::Validation(format!(
                "title length {} exceeds maximum {} bytes",
                self.title.len(),
                MAX_TITLE_LENGTH
            )));
        }
        if let Some(desc) = &self.desc {
            if desc.len() > MAX_DESC_LENGTH {
                return Err(RelchronError::Validation(format!(
                    "description length {} exceeds maximum {} bytes",
                    desc.len(),
                    MAX_DESC_LENGTH
                )));
            }
        }
        for list in [
            &self.timespec.befores,
            &self.timespec.afters,
            &self.timespec.sames,
        ] {
            if let Some(targets) = list {
                if targets.len() > MAX_RELATION_TARGETS {
                    return Err(RelchronError::Validation(format!(
                        "relation list length {} exceeds maximum {}",
                        targets.len(),
                        MAX_RELATION_TARGETS
                    )));
                }
            }
        }

        // An untouched spec stays *absent* rather than serializing as {}.
        let timespec = if self.timespec == RelTimeSpec::default() {
            None
        } else {
            Some(self.timespec)
        };

        Ok(TimeMarker::Event(Event {
            id: self.id.unwrap_or_else(MarkerId::random),
            title: self.title,
            desc: self.desc,
            timespec,
        }))
    }

    /// Record the first input error; later errors are dropped.
    fn defer(&mut self, err: RelchronError) {
        if self.deferred.is_none() {
            self.deferred = Some(err);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
