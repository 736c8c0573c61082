//! # JSON File Storage
//!
//! The storage collaborator: owns the data directory and the in-memory
//! [`Collection`], and moves whole documents between the two.
//!
//! The core never touches the filesystem; it only transforms bytes.
//! Crash-atomicity of the write is this layer's job: the document is
//! written to a sibling temp file and renamed over the target, so readers
//! observe either the old document or the new one, never a torn write.

use relchron_core::{Collection, MarkerId, RelchronError, TimeMarker, collection_from_bytes, collection_to_bytes};
use std::path::{Path, PathBuf};

/// File name of the persisted document inside the data directory.
pub const DATABASE_FILE: &str = "db.json";

/// Scratch name used during atomic replace.
const DATABASE_TEMP_FILE: &str = "db.json.tmp";

// =============================================================================
// DATABASE
// =============================================================================

/// A collection bound to the directory it persists in.
#[derive(Debug)]
pub struct Database {
    dir: PathBuf,
    collection: Collection,
}

impl Database {
    /// Initialize a fresh database directory.
    ///
    /// Refuses a path that exists and is a file or a non-empty directory;
    /// creates the directory when missing, then writes an empty document.
    pub fn init(dir: &Path) -> Result<Self, RelchronError> {
        if !not_exists_or_empty_dir(dir) {
            return Err(RelchronError::Io(format!(
                "path `{}` is not an empty directory or is a file",
                dir.display()
            )));
        }
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                RelchronError::Io(format!("cannot create `{}`: {}", dir.display(), e))
            })?;
        }
        let db = Self {
            dir: dir.to_path_buf(),
            collection: Collection::new(),
        };
        db.save()?;
        Ok(db)
    }

    /// Open an existing database directory.
    pub fn open(dir: &Path) -> Result<Self, RelchronError> {
        let path = dir.join(DATABASE_FILE);
        let bytes = std::fs::read(&path)
            .map_err(|e| RelchronError::Io(format!("cannot read `{}`: {}", path.display(), e)))?;
        let collection = collection_from_bytes(&bytes)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            collection,
        })
    }

    /// Persist the full collection with atomic whole-file replace.
    pub fn save(&self) -> Result<(), RelchronError> {
        let bytes = collection_to_bytes(&self.collection)?;
        let temp = self.dir.join(DATABASE_TEMP_FILE);
        let target = self.dir.join(DATABASE_FILE);

        std::fs::write(&temp, &bytes)
            .map_err(|e| RelchronError::Io(format!("cannot write `{}`: {}", temp.display(), e)))?;
        std::fs::rename(&temp, &target).map_err(|e| {
            RelchronError::Io(format!(
                "cannot replace `{}`: {}",
                target.display(),
                e
            ))
        })
    }

    /// The stored collection.
    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// The data directory this database persists in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // =========================================================================
    // COLLECTION OPERATIONS
    // =========================================================================
    //
    // The same operation set the collection exposes, owned by the facade;
    // callers persist with `save` when a mutation should reach disk.

    /// Add a marker, failing on identifier collision.
    pub fn add(&mut self, marker: TimeMarker) -> Result<(), RelchronError> {
        self.collection.add(marker)
    }

    /// Add-or-replace under the marker's identifier.
    pub fn upsert(
        &mut self,
        marker: TimeMarker,
    ) -> Option<TimeMarker> {
        self.collection.upsert(marker)
    }

    /// Look up a marker by the identifier's canonical text form.
    pub fn get_by_str(&self, text: &str) -> Result<&TimeMarker, RelchronError> {
        self.collection.get_by_str(text)
    }

    /// All stored identifiers.
    #[must_use]
    pub fn list(&self) -> Vec<MarkerId> {
        self.collection.list()
    }

    /// Whether every referenced identifier resolves to a stored marker.
    #[must_use]
    pub fn is_self_contained(&self) -> bool {
        self.collection.is_self_contained()
    }

    /// All ordering contradictions in the collection.
    #[must_use]
    pub fn conflicts(&self) -> Vec<Vec<MarkerId>> {
        self.collection.conflicts()
    }

    /// Whether the asserted partial order is contradiction-free.
    #[must_use]
    pub fn has_no_conflict(&self) -> bool {
        self.collection.has_no_conflict()
    }
}

/// Whether `path` is absent, or an existing empty directory.
fn not_exists_or_empty_dir(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }
    if !path.is_dir() {
        return false;
    }
    match std::fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
