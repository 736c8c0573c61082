//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::store::Database;
use crate::util::comma_separated_list;
use relchron_core::{EventBuilder, RelchronError, TimeMarker};
use std::path::Path;

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty database directory.
pub fn cmd_init(dir: &Path) -> Result<(), RelchronError> {
    Database::init(dir)?;
    println!("Initialized empty relchron database in {}", dir.display());
    Ok(())
}

// =============================================================================
// ADD COMMAND
// =============================================================================

/// Record an event and persist the collection.
///
/// Unless `--allow-dangling` is passed, a record that leaves the collection
/// referencing unknown markers is rejected and nothing is written.
pub fn cmd_add(
    dir: &Path,
    json_mode: bool,
    title: &str,
    desc: Option<&str>,
    before: Option<&str>,
    after: Option<&str>,
    same: Option<&str>,
    id: Option<&str>,
    allow_dangling: bool,
) -> Result<(), RelchronError> {
    let mut db = Database::open(dir)?;

    let mut builder = EventBuilder::new(title);
    if let Some(desc) = desc {
        builder = builder.desc(desc);
    }
    if let Some(id) = id {
        builder = builder.id(id);
    }
    for target in before.map(comma_separated_list).unwrap_or_default() {
        builder = builder.before(target.as_str());
    }
    for target in after.map(comma_separated_list).unwrap_or_default() {
        builder = builder.after(target.as_str());
    }
    for target in same.map(comma_separated_list).unwrap_or_default() {
        builder = builder.same(target.as_str());
    }

    let marker = builder.build()?;
    let marker_id = marker.id();
    db.add(marker)?;

    if !db.is_self_contained() && !allow_dangling {
        let missing: Vec<String> = db
            .collection()
            .dangling_refs()
            .keys()
            .map(|id| id.to_string())
            .collect();
        return Err(RelchronError::Validation(format!(
            "record references unknown markers ({}); pass --allow-dangling to keep it",
            missing.join(", ")
        )));
    }

    db.save()?;

    if json_mode {
        println!(
            "{}",
            serde_json::json!({ "id": marker_id.to_string() })
        );
    } else {
        println!("{}", marker_id);
    }
    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// Tabular listing of every stored marker.
pub fn cmd_list(dir: &Path, json_mode: bool) -> Result<(), RelchronError> {
    let db = Database::open(dir)?;

    if json_mode {
        let rows: Vec<serde_json::Value> = db
            .collection()
            .iter()
            .map(|marker| {
                serde_json::json!({
                    "id": marker.id().to_string(),
                    "label": marker_label(marker),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).unwrap_or_default()
        );
        return Ok(());
    }

    for marker in db.collection().iter() {
        println!("{} {}", marker.id(), marker_label(marker));
    }
    Ok(())
}

/// Human-readable label: title for events, calendar position for anchors.
fn marker_label(marker: &TimeMarker) -> String {
    match marker {
        TimeMarker::Event(e) => e.title.clone(),
        TimeMarker::Date(d) => d.date.to_string(),
        TimeMarker::AbsoluteDateTime(dt) => dt.datetime.to_string(),
    }
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show one marker in its serialized form.
pub fn cmd_show(dir: &Path, _json_mode: bool, id: &str) -> Result<(), RelchronError> {
    let db = Database::open(dir)?;
    let marker = db.get_by_str(id)?;
    let rendered = serde_json::to_string_pretty(marker)
        .map_err(|e| RelchronError::Serialization(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Report self-containment and ordering conflicts.
///
/// Exits non-zero when the collection is contradictory, so the command can
/// gate scripts and hooks.
pub fn cmd_check(dir: &Path, json_mode: bool) -> Result<(), RelchronError> {
    let db = Database::open(dir)?;
    let collection = db.collection();

    let self_contained = collection.is_self_contained();
    let conflicts = collection.conflicts();

    if json_mode {
        let output = serde_json::json!({
            "markers": collection.len(),
            "is_self_contained": self_contained,
            "has_no_conflict": conflicts.is_empty(),
            "conflicts": conflicts
                .iter()
                .map(|cycle| cycle.iter().map(|id| id.to_string()).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("relchron consistency report");
        println!("===========================");
        println!("Database: {}", dir.display());
        println!();
        println!("Markers:        {}", collection.len());
        println!("Self-contained: {}", if self_contained { "yes" } else { "no" });
        if !self_contained {
            for (missing, referrers) in collection.dangling_refs() {
                println!("  missing {} (referenced by {} record(s))", missing, referrers.len());
            }
        }
        if conflicts.is_empty() {
            println!("Conflicts:      none");
        } else {
            println!("Conflicts:      {}", conflicts.len());
            for cycle in &conflicts {
                let chain: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
                println!("  {}", chain.join(" -> "));
            }
        }
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(RelchronError::Validation(
            "collection holds contradictory ordering assertions".to_string(),
        ))
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server over the database directory.
pub async fn cmd_server(dir: &Path, host: &str, port: u16) -> Result<(), RelchronError> {
    let db = Database::open(dir)?;

    println!("relchron server starting...");
    println!();
    println!("Configuration:");
    println!("  Host:      {}", host);
    println!("  Port:      {}", port);
    println!("  Database:  {}", dir.display());
    println!();
    println!("Endpoints:");
    println!("  GET  /api/event      - List stored identifiers");
    println!("  POST /api/event      - Create an event");
    println!("  GET  /api/event/{{id}} - Fetch one marker");
    println!("  POST /api/event/{{id}} - Update a marker");
    println!("  GET  /api/collection - Consistency report");
    println!("  GET  /health         - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, db).await
}
