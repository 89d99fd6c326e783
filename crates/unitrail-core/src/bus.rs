//! Append-only event bus file -- the durable home of published records.
//!
//! # Overview
//!
//! The local bus is a JSONL file: one [`PublishedRecord`] per line,
//! newline-terminated, no pretty printing, UTF-8 bytes. The writer is
//! the only code path that stamps `_published_at_utc`, so a record on
//! the bus always carries the instant it became durable.
//!
//! Every append is written and fsynced before `publish` returns; a
//! record the caller saw accepted survives a crash.
//!
//! # Resume and corruption
//!
//! Opening an existing file scans it line by line. Malformed or
//! oversized lines abort the open with `io::ErrorKind::InvalidData`
//! naming the line number -- resuming on top of a corrupted bus would
//! silently launder bad history, so the failure is loud instead.
//!
//! # Error handling
//!
//! Write failures (fsync error, oversized record) return `io::Error`.
//! They are system-level: the event itself was valid, and callers must
//! not re-route it to the dead-letter store.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::NormalizedEvent;
use crate::sink::{EventPublisher, SINK_MAX_LINE_BYTES};

/// A normalized event as it appears on the bus: the unified schema
/// fields plus the publish instant stamped by the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedRecord {
    /// The normalized event, inlined at the top level of the line.
    #[serde(flatten)]
    pub event: NormalizedEvent,
    /// When the record was appended. The leading underscore marks the
    /// field as bus metadata rather than part of the unified schema.
    #[serde(rename = "_published_at_utc")]
    pub published_at_utc: DateTime<Utc>,
}

/// Append-only writer for the local event bus file.
#[derive(Debug)]
pub struct EventBusWriter {
    file: File,
    path: PathBuf,
    published_count: u64,
}

impl EventBusWriter {
    /// Open or create a bus file at the given path.
    ///
    /// Creates missing parent directories. An existing file is scanned
    /// to count prior records and to fail loudly on corruption.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let published_count = if path.exists() {
            scan_record_count(&path)?
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(EventBusWriter {
            file,
            path,
            published_count,
        })
    }

    /// Append one normalized event, stamping the publish instant.
    ///
    /// Returns the full record as written to the file.
    pub fn append(&mut self, event: &NormalizedEvent) -> io::Result<PublishedRecord> {
        let record = PublishedRecord {
            event: event.clone(),
            published_at_utc: Utc::now(),
        };
        let mut line = serde_json::to_string(&record).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("record serialization failed: {e}"),
            )
        })?;

        // Line size check (before adding the newline).
        if line.len() > SINK_MAX_LINE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "serialized record exceeds max line bytes ({} > {})",
                    line.len(),
                    SINK_MAX_LINE_BYTES
                ),
            ));
        }

        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.sync_all()?;

        self.published_count += 1;
        Ok(record)
    }

    /// Number of records on the bus, including those found at open.
    pub fn published_count(&self) -> u64 {
        self.published_count
    }

    /// Path to the bus file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventPublisher for EventBusWriter {
    fn publish(&mut self, event: &NormalizedEvent) -> io::Result<()> {
        self.append(event).map(|_| ())
    }
}

/// Count and validate existing records while resuming a writer.
fn scan_record_count(path: &Path) -> io::Result<u64> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut count = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.len() > SINK_MAX_LINE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "bus line {} exceeds max line bytes ({} > {})",
                    line_no + 1,
                    trimmed.len(),
                    SINK_MAX_LINE_BYTES
                ),
            ));
        }
        serde_json::from_str::<PublishedRecord>(trimmed).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "failed to parse bus line {} while resuming writer: {e}",
                    line_no + 1
                ),
            )
        })?;
        count += 1;
    }

    Ok(count)
}

/// Read all published records from a bus file, in append order.
pub fn read_bus(path: &Path) -> io::Result<Vec<PublishedRecord>> {
    let content = fs::read_to_string(path)?;
    let mut records = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: PublishedRecord = serde_json::from_str(trimmed).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to parse bus line: {e}"),
            )
        })?;
        records.push(record);
    }
    Ok(records)
}
