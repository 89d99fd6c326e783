//! Append-only dead-letter store for payloads that failed normalization.
//!
//! # Overview
//!
//! Same JSONL discipline as the bus file: one [`DeadLetterEntry`] per
//! line, written and fsynced per append, loud `InvalidData` failures
//! when an existing file does not scan cleanly. Entries keep the
//! original payload verbatim next to the rejection reason so a failed
//! event can be inspected or replayed later without hunting through
//! logs.
//!
//! The store itself reports write failures honestly via `io::Result`;
//! deciding that a dead-letter write is best-effort (log and continue)
//! is the calling pipeline's policy, not hidden in here.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::sink::{DeadLetterEntry, DeadLetterSink, SINK_MAX_LINE_BYTES};

/// Append-only writer for the dead-letter file.
#[derive(Debug)]
pub struct DeadLetterStore {
    file: File,
    path: PathBuf,
    entry_count: u64,
}

impl DeadLetterStore {
    /// Open or create a dead-letter file at the given path.
    ///
    /// Creates missing parent directories. An existing file is scanned
    /// to count prior entries and to fail loudly on corruption.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let entry_count = if path.exists() {
            scan_entry_count(&path)?
        } else {
            0
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(DeadLetterStore {
            file,
            path,
            entry_count,
        })
    }

    /// Append one rejection entry.
    pub fn append(&mut self, entry: &DeadLetterEntry) -> io::Result<()> {
        let mut line = serde_json::to_string(entry).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("dead-letter serialization failed: {e}"),
            )
        })?;

        if line.len() > SINK_MAX_LINE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "serialized dead-letter entry exceeds max line bytes ({} > {})",
                    line.len(),
                    SINK_MAX_LINE_BYTES
                ),
            ));
        }

        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.sync_all()?;

        self.entry_count += 1;
        Ok(())
    }

    /// Number of entries in the store, including those found at open.
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Path to the dead-letter file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DeadLetterSink for DeadLetterStore {
    fn record(&mut self, entry: &DeadLetterEntry) -> io::Result<()> {
        self.append(entry)
    }
}

/// Count and validate existing entries while resuming a store.
fn scan_entry_count(path: &Path) -> io::Result<u64> {
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
                    "dead-letter line {} exceeds max line bytes ({} > {})",
                    line_no + 1,
                    trimmed.len(),
                    SINK_MAX_LINE_BYTES
                ),
            ));
        }
        serde_json::from_str::<DeadLetterEntry>(trimmed).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "failed to parse dead-letter line {} while resuming store: {e}",
                    line_no + 1
                ),
            )
        })?;
        count += 1;
    }

    Ok(count)
}

/// Read all entries from a dead-letter file, in append order.
pub fn read_dead_letters(path: &Path) -> io::Result<Vec<DeadLetterEntry>> {
    let content = fs::read_to_string(path)?;
    let mut entries = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let entry: DeadLetterEntry = serde_json::from_str(trimmed).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to parse dead-letter line: {e}"),
            )
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_entry(reason: &str) -> DeadLetterEntry {
        DeadLetterEntry::new(
            "aws",
            json!({"eventName": "GetObject"}),
            reason,
        )
    }

    #[test]
    fn append_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dead_letters.jsonl");
        let mut store = DeadLetterStore::open(&path).unwrap();

        store.append(&make_entry("missing eventTime")).unwrap();
        store.append(&make_entry("bad timestamp")).unwrap();
        assert_eq!(store.entry_count(), 2);
        drop(store);

        let entries = read_dead_letters(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].error_details, "missing eventTime");
        assert_eq!(entries[1].error_details, "bad timestamp");
    }

    #[test]
    fn raw_payload_survives_storage_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dead_letters.jsonl");
        let mut store = DeadLetterStore::open(&path).unwrap();

        let payload = json!({"operationName": "x", "nested": {"list": [1, 2, 3]}});
        let entry = DeadLetterEntry::new("azure", payload.clone(), "rejected");
        store.append(&entry).unwrap();
        drop(store);

        let entries = read_dead_letters(&path).unwrap();
        assert_eq!(entries[0].raw_payload, payload);
    }

    #[test]
    fn reopen_resumes_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dead_letters.jsonl");
        {
            let mut store = DeadLetterStore::open(&path).unwrap();
            store.append(&make_entry("first")).unwrap();
        }

        let mut store = DeadLetterStore::open(&path).unwrap();
        assert_eq!(store.entry_count(), 1);
        store.append(&make_entry("second")).unwrap();
        assert_eq!(store.entry_count(), 2);
    }

    #[test]
    fn open_fails_loudly_on_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dead_letters.jsonl");
        fs::write(&path, "not json at all\n").unwrap();

        let result = DeadLetterStore::open(&path);
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("dead-letter line 1"), "got: {err}");
    }

    #[test]
    fn open_fails_loudly_on_oversized_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dead_letters.jsonl");

        // Parseable but over the cap, so only the size check can reject it.
        let entry = DeadLetterEntry::new(
            "aws",
            json!({"blob": "x".repeat(SINK_MAX_LINE_BYTES + 1)}),
            "oversized on disk",
        );
        let mut line = serde_json::to_string(&entry).unwrap();
        line.push('\n');
        fs::write(&path, line).unwrap();

        let err = DeadLetterStore::open(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("dead-letter line 1"), "got: {err}");
        assert!(err.to_string().contains("max line bytes"), "got: {err}");
    }

    #[test]
    fn oversized_entry_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dead_letters.jsonl");
        let mut store = DeadLetterStore::open(&path).unwrap();

        let entry = DeadLetterEntry::new(
            "gcp",
            json!({"blob": "x".repeat(SINK_MAX_LINE_BYTES + 1)}),
            "too big",
        );
        let err = store.append(&entry).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("max line bytes"), "got: {err}");
        assert_eq!(store.entry_count(), 0);
    }
}
