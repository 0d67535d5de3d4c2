//! Append-only JSONL record stores.
//!
//! A store is a UTF-8 text file with one JSON-encoded [`ScenarioRecord`]
//! per line, no enclosing array. An empty file is a valid empty store.
//! Writes are append-only and flushed per record, so a run interrupted
//! after N of M records leaves exactly the first N durably present and
//! well-formed.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::warn;

use crate::dataset::ScenarioRecord;
use crate::error::StoreError;

/// Appends records to the store at `path`, creating the file if absent.
///
/// Each record is serialized to a single self-contained line and written
/// with one write call followed by a flush, so no partial line is ever
/// left for a record that was fully handed to the writer. Existing
/// content is never truncated or rewritten.
///
/// Returns the number of records appended.
pub fn append(path: &Path, records: &[ScenarioRecord]) -> Result<usize, StoreError> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    for record in records {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.flush()?;
    }

    Ok(records.len())
}

/// Truncates the store at `path` to empty, creating it if absent.
///
/// Used only by fresh-run orchestration; incremental appends never call
/// this.
pub fn reset(path: &Path) -> Result<(), StoreError> {
    File::create(path)?;
    Ok(())
}

/// Result of scanning a store file.
#[derive(Debug)]
pub struct StoreScan {
    /// Records that decoded cleanly, in file order.
    pub records: Vec<ScenarioRecord>,
    /// Number of non-empty lines that failed to decode.
    pub lines_skipped: usize,
}

/// Reads every record from the store at `path`.
///
/// Corrupt lines are reported and skipped; one bad line never aborts the
/// scan. Blank lines are ignored silently.
pub fn read_records(path: &Path) -> Result<StoreScan, StoreError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut lines_skipped = 0usize;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ScenarioRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    line = line_number + 1,
                    error = %e,
                    "Skipping corrupt store line"
                );
                lines_skipped += 1;
            }
        }
    }

    Ok(StoreScan {
        records,
        lines_skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Rubric, ScenarioRecord};

    fn sample_record(id: &str) -> ScenarioRecord {
        ScenarioRecord {
            id: id.to_string(),
            domain: "Economic Systems".to_string(),
            level: "Level 1".to_string(),
            scenario_context: "ctx".to_string(),
            user_prompt: "prompt".to_string(),
            rubric: Rubric {
                generic_failure: "g".to_string(),
                context_success: "c".to_string(),
                key_concept: "k".to_string(),
            },
        }
    }

    #[test]
    fn test_append_creates_and_reads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.jsonl");

        let records = vec![sample_record("ECON_L1_001"), sample_record("ECON_L1_002")];
        let written = append(&path, &records).expect("append");
        assert_eq!(written, 2);

        let scan = read_records(&path).expect("read");
        assert_eq!(scan.records, records);
        assert_eq!(scan.lines_skipped, 0);
    }

    #[test]
    fn test_append_is_pure_append() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.jsonl");

        append(&path, &[sample_record("ECON_L1_001")]).expect("first append");
        append(&path, &[sample_record("ECON_L1_002")]).expect("second append");

        let scan = read_records(&path).expect("read");
        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.records[0].id, "ECON_L1_001");
        assert_eq!(scan.records[1].id, "ECON_L1_002");
    }

    #[test]
    fn test_append_empty_slice_does_not_create_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.jsonl");

        let written = append(&path, &[]).expect("append");
        assert_eq!(written, 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_reset_truncates_existing_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.jsonl");

        append(&path, &[sample_record("ECON_L1_001")]).expect("append");
        reset(&path).expect("reset");

        let scan = read_records(&path).expect("read");
        assert!(scan.records.is_empty());
    }

    #[test]
    fn test_read_skips_corrupt_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.jsonl");

        append(&path, &[sample_record("ECON_L1_001")]).expect("append");
        {
            let mut file = OpenOptions::new().append(true).open(&path).expect("open");
            writeln!(file, "{{ not json").expect("write corrupt line");
        }
        append(&path, &[sample_record("ECON_L1_002")]).expect("append");

        let scan = read_records(&path).expect("read");
        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.lines_skipped, 1);
    }

    #[test]
    fn test_empty_file_is_valid_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.jsonl");
        reset(&path).expect("reset");

        let scan = read_records(&path).expect("read");
        assert!(scan.records.is_empty());
        assert_eq!(scan.lines_skipped, 0);
    }
}
