//! Merging completed record stores into one deduplicated corpus.
//!
//! Stores are processed in caller-specified order and concatenated; the
//! first occurrence of an identifier wins, later occurrences are dropped.
//! Output order is concatenation order, never sorted.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::StoreError;
use crate::store;

/// Report produced by a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Unique records written to the output store.
    pub unique: usize,
    /// Records dropped because their id was already emitted.
    pub duplicates_dropped: usize,
    /// Input lines skipped because they failed to decode.
    pub lines_skipped: usize,
    /// Input stores skipped because the file was missing.
    pub stores_missing: usize,
    /// Configured target size for the merged corpus.
    pub target: usize,
}

impl MergeReport {
    /// Whether the merged corpus reached the configured target size.
    pub fn target_met(&self) -> bool {
        self.unique >= self.target
    }
}

/// Merges the given stores, in order, into one deduplicated output store.
///
/// A corrupt input line, a duplicate identifier or a missing input store
/// is reported and skipped, never fatal. Falling short of `target` is a
/// warning in the report, not an error.
pub fn merge(inputs: &[PathBuf], output: &Path, target: usize) -> Result<MergeReport, StoreError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut writer = BufWriter::new(File::create(output)?);

    let mut unique = 0usize;
    let mut duplicates_dropped = 0usize;
    let mut lines_skipped = 0usize;
    let mut stores_missing = 0usize;

    for input in inputs {
        let scan = match store::read_records(input) {
            Ok(scan) => scan,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %input.display(), "Input store not found, skipping");
                stores_missing += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        lines_skipped += scan.lines_skipped;

        for record in scan.records {
            if !seen.insert(record.id.clone()) {
                warn!(id = %record.id, source = %input.display(), "Dropping duplicate id");
                duplicates_dropped += 1;
                continue;
            }
            let mut line = serde_json::to_string(&record)?;
            line.push('\n');
            writer.write_all(line.as_bytes())?;
            unique += 1;
        }
    }

    writer.flush()?;

    let report = MergeReport {
        unique,
        duplicates_dropped,
        lines_skipped,
        stores_missing,
        target,
    };

    if report.target_met() {
        info!(
            unique = report.unique,
            target = report.target,
            "Merge reached target size"
        );
    } else {
        warn!(
            unique = report.unique,
            target = report.target,
            "Merge fell short of target size"
        );
    }

    Ok(report)
}
