use std::path::Path;

use yamj_core::ArtworkKind;

use crate::scanner::{ArtworkOrigin, ArtworkRecord, ScanOutcome};

/// A single entry in the artwork log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    Committed {
        item: String,
        kind: ArtworkKind,
        filename: String,
        origin: ArtworkOrigin,
    },
    Skipped {
        item: String,
        kind: ArtworkKind,
        filename: String,
    },
    Cached {
        item: String,
        kind: ArtworkKind,
    },
    NotFound {
        item: String,
        kind: ArtworkKind,
    },
    Failure {
        item: String,
        kind: ArtworkKind,
        outcome: ScanOutcome,
        message: String,
    },
}

impl LogEntry {
    /// Log entry for a record, or `None` when nothing was attempted.
    pub fn from_record(item: &str, record: &ArtworkRecord) -> Option<Self> {
        let item = item.to_string();
        let kind = record.kind;
        let filename = record.filename.clone().unwrap_or_default();
        let entry = match record.outcome {
            ScanOutcome::NotRequired | ScanOutcome::NotDue => return None,
            ScanOutcome::CacheValid => LogEntry::Cached { item, kind },
            ScanOutcome::Committed => LogEntry::Committed {
                item,
                kind,
                filename,
                origin: record.origin.clone().unwrap_or(ArtworkOrigin::Existing),
            },
            ScanOutcome::Skipped => LogEntry::Skipped { item, kind, filename },
            ScanOutcome::NotFound => LogEntry::NotFound { item, kind },
            outcome @ (ScanOutcome::FetchFailed | ScanOutcome::DecodeFailed | ScanOutcome::WriteFailed) => {
                LogEntry::Failure {
                    item,
                    kind,
                    outcome,
                    message: record.message.clone().unwrap_or_default(),
                }
            }
        };
        Some(entry)
    }
}

/// Collects batch results and writes a log file.
#[derive(Debug, Default)]
pub struct ArtworkLog {
    entries: Vec<LogEntry>,
}

impl ArtworkLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::Committed { origin, .. } => {
                    summary.committed += 1;
                    match origin {
                        ArtworkOrigin::Local => summary.from_local += 1,
                        ArtworkOrigin::Online(_) => summary.from_online += 1,
                        ArtworkOrigin::Existing => summary.from_metadata += 1,
                    }
                }
                LogEntry::Skipped { .. } => summary.skipped += 1,
                LogEntry::Cached { .. } => summary.cached += 1,
                LogEntry::NotFound { .. } => summary.not_found += 1,
                LogEntry::Failure { .. } => summary.failures += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Artwork Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(
            file,
            "Written: {} (local: {}, online: {}, metadata: {})",
            summary.committed, summary.from_local, summary.from_online, summary.from_metadata
        )?;
        writeln!(file, "Up to date: {}", summary.skipped + summary.cached)?;
        writeln!(file, "Not found: {}", summary.not_found)?;
        writeln!(file, "Failures: {}", summary.failures)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Committed {
                    item,
                    kind,
                    filename,
                    origin,
                } => {
                    writeln!(file, "[OK] {} {} -> {} ({})", item, kind, filename, origin)?;
                }
                LogEntry::Skipped { item, kind, filename } => {
                    writeln!(file, "[CURRENT] {} {} -> {}", item, kind, filename)?;
                }
                LogEntry::Cached { item, kind } => {
                    writeln!(file, "[CACHED] {} {}", item, kind)?;
                }
                LogEntry::NotFound { item, kind } => {
                    writeln!(file, "[NOT FOUND] {} {}", item, kind)?;
                }
                LogEntry::Failure {
                    item,
                    kind,
                    outcome,
                    message,
                } => {
                    writeln!(file, "[FAILED] {} {} ({:?}): {}", item, kind, outcome, message)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogSummary {
    pub committed: usize,
    pub skipped: usize,
    pub cached: usize,
    pub not_found: usize,
    pub failures: usize,
    pub from_local: usize,
    pub from_online: usize,
    pub from_metadata: usize,
}
