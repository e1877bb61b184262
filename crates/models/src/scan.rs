use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::{FolderRecord, MetadataField};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    NoImages,
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImages => write!(f, "no image files"),
            Self::Unreadable(message) => write!(f, "unreadable: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFolder {
    pub name: String,
    pub reason: SkipReason,
}

/// Everything the scanner learned about an input root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub records: Vec<FolderRecord>,
    pub skipped: Vec<SkippedFolder>,
    /// Non-directory entries found directly under the root.
    pub ignored_entries: Vec<String>,
}

impl ScanReport {
    #[must_use]
    pub fn folders_seen(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// What the filler did to the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FillOutcome {
    pub rows_written: usize,
    pub rows_appended: usize,
    pub placed_fields: Vec<MetadataField>,
    pub formatting_warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub output: PathBuf,
    pub scan: ScanReport,
    pub fill: FillOutcome,
}
