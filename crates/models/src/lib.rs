mod folder_record;
mod layout;
mod metadata;
mod scan;

pub use folder_record::FolderRecord;
pub use layout::{ColumnSpan, FolderOrder, FontStyle, MetadataLabel, TableLayout, TableSelector};
pub use metadata::{MetadataField, ReportMetadata};
pub use scan::{FillOutcome, ReportSummary, ScanReport, SkipReason, SkippedFolder};
