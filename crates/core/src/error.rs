use std::path::PathBuf;

use photolog_models::TableSelector;

/// Failures of the document layer.
#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid docx archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Package has no {0} part")]
    MissingPart(&'static str),

    #[error("Part {0} is not valid UTF-8")]
    Encoding(String),

    #[error("Row {row} does not exist (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Row {row} has no cell at grid column {col}")]
    CellOutOfRange { row: usize, col: usize },

    #[error("Cannot merge {span} columns from grid column {start} in row {row}: cell boundaries do not line up")]
    MergeMisaligned { row: usize, start: usize, span: usize },
}

pub(crate) fn xml_error(err: impl std::fmt::Display) -> DocxError {
    DocxError::Xml(err.to_string())
}

/// Fatal conditions that abort a report run.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Input directory does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Input path is not a directory: {}", .0.display())]
    InputNotDirectory(PathBuf),

    #[error("Cannot read input directory {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No folder under {} contains image files", .0.display())]
    NoRecords(PathBuf),

    #[error("Cannot load template {}: {source}", .path.display())]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: DocxError,
    },

    #[error("Template has no {selector}")]
    NoTargetTable { selector: TableSelector },

    #[error("Failed to write row for folder '{folder}': {source}")]
    RowWrite {
        folder: String,
        #[source]
        source: DocxError,
    },

    #[error("Cannot save report to {}: {source}", .path.display())]
    OutputUnsavable {
        path: PathBuf,
        #[source]
        source: DocxError,
    },

    #[error("Output path {} would overwrite the template", .0.display())]
    OutputIsTemplate(PathBuf),
}
