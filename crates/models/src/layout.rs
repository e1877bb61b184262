use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::MetadataField;

/// How the report table is located inside the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableSelector {
    /// The first table of the document body.
    #[default]
    First,
    /// The first table whose header row has a cell containing the marker.
    HeaderMarker(String),
}

impl fmt::Display for TableSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first table"),
            Self::HeaderMarker(marker) => write!(f, "table with header '{marker}'"),
        }
    }
}

/// Order in which capture folders become table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FolderOrder {
    #[default]
    Natural,
    FileSystem,
}

impl FromStr for FolderOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "natural" => Ok(Self::Natural),
            "filesystem" | "fs" => Ok(Self::FileSystem),
            _ => Err(format!("Unknown folder order: {s}")),
        }
    }
}

impl fmt::Display for FolderOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural => write!(f, "natural"),
            Self::FileSystem => write!(f, "filesystem"),
        }
    }
}

/// A (possibly merged) run of grid columns that holds one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub start: usize,
    #[serde(default = "default_span")]
    pub span: usize,
}

fn default_span() -> usize {
    1
}

impl ColumnSpan {
    #[must_use]
    pub const fn new(start: usize, span: usize) -> Self {
        Self { start, span }
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.span
    }
}

/// A label cell in the template whose answer cell sits `offset` grid columns to the right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataLabel {
    pub field: MetadataField,
    pub label: String,
    pub offset: usize,
}

impl MetadataLabel {
    #[must_use]
    pub fn new(field: MetadataField, label: impl Into<String>, offset: usize) -> Self {
        Self {
            field,
            label: label.into(),
            offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontStyle {
    pub family: String,
    pub size_pt: f32,
}

impl FontStyle {
    /// Font size in the half-point units used by `w:sz`.
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[must_use]
    pub fn half_points(&self) -> u32 {
        (self.size_pt * 2.0).round().max(1.0) as u32
    }
}

/// Where and how records are written into the template.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    #[serde(default)]
    pub table: TableSelector,
    #[serde(default = "default_start_row")]
    pub start_row: usize,
    /// Identifier, range, count, size label, processor.
    #[serde(default = "default_columns")]
    pub columns: [ColumnSpan; 5],
    #[serde(default = "default_labels")]
    pub labels: Vec<MetadataLabel>,
    #[serde(default = "default_copy_reference_row")]
    pub copy_reference_row: bool,
    #[serde(default)]
    pub merge_columns: bool,
    #[serde(default = "default_center_align")]
    pub center_align: bool,
    #[serde(default)]
    pub font: Option<FontStyle>,
}

fn default_start_row() -> usize {
    7
}
fn default_columns() -> [ColumnSpan; 5] {
    [
        ColumnSpan::new(0, 2),
        ColumnSpan::new(2, 3),
        ColumnSpan::new(5, 2),
        ColumnSpan::new(7, 2),
        ColumnSpan::new(9, 2),
    ]
}
fn default_labels() -> Vec<MetadataLabel> {
    vec![
        MetadataLabel::new(MetadataField::Filler, "填表人", 1),
        MetadataLabel::new(MetadataField::Date, "日期", 2),
        MetadataLabel::new(MetadataField::Location, "工作地点", 2),
        MetadataLabel::new(MetadataField::Unit, "单位名称", 3),
    ]
}
fn default_copy_reference_row() -> bool {
    true
}
fn default_center_align() -> bool {
    true
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            table: TableSelector::default(),
            start_row: default_start_row(),
            columns: default_columns(),
            labels: default_labels(),
            copy_reference_row: default_copy_reference_row(),
            merge_columns: false,
            center_align: default_center_align(),
            font: None,
        }
    }
}

impl TableLayout {
    /// Number of grid columns a row needs to hold every field.
    #[must_use]
    pub fn required_columns(&self) -> usize {
        self.columns.iter().map(ColumnSpan::end).max().unwrap_or(0)
    }
}
