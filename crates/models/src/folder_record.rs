use serde::{Deserialize, Serialize};

/// Summary of one capture folder, written as a single row of the report table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderRecord {
    pub folder_name: String,
    /// Stem of the first image in natural order.
    pub first_file_stem: String,
    /// `"{second}-{last}"`, empty when the folder holds a single image.
    pub range_label: String,
    /// Image count excluding the first file.
    pub file_count: usize,
    pub total_size_bytes: u64,
    pub total_size_gib: f64,
    pub processor_name: String,
}

impl FolderRecord {
    /// Total number of images the record was built from.
    #[must_use]
    pub const fn image_count(&self) -> usize {
        self.file_count + 1
    }

    #[must_use]
    pub fn has_range(&self) -> bool {
        !self.range_label.is_empty()
    }
}
