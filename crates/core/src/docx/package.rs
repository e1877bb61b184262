use std::io::{Cursor, Read, Write};
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use super::table::Table;
use super::xml::{Element, XmlDocument};
use crate::error::DocxError;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    modified: Option<DateTime>,
    is_dir: bool,
}

/// A `.docx` file held in memory.
///
/// Every part is carried through unchanged except `word/document.xml`, which
/// is parsed for editing and re-serialized on save.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
    document: XmlDocument,
}

impl DocxPackage {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid docx package.
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        let bytes = std::fs::read(path)?;
        let package = Self::from_bytes(&bytes)?;
        debug!("Opened {} ({} parts)", path.display(), package.entries.len());
        Ok(package)
    }

    /// # Errors
    ///
    /// Returns an error if the bytes are not a zip archive containing a well-formed
    /// `word/document.xml`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());
        let mut document = None;

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;

            let name = file.name().to_string();
            if name == DOCUMENT_PART {
                let xml = std::str::from_utf8(&data).map_err(|_| DocxError::Encoding(name.clone()))?;
                document = Some(XmlDocument::parse(xml)?);
            }

            entries.push(PackageEntry {
                name,
                data,
                compression: file.compression(),
                modified: file.last_modified(),
                is_dir: file.is_dir(),
            });
        }

        let document = document.ok_or(DocxError::MissingPart(DOCUMENT_PART))?;
        Ok(Self { entries, document })
    }

    #[must_use]
    pub const fn document(&self) -> &XmlDocument {
        &self.document
    }

    fn body(&self) -> Option<&Element> {
        self.document.root.child("w:body")
    }

    fn body_mut(&mut self) -> Option<&mut Element> {
        self.document.root.child_mut("w:body")
    }

    /// Number of top-level tables in the document body.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.body()
            .map_or(0, |body| body.elements().filter(|e| e.is("w:tbl")).count())
    }

    /// Top-level tables of the document body, in document order.
    pub fn tables_mut(&mut self) -> Vec<Table<'_>> {
        self.body_mut()
            .map(|body| {
                body.elements_mut()
                    .filter(|e| e.is("w:tbl"))
                    .map(Table::new)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or the archive cannot be built.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let document_xml = self.document.to_bytes()?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let method = if entry.compression == CompressionMethod::Stored {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let mut options = SimpleFileOptions::default().compression_method(method);
            if let Some(modified) = entry.modified {
                options = options.last_modified_time(modified);
            }

            if entry.is_dir {
                writer.add_directory(entry.name.as_str(), options)?;
                continue;
            }

            writer.start_file(entry.name.as_str(), options)?;
            let data = if entry.name == DOCUMENT_PART {
                &document_xml
            } else {
                &entry.data
            };
            writer.write_all(data)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Writes the package to `path` in a single write, so nothing is created
    /// when serialization fails.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save(&self, path: &Path) -> Result<(), DocxError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        debug!("Saved {}", path.display());
        Ok(())
    }
}
