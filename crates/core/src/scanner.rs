use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use photolog_models::{FolderOrder, FolderRecord, ScanReport, SkipReason, SkippedFolder};
use photolog_utils::media_types::is_image_file;
use photolog_utils::{Progress, bytes_to_gib, format_bytes, natural_cmp};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::ReportError;

/// An image that passed the extension filter.
#[derive(Debug, Clone)]
struct ImageEntry {
    name: String,
    stem: String,
    size: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    order: FolderOrder,
}

impl Scanner {
    #[must_use]
    pub const fn new(order: FolderOrder) -> Self {
        Self { order }
    }

    /// Builds one record per immediate subfolder of `root` that holds images.
    ///
    /// Folders without images or that cannot be read are skipped with a warning
    /// and listed in the report. Files directly under `root` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is missing, is not a directory, or cannot be listed.
    pub async fn scan(
        &self,
        root: &Path,
        processor: &str,
        progress: Arc<RwLock<Progress>>,
    ) -> Result<ScanReport, ReportError> {
        info!("Scanner: Starting scan of {:?} ({} order)", root, self.order);

        let metadata = match tokio::fs::metadata(root).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ReportError::InputNotFound(root.to_path_buf()));
            }
            Err(source) => {
                return Err(ReportError::InputUnreadable {
                    path: root.to_path_buf(),
                    source,
                });
            }
        };
        if !metadata.is_dir() {
            return Err(ReportError::InputNotDirectory(root.to_path_buf()));
        }

        let mut report = ScanReport::default();
        let folders = self.list_children(root, &mut report.ignored_entries)?;
        info!("Scanner: Found {} folders in {:?}", folders.len(), root);

        progress.write().await.reset(folders.len());

        for folder in folders {
            let name = file_name_of(&folder);
            match collect_images(&folder).await {
                Ok(images) if images.is_empty() => {
                    warn!("Skipping folder {:?}: no image files", name);
                    report.skipped.push(SkippedFolder {
                        name: name.clone(),
                        reason: SkipReason::NoImages,
                    });
                }
                Ok(images) => {
                    if let Some(record) = build_record(&name, images, processor) {
                        debug!(
                            "Folder {:?}: {} images, {}",
                            name,
                            record.image_count(),
                            format_bytes(record.total_size_bytes)
                        );
                        report.records.push(record);
                    }
                }
                Err(e) => {
                    warn!("Skipping folder {:?}: {}", name, e);
                    report.skipped.push(SkippedFolder {
                        name: name.clone(),
                        reason: SkipReason::Unreadable(e.to_string()),
                    });
                }
            }

            progress.write().await.advance(format!("Scanned {name}"));
        }

        progress.write().await.finish();
        info!(
            "Scanner: {} records, {} folders skipped, {} other entries ignored",
            report.records.len(),
            report.skipped.len(),
            report.ignored_entries.len()
        );
        Ok(report)
    }

    /// Immediate subdirectories of `root` in the configured order.
    fn list_children(&self, root: &Path, ignored: &mut Vec<String>) -> Result<Vec<PathBuf>, ReportError> {
        let mut walker = WalkDir::new(root).min_depth(1).max_depth(1);
        if self.order == FolderOrder::Natural {
            walker = walker.sort_by(|a, b| {
                natural_cmp(&a.file_name().to_string_lossy(), &b.file_name().to_string_lossy())
            });
        }

        let mut folders = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // the root itself could not be listed
                Err(e) if e.depth() == 0 => {
                    return Err(ReportError::InputUnreadable {
                        path: root.to_path_buf(),
                        source: io::Error::from(e),
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            let is_dir = entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir());
            if is_dir {
                folders.push(entry.into_path());
            } else {
                let name = entry.file_name().to_string_lossy().into_owned();
                info!("Ignoring non-directory entry {:?}", name);
                ignored.push(name);
            }
        }
        Ok(folders)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.to_string_lossy().into_owned(), |n| n.to_string_lossy().into_owned())
}

/// Regular files in `folder` with an image extension. Symlinks are followed.
async fn collect_images(folder: &Path) -> io::Result<Vec<ImageEntry>> {
    let mut images = Vec::new();
    let mut entries = tokio::fs::read_dir(folder).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_image_file(&path) {
            continue;
        }
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            // dangling symlink or file removed mid-scan
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Skipping {:?}: {}", path, e);
                continue;
            }
            Err(e) => return Err(e),
        };
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let stem = path
            .file_stem()
            .map_or_else(|| name.clone(), |s| s.to_string_lossy().into_owned());
        images.push(ImageEntry {
            name,
            stem,
            size: metadata.len(),
        });
    }
    Ok(images)
}

/// Summarizes a folder's images. Returns `None` for an empty list.
fn build_record(folder_name: &str, mut images: Vec<ImageEntry>, processor: &str) -> Option<FolderRecord> {
    images.sort_by(|a, b| natural_cmp(&a.name, &b.name));

    let first = images.first()?;
    let range_label = match images.as_slice() {
        [_, second, .., last] => format!("{}-{}", second.stem, last.stem),
        [_, only] => format!("{}-{}", only.stem, only.stem),
        _ => String::new(),
    };
    let total_size_bytes: u64 = images.iter().map(|i| i.size).sum();

    Some(FolderRecord {
        folder_name: folder_name.to_string(),
        first_file_stem: first.stem.clone(),
        range_label,
        file_count: images.len().saturating_sub(1),
        total_size_bytes,
        total_size_gib: bytes_to_gib(total_size_bytes),
        processor_name: processor.to_string(),
    })
}
