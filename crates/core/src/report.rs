use std::path::{Path, PathBuf};
use std::sync::Arc;

use photolog_models::{FolderOrder, ReportMetadata, ReportSummary, TableLayout};
use photolog_utils::Progress;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::docx::DocxPackage;
use crate::error::{DocxError, ReportError};
use crate::{Scanner, TableFiller};

/// Everything one report run needs.
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub input_dir: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub metadata: ReportMetadata,
    pub layout: TableLayout,
    pub folder_order: FolderOrder,
}

pub struct ReportGenerator;

impl ReportGenerator {
    /// Scans `job.input_dir`, fills the template and saves the result.
    ///
    /// Nothing is written to disk unless every earlier step succeeded.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`ReportError`] of the run.
    pub async fn generate(job: ReportJob, progress: Arc<RwLock<Progress>>) -> Result<ReportSummary, ReportError> {
        if same_file(&job.template, &job.output) {
            return Err(ReportError::OutputIsTemplate(job.output));
        }

        let scan = Scanner::new(job.folder_order)
            .scan(&job.input_dir, &job.metadata.processor, progress)
            .await?;
        if scan.records.is_empty() {
            return Err(ReportError::NoRecords(job.input_dir));
        }

        info!("Loading template {:?}", job.template);
        let mut package = DocxPackage::open(&job.template).map_err(|source| ReportError::TemplateUnreadable {
            path: job.template.clone(),
            source,
        })?;

        let fill = TableFiller::new(&job.layout).fill(&mut package, &scan.records, &job.metadata)?;
        if !fill.formatting_warnings.is_empty() {
            warn!("{} formatting steps were skipped", fill.formatting_warnings.len());
        }

        save(&package, &job.output).map_err(|source| ReportError::OutputUnsavable {
            path: job.output.clone(),
            source,
        })?;
        info!("Report written to {:?}", job.output);

        Ok(ReportSummary {
            output: job.output,
            scan,
            fill,
        })
    }
}

fn save(package: &DocxPackage, output: &Path) -> Result<(), DocxError> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    package.save(output)
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
