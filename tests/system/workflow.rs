#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
use color_eyre::Result;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::RwLock;

use photolog_core::docx::DocxPackage;
use photolog_core::{ReportError, ReportGenerator, ReportJob};
use photolog_models::{FolderOrder, ReportMetadata, TableLayout};
use photolog_utils::Progress;

#[path = "../common/mod.rs"]
mod common;
use common::{build_docx, create_image, report_body, write_template};

/// Folder A holds ten images of 600 KiB, folder B only a text file.
fn setup_captures(root: &Path) {
    for n in 1..=10 {
        create_image(&root.join("A").join(format!("{n}.jpg")), 600 * 1024);
    }
    create_image(&root.join("B/notes.txt"), 100);
}

fn job(temp_dir: &TempDir, template: &Path) -> ReportJob {
    ReportJob {
        input_dir: temp_dir.path().join("captures"),
        template: template.to_path_buf(),
        output: temp_dir.path().join("reports").join("filled.docx"),
        metadata: ReportMetadata {
            processor: "Lin".into(),
            filler: "Wang".into(),
            date: "2024-05-01".into(),
            location: String::new(),
            unit: String::new(),
        },
        layout: TableLayout::default(),
        folder_order: FolderOrder::Natural,
    }
}

#[tokio::test]
async fn test_end_to_end_report() -> Result<()> {
    let temp_dir = TempDir::new()?;
    setup_captures(&temp_dir.path().join("captures"));
    let template = write_template(temp_dir.path(), &report_body());
    let job = job(&temp_dir, &template);
    let output = job.output.clone();
    let progress = Arc::new(RwLock::new(Progress::default()));

    let summary = ReportGenerator::generate(job, progress.clone()).await?;

    assert_eq!(summary.output, output);
    assert_eq!(summary.scan.records.len(), 1);
    assert_eq!(summary.scan.skipped.len(), 1);
    assert_eq!(summary.fill.rows_written, 1);
    assert!(progress.read().await.is_complete);

    let mut package = DocxPackage::open(&output)?;
    let tables = package.tables_mut();
    assert_eq!(tables[0].row_texts(7), vec!["1", "2-10", "9", "0.01 GB", "Lin"]);
    assert_eq!(tables[0].row_count(), 8);
    assert_eq!(tables[0].cell_text(0, 2).as_deref(), Some("2024-05-01"));
    assert_eq!(tables[0].cell_text(0, 4).as_deref(), Some("Wang"));
    Ok(())
}

#[tokio::test]
async fn test_repeated_runs_are_identical() -> Result<()> {
    let temp_dir = TempDir::new()?;
    setup_captures(&temp_dir.path().join("captures"));
    let template = write_template(temp_dir.path(), &report_body());

    let first = ReportGenerator::generate(job(&temp_dir, &template), Arc::default()).await?;
    let first_bytes = std::fs::read(&first.output)?;
    let second = ReportGenerator::generate(job(&temp_dir, &template), Arc::default()).await?;

    assert_eq!(std::fs::read(&second.output)?, first_bytes);
    Ok(())
}

#[tokio::test]
async fn test_template_without_tables_leaves_no_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    setup_captures(&temp_dir.path().join("captures"));
    let template = write_template(temp_dir.path(), "<w:p><w:r><w:t>no table</w:t></w:r></w:p>");
    let job = job(&temp_dir, &template);
    let output = job.output.clone();

    let result = ReportGenerator::generate(job, Arc::default()).await;
    assert!(matches!(result, Err(ReportError::NoTargetTable { .. })));
    assert!(!output.exists());
    assert!(!output.parent().unwrap().exists());
    Ok(())
}

#[test]
fn test_cli_dry_run_prints_records_as_json() -> Result<()> {
    let temp_dir = TempDir::new()?;
    setup_captures(&temp_dir.path().join("captures"));
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "[operator]\nprocessor = \"Lin\"\n")?;

    let output = Command::new(env!("CARGO_BIN_EXE_photolog"))
        .arg("--input")
        .arg(temp_dir.path().join("captures"))
        .arg("--config")
        .arg(&config)
        .args(["--dry-run", "--json"])
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let scan: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(scan["records"][0]["first_file_stem"], "1");
    assert_eq!(scan["records"][0]["range_label"], "2-10");
    assert_eq!(scan["records"][0]["processor_name"], "Lin");
    assert_eq!(scan["skipped"][0]["name"], "B");
    Ok(())
}

#[test]
fn test_cli_fills_template() -> Result<()> {
    let temp_dir = TempDir::new()?;
    setup_captures(&temp_dir.path().join("captures"));
    let template = temp_dir.path().join("form.docx");
    std::fs::write(&template, build_docx(&report_body()))?;
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "")?;

    let status = Command::new(env!("CARGO_BIN_EXE_photolog"))
        .arg("--input")
        .arg(temp_dir.path().join("captures"))
        .arg("--template")
        .arg(&template)
        .args(["--output", "done", "--processor", "Zhao", "--date", "2024-05-01"])
        .arg("--config")
        .arg(&config)
        .status()?;
    assert!(status.success());

    let mut package = DocxPackage::open(&temp_dir.path().join("done.docx"))?;
    let tables = package.tables_mut();
    assert_eq!(tables[0].cell_text(7, 9).as_deref(), Some("Zhao"));
    assert_eq!(tables[0].cell_text(0, 2).as_deref(), Some("2024-05-01"));
    Ok(())
}

#[test]
fn test_cli_saves_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    setup_captures(&temp_dir.path().join("captures"));
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "")?;

    let status = Command::new(env!("CARGO_BIN_EXE_photolog"))
        .arg("--input")
        .arg(temp_dir.path().join("captures"))
        .arg("--config")
        .arg(&config)
        .args(["--processor", "Lin", "--start-row", "5", "--save-config", "--dry-run"])
        .status()?;
    assert!(status.success());

    let saved = std::fs::read_to_string(&config)?;
    assert!(saved.contains("processor = \"Lin\""));
    assert!(saved.contains("start_row = 5"));
    Ok(())
}

#[test]
fn test_cli_requires_processor() -> Result<()> {
    let temp_dir = TempDir::new()?;
    setup_captures(&temp_dir.path().join("captures"));
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "")?;

    let status = Command::new(env!("CARGO_BIN_EXE_photolog"))
        .arg("--input")
        .arg(temp_dir.path().join("captures"))
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .status()?;
    assert!(!status.success());
    Ok(())
}
