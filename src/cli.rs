use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use photolog_config::{OperatorDefaults, Settings};
use photolog_models::{FolderOrder, FontStyle, ReportMetadata, TableLayout, TableSelector};
use photolog_utils::path::resolve_output_path;

const DEFAULT_FONT_FAMILY: &str = "SimSun";
const DEFAULT_FONT_SIZE: f32 = 10.5;

/// Fill a photo-log report template from folders of captured images.
#[derive(Debug, Parser)]
#[command(name = "photolog", version, about)]
pub struct Cli {
    /// Directory whose subfolders each hold one set of photos
    #[arg(short, long)]
    pub input: PathBuf,

    /// Report template (.docx); falls back to `operator.template` in the config
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Output file name or path; a bare name is placed next to the template
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name written into every row as the processor
    #[arg(long)]
    pub processor: Option<String>,

    #[arg(long)]
    pub filler: Option<String>,

    /// Report date, defaults to today (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub unit: Option<String>,

    /// Settings file to use instead of the default config location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Row index of the first record
    #[arg(long)]
    pub start_row: Option<usize>,

    /// Pick the first table whose header row contains this text
    #[arg(long)]
    pub header_marker: Option<String>,

    /// Merge each field's grid columns into one cell
    #[arg(long)]
    pub merge_columns: bool,

    /// Leave paragraph alignment untouched
    #[arg(long)]
    pub no_center: bool,

    #[arg(long)]
    pub font_family: Option<String>,

    /// Font size in points
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Row order of the folders: natural or filesystem
    #[arg(long)]
    pub folder_order: Option<FolderOrder>,

    /// Store the effective operator values and layout in the config file
    #[arg(long)]
    pub save_config: bool,

    /// Scan only and print the records
    #[arg(long)]
    pub dry_run: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Reveal the finished report in the file browser
    #[arg(long)]
    pub open: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Applies command-line layout flags on top of the configured layout.
    pub fn apply_layout_overrides(&self, layout: &mut TableLayout) {
        if let Some(start_row) = self.start_row {
            layout.start_row = start_row;
        }
        if let Some(marker) = &self.header_marker {
            layout.table = TableSelector::HeaderMarker(marker.clone());
        }
        if self.merge_columns {
            layout.merge_columns = true;
        }
        if self.no_center {
            layout.center_align = false;
        }

        if self.font_family.is_some() || self.font_size.is_some() {
            let mut font = layout.font.take().unwrap_or_else(|| FontStyle {
                family: DEFAULT_FONT_FAMILY.to_string(),
                size_pt: DEFAULT_FONT_SIZE,
            });
            if let Some(family) = &self.font_family {
                font.family.clone_from(family);
            }
            if let Some(size) = self.font_size {
                font.size_pt = size;
            }
            layout.font = Some(font);
        }
    }

    /// Operator values from the flags, falling back to configured defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if no processor name is given by either source.
    pub fn metadata(&self, defaults: &OperatorDefaults, today: &str) -> Result<ReportMetadata> {
        let pick = |flag: &Option<String>, fallback: &Option<String>| {
            flag.clone().or_else(|| fallback.clone()).unwrap_or_default()
        };

        let processor = pick(&self.processor, &defaults.processor);
        if processor.trim().is_empty() {
            return Err(eyre!(
                "A processor name is required: pass --processor or set operator.processor in the config"
            ));
        }

        Ok(ReportMetadata {
            processor,
            filler: pick(&self.filler, &defaults.filler),
            date: self.date.clone().unwrap_or_else(|| today.to_string()),
            location: pick(&self.location, &defaults.location),
            unit: pick(&self.unit, &defaults.unit),
        })
    }

    /// # Errors
    ///
    /// Returns an error if neither the flag nor the config names a template.
    pub fn template_path(&self, defaults: &OperatorDefaults) -> Result<PathBuf> {
        self.template
            .clone()
            .or_else(|| defaults.template.clone())
            .ok_or_else(|| eyre!("A template is required: pass --template or set operator.template in the config"))
    }

    /// Settings that reproduce this run's operator values and layout.
    #[must_use]
    pub fn settings_to_save(
        &self,
        base: &Settings,
        layout: &TableLayout,
        folder_order: FolderOrder,
        metadata: &ReportMetadata,
    ) -> Settings {
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Settings {
            folder_order,
            layout: layout.clone(),
            operator: OperatorDefaults {
                processor: non_empty(&metadata.processor),
                filler: non_empty(&metadata.filler),
                location: non_empty(&metadata.location),
                unit: non_empty(&metadata.unit),
                template: self.template.clone().or_else(|| base.operator.template.clone()),
            },
        }
    }

    /// Output path for `template`: the `--output` value resolved next to the
    /// template, or `<template stem>_filled.docx`.
    #[must_use]
    pub fn output_path(&self, template: &Path) -> PathBuf {
        let output = self.output.clone().unwrap_or_else(|| {
            let stem = template.file_stem().map_or_else(|| "report".into(), |s| s.to_string_lossy());
            PathBuf::from(format!("{stem}_filled.docx"))
        });
        resolve_output_path(template, &output)
    }
}
