use photolog_models::{FillOutcome, FolderRecord, ReportMetadata, TableLayout, TableSelector};
use photolog_utils::format_gib;
use tracing::{debug, info, warn};

use crate::docx::{DocxPackage, Table};
use crate::error::ReportError;

/// Writes folder records and operator metadata into a template's tables.
#[derive(Debug, Clone)]
pub struct TableFiller {
    layout: TableLayout,
}

impl TableFiller {
    #[must_use]
    pub fn new(layout: &TableLayout) -> Self {
        Self { layout: layout.clone() }
    }

    /// Fills `package` in place.
    ///
    /// Formatting steps that fail are logged and reported in
    /// [`FillOutcome::formatting_warnings`]; only the record writes are fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoTargetTable`] if no table matches the selector, or
    /// [`ReportError::RowWrite`] if a record field cannot be written.
    pub fn fill(
        &self,
        package: &mut DocxPackage,
        records: &[FolderRecord],
        metadata: &ReportMetadata,
    ) -> Result<FillOutcome, ReportError> {
        let mut tables = package.tables_mut();
        let target = self
            .select_table(&tables)
            .ok_or_else(|| ReportError::NoTargetTable {
                selector: self.layout.table.clone(),
            })?;
        debug!("Target table is #{} of {}", target, tables.len());

        let mut outcome = FillOutcome::default();
        let required = self.layout.required_columns();
        let available = tables[target].column_count();
        if available < required {
            note_warning(
                &mut outcome,
                format!("target table has {available} grid columns, layout needs {required}"),
            );
        }
        self.place_metadata(&mut tables, metadata, &mut outcome);
        self.write_records(&mut tables[target], records, &mut outcome)?;

        if self.layout.center_align {
            for table in &mut tables {
                table.center_all();
            }
        }

        info!(
            "Filled {} rows ({} appended), placed {} metadata fields",
            outcome.rows_written,
            outcome.rows_appended,
            outcome.placed_fields.len()
        );
        Ok(outcome)
    }

    fn select_table(&self, tables: &[Table<'_>]) -> Option<usize> {
        match &self.layout.table {
            TableSelector::First => (!tables.is_empty()).then_some(0),
            TableSelector::HeaderMarker(marker) => tables
                .iter()
                .position(|t| t.row_texts(0).iter().any(|text| text.contains(marker.as_str()))),
        }
    }

    /// Writes each configured metadata value next to its label cell.
    fn place_metadata(&self, tables: &mut [Table<'_>], metadata: &ReportMetadata, outcome: &mut FillOutcome) {
        for label in &self.layout.labels {
            let found = tables
                .iter()
                .enumerate()
                .find_map(|(idx, t)| t.find(|text| text == label.label).map(|cell| (idx, cell)));

            let Some((idx, cell)) = found else {
                debug!("Label {:?} not present in template", label.label);
                continue;
            };

            let col = cell.col + label.offset;
            let value = metadata.value(label.field);
            match tables[idx].set_cell_text(cell.row, col, value, self.layout.font.as_ref()) {
                Ok(()) => {
                    debug!("Placed {} at row {}, column {}", label.field, cell.row, col);
                    outcome.placed_fields.push(label.field);
                }
                Err(e) => warn!("Cannot place {} next to {:?}: {}", label.field, label.label, e),
            }
        }
    }

    fn write_records(
        &self,
        table: &mut Table<'_>,
        records: &[FolderRecord],
        outcome: &mut FillOutcome,
    ) -> Result<(), ReportError> {
        let start = self.layout.start_row;
        let font = self.layout.font.as_ref();

        for (i, record) in records.iter().enumerate() {
            let row = start + i;
            while table.row_count() <= row {
                table.add_row();
                outcome.rows_appended += 1;
            }

            if self.layout.copy_reference_row && row != start {
                if let Err(e) = table.copy_row_structure(start, row) {
                    note_warning(outcome, format!("row {row}: reference layout not copied: {e}"));
                }
            }
            if self.layout.merge_columns {
                for span in &self.layout.columns {
                    if let Err(e) = table.merge_cells(row, span.start, span.span) {
                        note_warning(outcome, format!("row {row}: {e}"));
                    }
                }
            }

            let values = [
                record.first_file_stem.clone(),
                record.range_label.clone(),
                record.file_count.to_string(),
                format_gib(record.total_size_gib),
                record.processor_name.clone(),
            ];
            for (span, value) in self.layout.columns.iter().zip(&values) {
                table
                    .set_cell_text(row, span.start, value, font)
                    .map_err(|source| ReportError::RowWrite {
                        folder: record.folder_name.clone(),
                        source,
                    })?;
            }
            outcome.rows_written += 1;
        }
        Ok(())
    }
}

fn note_warning(outcome: &mut FillOutcome, message: String) {
    warn!("{}", message);
    outcome.formatting_warnings.push(message);
}
