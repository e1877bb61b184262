use color_eyre::Result;
use tempfile::TempDir;

use photolog_core::docx::DocxPackage;
use photolog_core::{ReportError, TableFiller};
use photolog_models::{FolderRecord, MetadataField, ReportMetadata, TableLayout, TableSelector};

use crate::common::{build_docx, document_xml, report_body, write_template};

fn record(folder: &str, first: &str, range: &str, count: usize, bytes: u64) -> FolderRecord {
    #[allow(clippy::cast_precision_loss)]
    let gib = bytes as f64 / (1024.0 * 1024.0 * 1024.0);
    FolderRecord {
        folder_name: folder.into(),
        first_file_stem: first.into(),
        range_label: range.into(),
        file_count: count,
        total_size_bytes: bytes,
        total_size_gib: gib,
        processor_name: "Lin".into(),
    }
}

fn metadata() -> ReportMetadata {
    ReportMetadata {
        processor: "Lin".into(),
        filler: "Wang Fang".into(),
        date: "2024-05-01".into(),
        location: "East Hall".into(),
        unit: "Survey Office".into(),
    }
}

#[test]
fn test_fill_report_form() -> Result<()> {
    let mut package = DocxPackage::from_bytes(&build_docx(&report_body()))?;
    let records = vec![
        record("A", "1", "2-10", 9, 6 * 1024 * 1024),
        record("C", "C_01", "C_02-C_40", 39, 3 * 1024 * 1024 * 1024),
        record("D", "D_1", "", 0, 1024),
    ];

    let outcome = TableFiller::new(&TableLayout::default()).fill(&mut package, &records, &metadata())?;
    assert_eq!(outcome.rows_written, 3);
    assert_eq!(outcome.rows_appended, 2);
    assert_eq!(
        outcome.placed_fields,
        vec![
            MetadataField::Filler,
            MetadataField::Date,
            MetadataField::Location,
            MetadataField::Unit
        ]
    );

    let tables = package.tables_mut();
    let form = &tables[0];
    assert_eq!(form.cell_text(0, 2).as_deref(), Some("2024-05-01"));
    assert_eq!(form.cell_text(0, 4).as_deref(), Some("Wang Fang"));
    assert_eq!(form.cell_text(1, 2).as_deref(), Some("East Hall"));
    assert_eq!(form.cell_text(1, 6).as_deref(), Some("Survey Office"));

    assert_eq!(form.row_texts(7), vec!["1", "2-10", "9", "0.01 GB", "Lin"]);
    assert_eq!(form.row_texts(8), vec!["C_01", "C_02-C_40", "39", "3.00 GB", "Lin"]);
    assert_eq!(form.row_texts(9), vec!["D_1", "", "0", "0.00 GB", "Lin"]);
    for row in 8..=9 {
        assert_eq!(form.row_spans(row), vec![2, 3, 2, 2, 2]);
    }
    Ok(())
}

#[test]
fn test_fill_keeps_template_formatting() -> Result<()> {
    let mut package = DocxPackage::from_bytes(&build_docx(&report_body()))?;
    TableFiller::new(&TableLayout::default()).fill(
        &mut package,
        &[record("A", "1", "", 0, 1), record("B", "2", "", 0, 1)],
        &metadata(),
    )?;

    let xml = String::from_utf8(package.document().to_bytes()?)?;
    assert!(xml.contains("影像采集记录表"));
    assert!(xml.contains(r#"<w:tblW w:w="8800" w:type="dxa"/>"#));
    assert!(xml.contains(r#"<w:trHeight w:val="400"/>"#));
    // run formatting of the reference row survives on copied rows
    assert_eq!(xml.matches(r#"<w:sz w:val="18"/>"#).count(), 10);
    Ok(())
}

#[test]
fn test_fill_then_save_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let template = write_template(temp_dir.path(), &report_body());
    let output = temp_dir.path().join("filled.docx");

    let mut package = DocxPackage::open(&template)?;
    TableFiller::new(&TableLayout::default()).fill(&mut package, &[record("A", "1", "2-3", 2, 10)], &metadata())?;
    package.save(&output)?;

    let xml = document_xml(&output);
    assert!(xml.contains("<w:t>2-3</w:t>"));
    assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
    // the template itself is untouched
    assert!(!document_xml(&template).contains("2-3"));
    Ok(())
}

#[test]
fn test_fill_with_missing_header_marker() -> Result<()> {
    let mut package = DocxPackage::from_bytes(&build_docx(&report_body()))?;
    let layout = TableLayout {
        table: TableSelector::HeaderMarker("色卡照片编号".into()),
        ..TableLayout::default()
    };
    let result = TableFiller::new(&layout).fill(&mut package, &[record("A", "1", "", 0, 1)], &metadata());
    assert!(matches!(result, Err(ReportError::NoTargetTable { .. })));
    Ok(())
}
