#![allow(clippy::unwrap_used)]
#![allow(dead_code)]
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

const GRID_COLUMNS: usize = 11;

fn cell(text: &str) -> String {
    format!(r#"<w:tc><w:tcPr><w:tcW w:w="800" w:type="dxa"/></w:tcPr><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:tc>"#)
}

fn merged(span: usize) -> String {
    let width = 800 * span;
    format!(
        r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/><w:gridSpan w:val="{span}"/></w:tcPr><w:p><w:pPr><w:spacing w:before="0"/></w:pPr><w:r><w:rPr><w:sz w:val="18"/></w:rPr><w:t></w:t></w:r></w:p></w:tc>"#
    )
}

fn labelled_row(labels: &[(usize, &str)]) -> String {
    let cells: String = (0..GRID_COLUMNS)
        .map(|col| {
            let text = labels.iter().find(|(c, _)| *c == col).map_or("", |(_, t)| t);
            cell(text)
        })
        .collect();
    format!("<w:tr>{cells}</w:tr>")
}

/// Body XML of a photo-log form: two label rows, five blank rows and a merged
/// reference row at index 7.
#[must_use]
pub fn report_body() -> String {
    let mut rows = vec![
        labelled_row(&[(0, "日期"), (3, "填表人")]),
        labelled_row(&[(0, "工作地点"), (3, "单位名称")]),
    ];
    rows.extend((0..5).map(|_| labelled_row(&[])));
    rows.push(format!(
        "<w:tr><w:trPr><w:trHeight w:val=\"400\"/></w:trPr>{}</w:tr>",
        [2, 3, 2, 2, 2].iter().map(|span| merged(*span)).collect::<String>()
    ));

    let grid: String = (0..GRID_COLUMNS).map(|_| r#"<w:gridCol w:w="800"/>"#).collect();
    format!(
        r#"<w:p><w:r><w:t>影像采集记录表</w:t></w:r></w:p><w:tbl><w:tblPr><w:tblW w:w="8800" w:type="dxa"/></w:tblPr><w:tblGrid>{grid}</w:tblGrid>{}</w:tbl>"#,
        rows.concat()
    )
}

/// Packs `body` into a minimal but complete `.docx`.
#[must_use]
pub fn build_docx(body: &str) -> Vec<u8> {
    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#.to_string(),
        ),
        (
            "word/document.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
            ),
        ),
    ];

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn write_template(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("template.docx");
    std::fs::write(&path, build_docx(body)).unwrap();
    path
}

pub fn create_image(path: &Path, size: usize) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, vec![0u8; size]).unwrap();
}

/// Raw `word/document.xml` of a saved package.
pub fn document_xml(path: &Path) -> String {
    let bytes = std::fs::read(path).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}
