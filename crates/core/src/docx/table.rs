//! Grid view over a `w:tbl` element.
//!
//! Cells are addressed by grid column: a cell with `w:gridSpan="3"` starting
//! at column 2 answers for columns 2, 3 and 4. Rows may start late through
//! `w:trPr/w:gridBefore`.

use photolog_models::FontStyle;

use super::xml::{Element, Node};
use crate::error::DocxError;

const W_TBL_GRID: &str = "w:tblGrid";
const W_GRID_COL: &str = "w:gridCol";
const W_TR: &str = "w:tr";
const W_TR_PR: &str = "w:trPr";
const W_GRID_BEFORE: &str = "w:gridBefore";
const W_TC: &str = "w:tc";
const W_TC_PR: &str = "w:tcPr";
const W_TC_W: &str = "w:tcW";
const W_GRID_SPAN: &str = "w:gridSpan";
const W_V_MERGE: &str = "w:vMerge";
const W_P: &str = "w:p";
const W_P_PR: &str = "w:pPr";
const W_JC: &str = "w:jc";
const W_R: &str = "w:r";
const W_R_PR: &str = "w:rPr";
const W_R_FONTS: &str = "w:rFonts";
const W_SZ: &str = "w:sz";
const W_SZ_CS: &str = "w:szCs";
const W_T: &str = "w:t";
const W_BR: &str = "w:br";
const W_VAL: &str = "w:val";

const TC_PR_ORDER: &[&str] = &[
    "w:cnfStyle",
    "w:tcW",
    "w:gridSpan",
    "w:hMerge",
    "w:vMerge",
    "w:tcBorders",
    "w:shd",
    "w:noWrap",
    "w:tcMar",
    "w:textDirection",
    "w:tcFitText",
    "w:vAlign",
    "w:hideMark",
    "w:headers",
    "w:cellIns",
    "w:cellDel",
    "w:cellMerge",
    "w:tcPrChange",
];

const P_PR_ORDER: &[&str] = &[
    "w:pStyle",
    "w:keepNext",
    "w:keepLines",
    "w:pageBreakBefore",
    "w:framePr",
    "w:widowControl",
    "w:numPr",
    "w:suppressLineNumbers",
    "w:pBdr",
    "w:shd",
    "w:tabs",
    "w:suppressAutoHyphens",
    "w:kinsoku",
    "w:wordWrap",
    "w:overflowPunct",
    "w:topLinePunct",
    "w:autoSpaceDE",
    "w:autoSpaceDN",
    "w:bidi",
    "w:adjustRightInd",
    "w:snapToGrid",
    "w:spacing",
    "w:ind",
    "w:contextualSpacing",
    "w:mirrorIndents",
    "w:suppressOverlap",
    "w:jc",
    "w:textDirection",
    "w:textAlignment",
    "w:textboxTightWrap",
    "w:outlineLvl",
    "w:divId",
    "w:cnfStyle",
    "w:rPr",
    "w:sectPr",
    "w:pPrChange",
];

const R_PR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
];

/// Position of a cell: row index and first grid column it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy)]
struct CellSlot {
    /// Index of the `w:tc` inside the row's children.
    child: usize,
    start: usize,
    span: usize,
}

impl CellSlot {
    const fn covers(&self, col: usize) -> bool {
        col >= self.start && col < self.start + self.span
    }
}

pub struct Table<'a> {
    tbl: &'a mut Element,
}

impl<'a> Table<'a> {
    pub fn new(tbl: &'a mut Element) -> Self {
        Self { tbl }
    }

    fn rows(&self) -> impl Iterator<Item = &Element> {
        self.tbl.elements().filter(|e| e.is(W_TR))
    }

    fn row_positions(&self) -> Vec<usize> {
        self.tbl
            .children
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_element().is_some_and(|e| e.is(W_TR)))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn row(&self, row: usize) -> Result<&Element, DocxError> {
        self.rows().nth(row).ok_or(DocxError::RowOutOfRange {
            row,
            rows: self.row_count(),
        })
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut Element, DocxError> {
        let rows = self.row_count();
        self.tbl
            .elements_mut()
            .filter(|e| e.is(W_TR))
            .nth(row)
            .ok_or(DocxError::RowOutOfRange { row, rows })
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Grid width from `w:tblGrid`, or the widest row when the grid is absent.
    #[must_use]
    pub fn column_count(&self) -> usize {
        let grid = self.grid_widths().len();
        if grid > 0 {
            return grid;
        }
        self.rows()
            .filter_map(|tr| cell_slots(tr).last().map(|s| s.start + s.span))
            .max()
            .unwrap_or(0)
    }

    fn grid_widths(&self) -> Vec<Option<String>> {
        self.tbl
            .child(W_TBL_GRID)
            .map(|grid| {
                grid.elements()
                    .filter(|e| e.is(W_GRID_COL))
                    .map(|col| col.attr("w:w"))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First cell, in row-major order, whose trimmed text satisfies `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&str) -> bool) -> Option<CellRef> {
        for (row_idx, tr) in self.rows().enumerate() {
            for slot in cell_slots(tr) {
                let Some(tc) = tr.children.get(slot.child).and_then(Node::as_element) else {
                    continue;
                };
                if predicate(cell_text(tc).trim()) {
                    return Some(CellRef {
                        row: row_idx,
                        col: slot.start,
                    });
                }
            }
        }
        None
    }

    #[must_use]
    pub fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        let tr = self.row(row).ok()?;
        let slot = cell_slots(tr).into_iter().find(|s| s.covers(col))?;
        tr.children.get(slot.child).and_then(Node::as_element).map(cell_text)
    }

    /// Texts of every cell in a row, one entry per `w:tc`.
    #[must_use]
    pub fn row_texts(&self, row: usize) -> Vec<String> {
        self.row(row)
            .map(|tr| tr.elements().filter(|e| e.is(W_TC)).map(cell_text).collect())
            .unwrap_or_default()
    }

    /// Grid spans of a row's cells, in order.
    #[must_use]
    pub fn row_spans(&self, row: usize) -> Vec<usize> {
        self.row(row)
            .map(|tr| cell_slots(tr).iter().map(|s| s.span).collect())
            .unwrap_or_default()
    }

    /// Replaces the content of the cell covering `(row, col)` with `text`.
    ///
    /// The first paragraph's properties and the first run's properties are kept
    /// so the template's formatting carries over.
    ///
    /// # Errors
    ///
    /// Returns [`DocxError::RowOutOfRange`] or [`DocxError::CellOutOfRange`] if there is no such cell.
    pub fn set_cell_text(
        &mut self,
        row: usize,
        col: usize,
        text: &str,
        font: Option<&FontStyle>,
    ) -> Result<(), DocxError> {
        let tr = self.row_mut(row)?;
        let slot = cell_slots(tr)
            .into_iter()
            .find(|s| s.covers(col))
            .ok_or(DocxError::CellOutOfRange { row, col })?;
        let tc = tr
            .children
            .get_mut(slot.child)
            .and_then(Node::as_element_mut)
            .ok_or(DocxError::CellOutOfRange { row, col })?;

        write_cell_text(tc, text, font);
        Ok(())
    }

    /// Appends an empty row with one cell per grid column.
    pub fn add_row(&mut self) {
        let mut widths = self.grid_widths();
        if widths.is_empty() {
            widths = vec![None; self.column_count().max(1)];
        }

        let mut tr = Element::new(W_TR);
        for width in widths {
            let mut tc = Element::new(W_TC);
            if let Some(width) = width {
                tc.push(
                    Element::new(W_TC_PR).with_child(
                        Element::new(W_TC_W)
                            .with_attr("w:w", &width)
                            .with_attr("w:type", "dxa"),
                    ),
                );
            }
            tc.push(Element::new(W_P));
            tr.push(tc);
        }

        let insert_at = self.row_positions().last().map_or(self.tbl.children.len(), |idx| idx + 1);
        self.tbl.children.insert(insert_at, Node::Element(tr));
    }

    /// Gives row `to` the cell layout of row `from` when `from` contains merged cells.
    ///
    /// Returns `Ok(false)` when there was nothing to copy.
    ///
    /// # Errors
    ///
    /// Returns [`DocxError::RowOutOfRange`] if either row is missing.
    pub fn copy_row_structure(&mut self, from: usize, to: usize) -> Result<bool, DocxError> {
        let reference = self.row(from)?;
        if from == to || !cell_slots(reference).iter().any(|s| s.span > 1) {
            return Ok(false);
        }

        let skeleton: Vec<Node> = reference
            .elements()
            .filter(|e| e.is(W_TC))
            .map(|tc| Node::Element(blank_cell(tc)))
            .collect();

        let target = self.row_mut(to)?;
        let insert_at = target
            .children
            .iter()
            .position(|n| n.as_element().is_some_and(|e| e.is(W_TC)))
            .unwrap_or(target.children.len());
        target.remove_children(W_TC);
        let insert_at = insert_at.min(target.children.len());
        for (offset, cell) in skeleton.into_iter().enumerate() {
            target.children.insert(insert_at + offset, cell);
        }
        Ok(true)
    }

    /// Merges the cells covering grid columns `start..start + span` of `row` into one.
    ///
    /// Non-empty paragraphs of the absorbed cells move into the surviving cell.
    ///
    /// # Errors
    ///
    /// Returns [`DocxError::MergeMisaligned`] when the range does not start and end on
    /// cell boundaries, or [`DocxError::RowOutOfRange`] for a missing row.
    pub fn merge_cells(&mut self, row: usize, start: usize, span: usize) -> Result<(), DocxError> {
        if span <= 1 {
            return Ok(());
        }
        let misaligned = DocxError::MergeMisaligned { row, start, span };

        let tr = self.row_mut(row)?;
        let slots = cell_slots(tr);
        let Some(first) = slots.iter().position(|s| s.start == start) else {
            return Err(misaligned);
        };

        let mut covered = 0;
        let mut last = first;
        for (idx, slot) in slots.iter().enumerate().skip(first) {
            covered += slot.span;
            last = idx;
            if covered >= span {
                break;
            }
        }
        if covered != span {
            return Err(misaligned);
        }
        if last == first {
            return Ok(());
        }

        let mut total_width = tr.children.get(slots[first].child).and_then(Node::as_element).and_then(cell_width);
        let mut moved = Vec::new();
        for slot in slots[first + 1..=last].iter().rev() {
            if let Node::Element(tc) = tr.children.remove(slot.child) {
                total_width = total_width.zip(cell_width(&tc)).map(|(a, b)| a + b);
                let paragraphs: Vec<Element> = tc
                    .children
                    .into_iter()
                    .filter_map(|n| match n {
                        Node::Element(p) if p.is(W_P) && !p.text().trim().is_empty() => Some(p),
                        _ => None,
                    })
                    .collect();
                moved.push(paragraphs);
            }
        }

        let Some(tc) = tr.children.get_mut(slots[first].child).and_then(Node::as_element_mut) else {
            return Err(misaligned);
        };
        let tc_pr = first_child_or_insert(tc, W_TC_PR);
        tc_pr
            .child_in_sequence(W_GRID_SPAN, TC_PR_ORDER)
            .set_attr(W_VAL, &span.to_string());
        if let Some(width) = total_width {
            tc_pr
                .child_in_sequence(W_TC_W, TC_PR_ORDER)
                .set_attr("w:w", &width.to_string());
        }
        // collected right to left
        for paragraph in moved.into_iter().rev().flatten() {
            tc.push(paragraph);
        }
        Ok(())
    }

    /// Centers every paragraph of every cell.
    pub fn center_all(&mut self) {
        for tr in self.tbl.elements_mut().filter(|e| e.is(W_TR)) {
            for tc in tr.elements_mut().filter(|e| e.is(W_TC)) {
                for p in tc.elements_mut().filter(|e| e.is(W_P)) {
                    first_child_or_insert(p, W_P_PR)
                        .child_in_sequence(W_JC, P_PR_ORDER)
                        .set_attr(W_VAL, "center");
                }
            }
        }
    }
}

fn cell_slots(tr: &Element) -> Vec<CellSlot> {
    let mut col = grid_before(tr);
    let mut slots = Vec::new();
    for (child, node) in tr.children.iter().enumerate() {
        let Some(tc) = node.as_element().filter(|e| e.is(W_TC)) else {
            continue;
        };
        let span = grid_span(tc);
        slots.push(CellSlot { child, start: col, span });
        col += span;
    }
    slots
}

fn val_of(element: Option<&Element>) -> Option<usize> {
    element.and_then(|e| e.attr(W_VAL)).and_then(|v| v.trim().parse().ok())
}

fn grid_span(tc: &Element) -> usize {
    val_of(tc.child(W_TC_PR).and_then(|p| p.child(W_GRID_SPAN)))
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

fn grid_before(tr: &Element) -> usize {
    val_of(tr.child(W_TR_PR).and_then(|p| p.child(W_GRID_BEFORE))).unwrap_or(0)
}

fn cell_width(tc: &Element) -> Option<u32> {
    let width = tc.child(W_TC_PR)?.child(W_TC_W)?;
    match width.attr("w:type").as_deref() {
        None | Some("dxa") => width.attr("w:w")?.parse().ok(),
        Some(_) => None,
    }
}

/// Paragraph texts joined by newlines.
fn cell_text(tc: &Element) -> String {
    tc.elements()
        .filter(|e| e.is(W_P))
        .map(Element::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Property elements (`w:pPr`, `w:rPr`, `w:tcPr`) always come first.
fn first_child_or_insert<'e>(parent: &'e mut Element, name: &str) -> &'e mut Element {
    if parent.position(name).is_none() {
        parent.children.insert(0, Node::Element(Element::new(name)));
    }
    parent.child_in_sequence(name, &[])
}

/// Copy of a cell with its properties and first paragraph/run formatting, but no content.
fn blank_cell(tc: &Element) -> Element {
    let mut cell = Element::new(W_TC);
    if let Some(tc_pr) = tc.child(W_TC_PR) {
        let mut tc_pr = tc_pr.clone();
        tc_pr.remove_children(W_V_MERGE);
        cell.push(tc_pr);
    }

    let mut paragraph = Element::new(W_P);
    if let Some(source) = tc.child(W_P) {
        if let Some(p_pr) = source.child(W_P_PR) {
            paragraph.push(p_pr.clone());
        }
        if let Some(r_pr) = source.child(W_R).and_then(|r| r.child(W_R_PR)) {
            paragraph.push(Element::new(W_R).with_child(r_pr.clone()));
        }
    }
    cell.push(paragraph);
    cell
}

fn write_cell_text(tc: &mut Element, text: &str, font: Option<&FontStyle>) {
    let mut paragraph = tc.take_child(W_P).unwrap_or_else(|| Element::new(W_P));
    let run_props = paragraph.child(W_R).and_then(|r| r.child(W_R_PR)).cloned();

    tc.children.retain(|n| n.as_element().is_some_and(|e| e.is(W_TC_PR)));
    paragraph
        .children
        .retain(|n| n.as_element().is_some_and(|e| e.is(W_P_PR)));

    let mut run = Element::new(W_R);
    if let Some(run_props) = run_props {
        run.push(run_props);
    }
    if let Some(font) = font {
        apply_font(&mut run, font);
    }
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            run.push(Element::new(W_BR));
        }
        run.push(text_element(line));
    }

    paragraph.push(run);
    tc.push(paragraph);
}

fn text_element(text: &str) -> Element {
    let t = Element::new(W_T);
    let t = if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        t.with_attr("xml:space", "preserve")
    } else {
        t
    };
    if text.is_empty() { t } else { t.with_text(text) }
}

fn apply_font(run: &mut Element, font: &FontStyle) {
    let r_pr = first_child_or_insert(run, W_R_PR);

    let fonts = r_pr.child_in_sequence(W_R_FONTS, R_PR_ORDER);
    for attr in ["w:ascii", "w:hAnsi", "w:eastAsia", "w:cs"] {
        fonts.set_attr(attr, &font.family);
    }

    let size = font.half_points().to_string();
    r_pr.child_in_sequence(W_SZ, R_PR_ORDER).set_attr(W_VAL, &size);
    r_pr.child_in_sequence(W_SZ_CS, R_PR_ORDER).set_attr(W_VAL, &size);
}
