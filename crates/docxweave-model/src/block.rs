//! Block-level elements of the document tree
//!
//! A document body is an ordered sequence of [`Block`]s. Tables own rows,
//! rows own cells, and cells own blocks again, so tables nest to any depth.
//!
//! Every `add_*` operation appends and returns a mutable reference to the
//! new node so documents can be built fluently:
//!
//! ```
//! use docxweave_model::Document;
//!
//! let mut doc = Document::new();
//! let table = doc.add_table();
//! table.set_style("LightList-Accent4");
//! let header = table.add_row();
//! header.add_cell().add_paragraph("Qty");
//! header.add_cell().add_paragraph("ID");
//! ```
//!
//! Nothing here validates structure. A table with no rows or a row with no
//! cells is a legal intermediate state.

use serde::{Deserialize, Serialize};

use crate::style::TableBorders;

/// Widest grid a table may have; larger cell spans are clamped to it
pub const MAX_GRID_COLUMNS: u32 = 63;

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A paragraph of runs
    Paragraph(Paragraph),
    /// A table
    Table(Table),
}

impl Block {
    /// Returns the paragraph if this block is one
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        }
    }

    /// Returns the table if this block is one
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        }
    }
}

/// Paragraph justification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justification {
    Left,
    Center,
    Right,
    Both,
}

impl Justification {
    /// Value of the `w:jc` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Justification::Left => "left",
            Justification::Center => "center",
            Justification::Right => "right",
            Justification::Both => "both",
        }
    }
}

/// Vertical alignment of cell content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

impl VerticalAlign {
    /// Value of the `w:vAlign` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            VerticalAlign::Top => "top",
            VerticalAlign::Center => "center",
            VerticalAlign::Bottom => "bottom",
        }
    }
}

/// Table or cell width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Width {
    /// Let the consumer size it
    #[default]
    Auto,
    /// Twentieths of a point
    Dxa(u32),
    /// Fiftieths of a percent (5000 = 100%)
    Pct(u32),
}

/// Table layout algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLayout {
    /// Column widths come from the grid
    Fixed,
    /// Columns resize to fit their content
    Autofit,
}

impl TableLayout {
    /// Value of the `w:type` attribute of `w:tblLayout`
    pub fn as_str(self) -> &'static str {
        match self {
            TableLayout::Fixed => "fixed",
            TableLayout::Autofit => "autofit",
        }
    }
}

/// Default cell margins of a table, in twentieths of a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellMargins {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl CellMargins {
    /// Left and right margins only
    pub fn horizontal(twips: u32) -> Self {
        Self {
            left: twips,
            right: twips,
            ..Default::default()
        }
    }
}

/// Vertical merge state of a cell
///
/// A merged group starts with a `Restart` cell and continues through the
/// `Continue` cells directly below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalMerge {
    Restart,
    Continue,
}

/// Which conditional regions of the table style apply to a table
///
/// Defaults to what Word uses for a freshly inserted table: header row,
/// first column and row banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLook {
    pub first_row: bool,
    pub last_row: bool,
    pub first_column: bool,
    pub last_column: bool,
    pub banded_rows: bool,
    pub banded_columns: bool,
}

impl Default for TableLook {
    fn default() -> Self {
        Self {
            first_row: true,
            last_row: false,
            first_column: true,
            last_column: false,
            banded_rows: true,
            banded_columns: false,
        }
    }
}

impl TableLook {
    /// Legacy bitmask form used by the `w:val` attribute of `w:tblLook`
    pub fn bitmask(&self) -> u16 {
        let mut val = 0u16;
        if self.first_row {
            val |= 0x0020;
        }
        if self.last_row {
            val |= 0x0040;
        }
        if self.first_column {
            val |= 0x0080;
        }
        if self.last_column {
            val |= 0x0100;
        }
        if !self.banded_rows {
            val |= 0x0200;
        }
        if !self.banded_columns {
            val |= 0x0400;
        }
        val
    }
}

/// A table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Row>,
    /// Style name, resolved against the registry when the document is saved
    style: Option<String>,
    width: Width,
    grid: Vec<u32>,
    justification: Option<Justification>,
    look: TableLook,
    /// Indent from the leading margin in twentieths of a point
    #[serde(default)]
    indent: Option<u32>,
    #[serde(default)]
    layout: Option<TableLayout>,
    #[serde(default)]
    cell_margins: Option<CellMargins>,
}

impl Table {
    /// Create an empty table with no style
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row and return it
    pub fn add_row(&mut self) -> &mut Row {
        self.rows.push(Row::new());
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Set the table style by name (e.g. `"LightList-Accent4"`)
    pub fn set_style(&mut self, name: impl Into<String>) -> &mut Self {
        self.style = Some(name.into());
        self
    }

    /// Remove the style reference
    pub fn clear_style(&mut self) -> &mut Self {
        self.style = None;
        self
    }

    pub fn set_width(&mut self, width: Width) -> &mut Self {
        self.width = width;
        self
    }

    /// Set explicit grid column widths in twentieths of a point
    pub fn set_grid(&mut self, widths: impl IntoIterator<Item = u32>) -> &mut Self {
        self.grid = widths.into_iter().collect();
        self
    }

    pub fn set_justification(&mut self, jc: Justification) -> &mut Self {
        self.justification = Some(jc);
        self
    }

    pub fn set_look(&mut self, look: TableLook) -> &mut Self {
        self.look = look;
        self
    }

    /// Indent the table by `twips` from the leading margin
    pub fn set_indent(&mut self, twips: u32) -> &mut Self {
        self.indent = Some(twips);
        self
    }

    pub fn set_layout(&mut self, layout: TableLayout) -> &mut Self {
        self.layout = Some(layout);
        self
    }

    /// Default margins for every cell, overriding the table style
    pub fn set_cell_margins(&mut self, margins: CellMargins) -> &mut Self {
        self.cell_margins = Some(margins);
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn grid(&self) -> &[u32] {
        &self.grid
    }

    pub fn justification(&self) -> Option<Justification> {
        self.justification
    }

    pub fn look(&self) -> TableLook {
        self.look
    }

    pub fn indent(&self) -> Option<u32> {
        self.indent
    }

    pub fn layout(&self) -> Option<TableLayout> {
        self.layout
    }

    pub fn cell_margins(&self) -> Option<CellMargins> {
        self.cell_margins
    }

    /// Number of grid columns implied by the widest row (honouring spans)
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|c| c.span() as usize).sum())
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<Cell>,
    /// Repeat this row at the top of each page
    header: bool,
    /// Minimum height in twentieths of a point
    height: Option<u32>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell and return it
    pub fn add_cell(&mut self) -> &mut Cell {
        self.cells.push(Cell::new());
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }

    /// Mark the row as a repeating header row
    pub fn set_header(&mut self, header: bool) -> &mut Self {
        self.header = header;
        self
    }

    pub fn set_height(&mut self, twips: u32) -> &mut Self {
        self.height = Some(twips);
        self
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_header(&self) -> bool {
        self.header
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }
}

/// A table cell
///
/// Cells hold blocks, so a cell may contain paragraphs and nested tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    blocks: Vec<Block>,
    span: u32,
    vertical_align: Option<VerticalAlign>,
    /// Background fill as hex RGB
    shading: Option<String>,
    width: Option<Width>,
    #[serde(default)]
    vertical_merge: Option<VerticalMerge>,
    #[serde(default)]
    borders: TableBorders,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            span: 1,
            vertical_align: None,
            shading: None,
            width: None,
            vertical_merge: None,
            borders: TableBorders::default(),
        }
    }
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph holding a single plain run
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Paragraph {
        push_paragraph(&mut self.blocks, Paragraph::with_text(text))
    }

    /// Append a paragraph with no runs
    pub fn add_empty_paragraph(&mut self) -> &mut Paragraph {
        push_paragraph(&mut self.blocks, Paragraph::new())
    }

    /// Append a nested table
    pub fn add_table(&mut self) -> &mut Table {
        push_table(&mut self.blocks, Table::new())
    }

    /// Span this cell across `cols` grid columns, at most [`MAX_GRID_COLUMNS`]
    pub fn set_span(&mut self, cols: u32) -> &mut Self {
        self.span = cols.clamp(1, MAX_GRID_COLUMNS);
        self
    }

    /// Take part in a vertically merged group of cells
    pub fn set_vertical_merge(&mut self, merge: VerticalMerge) -> &mut Self {
        self.vertical_merge = Some(merge);
        self
    }

    /// Borders drawn around this cell, overriding the table style
    pub fn set_borders(&mut self, borders: TableBorders) -> &mut Self {
        self.borders = borders;
        self
    }

    pub fn set_vertical_align(&mut self, align: VerticalAlign) -> &mut Self {
        self.vertical_align = Some(align);
        self
    }

    /// Set the cell background, hex RGB such as `"D9E2F3"`
    pub fn set_shading(&mut self, fill: impl Into<String>) -> &mut Self {
        self.shading = Some(fill.into());
        self
    }

    pub fn set_width(&mut self, width: Width) -> &mut Self {
        self.width = Some(width);
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn span(&self) -> u32 {
        self.span.clamp(1, MAX_GRID_COLUMNS)
    }

    pub fn vertical_merge(&self) -> Option<VerticalMerge> {
        self.vertical_merge
    }

    pub fn borders(&self) -> &TableBorders {
        &self.borders
    }

    pub fn vertical_align(&self) -> Option<VerticalAlign> {
        self.vertical_align
    }

    pub fn shading(&self) -> Option<&str> {
        self.shading.as_deref()
    }

    pub fn width(&self) -> Option<Width> {
        self.width
    }

    /// Plain text of all paragraphs in the cell, one line per paragraph
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(Block::as_paragraph)
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Drop for Cell {
    /// Tables nest without limit, so nested blocks are drained onto a work
    /// list instead of being dropped recursively.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.blocks);
        while let Some(block) = pending.pop() {
            if let Block::Table(mut table) = block {
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        pending.append(&mut cell.blocks);
                    }
                }
            }
        }
    }
}

/// A paragraph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    runs: Vec<Run>,
    /// Paragraph style name
    style: Option<String>,
    justification: Option<Justification>,
    spacing_before: Option<u32>,
    spacing_after: Option<u32>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A paragraph with one plain run; empty text gives a paragraph with no runs
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut para = Self::new();
        if !text.is_empty() {
            para.runs.push(Run::new(text));
        }
        para
    }

    /// Append an empty run and return it
    pub fn add_run(&mut self) -> &mut Run {
        self.runs.push(Run::default());
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    /// Append a run with text and return it for formatting
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Run {
        self.runs.push(Run::new(text));
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    /// Append a run linking to an external `url`, styled as `Hyperlink`
    pub fn add_link(&mut self, text: impl Into<String>, url: impl Into<String>) -> &mut Run {
        let run = self.add_text(text);
        run.set_style(HYPERLINK_STYLE).set_link(url);
        run
    }

    pub fn set_style(&mut self, name: impl Into<String>) -> &mut Self {
        self.style = Some(name.into());
        self
    }

    pub fn set_justification(&mut self, jc: Justification) -> &mut Self {
        self.justification = Some(jc);
        self
    }

    /// Spacing before and after in twentieths of a point
    pub fn set_spacing(&mut self, before: u32, after: u32) -> &mut Self {
        self.spacing_before = Some(before);
        self.spacing_after = Some(after);
        self
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn justification(&self) -> Option<Justification> {
        self.justification
    }

    pub fn spacing(&self) -> (Option<u32>, Option<u32>) {
        (self.spacing_before, self.spacing_after)
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Underline {
    Single,
    Double,
    Dotted,
    Dash,
    Wave,
}

impl Underline {
    pub fn as_str(self) -> &'static str {
        match self {
            Underline::Single => "single",
            Underline::Double => "double",
            Underline::Dotted => "dotted",
            Underline::Dash => "dash",
            Underline::Wave => "wave",
        }
    }
}

/// Vertical position of run text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalPosition {
    Superscript,
    Subscript,
}

impl VerticalPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            VerticalPosition::Superscript => "superscript",
            VerticalPosition::Subscript => "subscript",
        }
    }
}

/// Character style applied by [`Paragraph::add_link`]
pub const HYPERLINK_STYLE: &str = "Hyperlink";

/// Break emitted after the run text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakType {
    Line,
    Page,
    Column,
}

/// Character formatting applied directly to a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunFormat {
    /// Character style name
    pub style: Option<String>,
    pub font: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub caps: bool,
    pub small_caps: bool,
    pub strike: bool,
    /// Hex RGB
    pub color: Option<String>,
    /// Size in half-points
    pub size: Option<u32>,
    /// Highlight color name (e.g. "yellow")
    pub highlight: Option<String>,
    pub underline: Option<Underline>,
    pub vertical: Option<VerticalPosition>,
}

impl RunFormat {
    /// True when no direct formatting is set
    pub fn is_plain(&self) -> bool {
        *self == RunFormat::default()
    }
}

/// A run of text sharing one set of character formatting
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Run {
    text: String,
    format: RunFormat,
    break_after: Option<BreakType>,
    /// External hyperlink target
    #[serde(default)]
    link: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    pub fn append_text(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub fn bold(&mut self, value: bool) -> &mut Self {
        self.format.bold = value;
        self
    }

    pub fn italic(&mut self, value: bool) -> &mut Self {
        self.format.italic = value;
        self
    }

    pub fn caps(&mut self, value: bool) -> &mut Self {
        self.format.caps = value;
        self
    }

    pub fn small_caps(&mut self, value: bool) -> &mut Self {
        self.format.small_caps = value;
        self
    }

    pub fn strike(&mut self, value: bool) -> &mut Self {
        self.format.strike = value;
        self
    }

    /// Hex RGB color such as `"FF0000"`
    pub fn color(&mut self, hex: impl Into<String>) -> &mut Self {
        self.format.color = Some(hex.into());
        self
    }

    /// Font size in half-points (24 = 12pt)
    pub fn size(&mut self, half_points: u32) -> &mut Self {
        self.format.size = Some(half_points);
        self
    }

    pub fn font(&mut self, name: impl Into<String>) -> &mut Self {
        self.format.font = Some(name.into());
        self
    }

    pub fn highlight(&mut self, color: impl Into<String>) -> &mut Self {
        self.format.highlight = Some(color.into());
        self
    }

    pub fn underline(&mut self, style: Underline) -> &mut Self {
        self.format.underline = Some(style);
        self
    }

    pub fn vertical(&mut self, position: VerticalPosition) -> &mut Self {
        self.format.vertical = Some(position);
        self
    }

    /// Set the character style by name
    pub fn set_style(&mut self, name: impl Into<String>) -> &mut Self {
        self.format.style = Some(name.into());
        self
    }

    pub fn add_break(&mut self, kind: BreakType) -> &mut Self {
        self.break_after = Some(kind);
        self
    }

    /// Make the run a hyperlink to an external URL
    pub fn set_link(&mut self, url: impl Into<String>) -> &mut Self {
        self.link = Some(url.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> &RunFormat {
        &self.format
    }

    pub fn break_after(&self) -> Option<BreakType> {
        self.break_after
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

pub(crate) fn push_paragraph(blocks: &mut Vec<Block>, para: Paragraph) -> &mut Paragraph {
    blocks.push(Block::Paragraph(para));
    match blocks.last_mut() {
        Some(Block::Paragraph(p)) => p,
        _ => unreachable!("a paragraph was just pushed"),
    }
}

pub(crate) fn push_table(blocks: &mut Vec<Block>, table: Table) -> &mut Table {
    blocks.push(Block::Table(table));
    match blocks.last_mut() {
        Some(Block::Table(t)) => t,
        _ => unreachable!("a table was just pushed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_with_text_has_single_run() {
        let para = Paragraph::with_text("Hello");
        assert_eq!(para.runs().len(), 1);
        assert_eq!(para.text(), "Hello");
        assert!(para.runs()[0].format().is_plain());
    }

    #[test]
    fn test_paragraph_with_empty_text_has_no_runs() {
        let para = Paragraph::with_text("");
        assert!(para.is_empty());
    }

    #[test]
    fn test_run_formatting_chain() {
        let mut para = Paragraph::new();
        para.add_text("bold").bold(true).italic(true).color("FF0000").size(28);
        let run = &para.runs()[0];
        assert!(run.format().bold);
        assert!(run.format().italic);
        assert_eq!(run.format().color.as_deref(), Some("FF0000"));
        assert_eq!(run.format().size, Some(28));
    }

    #[test]
    fn test_row_and_cell_append_order() {
        let mut table = Table::new();
        let row = table.add_row();
        row.add_cell().add_paragraph("a");
        row.add_cell().add_paragraph("b");
        row.add_cell().add_paragraph("c");

        let texts: Vec<String> = table.rows()[0].cells().iter().map(Cell::text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_structures_are_legal() {
        let mut table = Table::new();
        assert!(table.is_empty());
        table.add_row();
        assert_eq!(table.rows().len(), 1);
        assert!(table.rows()[0].cells().is_empty());
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_column_count_honours_span() {
        let mut table = Table::new();
        let row = table.add_row();
        row.add_cell().set_span(2);
        row.add_cell();
        let row = table.add_row();
        row.add_cell();
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_span_never_zero() {
        let mut cell = Cell::new();
        cell.set_span(0);
        assert_eq!(cell.span(), 1);
    }

    #[test]
    fn test_span_clamped_to_grid_limit() {
        let mut table = Table::new();
        table.add_row().add_cell().set_span(u32::MAX);
        assert_eq!(table.rows()[0].cells()[0].span(), MAX_GRID_COLUMNS);
        assert_eq!(table.column_count(), MAX_GRID_COLUMNS as usize);
    }

    #[test]
    fn test_drop_deeply_nested_cells() {
        let mut outer = Table::new();
        let mut table = &mut outer;
        for _ in 0..100_000 {
            table = table.add_row().add_cell().add_table();
        }
        table.add_row().add_cell().add_paragraph("innermost");
        drop(outer);
    }

    #[test]
    fn test_add_link() {
        let mut para = Paragraph::new();
        para.add_text("see ");
        para.add_link("the docs", "https://docs.rs").bold(true);

        let link = &para.runs()[1];
        assert_eq!(link.link(), Some("https://docs.rs"));
        assert_eq!(link.format().style.as_deref(), Some(HYPERLINK_STYLE));
        assert!(link.format().bold);
        assert_eq!(para.runs()[0].link(), None);
        assert_eq!(para.text(), "see the docs");
    }

    #[test]
    fn test_cell_merge_and_borders() {
        use crate::style::Border;

        let mut cell = Cell::new();
        assert!(cell.borders().is_empty());
        cell.set_vertical_merge(VerticalMerge::Restart)
            .set_borders(TableBorders::outer(Border::single(4, "000000")));
        assert_eq!(cell.vertical_merge(), Some(VerticalMerge::Restart));
        assert!(cell.borders().top.is_some());
        assert!(cell.borders().inside_h.is_none());
    }

    #[test]
    fn test_nested_table_in_cell() {
        let mut table = Table::new();
        let cell = table.add_row().add_cell();
        cell.add_paragraph("before");
        cell.add_table().add_row().add_cell().add_paragraph("inner");

        let blocks = table.rows()[0].cells()[0].blocks();
        assert_eq!(blocks.len(), 2);
        let inner = blocks[1].as_table().unwrap();
        assert_eq!(inner.rows()[0].cells()[0].text(), "inner");
    }

    #[test]
    fn test_table_look_default_bitmask() {
        assert_eq!(TableLook::default().bitmask(), 0x04A0);
    }

    #[test]
    fn test_table_look_all_regions() {
        let look = TableLook {
            first_row: true,
            last_row: true,
            first_column: true,
            last_column: true,
            banded_rows: true,
            banded_columns: true,
        };
        assert_eq!(look.bitmask(), 0x01E0);
    }

    #[test]
    fn test_block_serde_roundtrip() {
        let mut table = Table::new();
        table.set_style("TableGrid");
        table.add_row().add_cell().add_paragraph("x");
        let block = Block::Table(table);

        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(back, block);
    }
}
