//! DOCX Writer
//!
//! Turns a [`Document`] into a complete package. Writing happens in two
//! phases: every style reference is resolved first (see
//! [`resolve_document`]), and only when that succeeds are the parts
//! generated and the archive written. A failing save never produces a
//! partial file.
//!
//! # Example
//!
//! ```no_run
//! use docxweave_model::Document;
//! use docxweave_ooxml::{DocxWriter, WriterConfig};
//!
//! let mut doc = Document::new();
//! let table = doc.add_table();
//! table.set_style("LightList-Accent4");
//! table.add_row().add_cell().add_paragraph("Qty");
//!
//! DocxWriter::new(WriterConfig::default()).save(&doc, "out.docx")?;
//! # Ok::<(), docxweave_ooxml::DocxError>(())
//! ```

use std::borrow::Cow;
use std::io::{Seek, Write};
use std::path::Path;

use docxweave_model::{
    Block, BreakType, Cell, CellMargins, Document, Paragraph, Row, Run, RunFormat, Table,
    TableLook, VerticalMerge, Width, MAX_GRID_COLUMNS,
};
use tracing::{debug, warn};

use crate::archive::PackageWriter;
use crate::config::{Orientation, PageSetup, WriterConfig};
use crate::error::Result;
use crate::parts::{PartHandle, PartKind, PartManager, RelSource};
use crate::props::{generate_app_xml, generate_core_xml};
use crate::relationships::Relationships;
use crate::resolve::{resolve_document, ResolvedStyles};
use crate::styles_writer::{generate_styles_xml, write_borders, write_shading};
use crate::xml::escape_text;

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Office document relationships namespace (`r:` prefix)
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Writes documents as `.docx` packages
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    config: WriterConfig,
}

impl DocxWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Resolve styles and generate every part of the package
    pub fn build_parts(&self, doc: &Document) -> Result<PartManager> {
        let styles = resolve_document(doc)?;

        let mut parts = PartManager::new();
        let main = parts.register_part(PartKind::Document, Vec::new());
        parts.add_relationship(
            RelSource::Package,
            main,
            PartKind::Document.relationship_type(),
        );

        if !styles.is_empty() {
            let styles_xml = generate_styles_xml(&styles, &self.config.defaults);
            let handle = parts.register_part(PartKind::Styles, styles_xml);
            parts.add_relationship(
                RelSource::Part(main),
                handle,
                PartKind::Styles.relationship_type(),
            );
        }

        // Hyperlink relationships are allocated while the body is written
        let document_xml =
            DocumentXml::new(&styles, &self.config.page, &mut parts, main).generate(doc);
        parts.register_part(PartKind::Document, document_xml);

        if !doc.properties().is_empty() {
            let handle =
                parts.register_part(PartKind::CoreProperties, generate_core_xml(doc.properties()));
            parts.add_relationship(
                RelSource::Package,
                handle,
                PartKind::CoreProperties.relationship_type(),
            );
        }

        if self.config.app_properties {
            let handle = parts.register_part(
                PartKind::AppProperties,
                generate_app_xml(doc, &self.config.application),
            );
            parts.add_relationship(
                RelSource::Package,
                handle,
                PartKind::AppProperties.relationship_type(),
            );
        }

        debug!(parts = parts.len(), styles = styles.len(), "built package parts");
        Ok(parts)
    }

    fn package(&self) -> PackageWriter {
        PackageWriter::new(self.config.compression)
    }

    /// Write the document into memory
    pub fn write(&self, doc: &Document) -> Result<Vec<u8>> {
        let parts = self.build_parts(doc)?;
        self.package().to_bytes(&parts)
    }

    /// Write the document to a seekable writer
    pub fn write_to<W: Write + Seek>(&self, doc: &Document, writer: W) -> Result<()> {
        let parts = self.build_parts(doc)?;
        self.package().write_to(&parts, writer)
    }

    /// Write the document to a file, atomically
    pub fn save(&self, doc: &Document, path: impl AsRef<Path>) -> Result<()> {
        let parts = self.build_parts(doc)?;
        self.package().write_to_file(&parts, path)
    }
}

/// Save shortcuts on [`Document`] using the default configuration
pub trait SaveDocx {
    /// Write the document to `path`
    fn save(&self, path: impl AsRef<Path>) -> Result<()>;

    /// Write the document into memory
    fn to_docx_bytes(&self) -> Result<Vec<u8>>;
}

impl SaveDocx for Document {
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        DocxWriter::default().save(self, path)
    }

    fn to_docx_bytes(&self) -> Result<Vec<u8>> {
        DocxWriter::default().write(self)
    }
}

/// Pending work of the document walk
///
/// Nesting is unbounded, so the tree is walked with an explicit stack
/// rather than recursion.
enum Step<'a> {
    Block(&'a Block),
    Row(&'a Row),
    Cell(&'a Cell),
    /// Markup written once everything pushed after it is done
    Raw(&'static str),
}

/// `word/document.xml` generator
struct DocumentXml<'a, 'p> {
    output: String,
    styles: &'a ResolvedStyles,
    page: &'a PageSetup,
    parts: &'p mut PartManager,
    main: PartHandle,
}

impl<'a, 'p> DocumentXml<'a, 'p> {
    fn new(
        styles: &'a ResolvedStyles,
        page: &'a PageSetup,
        parts: &'p mut PartManager,
        main: PartHandle,
    ) -> Self {
        Self {
            output: String::new(),
            styles,
            page,
            parts,
            main,
        }
    }

    fn generate(mut self, doc: &'a Document) -> String {
        self.output.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.output.push('\n');
        self.output.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}">"#,
            W_NS, R_NS
        ));
        self.output.push('\n');
        if let Some(color) = doc.background() {
            self.output.push_str(&format!(
                r#"<w:background w:color="{}"/>"#,
                escape_text(color)
            ));
            self.output.push('\n');
        }
        self.output.push_str("<w:body>\n");

        self.generate_blocks(doc.blocks());
        self.generate_section();

        self.output.push_str("</w:body>\n");
        self.output.push_str("</w:document>");
        self.output
    }

    /// Id for a style name; resolution has already checked every reference
    fn style_id(&self, name: &'a str) -> &'a str {
        self.styles.id_of(name).unwrap_or(name)
    }

    fn generate_blocks(&mut self, blocks: &'a [Block]) {
        let mut pending: Vec<Step<'a>> = blocks.iter().rev().map(Step::Block).collect();

        while let Some(step) = pending.pop() {
            match step {
                Step::Block(Block::Paragraph(para)) => self.generate_paragraph(para),
                Step::Block(Block::Table(table)) => {
                    self.open_table(table);
                    pending.push(Step::Raw("</w:tbl>\n"));
                    pending.extend(table.rows().iter().rev().map(Step::Row));
                }
                Step::Row(row) => {
                    self.open_row(row);
                    pending.push(Step::Raw("</w:tr>\n"));
                    pending.extend(row.cells().iter().rev().map(Step::Cell));
                }
                Step::Cell(cell) => {
                    self.open_cell(cell);
                    pending.push(Step::Raw("</w:tc>\n"));
                    // A cell needs at least one block and must end with a paragraph
                    if !matches!(cell.blocks().last(), Some(Block::Paragraph(_))) {
                        pending.push(Step::Raw("<w:p/>\n"));
                    }
                    pending.extend(cell.blocks().iter().rev().map(Step::Block));
                }
                Step::Raw(markup) => self.output.push_str(markup),
            }
        }
    }

    fn generate_paragraph(&mut self, para: &'a Paragraph) {
        let (before, after) = para.spacing();
        let has_ppr = para.style().is_some()
            || before.is_some()
            || after.is_some()
            || para.justification().is_some();

        if !has_ppr && para.runs().is_empty() {
            self.output.push_str("<w:p/>\n");
            return;
        }

        self.output.push_str("<w:p>");
        if has_ppr {
            self.output.push_str("<w:pPr>");
            if let Some(style) = para.style() {
                let id = self.style_id(style);
                self.output
                    .push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape_text(id)));
            }
            if before.is_some() || after.is_some() {
                self.output.push_str("<w:spacing");
                if let Some(before) = before {
                    self.output.push_str(&format!(r#" w:before="{}""#, before));
                }
                if let Some(after) = after {
                    self.output.push_str(&format!(r#" w:after="{}""#, after));
                }
                self.output.push_str("/>");
            }
            if let Some(jc) = para.justification() {
                self.output
                    .push_str(&format!(r#"<w:jc w:val="{}"/>"#, jc.as_str()));
            }
            self.output.push_str("</w:pPr>");
        }

        // Consecutive runs pointing at the same target share one hyperlink
        let mut open_link: Option<&'a str> = None;
        for run in para.runs() {
            if run.link() != open_link {
                if open_link.is_some() {
                    self.output.push_str("</w:hyperlink>");
                }
                if let Some(url) = run.link() {
                    let id = self.parts.add_external_relationship(
                        RelSource::Part(self.main),
                        url,
                        Relationships::TYPE_HYPERLINK,
                    );
                    self.output.push_str(&format!(
                        r#"<w:hyperlink r:id="{}" w:history="1">"#,
                        escape_text(&id)
                    ));
                }
                open_link = run.link();
            }
            self.generate_run(run);
        }
        if open_link.is_some() {
            self.output.push_str("</w:hyperlink>");
        }

        self.output.push_str("</w:p>\n");
    }

    fn generate_run(&mut self, run: &'a Run) {
        self.output.push_str("<w:r>");
        self.generate_run_properties(run.format());

        // Newlines become line breaks and tabs become tab characters
        let text = normalize_line_endings(run.text());
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.output.push_str("<w:br/>");
            }
            for (j, segment) in line.split('\t').enumerate() {
                if j > 0 {
                    self.output.push_str("<w:tab/>");
                }
                if segment.is_empty() {
                    continue;
                }
                let padded = segment.starts_with(char::is_whitespace)
                    || segment.ends_with(char::is_whitespace);
                if padded {
                    self.output.push_str(r#"<w:t xml:space="preserve">"#);
                } else {
                    self.output.push_str("<w:t>");
                }
                self.output.push_str(&escape_text(segment));
                self.output.push_str("</w:t>");
            }
        }

        match run.break_after() {
            Some(BreakType::Line) => self.output.push_str("<w:br/>"),
            Some(BreakType::Page) => self.output.push_str(r#"<w:br w:type="page"/>"#),
            Some(BreakType::Column) => self.output.push_str(r#"<w:br w:type="column"/>"#),
            None => {}
        }

        self.output.push_str("</w:r>");
    }

    fn generate_run_properties(&mut self, format: &'a RunFormat) {
        if format.is_plain() {
            return;
        }
        self.output.push_str("<w:rPr>");
        if let Some(style) = format.style.as_deref() {
            let id = self.style_id(style);
            self.output
                .push_str(&format!(r#"<w:rStyle w:val="{}"/>"#, escape_text(id)));
        }
        if let Some(font) = &format.font {
            let font = escape_text(font.as_str());
            self.output.push_str(&format!(
                r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
                font
            ));
        }
        for (on, tag) in [
            (format.bold, "<w:b/>"),
            (format.italic, "<w:i/>"),
            (format.caps, "<w:caps/>"),
            (format.small_caps, "<w:smallCaps/>"),
            (format.strike, "<w:strike/>"),
        ] {
            if on {
                self.output.push_str(tag);
            }
        }
        if let Some(color) = &format.color {
            self.output.push_str(&format!(
                r#"<w:color w:val="{}"/>"#,
                escape_text(color.as_str())
            ));
        }
        if let Some(size) = format.size {
            self.output
                .push_str(&format!(r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size));
        }
        if let Some(highlight) = &format.highlight {
            self.output.push_str(&format!(
                r#"<w:highlight w:val="{}"/>"#,
                escape_text(highlight.as_str())
            ));
        }
        if let Some(underline) = format.underline {
            self.output
                .push_str(&format!(r#"<w:u w:val="{}"/>"#, underline.as_str()));
        }
        if let Some(vertical) = format.vertical {
            self.output.push_str(&format!(
                r#"<w:vertAlign w:val="{}"/>"#,
                vertical.as_str()
            ));
        }
        self.output.push_str("</w:rPr>");
    }

    /// Everything of a table up to its first row
    fn open_table(&mut self, table: &'a Table) {
        if table.is_empty() {
            warn!("writing table with no rows");
        }

        self.output.push_str("<w:tbl>\n");

        self.output.push_str("<w:tblPr>");
        if let Some(style) = table.style() {
            let id = self.style_id(style);
            self.output
                .push_str(&format!(r#"<w:tblStyle w:val="{}"/>"#, escape_text(id)));
        }
        self.output
            .push_str(&format!("<w:tblW {}/>", width_attrs(table.width())));
        if let Some(jc) = table.justification() {
            self.output
                .push_str(&format!(r#"<w:jc w:val="{}"/>"#, jc.as_str()));
        }
        if let Some(indent) = table.indent() {
            self.output
                .push_str(&format!(r#"<w:tblInd w:w="{}" w:type="dxa"/>"#, indent));
        }
        if let Some(layout) = table.layout() {
            self.output
                .push_str(&format!(r#"<w:tblLayout w:type="{}"/>"#, layout.as_str()));
        }
        if let Some(margins) = table.cell_margins() {
            self.output.push_str(&cell_margins(margins));
        }
        self.output.push_str(&table_look(table.look()));
        self.output.push_str("</w:tblPr>\n");

        self.generate_grid(table);
    }

    fn generate_grid(&mut self, table: &Table) {
        let columns: Vec<u32> = if !table.grid().is_empty() {
            table.grid().to_vec()
        } else {
            // Spans are capped, so the count stays small
            let count = u32::try_from(table.column_count()).unwrap_or(MAX_GRID_COLUMNS);
            if count == 0 {
                Vec::new()
            } else {
                let total = match table.width() {
                    Width::Dxa(w) => w,
                    _ => self.content_width(),
                };
                vec![total / count; count as usize]
            }
        };

        if columns.is_empty() {
            self.output.push_str("<w:tblGrid/>\n");
            return;
        }
        self.output.push_str("<w:tblGrid>");
        for w in columns {
            self.output.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, w));
        }
        self.output.push_str("</w:tblGrid>\n");
    }

    /// Page width between the margins
    fn content_width(&self) -> u32 {
        let (width, _) = self.page.dimensions();
        width.saturating_sub(self.page.margins.left + self.page.margins.right)
    }

    fn open_row(&mut self, row: &'a Row) {
        if row.cells().is_empty() {
            warn!("writing table row with no cells");
        }

        self.output.push_str("<w:tr>");
        if row.height().is_some() || row.is_header() {
            self.output.push_str("<w:trPr>");
            if let Some(height) = row.height() {
                self.output
                    .push_str(&format!(r#"<w:trHeight w:val="{}"/>"#, height));
            }
            if row.is_header() {
                self.output.push_str("<w:tblHeader/>");
            }
            self.output.push_str("</w:trPr>");
        }
        self.output.push('\n');
    }

    fn open_cell(&mut self, cell: &'a Cell) {
        self.output.push_str("<w:tc>");

        self.output.push_str("<w:tcPr>");
        self.output.push_str(&format!(
            "<w:tcW {}/>",
            width_attrs(cell.width().unwrap_or_default())
        ));
        if cell.span() > 1 {
            self.output
                .push_str(&format!(r#"<w:gridSpan w:val="{}"/>"#, cell.span()));
        }
        match cell.vertical_merge() {
            Some(VerticalMerge::Restart) => self.output.push_str(r#"<w:vMerge w:val="restart"/>"#),
            Some(VerticalMerge::Continue) => self.output.push_str("<w:vMerge/>"),
            None => {}
        }
        write_borders(&mut self.output, "tcBorders", cell.borders());
        if let Some(fill) = cell.shading() {
            write_shading(&mut self.output, fill);
        }
        if let Some(align) = cell.vertical_align() {
            self.output
                .push_str(&format!(r#"<w:vAlign w:val="{}"/>"#, align.as_str()));
        }
        self.output.push_str("</w:tcPr>\n");
    }

    fn generate_section(&mut self) {
        let (width, height) = self.page.dimensions();
        let m = &self.page.margins;
        self.output.push_str("<w:sectPr>");
        self.output
            .push_str(&format!(r#"<w:pgSz w:w="{}" w:h="{}""#, width, height));
        if self.page.orientation == Orientation::Landscape {
            self.output.push_str(r#" w:orient="landscape""#);
        }
        self.output.push_str("/>");
        self.output.push_str(&format!(
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="{}"/>"#,
            m.top, m.right, m.bottom, m.left, m.header, m.footer, m.gutter
        ));
        self.output.push_str("</w:sectPr>\n");
    }
}

/// `\r\n` and lone `\r` become `\n`, which is then written as a break
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn cell_margins(m: CellMargins) -> String {
    format!(
        r#"<w:tblCellMar><w:top w:w="{}" w:type="dxa"/><w:left w:w="{}" w:type="dxa"/><w:bottom w:w="{}" w:type="dxa"/><w:right w:w="{}" w:type="dxa"/></w:tblCellMar>"#,
        m.top, m.left, m.bottom, m.right
    )
}

fn width_attrs(width: Width) -> String {
    match width {
        Width::Auto => r#"w:w="0" w:type="auto""#.to_string(),
        Width::Dxa(w) => format!(r#"w:w="{}" w:type="dxa""#, w),
        Width::Pct(w) => format!(r#"w:w="{}" w:type="pct""#, w),
    }
}

fn table_look(look: TableLook) -> String {
    let flag = |b: bool| if b { "1" } else { "0" };
    format!(
        r#"<w:tblLook w:val="{:04X}" w:firstRow="{}" w:lastRow="{}" w:firstColumn="{}" w:lastColumn="{}" w:noHBand="{}" w:noVBand="{}"/>"#,
        look.bitmask(),
        flag(look.first_row),
        flag(look.last_row),
        flag(look.first_column),
        flag(look.last_column),
        flag(!look.banded_rows),
        flag(!look.banded_columns)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{paragraph_texts, parse_elements, read_entry};
    use docxweave_model::{
        Border, Justification, TableBorders, TableLayout, Underline, VerticalAlign,
    };

    fn document_xml(doc: &Document) -> String {
        let bytes = DocxWriter::default().write(doc).unwrap();
        read_entry(&bytes, "word/document.xml").unwrap()
    }

    #[test]
    fn test_write_basic_doc() {
        let mut doc = Document::new();
        doc.add_paragraph("Hello, World!");
        let xml = document_xml(&doc);

        assert!(xml.contains(&format!(r#"xmlns:w="{}""#, W_NS)));
        assert!(xml.contains("<w:p><w:r><w:t>Hello, World!</w:t></w:r></w:p>"));
        assert!(xml.contains("<w:sectPr>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = Document::new();
        doc.add_paragraph("a < b & c");
        let xml = document_xml(&doc);
        assert!(xml.contains("<w:t>a &lt; b &amp; c</w:t>"));
    }

    #[test]
    fn test_whitespace_preserved() {
        let mut doc = Document::new();
        doc.add_paragraph(" padded ");
        let xml = document_xml(&doc);
        assert!(xml.contains(r#"<w:t xml:space="preserve"> padded </w:t>"#));
    }

    #[test]
    fn test_newlines_and_tabs() {
        let mut doc = Document::new();
        doc.add_paragraph("a\tb\nc");
        let xml = document_xml(&doc);
        assert!(xml.contains("<w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t>"));
    }

    #[test]
    fn test_control_characters_stay_well_formed() {
        let mut doc = Document::new();
        doc.add_paragraph("a\u{1}b\u{B}c");
        doc.add_paragraph("line1\r\nline2\rline3");
        let xml = document_xml(&doc);

        assert!(xml.chars().all(crate::xml::is_xml_char));
        assert!(!xml.contains('\u{1}'));
        assert!(!xml.contains('\r'));
        assert!(xml.contains("<w:t>line1</w:t><w:br/><w:t>line2</w:t><w:br/><w:t>line3</w:t>"));
        // Still readable by an independent parser
        assert!(!parse_elements(&xml).is_empty());
        assert_eq!(
            paragraph_texts(&xml),
            vec!["a\u{FFFD}b\u{FFFD}c", "line1line2line3"]
        );
    }

    #[test]
    fn test_empty_paragraph() {
        let mut doc = Document::new();
        doc.add_empty_paragraph();
        let xml = document_xml(&doc);
        assert!(xml.contains("<w:body>\n<w:p/>\n<w:sectPr>"));
    }

    #[test]
    fn test_run_properties_order() {
        let mut doc = Document::new();
        doc.add_empty_paragraph()
            .add_text("x")
            .font("Arial")
            .bold(true)
            .italic(true)
            .color("FF0000")
            .size(28)
            .underline(Underline::Single);
        let xml = document_xml(&doc);
        assert!(xml.contains(
            r#"<w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial" w:cs="Arial"/><w:b/><w:i/><w:color w:val="FF0000"/><w:sz w:val="28"/><w:szCs w:val="28"/><w:u w:val="single"/></w:rPr>"#
        ));
    }

    #[test]
    fn test_paragraph_properties() {
        let mut doc = Document::new();
        doc.add_heading("Intro", 1)
            .set_spacing(120, 60)
            .set_justification(Justification::Center);
        let xml = document_xml(&doc);
        assert!(xml.contains(
            r#"<w:pPr><w:pStyle w:val="Heading1"/><w:spacing w:before="120" w:after="60"/><w:jc w:val="center"/></w:pPr>"#
        ));
    }

    #[test]
    fn test_page_break() {
        let mut doc = Document::new();
        doc.add_page_break();
        let xml = document_xml(&doc);
        assert!(xml.contains(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#));
    }

    #[test]
    fn test_write_table() {
        let mut doc = Document::new();
        let table = doc.add_table();
        table.set_style("TableGrid");
        let row = table.add_row();
        row.set_header(true);
        row.add_cell().add_paragraph("A");
        row.add_cell()
            .set_shading("D9E2F3")
            .set_vertical_align(VerticalAlign::Center)
            .add_paragraph("B");
        let xml = document_xml(&doc);

        assert!(xml.contains(r#"<w:tblStyle w:val="TableGrid"/>"#));
        assert!(xml.contains(r#"w:val="04A0""#));
        assert!(xml.contains(r#"<w:gridCol w:w="4680"/><w:gridCol w:w="4680"/>"#));
        assert!(xml.contains("<w:trPr><w:tblHeader/></w:trPr>"));
        assert!(xml.contains(
            r#"<w:shd w:val="clear" w:color="auto" w:fill="D9E2F3"/><w:vAlign w:val="center"/>"#
        ));
    }

    #[test]
    fn test_degenerate_tables() {
        let mut doc = Document::new();
        doc.add_table();
        let table = doc.add_table();
        table.add_row();
        table.add_row().add_cell();
        let xml = document_xml(&doc);

        let elements = parse_elements(&xml);
        let tables = elements.iter().filter(|e| e.name == "w:tbl").count();
        assert_eq!(tables, 2);
        assert!(xml.contains("<w:tblGrid/>"));
        assert!(xml.contains("<w:tr>\n</w:tr>"));
        // Empty cell gets its required paragraph
        assert!(xml.contains("</w:tcPr>\n<w:p/>\n</w:tc>"));
    }

    #[test]
    fn test_nested_table_cell_ends_with_paragraph() {
        let mut doc = Document::new();
        let cell = doc.add_table().add_row().add_cell();
        cell.add_paragraph("outer");
        cell.add_table().add_row().add_cell().add_paragraph("inner");
        let xml = document_xml(&doc);
        assert!(xml.contains("</w:tbl>\n<w:p/>\n</w:tc>"));
    }

    #[test]
    fn test_deeply_nested_tables() {
        const DEPTH: usize = 1200;
        let mut doc = Document::new();
        let mut table = doc.add_table();
        for _ in 0..DEPTH {
            table = table.add_row().add_cell().add_table();
        }

        let xml = document_xml(&doc);
        assert_eq!(xml.matches("<w:tbl>").count(), DEPTH + 1);
        assert_eq!(xml.matches("</w:tbl>").count(), DEPTH + 1);
        // Every cell ends in a table, so each gets a closing paragraph
        assert_eq!(xml.matches("</w:tbl>\n<w:p/>\n</w:tc>").count(), DEPTH);
    }

    #[test]
    fn test_span_is_capped_in_grid() {
        let mut doc = Document::new();
        doc.add_table().add_row().add_cell().set_span(u32::MAX);
        let xml = document_xml(&doc);
        assert!(xml.contains(&format!(r#"<w:gridSpan w:val="{}"/>"#, MAX_GRID_COLUMNS)));
        assert_eq!(xml.matches("<w:gridCol ").count(), MAX_GRID_COLUMNS as usize);
    }

    #[test]
    fn test_hyperlinks() {
        let mut doc = Document::new();
        let para = doc.add_paragraph("See ");
        para.add_link("the site", "https://example.com/?q=a&b");
        para.add_link(" again", "https://example.com/?q=a&b");
        para.add_text(" or ");
        para.add_link("docs", "https://docs.example.com");

        let bytes = DocxWriter::default().write(&doc).unwrap();
        let xml = read_entry(&bytes, "word/document.xml").unwrap();
        assert!(xml.contains(
            r#"<w:hyperlink r:id="rId2" w:history="1"><w:r><w:rPr><w:rStyle w:val="Hyperlink"/></w:rPr><w:t>the site</w:t></w:r><w:r><w:rPr><w:rStyle w:val="Hyperlink"/></w:rPr><w:t xml:space="preserve"> again</w:t></w:r></w:hyperlink>"#
        ));
        assert!(xml.contains(r#"<w:hyperlink r:id="rId3" w:history="1">"#));
        assert_eq!(xml.matches("<w:hyperlink ").count(), 2);

        let rels = read_entry(&bytes, "word/_rels/document.xml.rels").unwrap();
        let rels = Relationships::parse(rels.as_bytes()).unwrap();
        assert_eq!(rels.get("rId1").unwrap().rel_type, Relationships::TYPE_STYLES);
        let link = rels.get("rId2").unwrap();
        assert_eq!(link.rel_type, Relationships::TYPE_HYPERLINK);
        assert_eq!(link.target, "https://example.com/?q=a&b");
        assert!(link.is_external());
        assert_eq!(rels.get("rId3").unwrap().target, "https://docs.example.com");
    }

    #[test]
    fn test_vertical_merge_and_cell_borders() {
        let mut doc = Document::new();
        let table = doc.add_table();
        let top = table.add_row().add_cell();
        top.set_vertical_merge(VerticalMerge::Restart)
            .set_borders(TableBorders {
                bottom: Some(Border::double(6, "FF0000")),
                ..Default::default()
            })
            .set_shading("EEEEEE");
        top.add_paragraph("merged");
        table
            .add_row()
            .add_cell()
            .set_vertical_merge(VerticalMerge::Continue);
        let xml = document_xml(&doc);

        assert!(xml.contains(
            r#"<w:vMerge w:val="restart"/><w:tcBorders><w:bottom w:val="double" w:sz="6" w:space="0" w:color="FF0000"/></w:tcBorders><w:shd "#
        ));
        assert!(xml.contains(r#"<w:tcW w:w="0" w:type="auto"/><w:vMerge/></w:tcPr>"#));
    }

    #[test]
    fn test_table_indent_layout_and_margins() {
        let mut doc = Document::new();
        let table = doc.add_table();
        table
            .set_indent(360)
            .set_layout(TableLayout::Fixed)
            .set_cell_margins(CellMargins::horizontal(115));
        table.add_row().add_cell().add_paragraph("x");
        let xml = document_xml(&doc);

        assert!(xml.contains(
            r#"<w:tblInd w:w="360" w:type="dxa"/><w:tblLayout w:type="fixed"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="115" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="115" w:type="dxa"/></w:tblCellMar><w:tblLook "#
        ));
    }

    #[test]
    fn test_background_precedes_body() {
        let mut doc = Document::new();
        doc.set_background("FFFFCC");
        doc.add_paragraph("tinted");
        let xml = document_xml(&doc);
        assert!(xml.contains("<w:background w:color=\"FFFFCC\"/>\n<w:body>"));

        let plain = document_xml(&Document::new());
        assert!(!plain.contains("w:background"));
    }

    #[test]
    fn test_landscape_section() {
        let mut config = WriterConfig::default();
        config.page.orientation = Orientation::Landscape;
        let bytes = DocxWriter::new(config).write(&Document::new()).unwrap();
        let xml = read_entry(&bytes, "word/document.xml").unwrap();
        assert!(xml.contains(r#"<w:pgSz w:w="15840" w:h="12240" w:orient="landscape"/>"#));
    }

    #[test]
    fn test_save_docx_trait() {
        let mut doc = Document::new();
        doc.add_paragraph("via trait");
        let bytes = doc.to_docx_bytes().unwrap();
        assert!(read_entry(&bytes, "word/document.xml")
            .unwrap()
            .contains("via trait"));
    }
}
