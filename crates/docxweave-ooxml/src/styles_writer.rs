//! `word/styles.xml` generation
//!
//! Styles are written in registry order. Whole-table formatting goes inline
//! into `pPr`/`rPr`/`tblPr`/`tcPr`; every other region becomes a
//! `w:tblStylePr` in schema order.

use docxweave_model::{Formatting, StyleKind, TableBorders, TableRegion};

use crate::config::DocDefaults;
use crate::resolve::{ResolvedStyle, ResolvedStyles};
use crate::writer::W_NS;
use crate::xml::escape_text;

/// Generate the styles part
pub fn generate_styles_xml(styles: &ResolvedStyles, defaults: &DocDefaults) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, W_NS));
    out.push('\n');

    write_doc_defaults(&mut out, defaults);
    let normal = styles.get("Normal").map(|s| s.id.as_str());
    for style in styles.iter() {
        write_style(&mut out, style, normal);
    }

    out.push_str("</w:styles>");
    out
}

fn write_doc_defaults(out: &mut String, defaults: &DocDefaults) {
    out.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
    if let Some(font) = &defaults.font {
        let font = escape_text(font.as_str());
        out.push_str(&format!(
            r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:eastAsia="{0}" w:cs="{0}"/>"#,
            font
        ));
    }
    if let Some(size) = defaults.size {
        out.push_str(&format!(r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size));
    }
    if let Some(lang) = &defaults.language {
        out.push_str(&format!(r#"<w:lang w:val="{}"/>"#, escape_text(lang.as_str())));
    }
    out.push_str("</w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>\n");
}

fn write_style(out: &mut String, style: &ResolvedStyle, normal: Option<&str>) {
    out.push_str(&format!(r#"<w:style w:type="{}""#, style.kind.as_str()));
    if style.is_default {
        out.push_str(r#" w:default="1""#);
    }
    out.push_str(&format!(r#" w:styleId="{}">"#, escape_text(style.id.as_str())));
    out.push_str(&format!(r#"<w:name w:val="{}"/>"#, escape_text(style.name.as_str())));
    if let Some(parent) = &style.based_on {
        out.push_str(&format!(r#"<w:basedOn w:val="{}"/>"#, escape_text(parent.as_str())));
    }
    if style.kind == StyleKind::Paragraph {
        if let Some(next) = next_style(style, normal) {
            out.push_str(&format!(r#"<w:next w:val="{}"/>"#, escape_text(next)));
        }
    }
    if let Some(priority) = style.ui_priority {
        out.push_str(&format!(r#"<w:uiPriority w:val="{}"/>"#, priority));
    }
    if style.kind != StyleKind::Table && style.ui_priority.is_some_and(|p| p <= 10) {
        out.push_str("<w:qFormat/>");
    }

    if let Some(whole) = style.region(TableRegion::WholeTable) {
        write_ppr(out, whole);
        write_rpr(out, whole);
        if style.kind == StyleKind::Table {
            write_tblpr(out, whole);
            write_tcpr(out, whole, &TableBorders::default());
        }
    }

    if style.kind == StyleKind::Table {
        for (region, formatting) in &style.regions {
            if *region == TableRegion::WholeTable {
                continue;
            }
            out.push_str(&format!(r#"<w:tblStylePr w:type="{}">"#, region.as_str()));
            write_ppr(out, formatting);
            write_rpr(out, formatting);
            write_tcpr(out, formatting, &formatting.borders);
            out.push_str("</w:tblStylePr>");
        }
    }

    out.push_str("</w:style>\n");
}

/// Headings and the title continue with body text when `Normal` is written
fn next_style<'s>(style: &'s ResolvedStyle, normal: Option<&'s str>) -> Option<&'s str> {
    if style.id.starts_with("Heading") || style.id == "Title" {
        normal.filter(|id| *id != style.id)
    } else {
        Some(&style.id)
    }
}

fn on_off(out: &mut String, tag: &str, value: Option<bool>) {
    match value {
        Some(true) => out.push_str(&format!("<w:{}/>", tag)),
        Some(false) => out.push_str(&format!(r#"<w:{} w:val="0"/>"#, tag)),
        None => {}
    }
}

pub(crate) fn write_ppr(out: &mut String, f: &Formatting) {
    if !f.has_paragraph_properties() {
        return;
    }
    out.push_str("<w:pPr>");
    on_off(out, "keepNext", f.keep_next);
    if f.spacing_before.is_some() || f.spacing_after.is_some() || f.line_spacing.is_some() {
        out.push_str("<w:spacing");
        if let Some(before) = f.spacing_before {
            out.push_str(&format!(r#" w:before="{}""#, before));
        }
        if let Some(after) = f.spacing_after {
            out.push_str(&format!(r#" w:after="{}""#, after));
        }
        if let Some(line) = f.line_spacing {
            out.push_str(&format!(r#" w:line="{}" w:lineRule="auto""#, line));
        }
        out.push_str("/>");
    }
    if let Some(jc) = f.justification {
        out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, jc.as_str()));
    }
    if let Some(level) = f.outline_level {
        out.push_str(&format!(r#"<w:outlineLvl w:val="{}"/>"#, level));
    }
    out.push_str("</w:pPr>");
}

pub(crate) fn write_rpr(out: &mut String, f: &Formatting) {
    if !f.has_run_properties() {
        return;
    }
    out.push_str("<w:rPr>");
    if let Some(font) = &f.font {
        let font = escape_text(font.as_str());
        out.push_str(&format!(
            r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
            font
        ));
    }
    on_off(out, "b", f.bold);
    on_off(out, "i", f.italic);
    on_off(out, "caps", f.caps);
    if let Some(color) = &f.color {
        out.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape_text(color.as_str())));
    }
    if let Some(size) = f.size {
        out.push_str(&format!(r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size));
    }
    if let Some(underline) = f.underline {
        out.push_str(&format!(r#"<w:u w:val="{}"/>"#, underline.as_str()));
    }
    out.push_str("</w:rPr>");
}

fn write_tblpr(out: &mut String, f: &Formatting) {
    if !f.has_table_properties() {
        return;
    }
    out.push_str("<w:tblPr>");
    if let Some(n) = f.row_band_size {
        out.push_str(&format!(r#"<w:tblStyleRowBandSize w:val="{}"/>"#, n));
    }
    if let Some(n) = f.col_band_size {
        out.push_str(&format!(r#"<w:tblStyleColBandSize w:val="{}"/>"#, n));
    }
    write_borders(out, "tblBorders", &f.borders);
    if let Some(margin) = f.cell_margin {
        out.push_str(&format!(
            r#"<w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="{0}" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="{0}" w:type="dxa"/></w:tblCellMar>"#,
            margin
        ));
    }
    out.push_str("</w:tblPr>");
}

/// Cell properties of a style region; `borders` become `w:tcBorders`
fn write_tcpr(out: &mut String, f: &Formatting, borders: &TableBorders) {
    if !f.has_cell_properties() && borders.is_empty() {
        return;
    }
    out.push_str("<w:tcPr>");
    write_borders(out, "tcBorders", borders);
    if let Some(fill) = &f.shading {
        write_shading(out, fill);
    }
    if let Some(align) = f.vertical_align {
        out.push_str(&format!(r#"<w:vAlign w:val="{}"/>"#, align.as_str()));
    }
    out.push_str("</w:tcPr>");
}

pub(crate) fn write_shading(out: &mut String, fill: &str) {
    out.push_str(&format!(
        r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
        escape_text(fill)
    ));
}

pub(crate) fn write_borders(out: &mut String, tag: &str, borders: &TableBorders) {
    if borders.is_empty() {
        return;
    }
    out.push_str(&format!("<w:{}>", tag));
    for (side, border) in borders.sides() {
        if let Some(border) = border {
            out.push_str(&format!(
                r#"<w:{} w:val="{}" w:sz="{}" w:space="0" w:color="{}"/>"#,
                side,
                border.style.as_str(),
                border.size,
                escape_text(border.color.as_str())
            ));
        }
    }
    out.push_str(&format!("</w:{}>", tag));
}
