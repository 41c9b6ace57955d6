//! Package properties (`docProps/core.xml`, `docProps/app.xml`)

use docxweave_model::{CoreProperties, Document};

use crate::xml::escape_text;

const CP_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
const DCMITYPE_NS: &str = "http://purl.org/dc/dcmitype/";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const EP_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
const VT_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";

/// Generate the core properties part
pub fn generate_core_xml(props: &CoreProperties) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<cp:coreProperties xmlns:cp="{}" xmlns:dc="{}" xmlns:dcterms="{}" xmlns:dcmitype="{}" xmlns:xsi="{}">"#,
        CP_NS, DC_NS, DCTERMS_NS, DCMITYPE_NS, XSI_NS
    ));

    text_element(&mut out, "dc:title", props.title.as_deref());
    text_element(&mut out, "dc:subject", props.subject.as_deref());
    text_element(&mut out, "dc:creator", props.creator.as_deref());
    text_element(&mut out, "cp:keywords", props.keywords.as_deref());
    text_element(&mut out, "dc:description", props.description.as_deref());
    text_element(&mut out, "cp:lastModifiedBy", props.last_modified_by.as_deref());
    if let Some(revision) = props.revision {
        out.push_str(&format!("<cp:revision>{}</cp:revision>", revision));
    }
    for (tag, value) in [
        ("dcterms:created", &props.created),
        ("dcterms:modified", &props.modified),
    ] {
        if let Some(value) = value {
            out.push_str(&format!(
                r#"<{0} xsi:type="dcterms:W3CDTF">{1}</{0}>"#,
                tag,
                escape_text(value.as_str())
            ));
        }
    }
    text_element(&mut out, "cp:category", props.category.as_deref());

    out.push_str("</cp:coreProperties>");
    out
}

/// Generate the extended (application) properties part
pub fn generate_app_xml(doc: &Document, application: &str) -> String {
    let paragraphs = doc.paragraphs().count();
    let words: usize = doc
        .paragraphs()
        .map(|p| p.text().split_whitespace().count())
        .sum();

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(&format!(
        r#"<Properties xmlns="{}" xmlns:vt="{}">"#,
        EP_NS, VT_NS
    ));
    out.push_str(&format!(
        "<Application>{}</Application>",
        escape_text(application)
    ));
    out.push_str("<DocSecurity>0</DocSecurity>");
    out.push_str(&format!("<Words>{}</Words>", words));
    out.push_str(&format!("<Paragraphs>{}</Paragraphs>", paragraphs));
    out.push_str("<ScaleCrop>false</ScaleCrop>");
    out.push_str("<LinksUpToDate>false</LinksUpToDate>");
    out.push_str("<SharedDoc>false</SharedDoc>");
    out.push_str("</Properties>");
    out
}

fn text_element(out: &mut String, tag: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.push_str(&format!("<{0}>{1}</{0}>", tag, escape_text(value)));
    }
}
