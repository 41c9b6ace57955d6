//! Package Structure Tests
//!
//! Archive entries, relationships and content types of written packages,
//! read back with an independent zip/XML reader.

use docxweave_model::{Document, StyleDefinition};
use docxweave_ooxml::parts::PartKind;
use docxweave_ooxml::relationships::Relationships;
use docxweave_ooxml::test_utils::{paragraph_texts, parse_elements, read_entries, read_entry};
use docxweave_ooxml::{DocxWriter, SaveDocx, WriterConfig};

fn entry_names(bytes: &[u8]) -> Vec<String> {
    read_entries(bytes).into_iter().map(|(n, _)| n).collect()
}

#[test]
fn test_empty_document_entries() {
    let bytes = Document::new().to_docx_bytes().unwrap();
    assert_eq!(
        entry_names(&bytes),
        vec!["[Content_Types].xml", "_rels/.rels", "word/document.xml"]
    );

    let xml = read_entry(&bytes, "word/document.xml").unwrap();
    let elements = parse_elements(&xml);
    let body_children: Vec<&str> = elements
        .iter()
        .filter(|e| e.depth == 2)
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(body_children, vec!["w:sectPr"]);
}

#[test]
fn test_registered_style_adds_styles_part() {
    let mut doc = Document::new();
    doc.register_style(StyleDefinition::table("Plain"));
    let bytes = doc.to_docx_bytes().unwrap();
    assert_eq!(
        entry_names(&bytes),
        vec![
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/_rels/document.xml.rels",
            "word/styles.xml",
        ]
    );
}

#[test]
fn test_relationship_uris() {
    let mut doc = Document::new();
    doc.add_table().set_style("TableGrid");
    let bytes = doc.to_docx_bytes().unwrap();

    let package_rels = read_entry(&bytes, "_rels/.rels").unwrap();
    let package = Relationships::parse(package_rels.as_bytes()).unwrap();
    let main = package.get("rId1").unwrap();
    assert_eq!(
        main.rel_type,
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument"
    );
    assert_eq!(main.target, "word/document.xml");

    let doc_rels = Relationships::parse(
        read_entry(&bytes, "word/_rels/document.xml.rels")
            .unwrap()
            .as_bytes(),
    )
    .unwrap();
    let styles = doc_rels.get("rId1").unwrap();
    assert_eq!(
        styles.rel_type,
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"
    );
    assert_eq!(styles.target, "styles.xml");
}

#[test]
fn test_content_types_cover_every_part_once() {
    let mut doc = Document::new();
    doc.set_title("Covered");
    doc.add_table().set_style("TableGrid");
    let config = WriterConfig {
        app_properties: true,
        ..Default::default()
    };
    let bytes = DocxWriter::new(config).write(&doc).unwrap();

    let xml = read_entry(&bytes, "[Content_Types].xml").unwrap();
    let overrides: Vec<(String, String)> = parse_elements(&xml)
        .into_iter()
        .filter(|e| e.name == "Override")
        .map(|e| {
            (
                e.attr("PartName").unwrap().to_string(),
                e.attr("ContentType").unwrap().to_string(),
            )
        })
        .collect();

    let parts: Vec<String> = entry_names(&bytes)
        .into_iter()
        .filter(|n| !n.ends_with(".rels") && n != "[Content_Types].xml")
        .collect();
    assert_eq!(overrides.len(), parts.len());
    for part in &parts {
        let matching: Vec<_> = overrides
            .iter()
            .filter(|(name, _)| name == &format!("/{}", part))
            .collect();
        assert_eq!(matching.len(), 1, "{} declared {} times", part, matching.len());
    }
    assert!(overrides.contains(&(
        "/docProps/core.xml".to_string(),
        PartKind::CoreProperties.content_type().to_string()
    )));
}

#[test]
fn test_properties_parts() {
    let mut doc = Document::new();
    doc.set_title("Inventory").set_creator("Warehouse");
    let config = WriterConfig {
        app_properties: true,
        ..Default::default()
    };
    let bytes = DocxWriter::new(config).write(&doc).unwrap();

    let names = entry_names(&bytes);
    assert!(names.contains(&"docProps/core.xml".to_string()));
    assert!(names.contains(&"docProps/app.xml".to_string()));

    let package_rels = read_entry(&bytes, "_rels/.rels").unwrap();
    let package = Relationships::parse(package_rels.as_bytes()).unwrap();
    assert_eq!(package.len(), 3);
    assert_eq!(
        package.by_type(Relationships::TYPE_CORE_PROPERTIES).unwrap().target,
        "docProps/core.xml"
    );

    let core = read_entry(&bytes, "docProps/core.xml").unwrap();
    assert!(core.contains("<dc:title>Inventory</dc:title>"));
}

#[test]
fn test_roundtrip_tables() {
    const TABLES: usize = 3;
    const ROWS: usize = 4;
    const CELLS: usize = 5;

    let mut doc = Document::new();
    for t in 0..TABLES {
        let table = doc.add_table();
        for r in 0..ROWS {
            let row = table.add_row();
            for c in 0..CELLS {
                row.add_cell().add_paragraph(format!("t{} r{} c{} <&>", t, r, c));
            }
        }
    }

    let bytes = doc.to_docx_bytes().unwrap();
    let xml = read_entry(&bytes, "word/document.xml").unwrap();
    let elements = parse_elements(&xml);

    let tables: Vec<_> = elements.iter().filter(|e| e.name == "w:tbl").collect();
    assert_eq!(tables.len(), TABLES);
    let rows = elements.iter().filter(|e| e.name == "w:tr").count();
    assert_eq!(rows, TABLES * ROWS);
    let cells = elements.iter().filter(|e| e.name == "w:tc").count();
    assert_eq!(cells, TABLES * ROWS * CELLS);

    let texts = paragraph_texts(&xml);
    let mut expected = Vec::new();
    for t in 0..TABLES {
        for r in 0..ROWS {
            for c in 0..CELLS {
                expected.push(format!("t{} r{} c{} <&>", t, r, c));
            }
        }
    }
    assert_eq!(texts, expected);
}

#[test]
fn test_output_is_reproducible() {
    let build = || {
        let mut doc = Document::new();
        doc.set_title("Same");
        doc.add_heading("Heading", 1);
        let table = doc.add_table();
        table.set_style("MediumGrid1-Accent2");
        table.add_row().add_cell().add_paragraph("x");
        doc
    };

    let a = build().to_docx_bytes().unwrap();
    let b = build().to_docx_bytes().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_save_via_writer_and_trait_agree() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::new();
    doc.add_paragraph("same bytes");

    let via_trait = dir.path().join("a.docx");
    let via_writer = dir.path().join("b.docx");
    doc.save(&via_trait).unwrap();
    DocxWriter::default().save(&doc, &via_writer).unwrap();

    assert_eq!(
        std::fs::read(&via_trait).unwrap(),
        std::fs::read(&via_writer).unwrap()
    );
}

mod ordering {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Body children come out in the order they were added
        #[test]
        fn prop_body_order_matches_calls(kinds in prop::collection::vec(any::<bool>(), 0..12)) {
            let mut doc = Document::new();
            for (i, is_table) in kinds.iter().enumerate() {
                if *is_table {
                    doc.add_table().add_row().add_cell().add_paragraph(format!("block {}", i));
                } else {
                    doc.add_paragraph(format!("block {}", i));
                }
            }

            let bytes = doc.to_docx_bytes().unwrap();
            let xml = read_entry(&bytes, "word/document.xml").unwrap();
            let body: Vec<String> = parse_elements(&xml)
                .into_iter()
                .filter(|e| e.depth == 2)
                .map(|e| e.name)
                .collect();

            let mut expected: Vec<String> = kinds
                .iter()
                .map(|t| if *t { "w:tbl" } else { "w:p" }.to_string())
                .collect();
            expected.push("w:sectPr".to_string());
            prop_assert_eq!(body, expected);

            let texts = paragraph_texts(&xml);
            let wanted: Vec<String> = (0..kinds.len()).map(|i| format!("block {}", i)).collect();
            prop_assert_eq!(texts, wanted);
        }
    }
}
