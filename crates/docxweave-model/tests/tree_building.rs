//! Tree Building Tests
//!
//! Construction order, nesting and registry behaviour seen through the
//! public API only.

use docxweave_model::{
    catalog, Block, Document, Formatting, StyleDefinition, StyleKind, StyleRegistry, TableRegion,
};
use proptest::prelude::*;

/// One step of a random construction script
#[derive(Debug, Clone)]
enum Op {
    Paragraph(String),
    Table { rows: usize, cells: usize },
    Heading(String, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(Op::Paragraph),
        (0usize..4, 0usize..4).prop_map(|(rows, cells)| Op::Table { rows, cells }),
        ("[a-z]{1,8}", 0u8..12).prop_map(|(t, l)| Op::Heading(t, l)),
    ]
}

fn build(ops: &[Op]) -> Document {
    let mut doc = Document::new();
    for (i, op) in ops.iter().enumerate() {
        match op {
            Op::Paragraph(text) => {
                doc.add_paragraph(text.clone());
            }
            Op::Table { rows, cells } => {
                let table = doc.add_table();
                for r in 0..*rows {
                    let row = table.add_row();
                    for c in 0..*cells {
                        row.add_cell().add_paragraph(format!("{}:{}:{}", i, r, c));
                    }
                }
            }
            Op::Heading(text, level) => {
                doc.add_heading(text.clone(), *level);
            }
        }
    }
    doc
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_blocks_follow_call_order(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let doc = build(&ops);
        prop_assert_eq!(doc.len(), ops.len());

        for (i, (op, block)) in ops.iter().zip(doc.blocks()).enumerate() {
            match (op, block) {
                (Op::Paragraph(text), Block::Paragraph(p)) => prop_assert_eq!(&p.text(), text),
                (Op::Heading(text, _), Block::Paragraph(p)) => prop_assert_eq!(&p.text(), text),
                (Op::Table { rows, cells }, Block::Table(t)) => {
                    prop_assert_eq!(t.rows().len(), *rows);
                    for (r, row) in t.rows().iter().enumerate() {
                        prop_assert_eq!(row.cells().len(), *cells);
                        for (c, cell) in row.cells().iter().enumerate() {
                            prop_assert_eq!(cell.text(), format!("{}:{}:{}", i, r, c));
                        }
                    }
                }
                (op, block) => prop_assert!(false, "block {} mismatch: {:?} vs {:?}", i, op, block),
            }
        }
    }
}

#[test]
fn test_deeply_nested_tables() {
    let mut doc = Document::new();
    let mut table = doc.add_table();
    for depth in 0..5 {
        let cell = table.add_row().add_cell();
        cell.add_paragraph(format!("depth {}", depth));
        table = cell.add_table();
    }

    let mut current = doc.tables().next().unwrap();
    for depth in 0..5 {
        let cell = &current.rows()[0].cells()[0];
        assert_eq!(cell.text(), format!("depth {}", depth));
        current = cell.blocks()[1].as_table().unwrap();
    }
    assert!(current.is_empty());
}

#[test]
fn test_every_catalog_name_is_a_table_style() {
    let registry = StyleRegistry::with_builtins();
    let names = catalog::builtin_table_style_names();
    assert!(names.contains(&"LightList-Accent4".to_string()));
    for name in &names {
        let style = registry.resolve(name).unwrap();
        assert_eq!(style.kind, StyleKind::Table);
        assert_eq!(style.based_on.as_deref(), Some(catalog::TABLE_NORMAL));
    }
}

#[test]
fn test_registry_clone_is_independent() {
    let mut a = StyleRegistry::with_builtins();
    let b = StyleRegistry::with_builtins();
    a.register(
        StyleDefinition::table("TableGrid").with_formatting(Formatting::new().shading("FFFF00")),
    );

    assert!(a.is_user_defined("TableGrid"));
    assert!(!b.is_user_defined("TableGrid"));
    assert_eq!(a.position("TableGrid"), b.position("TableGrid"));
    assert!(b
        .resolve("TableGrid")
        .unwrap()
        .region(TableRegion::WholeTable)
        .unwrap()
        .shading
        .is_none());
}

#[test]
fn test_style_definition_serde() {
    let style = StyleDefinition::table("Custom")
        .based_on("TableGrid")
        .with_region(TableRegion::FirstRow, Formatting::new().bold(true));

    let json = serde_json::to_string(&style).unwrap();
    assert!(json.contains("first_row"));
    let back: StyleDefinition = serde_json::from_str(&json).unwrap();
    assert_eq!(back, style);
}
