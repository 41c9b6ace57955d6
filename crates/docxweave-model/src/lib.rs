//! docxweave-model - Document tree and style model
//!
//! This crate holds everything a caller builds before writing a `.docx`:
//! the block tree ([`Document`] → [`Table`] → [`Row`] → [`Cell`] →
//! [`Paragraph`] → [`Run`]), named style definitions and the per-document
//! [`StyleRegistry`] seeded from the built-in [`catalog`].
//!
//! Packaging and serialization live in `docxweave-ooxml`.

pub mod block;
pub mod catalog;
pub mod document;
pub mod style;

pub use block::{
    Block, BreakType, Cell, CellMargins, Justification, Paragraph, Row, Run, RunFormat, Table,
    TableLayout, TableLook, Underline, VerticalAlign, VerticalMerge, VerticalPosition, Width,
    HYPERLINK_STYLE, MAX_GRID_COLUMNS,
};
pub use document::{CoreProperties, Document, MAX_HEADING_LEVEL};
pub use style::{
    Border, BorderStyle, ChainError, Formatting, StyleDefinition, StyleKind, StyleRegistry,
    TableBorders, TableRegion,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
