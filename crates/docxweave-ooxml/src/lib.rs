//! # docxweave-ooxml
//!
//! Serialization of `docxweave-model` documents to OOXML `.docx` packages.
//!
//! This crate provides:
//! - Style resolution with `basedOn` inheritance and conditional table regions
//! - Generation of the document, styles and property parts
//! - Relationship and content type bookkeeping
//! - Deterministic, atomic ZIP package output
//!
//! ## Example
//!
//! ```no_run
//! use docxweave_model::Document;
//! use docxweave_ooxml::SaveDocx;
//!
//! let mut doc = Document::new();
//! doc.add_heading("Inventory", 1);
//! let table = doc.add_table();
//! table.set_style("LightList-Accent4");
//! let header = table.add_row();
//! header.add_cell().add_paragraph("Qty");
//! header.add_cell().add_paragraph("ID");
//! let row = table.add_row();
//! row.add_cell().add_paragraph("3");
//! row.add_cell().add_paragraph("A-17");
//!
//! doc.save("inventory.docx")?;
//! # Ok::<(), docxweave_ooxml::DocxError>(())
//! ```

pub mod archive;
pub mod config;
pub mod content_types;
pub mod error;
pub mod parts;
pub mod props;
pub mod relationships;
pub mod resolve;
pub mod styles_writer;
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;
pub mod writer;
pub mod xml;

pub use archive::PackageWriter;
pub use config::{load_styles_toml, styles_to_toml, Compression, PageSetup, WriterConfig};
pub use content_types::ContentTypes;
pub use error::{DocxError, Result};
pub use parts::{PartHandle, PartKind, PartManager, RelSource};
pub use relationships::{IdAllocator, Relationships};
pub use resolve::{resolve_document, ResolvedStyles, StyleIdMap};
pub use writer::{DocxWriter, SaveDocx};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
