//! Document root and metadata
//!
//! A [`Document`] owns its body blocks, its own copy of the style registry
//! and the package metadata. Building a document never fails; style names
//! are checked when the document is written.

use serde::{Deserialize, Serialize};

use crate::block::{push_paragraph, push_table, Block, BreakType, Paragraph, Table};
use crate::catalog::TITLE;
use crate::style::{StyleDefinition, StyleRegistry};

/// Deepest heading level with a built-in style
pub const MAX_HEADING_LEVEL: u8 = 9;

/// Package metadata written to `docProps/core.xml`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<u32>,
    /// W3CDTF timestamp, e.g. `2024-01-31T09:00:00Z`
    pub created: Option<String>,
    /// W3CDTF timestamp
    pub modified: Option<String>,
    pub category: Option<String>,
}

impl CoreProperties {
    /// True when no property is set
    pub fn is_empty(&self) -> bool {
        *self == CoreProperties::default()
    }
}

/// A complete document
#[derive(Debug, Clone)]
pub struct Document {
    blocks: Vec<Block>,
    styles: StyleRegistry,
    properties: CoreProperties,
    /// Page background color, hex RGB
    background: Option<String>,
}

impl Document {
    /// Create an empty document seeded with the built-in styles
    pub fn new() -> Self {
        Self::with_registry(StyleRegistry::with_builtins())
    }

    /// Create an empty document using the given registry
    pub fn with_registry(styles: StyleRegistry) -> Self {
        Self {
            blocks: Vec::new(),
            styles,
            properties: CoreProperties::default(),
            background: None,
        }
    }

    /// Append a paragraph holding a single plain run
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Paragraph {
        push_paragraph(&mut self.blocks, Paragraph::with_text(text))
    }

    pub fn add_empty_paragraph(&mut self) -> &mut Paragraph {
        push_paragraph(&mut self.blocks, Paragraph::new())
    }

    /// Append a heading paragraph
    ///
    /// Level 0 uses the `Title` style, levels 1 to 9 use `Heading1` to
    /// `Heading9`. Deeper levels are clamped to 9.
    pub fn add_heading(&mut self, text: impl Into<String>, level: u8) -> &mut Paragraph {
        let style = match level {
            0 => TITLE.to_string(),
            n => format!("Heading{}", n.min(MAX_HEADING_LEVEL)),
        };
        let para = push_paragraph(&mut self.blocks, Paragraph::with_text(text));
        para.set_style(style);
        para
    }

    /// Append a paragraph containing only a page break
    pub fn add_page_break(&mut self) -> &mut Paragraph {
        let para = push_paragraph(&mut self.blocks, Paragraph::new());
        para.add_run().add_break(BreakType::Page);
        para
    }

    /// Append a table with no rows and no style
    pub fn add_table(&mut self) -> &mut Table {
        push_table(&mut self.blocks, Table::new())
    }

    /// Register (or overwrite) a named style in this document's registry
    pub fn register_style(&mut self, definition: StyleDefinition) -> Option<StyleDefinition> {
        self.styles.register(definition)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    pub fn properties(&self) -> &CoreProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut CoreProperties {
        &mut self.properties
    }

    /// Set the document title
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.properties.title = Some(title.into());
        self
    }

    /// Set the document author
    pub fn set_creator(&mut self, creator: impl Into<String>) -> &mut Self {
        self.properties.creator = Some(creator.into());
        self
    }

    /// Page background color shown behind all content, hex RGB
    pub fn set_background(&mut self, color: impl Into<String>) -> &mut Self {
        self.background = Some(color.into());
        self
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    /// Top-level tables in body order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(Block::as_table)
    }

    /// Top-level paragraphs in body order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(Block::as_paragraph)
    }

    /// Number of top-level blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
