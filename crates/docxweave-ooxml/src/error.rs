//! Error types for serialization and packaging

use std::path::PathBuf;

use docxweave_model::ChainError;
use thiserror::Error;

/// Errors that can occur while writing a document
#[derive(Error, Debug)]
pub enum DocxError {
    /// A style name referenced by the tree is not in the registry
    #[error("Unresolved style '{style}' referenced by {location}")]
    UnresolvedStyle {
        /// Where the reference was found, e.g. `table 2 (body/3)`
        location: String,
        style: String,
    },

    /// A `basedOn` chain loops back on itself
    #[error("Cyclic style inheritance: {}", chain.join(" -> "))]
    CyclicStyleInheritance { chain: Vec<String> },

    /// The package could not be written to its destination
    #[error("Failed to write package to {}: {source}", path.display())]
    PackageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid document or style structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading XML content
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error parsing configuration
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Error serializing configuration
    #[error("Config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl DocxError {
    /// Map a registry chain failure found while resolving `location`
    pub(crate) fn from_chain(err: ChainError, location: &str) -> Self {
        match err {
            ChainError::Missing {
                style,
                referenced_by: None,
            } => DocxError::UnresolvedStyle {
                location: location.to_string(),
                style,
            },
            ChainError::Missing {
                style,
                referenced_by: Some(child),
            } => DocxError::UnresolvedStyle {
                location: format!("basedOn of style '{}'", child),
                style,
            },
            ChainError::Cycle { chain } => DocxError::CyclicStyleInheritance { chain },
        }
    }
}

/// Result type for docx operations
pub type Result<T> = std::result::Result<T, DocxError>;
