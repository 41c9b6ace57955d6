//! Writer configuration and TOML style sheets
//!
//! [`WriterConfig`] controls everything about the output that is not part
//! of the document tree: compression, page setup, document defaults and
//! whether application properties are written. It loads from TOML:
//!
//! ```toml
//! compression = "stored"
//! app_properties = true
//!
//! [page]
//! size = "a4"
//! orientation = "landscape"
//!
//! [defaults]
//! font = "Cambria"
//! size = 24
//! ```
//!
//! Style definitions can be kept in TOML too and loaded into a registry
//! with [`load_styles_toml`].

use std::path::Path;

use docxweave_model::{Formatting, StyleDefinition, StyleKind, StyleRegistry, TableRegion};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Compression used for archive entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

impl Compression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Compression::Deflated => zip::CompressionMethod::Deflated,
            Compression::Stored => zip::CompressionMethod::Stored,
        }
    }
}

/// Paper size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    Letter,
    Legal,
    A3,
    A4,
    A5,
}

impl PaperSize {
    /// Portrait `(width, height)` in twentieths of a point
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            PaperSize::Letter => (12240, 15840),
            PaperSize::Legal => (12240, 20160),
            PaperSize::A3 => (16838, 23811),
            PaperSize::A4 => (11906, 16838),
            PaperSize::A5 => (8391, 11906),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in twentieths of a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
    pub header: u32,
    pub footer: u32,
    pub gutter: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 1440,
            right: 1440,
            bottom: 1440,
            left: 1440,
            header: 720,
            footer: 720,
            gutter: 0,
        }
    }
}

/// Section page setup written to the final `w:sectPr`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub size: PaperSize,
    pub orientation: Orientation,
    pub margins: Margins,
}

impl PageSetup {
    /// Effective `(width, height)` after orientation
    pub fn dimensions(&self) -> (u32, u32) {
        let (w, h) = self.size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Document-wide run defaults (`w:docDefaults`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocDefaults {
    pub font: Option<String>,
    /// Half-points
    pub size: Option<u32>,
    pub language: Option<String>,
}

impl Default for DocDefaults {
    fn default() -> Self {
        Self {
            font: Some("Calibri".to_string()),
            size: Some(22),
            language: Some("en-US".to_string()),
        }
    }
}

/// Writer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub compression: Compression,
    pub page: PageSetup,
    pub defaults: DocDefaults,
    /// Write `docProps/app.xml`
    pub app_properties: bool,
    /// Application name recorded in `docProps/app.xml`
    pub application: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            page: PageSetup::default(),
            defaults: DocDefaults::default(),
            app_properties: false,
            application: "docxweave".to_string(),
        }
    }
}

impl WriterConfig {
    /// Parse from a TOML string; missing keys keep their defaults
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "load writer config");
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// One style as written in a TOML style sheet
///
/// Regions are separate tables instead of a map so the file reads
/// naturally (`[styles.first_row]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct StyleEntry {
    name: String,
    kind: Option<StyleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    based_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ui_priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    whole_table: Option<Formatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_row: Option<Formatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_row: Option<Formatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_column: Option<Formatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_column: Option<Formatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    band1_vertical: Option<Formatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    band2_vertical: Option<Formatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    band1_horizontal: Option<Formatting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    band2_horizontal: Option<Formatting>,
}

impl StyleEntry {
    fn slot(&mut self, region: TableRegion) -> &mut Option<Formatting> {
        match region {
            TableRegion::WholeTable => &mut self.whole_table,
            TableRegion::FirstRow => &mut self.first_row,
            TableRegion::LastRow => &mut self.last_row,
            TableRegion::FirstColumn => &mut self.first_column,
            TableRegion::LastColumn => &mut self.last_column,
            TableRegion::Band1Vertical => &mut self.band1_vertical,
            TableRegion::Band2Vertical => &mut self.band2_vertical,
            TableRegion::Band1Horizontal => &mut self.band1_horizontal,
            TableRegion::Band2Horizontal => &mut self.band2_horizontal,
        }
    }

    fn into_definition(mut self) -> StyleDefinition {
        let mut def = StyleDefinition::new(
            std::mem::take(&mut self.name),
            self.kind.unwrap_or(StyleKind::Table),
        );
        def.based_on = self.based_on.take();
        def.ui_priority = self.ui_priority;
        for region in TableRegion::ALL {
            if let Some(formatting) = self.slot(region).take() {
                def.regions.insert(region, formatting);
            }
        }
        def
    }

    fn from_definition(def: &StyleDefinition) -> Self {
        let mut entry = StyleEntry {
            name: def.name.clone(),
            kind: Some(def.kind),
            based_on: def.based_on.clone(),
            ui_priority: def.ui_priority,
            ..Default::default()
        };
        for (region, formatting) in &def.regions {
            *entry.slot(*region) = Some(formatting.clone());
        }
        entry
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StyleSheet {
    styles: Vec<StyleEntry>,
}

/// Register every style in a TOML style sheet; returns how many were loaded
///
/// Styles without a `kind` are table styles. Later entries overwrite
/// earlier ones with the same name.
pub fn load_styles_toml(registry: &mut StyleRegistry, toml_str: &str) -> Result<usize> {
    let sheet: StyleSheet = toml::from_str(toml_str)?;
    let count = sheet.styles.len();
    for entry in sheet.styles {
        let def = entry.into_definition();
        debug!(style = %def.name, "load style from TOML");
        registry.register(def);
    }
    Ok(count)
}

/// Serialize the user-registered styles of a registry as a TOML style sheet
pub fn styles_to_toml(registry: &StyleRegistry) -> Result<String> {
    let sheet = StyleSheet {
        styles: registry
            .iter()
            .filter(|s| registry.is_user_defined(&s.name))
            .map(StyleEntry::from_definition)
            .collect(),
    };
    Ok(toml::to_string_pretty(&sheet)?)
}
