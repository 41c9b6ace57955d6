//! Named style definitions and the style registry
//!
//! Tables, paragraphs and runs reference styles by *name*. The name is
//! looked up in the document's [`StyleRegistry`] only when the document is
//! saved, so re-registering a name changes every table that uses it.
//!
//! A style may be `based_on` another style of the same kind. The registry
//! itself does not merge inherited formatting; [`StyleRegistry::chain`]
//! returns the inheritance chain and callers merge it region by region with
//! [`Formatting::merge`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::{Justification, Underline, VerticalAlign};

/// Kind of style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
}

impl StyleKind {
    /// Value of the `w:type` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            StyleKind::Paragraph => "paragraph",
            StyleKind::Character => "character",
            StyleKind::Table => "table",
        }
    }
}

/// Conditional formatting region of a table style
///
/// Variant order follows `ST_TblStyleOverrideType`, which is also the order
/// the regions are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRegion {
    /// Base formatting of the whole table
    WholeTable,
    /// Header row
    FirstRow,
    /// Total row
    LastRow,
    FirstColumn,
    LastColumn,
    /// Odd banded columns
    Band1Vertical,
    /// Even banded columns
    Band2Vertical,
    /// Odd banded rows
    Band1Horizontal,
    /// Even banded rows
    Band2Horizontal,
}

impl TableRegion {
    pub const ALL: [TableRegion; 9] = [
        TableRegion::WholeTable,
        TableRegion::FirstRow,
        TableRegion::LastRow,
        TableRegion::FirstColumn,
        TableRegion::LastColumn,
        TableRegion::Band1Vertical,
        TableRegion::Band2Vertical,
        TableRegion::Band1Horizontal,
        TableRegion::Band2Horizontal,
    ];

    /// Value of the `w:type` attribute on `w:tblStylePr`
    pub fn as_str(self) -> &'static str {
        match self {
            TableRegion::WholeTable => "wholeTable",
            TableRegion::FirstRow => "firstRow",
            TableRegion::LastRow => "lastRow",
            TableRegion::FirstColumn => "firstCol",
            TableRegion::LastColumn => "lastCol",
            TableRegion::Band1Vertical => "band1Vert",
            TableRegion::Band2Vertical => "band2Vert",
            TableRegion::Band1Horizontal => "band1Horz",
            TableRegion::Band2Horizontal => "band2Horz",
        }
    }
}

/// Border line style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    None,
    Single,
    Double,
    Dotted,
    Dashed,
    Thick,
}

impl BorderStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            BorderStyle::None => "nil",
            BorderStyle::Single => "single",
            BorderStyle::Double => "double",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Thick => "thick",
        }
    }
}

/// A single border line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    pub style: BorderStyle,
    /// Width in eighths of a point
    pub size: u32,
    /// Hex RGB or `"auto"`
    pub color: String,
}

impl Border {
    pub fn single(size: u32, color: impl Into<String>) -> Self {
        Self {
            style: BorderStyle::Single,
            size,
            color: color.into(),
        }
    }

    pub fn double(size: u32, color: impl Into<String>) -> Self {
        Self {
            style: BorderStyle::Double,
            size,
            color: color.into(),
        }
    }

    pub fn none() -> Self {
        Self {
            style: BorderStyle::None,
            size: 0,
            color: "auto".to_string(),
        }
    }
}

/// Borders of a table or a conditional region; each side merges separately
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableBorders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inside_h: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inside_v: Option<Border>,
}

impl TableBorders {
    /// The same border on all six edges
    pub fn all(border: Border) -> Self {
        Self {
            top: Some(border.clone()),
            left: Some(border.clone()),
            bottom: Some(border.clone()),
            right: Some(border.clone()),
            inside_h: Some(border.clone()),
            inside_v: Some(border),
        }
    }

    /// The same border on the four outer edges
    pub fn outer(border: Border) -> Self {
        Self {
            top: Some(border.clone()),
            left: Some(border.clone()),
            bottom: Some(border.clone()),
            right: Some(border),
            inside_h: None,
            inside_v: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TableBorders::default()
    }

    /// Sides in schema order (`top, left, bottom, right, insideH, insideV`)
    pub fn sides(&self) -> [(&'static str, Option<&Border>); 6] {
        [
            ("top", self.top.as_ref()),
            ("left", self.left.as_ref()),
            ("bottom", self.bottom.as_ref()),
            ("right", self.right.as_ref()),
            ("insideH", self.inside_h.as_ref()),
            ("insideV", self.inside_v.as_ref()),
        ]
    }

    fn merge(&mut self, overlay: &TableBorders) {
        overwrite(&mut self.top, &overlay.top);
        overwrite(&mut self.left, &overlay.left);
        overwrite(&mut self.bottom, &overlay.bottom);
        overwrite(&mut self.right, &overlay.right);
        overwrite(&mut self.inside_h, &overlay.inside_h);
        overwrite(&mut self.inside_v, &overlay.inside_v);
    }
}

/// Formatting properties of one style region
///
/// Every field is optional. An unset field inherits from the `based_on`
/// parent for the same region.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Formatting {
    // Run properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Half-points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<Underline>,

    // Paragraph properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_next: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_before: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_after: Option<u32>,
    /// Line spacing in 240ths of a line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<Justification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<u8>,

    // Table properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_band_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_band_size: Option<u32>,
    #[serde(skip_serializing_if = "TableBorders::is_empty")]
    pub borders: TableBorders,
    /// Left and right cell margin in twentieths of a point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_margin: Option<u32>,

    // Cell properties
    /// Background fill as hex RGB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,
}

impl Formatting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite every field that `overlay` sets, leaving the rest untouched
    pub fn merge(&mut self, overlay: &Formatting) {
        overwrite(&mut self.font, &overlay.font);
        overwrite(&mut self.bold, &overlay.bold);
        overwrite(&mut self.italic, &overlay.italic);
        overwrite(&mut self.caps, &overlay.caps);
        overwrite(&mut self.color, &overlay.color);
        overwrite(&mut self.size, &overlay.size);
        overwrite(&mut self.underline, &overlay.underline);
        overwrite(&mut self.keep_next, &overlay.keep_next);
        overwrite(&mut self.spacing_before, &overlay.spacing_before);
        overwrite(&mut self.spacing_after, &overlay.spacing_after);
        overwrite(&mut self.line_spacing, &overlay.line_spacing);
        overwrite(&mut self.justification, &overlay.justification);
        overwrite(&mut self.outline_level, &overlay.outline_level);
        overwrite(&mut self.row_band_size, &overlay.row_band_size);
        overwrite(&mut self.col_band_size, &overlay.col_band_size);
        overwrite(&mut self.cell_margin, &overlay.cell_margin);
        overwrite(&mut self.shading, &overlay.shading);
        overwrite(&mut self.vertical_align, &overlay.vertical_align);
        self.borders.merge(&overlay.borders);
    }

    pub fn is_empty(&self) -> bool {
        *self == Formatting::default()
    }

    pub fn has_run_properties(&self) -> bool {
        self.font.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.caps.is_some()
            || self.color.is_some()
            || self.size.is_some()
            || self.underline.is_some()
    }

    pub fn has_paragraph_properties(&self) -> bool {
        self.keep_next.is_some()
            || self.spacing_before.is_some()
            || self.spacing_after.is_some()
            || self.line_spacing.is_some()
            || self.justification.is_some()
            || self.outline_level.is_some()
    }

    pub fn has_table_properties(&self) -> bool {
        self.row_band_size.is_some()
            || self.col_band_size.is_some()
            || !self.borders.is_empty()
            || self.cell_margin.is_some()
    }

    pub fn has_cell_properties(&self) -> bool {
        self.shading.is_some() || self.vertical_align.is_some()
    }

    pub fn bold(mut self, value: bool) -> Self {
        self.bold = Some(value);
        self
    }

    pub fn italic(mut self, value: bool) -> Self {
        self.italic = Some(value);
        self
    }

    pub fn color(mut self, hex: impl Into<String>) -> Self {
        self.color = Some(hex.into());
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn font(mut self, name: impl Into<String>) -> Self {
        self.font = Some(name.into());
        self
    }

    pub fn underline(mut self, style: Underline) -> Self {
        self.underline = Some(style);
        self
    }

    pub fn shading(mut self, fill: impl Into<String>) -> Self {
        self.shading = Some(fill.into());
        self
    }

    pub fn borders(mut self, borders: TableBorders) -> Self {
        self.borders = borders;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing_before = Some(before);
        self.spacing_after = Some(after);
        self
    }
}

fn overwrite<T: Clone>(base: &mut Option<T>, overlay: &Option<T>) {
    if let Some(value) = overlay {
        *base = Some(value.clone());
    }
}

/// A named style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Human-readable name; the registry key
    pub name: String,
    pub kind: StyleKind,
    /// Name of the parent style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_priority: Option<u32>,
    /// Formatting per conditional region. Non-table styles only use
    /// [`TableRegion::WholeTable`].
    #[serde(default)]
    pub regions: BTreeMap<TableRegion, Formatting>,
}

impl StyleDefinition {
    pub fn new(name: impl Into<String>, kind: StyleKind) -> Self {
        Self {
            name: name.into(),
            kind,
            based_on: None,
            ui_priority: None,
            regions: BTreeMap::new(),
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self::new(name, StyleKind::Table)
    }

    pub fn paragraph(name: impl Into<String>) -> Self {
        Self::new(name, StyleKind::Paragraph)
    }

    pub fn character(name: impl Into<String>) -> Self {
        Self::new(name, StyleKind::Character)
    }

    pub fn based_on(mut self, parent: impl Into<String>) -> Self {
        self.based_on = Some(parent.into());
        self
    }

    pub fn ui_priority(mut self, priority: u32) -> Self {
        self.ui_priority = Some(priority);
        self
    }

    /// Set the formatting of one region, replacing what was there
    pub fn with_region(mut self, region: TableRegion, formatting: Formatting) -> Self {
        self.regions.insert(region, formatting);
        self
    }

    /// Shorthand for the whole-table region
    pub fn with_formatting(self, formatting: Formatting) -> Self {
        self.with_region(TableRegion::WholeTable, formatting)
    }

    pub fn region(&self, region: TableRegion) -> Option<&Formatting> {
        self.regions.get(&region)
    }

    pub fn region_mut(&mut self, region: TableRegion) -> &mut Formatting {
        self.regions.entry(region).or_default()
    }
}

/// Failure to walk a `based_on` chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// A style in the chain does not exist
    Missing {
        style: String,
        /// The style whose `based_on` named the missing one, if any
        referenced_by: Option<String>,
    },
    /// The chain revisits a style; the last name is the repeated one
    Cycle { chain: Vec<String> },
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Missing {
                style,
                referenced_by: Some(child),
            } => write!(f, "style '{}' (parent of '{}') is not defined", style, child),
            ChainError::Missing { style, .. } => write!(f, "style '{}' is not defined", style),
            ChainError::Cycle { chain } => {
                write!(f, "cyclic basedOn chain: {}", chain.join(" -> "))
            }
        }
    }
}

impl std::error::Error for ChainError {}

/// Insertion-ordered collection of style definitions keyed by name
///
/// Insertion order is the order styles are written to the styles part.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: Vec<StyleDefinition>,
    index: HashMap<String, usize>,
    user_defined: HashSet<String>,
}

impl StyleRegistry {
    /// An empty registry with no built-in styles
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry seeded with a copy of the built-in catalog
    pub fn with_builtins() -> Self {
        crate::catalog::builtin_registry().clone()
    }

    /// Look up a style by name. No inheritance is applied.
    pub fn resolve(&self, name: &str) -> Option<&StyleDefinition> {
        self.index.get(name).map(|&i| &self.styles[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Insert or overwrite a user style, returning the previous definition
    ///
    /// An overwritten style keeps its original position.
    pub fn register(&mut self, definition: StyleDefinition) -> Option<StyleDefinition> {
        self.user_defined.insert(definition.name.clone());
        self.insert(definition)
    }

    pub(crate) fn insert(&mut self, definition: StyleDefinition) -> Option<StyleDefinition> {
        match self.index.get(&definition.name) {
            Some(&i) => Some(std::mem::replace(&mut self.styles[i], definition)),
            None => {
                self.index.insert(definition.name.clone(), self.styles.len());
                self.styles.push(definition);
                None
            }
        }
    }

    /// True if the style was registered by the user rather than seeded
    pub fn is_user_defined(&self, name: &str) -> bool {
        self.user_defined.contains(name)
    }

    /// True if any style has been registered by the user
    pub fn has_user_styles(&self) -> bool {
        !self.user_defined.is_empty()
    }

    /// Iterate styles in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.iter()
    }

    /// Style names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|s| s.name.as_str())
    }

    /// Position of a style in insertion order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// The `based_on` chain of a style, leaf first
    pub fn chain(&self, name: &str) -> Result<Vec<&StyleDefinition>, ChainError> {
        let mut chain: Vec<&StyleDefinition> = Vec::new();
        let mut current = name;
        let mut child: Option<&str> = None;

        loop {
            let style = self.resolve(current).ok_or_else(|| ChainError::Missing {
                style: current.to_string(),
                referenced_by: child.map(str::to_string),
            })?;

            if chain.iter().any(|s| s.name == style.name) {
                let mut names: Vec<String> = chain.iter().map(|s| s.name.clone()).collect();
                names.push(style.name.clone());
                return Err(ChainError::Cycle { chain: names });
            }
            chain.push(style);

            match style.based_on.as_deref() {
                Some(parent) => {
                    child = Some(&style.name);
                    current = parent;
                }
                None => return Ok(chain),
            }
        }
    }

    /// Check every style's chain
    pub fn validate(&self) -> Result<(), ChainError> {
        for style in &self.styles {
            self.chain(&style.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = StyleRegistry::empty();
        registry.register(StyleDefinition::table("Plain"));
        assert!(registry.resolve("Plain").is_some());
        assert!(registry.resolve("Missing").is_none());
        assert!(registry.is_user_defined("Plain"));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut registry = StyleRegistry::empty();
        registry.register(StyleDefinition::table("A"));
        registry.register(StyleDefinition::table("B"));
        let old = registry.register(
            StyleDefinition::table("A").with_formatting(Formatting::new().bold(true)),
        );

        assert!(old.is_some());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(
            registry.resolve("A").unwrap().region(TableRegion::WholeTable).unwrap().bold,
            Some(true)
        );
    }

    #[test]
    fn test_chain_leaf_first() {
        let mut registry = StyleRegistry::empty();
        registry.register(StyleDefinition::table("C"));
        registry.register(StyleDefinition::table("B").based_on("C"));
        registry.register(StyleDefinition::table("A").based_on("B"));

        let names: Vec<&str> = registry
            .chain("A")
            .unwrap()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_chain_detects_cycle() {
        let mut registry = StyleRegistry::empty();
        registry.register(StyleDefinition::table("A").based_on("B"));
        registry.register(StyleDefinition::table("B").based_on("A"));

        let err = registry.chain("A").unwrap_err();
        assert_eq!(
            err,
            ChainError::Cycle {
                chain: vec!["A".into(), "B".into(), "A".into()]
            }
        );
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_chain_detects_self_reference() {
        let mut registry = StyleRegistry::empty();
        registry.register(StyleDefinition::table("Loop").based_on("Loop"));
        assert!(matches!(
            registry.chain("Loop"),
            Err(ChainError::Cycle { .. })
        ));
    }

    #[test]
    fn test_chain_reports_missing_parent() {
        let mut registry = StyleRegistry::empty();
        registry.register(StyleDefinition::table("Child").based_on("Ghost"));

        let err = registry.chain("Child").unwrap_err();
        assert_eq!(
            err,
            ChainError::Missing {
                style: "Ghost".into(),
                referenced_by: Some("Child".into())
            }
        );
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn test_formatting_merge_overrides_only_set_fields() {
        let mut base = Formatting::new().bold(true).color("000000").size(20);
        let overlay = Formatting::new().color("FF0000");
        base.merge(&overlay);

        assert_eq!(base.bold, Some(true));
        assert_eq!(base.color.as_deref(), Some("FF0000"));
        assert_eq!(base.size, Some(20));
    }

    #[test]
    fn test_border_merge_per_side() {
        let mut base = Formatting::new().borders(TableBorders::all(Border::single(4, "000000")));
        let overlay = Formatting::new().borders(TableBorders {
            top: Some(Border::double(8, "FF0000")),
            ..Default::default()
        });
        base.merge(&overlay);

        assert_eq!(base.borders.top, Some(Border::double(8, "FF0000")));
        assert_eq!(base.borders.bottom, Some(Border::single(4, "000000")));
    }

    #[test]
    fn test_region_order_matches_schema() {
        let mut sorted = TableRegion::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, TableRegion::ALL.to_vec());
        assert_eq!(TableRegion::Band1Horizontal.as_str(), "band1Horz");
    }

    #[test]
    fn test_formatting_property_groups() {
        let f = Formatting::new().shading("EEEEEE");
        assert!(f.has_cell_properties());
        assert!(!f.has_run_properties());
        assert!(!f.has_table_properties());
        assert!(Formatting::new().is_empty());
    }
}
