//! Style resolution for one save
//!
//! Before anything is written the whole tree is walked once: every style
//! name referenced by a table, paragraph or run must exist in the document's
//! registry and have an acyclic `basedOn` chain of a single kind. The result
//! is a [`ResolvedStyles`] snapshot holding the styles to emit, their ids
//! and their formatting merged along the chain.

use std::collections::{BTreeMap, HashMap, HashSet};

use docxweave_model::{Block, Document, Formatting, StyleKind, StyleRegistry, TableRegion};
use tracing::debug;

use crate::error::{DocxError, Result};

/// Style name to style id mapping
///
/// Ids keep ASCII letters, digits and `-`. A name that reduces to nothing
/// becomes `Style`. Clashes get a numeric suffix, assigned in registry
/// order.
#[derive(Debug, Clone, Default)]
pub struct StyleIdMap {
    ids: HashMap<String, String>,
}

impl StyleIdMap {
    pub fn new(registry: &StyleRegistry) -> Self {
        let mut ids = HashMap::with_capacity(registry.len());
        let mut taken: HashSet<String> = HashSet::with_capacity(registry.len());

        for name in registry.names() {
            let base = sanitize_id(name);
            let mut id = base.clone();
            let mut n = 1;
            while taken.contains(&id) {
                id = format!("{}{}", base, n);
                n += 1;
            }
            taken.insert(id.clone());
            ids.insert(name.to_string(), id);
        }

        Self { ids }
    }

    /// Id of a style name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }
}

fn sanitize_id(name: &str) -> String {
    let id: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if id.is_empty() {
        "Style".to_string()
    } else {
        id
    }
}

/// A style ready to be written
#[derive(Debug, Clone)]
pub struct ResolvedStyle {
    pub name: String,
    pub id: String,
    pub kind: StyleKind,
    /// Id of the parent style
    pub based_on: Option<String>,
    pub ui_priority: Option<u32>,
    /// Registry default for its kind (`Normal`, `TableNormal`, ...)
    pub is_default: bool,
    /// Formatting merged from the root of the chain down to this style
    pub regions: BTreeMap<TableRegion, Formatting>,
}

impl ResolvedStyle {
    pub fn region(&self, region: TableRegion) -> Option<&Formatting> {
        self.regions.get(&region)
    }
}

/// Styles to emit, in registry order
#[derive(Debug, Clone, Default)]
pub struct ResolvedStyles {
    styles: Vec<ResolvedStyle>,
    ids: StyleIdMap,
}

impl ResolvedStyles {
    /// Id of a referenced style
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.ids.get(name)
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedStyle> {
        self.styles.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedStyle> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True when no styles part is needed
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Resolve every style the document needs
pub fn resolve_document(doc: &Document) -> Result<ResolvedStyles> {
    let registry = doc.styles();
    let mut collector = Collector::new(registry);
    collector.walk(doc.blocks())?;

    let mut emitted: HashSet<&str> = HashSet::new();
    let user_styles = registry
        .iter()
        .filter(|s| registry.is_user_defined(&s.name))
        .map(|s| (s.name.as_str(), format!("registered style '{}'", s.name)));
    let roots: Vec<(&str, String)> = collector
        .referenced
        .iter()
        .map(|(name, location)| (name.as_str(), location.clone()))
        .chain(user_styles)
        .collect();

    for (name, location) in &roots {
        let chain = registry
            .chain(name)
            .map_err(|e| DocxError::from_chain(e, location))?;
        let kind = chain[0].kind;
        for style in &chain {
            if style.kind != kind {
                return Err(DocxError::InvalidStructure(format!(
                    "style '{}' ({}) is based on '{}' ({})",
                    chain[0].name,
                    kind.as_str(),
                    style.name,
                    style.kind.as_str()
                )));
            }
            emitted.insert(style.name.as_str());
        }
    }

    let ids = StyleIdMap::new(registry);
    let mut styles = Vec::with_capacity(emitted.len());
    for style in registry.iter().filter(|s| emitted.contains(s.name.as_str())) {
        // Chains of emitted styles were validated above
        let chain = registry
            .chain(&style.name)
            .map_err(|e| DocxError::from_chain(e, &style.name))?;
        let mut regions: BTreeMap<TableRegion, Formatting> = BTreeMap::new();
        for ancestor in chain.iter().rev() {
            for (region, formatting) in &ancestor.regions {
                regions.entry(*region).or_default().merge(formatting);
            }
        }
        regions.retain(|_, f| !f.is_empty());

        let id = ids.get(&style.name).unwrap_or(style.name.as_str()).to_string();
        styles.push(ResolvedStyle {
            name: style.name.clone(),
            id,
            kind: style.kind,
            based_on: style
                .based_on
                .as_deref()
                .and_then(|parent| ids.get(parent))
                .map(str::to_string),
            ui_priority: style.ui_priority,
            is_default: style.based_on.is_none() && is_kind_default(&style.name),
            regions,
        });
    }

    debug!(
        referenced = collector.referenced.len(),
        emitted = styles.len(),
        "resolved styles"
    );
    Ok(ResolvedStyles { styles, ids })
}

fn is_kind_default(name: &str) -> bool {
    matches!(name, "Normal" | "DefaultParagraphFont" | "TableNormal")
}

/// Block locations as a tree of path segments
///
/// Each node stores only its own segment, so deep nesting costs memory
/// proportional to the number of blocks. Full paths are rendered when a
/// location is actually reported.
#[derive(Default)]
struct PathTree {
    nodes: Vec<(Option<usize>, String)>,
}

impl PathTree {
    fn push(&mut self, parent: Option<usize>, segment: String) -> usize {
        self.nodes.push((parent, segment));
        self.nodes.len() - 1
    }

    /// `body/0/r1/c2/3` style path of a node
    fn render(&self, node: usize) -> String {
        let mut segments = Vec::new();
        let mut current = Some(node);
        while let Some(i) = current {
            let (parent, segment) = &self.nodes[i];
            segments.push(segment.as_str());
            current = *parent;
        }
        segments.reverse();
        segments.join("/")
    }
}

/// Walks the tree collecting style references in document order
struct Collector<'a> {
    registry: &'a StyleRegistry,
    /// First location each name was referenced from
    referenced: Vec<(String, String)>,
    seen: HashSet<String>,
    tables: usize,
    paragraphs: usize,
}

impl<'a> Collector<'a> {
    fn new(registry: &'a StyleRegistry) -> Self {
        Self {
            registry,
            referenced: Vec::new(),
            seen: HashSet::new(),
            tables: 0,
            paragraphs: 0,
        }
    }

    fn reference(
        &mut self,
        name: &str,
        expected: StyleKind,
        location: impl FnOnce() -> String,
    ) -> Result<()> {
        let Some(style) = self.registry.resolve(name) else {
            return Err(DocxError::UnresolvedStyle {
                location: location(),
                style: name.to_string(),
            });
        };
        if style.kind != expected {
            return Err(DocxError::InvalidStructure(format!(
                "{} uses {} style '{}' where a {} style is required",
                location(),
                style.kind.as_str(),
                name,
                expected.as_str()
            )));
        }
        if self.seen.insert(name.to_string()) {
            self.referenced.push((name.to_string(), location()));
        }
        Ok(())
    }

    /// Visit every block in document order without recursing
    fn walk(&mut self, body: &[Block]) -> Result<()> {
        let mut paths = PathTree::default();
        let root = paths.push(None, "body".to_string());
        let mut pending: Vec<(&Block, usize)> = Vec::new();
        push_blocks(&mut pending, &mut paths, body, root);

        while let Some((block, node)) = pending.pop() {
            match block {
                Block::Paragraph(para) => {
                    self.paragraphs += 1;
                    let n = self.paragraphs;
                    if let Some(style) = para.style() {
                        self.reference(style, StyleKind::Paragraph, || {
                            format!("paragraph {} ({})", n, paths.render(node))
                        })?;
                    }
                    for (r, run) in para.runs().iter().enumerate() {
                        if let Some(style) = run.format().style.as_deref() {
                            self.reference(style, StyleKind::Character, || {
                                let here = paths.render(node);
                                format!("run {} of paragraph {} ({})", r + 1, n, here)
                            })?;
                        }
                    }
                }
                Block::Table(table) => {
                    self.tables += 1;
                    let n = self.tables;
                    if let Some(style) = table.style() {
                        self.reference(style, StyleKind::Table, || {
                            format!("table {} ({})", n, paths.render(node))
                        })?;
                    }
                    for (r, row) in table.rows().iter().enumerate().rev() {
                        for (c, cell) in row.cells().iter().enumerate().rev() {
                            let cell_node = paths.push(Some(node), format!("r{}/c{}", r, c));
                            push_blocks(&mut pending, &mut paths, cell.blocks(), cell_node);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Queue `blocks` so they pop in order
fn push_blocks<'b>(
    pending: &mut Vec<(&'b Block, usize)>,
    paths: &mut PathTree,
    blocks: &'b [Block],
    parent: usize,
) {
    for (i, block) in blocks.iter().enumerate().rev() {
        let node = paths.push(Some(parent), i.to_string());
        pending.push((block, node));
    }
}
