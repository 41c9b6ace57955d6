//! Package parts and the relationships between them
//!
//! A [`PartManager`] is built fresh for every save. It holds at most one part
//! per [`PartKind`], the package-level relationships and one relationship set
//! per source part, and derives `[Content_Types].xml` from the registered
//! parts.

use std::collections::BTreeMap;

use tracing::debug;

use crate::content_types::{ContentTypes, CONTENT_TYPES_PATH};
use crate::relationships::Relationships;

/// Archive path of the package relationships
pub const PACKAGE_RELS_PATH: &str = "_rels/.rels";

/// Kinds of part this library writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartKind {
    Document,
    Styles,
    Numbering,
    CoreProperties,
    AppProperties,
}

impl PartKind {
    /// Archive path, without a leading slash
    pub fn path(self) -> &'static str {
        match self {
            PartKind::Document => "word/document.xml",
            PartKind::Styles => "word/styles.xml",
            PartKind::Numbering => "word/numbering.xml",
            PartKind::CoreProperties => "docProps/core.xml",
            PartKind::AppProperties => "docProps/app.xml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            PartKind::Document => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"
            }
            PartKind::Styles => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"
            }
            PartKind::Numbering => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"
            }
            PartKind::CoreProperties => {
                "application/vnd.openxmlformats-package.core-properties+xml"
            }
            PartKind::AppProperties => {
                "application/vnd.openxmlformats-officedocument.extended-properties+xml"
            }
        }
    }

    /// Type URI of a relationship pointing at this kind of part
    pub fn relationship_type(self) -> &'static str {
        match self {
            PartKind::Document => Relationships::TYPE_OFFICE_DOCUMENT,
            PartKind::Styles => Relationships::TYPE_STYLES,
            PartKind::Numbering => Relationships::TYPE_NUMBERING,
            PartKind::CoreProperties => Relationships::TYPE_CORE_PROPERTIES,
            PartKind::AppProperties => Relationships::TYPE_EXTENDED_PROPERTIES,
        }
    }

    /// Archive path of the relationships owned by this part
    pub fn rels_path(self) -> String {
        let path = self.path();
        match path.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None => format!("_rels/{}.rels", path),
        }
    }

    /// Directory the part lives in, with trailing slash (empty at the root)
    fn directory(self) -> &'static str {
        let path = self.path();
        path.rfind('/').map(|i| &path[..=i]).unwrap_or("")
    }
}

/// Handle to a registered part
///
/// There is at most one part per kind, so the kind identifies the part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartHandle(PartKind);

impl PartHandle {
    pub fn kind(self) -> PartKind {
        self.0
    }

    pub fn path(self) -> &'static str {
        self.0.path()
    }
}

/// Source of a relationship: the package itself or a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelSource {
    Package,
    Part(PartHandle),
}

#[derive(Debug, Clone)]
struct Part {
    kind: PartKind,
    content: Vec<u8>,
}

/// Parts and relationships of one package
#[derive(Debug, Clone, Default)]
pub struct PartManager {
    parts: Vec<Part>,
    package_rels: Relationships,
    part_rels: BTreeMap<PartKind, Relationships>,
}

impl PartManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a part, replacing the content if the kind is already present
    pub fn register_part(&mut self, kind: PartKind, content: impl Into<Vec<u8>>) -> PartHandle {
        let content = content.into();
        debug!(part = kind.path(), bytes = content.len(), "register part");
        match self.parts.iter_mut().find(|p| p.kind == kind) {
            Some(part) => part.content = content,
            None => self.parts.push(Part { kind, content }),
        }
        PartHandle(kind)
    }

    /// Handle of a registered part
    pub fn part(&self, kind: PartKind) -> Option<PartHandle> {
        self.parts
            .iter()
            .any(|p| p.kind == kind)
            .then_some(PartHandle(kind))
    }

    pub fn content(&self, handle: PartHandle) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.kind == handle.0)
            .map(|p| p.content.as_slice())
    }

    /// Relate `from` to `to` and return the relationship id
    ///
    /// Ids are allocated per source starting at `rId1`. Relating the same
    /// pair with the same type twice returns the existing id.
    pub fn add_relationship(&mut self, from: RelSource, to: PartHandle, rel_type: &str) -> String {
        let (rels, base) = match from {
            RelSource::Package => (&mut self.package_rels, ""),
            RelSource::Part(source) => (
                self.part_rels.entry(source.0).or_default(),
                source.0.directory(),
            ),
        };
        let target = relative_target(base, to.path());
        let id = rels.add(target.clone(), rel_type);
        debug!(?from, target = %target, id = %id, "add relationship");
        id
    }

    /// Relate `from` to a target outside the package and return the id
    ///
    /// The target is written as given, with `TargetMode="External"`.
    pub fn add_external_relationship(
        &mut self,
        from: RelSource,
        target: &str,
        rel_type: &str,
    ) -> String {
        let rels = match from {
            RelSource::Package => &mut self.package_rels,
            RelSource::Part(source) => self.part_rels.entry(source.0).or_default(),
        };
        let id = rels.add_external(target, rel_type);
        debug!(?from, target, id = %id, "add external relationship");
        id
    }

    /// Relationships owned by `from`, if any
    pub fn relationships(&self, from: RelSource) -> Option<&Relationships> {
        match from {
            RelSource::Package => Some(&self.package_rels),
            RelSource::Part(handle) => self.part_rels.get(&handle.0),
        }
    }

    /// Parts in registration order
    pub fn handles(&self) -> impl Iterator<Item = PartHandle> + '_ {
        self.parts.iter().map(|p| PartHandle(p.kind))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Content types derived from the registered parts
    pub fn content_types(&self) -> ContentTypes {
        let mut types = ContentTypes::new();
        for part in &self.parts {
            types.add_override(part.kind.path(), part.kind.content_type());
        }
        types
    }

    /// Archive entries in write order
    ///
    /// Content types first, then the package relationships, then each part
    /// followed by its own relationships when it has any.
    pub fn entries(&self) -> Vec<(String, Vec<u8>)> {
        let mut entries = Vec::with_capacity(self.parts.len() * 2 + 2);
        entries.push((
            CONTENT_TYPES_PATH.to_string(),
            self.content_types().to_xml().into_bytes(),
        ));
        entries.push((
            PACKAGE_RELS_PATH.to_string(),
            self.package_rels.to_xml().into_bytes(),
        ));
        for part in &self.parts {
            entries.push((part.kind.path().to_string(), part.content.clone()));
            if let Some(rels) = self.part_rels.get(&part.kind).filter(|r| !r.is_empty()) {
                entries.push((part.kind.rels_path(), rels.to_xml().into_bytes()));
            }
        }
        entries
    }
}

/// Path of `target` relative to directory `base` (`""` or ending in `/`)
fn relative_target(base: &str, target: &str) -> String {
    if let Some(rest) = target.strip_prefix(base) {
        return rest.to_string();
    }
    let base_dirs: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    let target_dirs: Vec<&str> = target.split('/').collect();
    let common = base_dirs
        .iter()
        .zip(&target_dirs)
        .take_while(|(a, b)| a == b)
        .count();
    let mut out = "../".repeat(base_dirs.len() - common);
    out.push_str(&target_dirs[common..].join("/"));
    out
}
