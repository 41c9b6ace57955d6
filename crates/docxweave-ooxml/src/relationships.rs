//! Relationship descriptors (`_rels/*.rels`)
//!
//! Every part that points at other parts owns one [`Relationships`] set.
//! Ids are allocated per set, starting at `rId1`, in the order the
//! relationships are added, so the same sequence of calls always yields the
//! same ids.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{DocxError, Result};
use crate::xml::escape_text;

/// Namespace of relationship descriptors
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Relationship type URIs
impl Relationships {
    /// Package to main document part
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Main document to styles part
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    /// Main document to numbering part
    pub const TYPE_NUMBERING: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    /// Package to core properties
    pub const TYPE_CORE_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    /// Package to extended (application) properties
    pub const TYPE_EXTENDED_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    /// Part to an external hyperlink target
    pub const TYPE_HYPERLINK: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}

/// `TargetMode` value of relationships leaving the package
pub const TARGET_MODE_EXTERNAL: &str = "External";

/// Sequential `rId{n}` generator for one relationship scope
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id
    pub fn allocate(&mut self) -> String {
        let id = format!("rId{}", self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`allocate`](Self::allocate) returns
    pub fn peek(&self) -> String {
        format!("rId{}", self.next)
    }
}

/// One relationship entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part's directory, or a URL
    pub target: String,
    /// `External` for targets outside the package, `None` for parts
    pub target_mode: Option<String>,
}

impl Relationship {
    pub fn is_external(&self) -> bool {
        self.target_mode.as_deref() == Some(TARGET_MODE_EXTERNAL)
    }
}

/// Insertion-ordered relationships of one source
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
    by_id: HashMap<String, usize>,
    ids: IdAllocator,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its id
    ///
    /// Adding the same `(target, rel_type)` pair again returns the id it
    /// already has.
    pub fn add(&mut self, target: impl Into<String>, rel_type: impl Into<String>) -> String {
        self.add_with_mode(target.into(), rel_type.into(), None)
    }

    /// Add a relationship to a resource outside the package, such as a URL
    pub fn add_external(
        &mut self,
        target: impl Into<String>,
        rel_type: impl Into<String>,
    ) -> String {
        self.add_with_mode(target.into(), rel_type.into(), Some(TARGET_MODE_EXTERNAL.to_string()))
    }

    fn add_with_mode(
        &mut self,
        target: String,
        rel_type: String,
        target_mode: Option<String>,
    ) -> String {
        if let Some(existing) = self
            .entries
            .iter()
            .find(|r| r.target == target && r.rel_type == rel_type && r.target_mode == target_mode)
        {
            return existing.id.clone();
        }

        let id = self.ids.allocate();
        self.by_id.insert(id.clone(), self.entries.len());
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type,
            target,
            target_mode,
        });
        id
    }

    /// Existing relationship to `target` with type `rel_type`
    pub fn find(&self, target: &str, rel_type: &str) -> Option<&Relationship> {
        self.entries
            .iter()
            .find(|r| r.target == target && r.rel_type == rel_type)
    }

    /// Look up by id
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// First relationship of the given type
    pub fn by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.rel_type == rel_type)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Serialize to a `.rels` document
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));

        for rel in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape_text(rel.id.as_str()),
                escape_text(rel.rel_type.as_str()),
                escape_text(rel.target.as_str())
            ));
            if let Some(mode) = &rel.target_mode {
                xml.push_str(&format!(r#" TargetMode="{}""#, escape_text(mode.as_str())));
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }

    /// Parse a `.rels` document
    ///
    /// Newly added relationships continue numbering after the highest
    /// existing `rId`.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut rels = Relationships::new();
        let mut max_id = 0u32;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut target = None;
                    let mut rel_type = None;
                    let mut target_mode = None;

                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Id" => id = Some(value),
                            b"Target" => target = Some(value),
                            b"Type" => rel_type = Some(value),
                            b"TargetMode" => target_mode = Some(value),
                            _ => {}
                        }
                    }

                    let (Some(id), Some(target)) = (id, target) else {
                        return Err(DocxError::InvalidStructure(
                            "Relationship without Id or Target".to_string(),
                        ));
                    };
                    if let Some(n) = id.strip_prefix("rId").and_then(|n| n.parse().ok()) {
                        max_id = max_id.max(n);
                    }
                    rels.by_id.insert(id.clone(), rels.entries.len());
                    rels.entries.push(Relationship {
                        id,
                        rel_type: rel_type.unwrap_or_default(),
                        target,
                        target_mode,
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        rels.ids = IdAllocator { next: max_id + 1 };
        Ok(rels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add("styles.xml", Relationships::TYPE_STYLES), "rId1");
        assert_eq!(rels.add("numbering.xml", Relationships::TYPE_NUMBERING), "rId2");
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut rels = Relationships::new();
        let first = rels.add("styles.xml", Relationships::TYPE_STYLES);
        let again = rels.add("styles.xml", Relationships::TYPE_STYLES);
        assert_eq!(first, again);
        assert_eq!(rels.len(), 1);
    }

    #[test]
    fn test_to_xml_insertion_order() {
        let mut rels = Relationships::new();
        rels.add("word/document.xml", Relationships::TYPE_OFFICE_DOCUMENT);
        rels.add("docProps/core.xml", Relationships::TYPE_CORE_PROPERTIES);

        let xml = rels.to_xml();
        let first = xml.find("rId1").unwrap();
        let second = xml.find("rId2").unwrap();
        assert!(first < second);
        assert!(xml.contains(RELATIONSHIPS_NS));
        assert!(xml.contains(r#"Target="word/document.xml""#));
    }

    #[test]
    fn test_parse_roundtrip() {
        let mut rels = Relationships::new();
        rels.add("styles.xml", Relationships::TYPE_STYLES);
        rels.add("a&b.xml", Relationships::TYPE_NUMBERING);

        let parsed = Relationships::parse(rels.to_xml().as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("rId2").unwrap().target, "a&b.xml");
        assert_eq!(
            parsed.by_type(Relationships::TYPE_STYLES).unwrap().id,
            "rId1"
        );
    }

    #[test]
    fn test_parse_continues_numbering() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
        <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
        </Relationships>"#;

        let mut rels = Relationships::parse(xml).unwrap();
        assert_eq!(rels.add("numbering.xml", Relationships::TYPE_NUMBERING), "rId5");
    }

    #[test]
    fn test_external_target_mode() {
        let mut rels = Relationships::new();
        rels.add("styles.xml", Relationships::TYPE_STYLES);
        let link = rels.add_external("https://example.com/?a=1&b=2", Relationships::TYPE_HYPERLINK);
        assert_eq!(link, "rId2");
        assert_eq!(
            rels.add_external("https://example.com/?a=1&b=2", Relationships::TYPE_HYPERLINK),
            "rId2"
        );

        let xml = rels.to_xml();
        assert!(xml.contains(
            r#"Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>"#
        ));
        assert!(!xml.contains(r#"Target="styles.xml" TargetMode"#));

        let parsed = Relationships::parse(xml.as_bytes()).unwrap();
        assert!(parsed.get("rId2").unwrap().is_external());
        assert!(!parsed.get("rId1").unwrap().is_external());
    }

    #[test]
    fn test_allocator_peek() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.peek(), "rId1");
        ids.allocate();
        assert_eq!(ids.peek(), "rId2");
    }
}
