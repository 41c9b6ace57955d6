//! `[Content_Types].xml`
//!
//! Extension defaults cover `.rels` and generic `.xml`; every part gets an
//! explicit override so each part path maps to exactly one content type.

use crate::xml::escape_text;

/// Namespace of the content types stream
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Archive entry name of the content types stream
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const CT_XML: &str = "application/xml";

/// Content type declarations of a package
#[derive(Debug, Clone)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self {
            defaults: vec![
                ("rels".to_string(), CT_RELATIONSHIPS.to_string()),
                ("xml".to_string(), CT_XML.to_string()),
            ],
            overrides: Vec::new(),
        }
    }
}

impl ContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the content type of a part
    ///
    /// `part_name` is the archive path without a leading slash. Declaring
    /// the same part again replaces its content type in place.
    pub fn add_override(&mut self, part_name: &str, content_type: &str) {
        let part_name = format!("/{}", part_name.trim_start_matches('/'));
        match self.overrides.iter_mut().find(|(name, _)| *name == part_name) {
            Some(entry) => entry.1 = content_type.to_string(),
            None => self.overrides.push((part_name, content_type.to_string())),
        }
    }

    /// Content type of a part, checking overrides before extension defaults
    pub fn content_type_of(&self, part_name: &str) -> Option<&str> {
        let part_name = format!("/{}", part_name.trim_start_matches('/'));
        if let Some((_, ct)) = self.overrides.iter().find(|(name, _)| *name == part_name) {
            return Some(ct);
        }
        let ext = part_name.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, ct)| ct.as_str())
    }

    /// Overrides in declaration order, as `(part_name, content_type)`
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, CONTENT_TYPES_NS));
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_text(ext.as_str()),
                escape_text(ct.as_str())
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_text(part.as_str()),
                escape_text(ct.as_str())
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_present() {
        let xml = ContentTypes::new().to_xml();
        assert!(xml.contains(r#"<Default Extension="rels""#));
        assert!(xml.contains(r#"<Default Extension="xml" ContentType="application/xml"/>"#));
    }

    #[test]
    fn test_override_replaces_in_place() {
        let mut types = ContentTypes::new();
        types.add_override("word/document.xml", "a");
        types.add_override("word/styles.xml", "b");
        types.add_override("/word/document.xml", "c");

        let overrides: Vec<_> = types.overrides().collect();
        assert_eq!(
            overrides,
            vec![("/word/document.xml", "c"), ("/word/styles.xml", "b")]
        );
    }

    #[test]
    fn test_content_type_lookup() {
        let mut types = ContentTypes::new();
        types.add_override("word/document.xml", "main");
        assert_eq!(types.content_type_of("word/document.xml"), Some("main"));
        assert_eq!(types.content_type_of("_rels/.rels"), Some(CT_RELATIONSHIPS));
        assert_eq!(types.content_type_of("docProps/other.xml"), Some(CT_XML));
        assert_eq!(types.content_type_of("media/image.png"), None);
    }
}
