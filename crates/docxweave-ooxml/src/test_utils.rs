//! Helpers for inspecting written packages
//!
//! Used by the unit and integration tests to read archives back with an
//! independent reader (`zip` + `quick-xml`) instead of trusting the writer's
//! own string building.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::Result;

/// All archive entries as `(name, bytes)` in archive order
pub fn try_read_entries(bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        entries.push((file.name().to_string(), data));
    }
    Ok(entries)
}

/// Like [`try_read_entries`], panicking on a malformed archive
pub fn read_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    match try_read_entries(bytes) {
        Ok(entries) => entries,
        Err(e) => panic!("not a readable archive: {}", e),
    }
}

/// Contents of one entry as UTF-8, if present
pub fn read_entry(bytes: &[u8], name: &str) -> Option<String> {
    read_entries(bytes)
        .into_iter()
        .find(|(n, _)| n == name)
        .and_then(|(_, data)| String::from_utf8(data).ok())
}

/// One parsed XML element: qualified name and attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attrs: HashMap<String, String>,
    /// Nesting depth, root = 0
    pub depth: usize,
}

impl XmlElement {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}

/// Every element of a document in document order
pub fn try_parse_elements(xml: &str) -> Result<Vec<XmlElement>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut elements = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                elements.push(element(&e, depth)?);
                depth += 1;
            }
            Event::Empty(e) => elements.push(element(&e, depth)?),
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(elements)
}

/// Like [`try_parse_elements`], panicking on malformed XML
pub fn parse_elements(xml: &str) -> Vec<XmlElement> {
    match try_parse_elements(xml) {
        Ok(elements) => elements,
        Err(e) => panic!("not well-formed XML: {}", e),
    }
}

fn element(e: &quick_xml::events::BytesStart<'_>, depth: usize) -> Result<XmlElement> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        attrs.insert(
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            attr.unescape_value()?.into_owned(),
        );
    }
    Ok(XmlElement {
        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        attrs,
        depth,
    })
}

/// Concatenated text of every `w:t` element, one string per `w:p`
pub fn paragraph_texts(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:p" => current.clear(),
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:p" => texts.push(String::new()),
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => in_text = false,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => {
                texts.push(std::mem::take(&mut current))
            }
            Ok(Event::Text(t)) if in_text => {
                if let Ok(text) = t.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    texts
}
