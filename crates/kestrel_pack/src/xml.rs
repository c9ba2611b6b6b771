//! A small element-tree reader over quick-xml.
//!
//! The packed-netlist document is tree-shaped and recursive, so the ingestor
//! works over a materialized [`XmlElement`] tree rather than a pull stream.
//! Each element records the 1-based line it started on so every downstream
//! error can name its document position.

use crate::error::PackError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// One element of the packed-netlist document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Element name.
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
    /// Concatenated text content, whitespace-normalized.
    pub text: String,
    /// 1-based line the element started on.
    pub line: u32,
}

impl XmlElement {
    /// Returns the value of the named attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the named attribute or a schema error naming this element.
    pub fn required_attr(&self, name: &str, file: &str) -> Result<&str, PackError> {
        self.attr(name).ok_or_else(|| {
            PackError::schema(
                file,
                self.line,
                format!("<{}> is missing required attribute '{name}'", self.name),
            )
        })
    }

    /// Returns the first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterates over child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Iterates over the whitespace-separated tokens of the text content.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

fn line_of(text: &str, byte_offset: u64) -> u32 {
    let end = (byte_offset as usize).min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() as u32 + 1
}

/// Parses a document into its root element.
pub fn parse_document(text: &str, file: &str) -> Result<XmlElement, PackError> {
    let mut reader = Reader::from_str(text);
    let config = reader.config_mut();
    config.trim_text(true);
    config.expand_empty_elements = true;

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut pending = String::new();

    fn flush_pending(top: &mut XmlElement, pending: &mut String) {
        let trimmed = pending.trim();
        if !trimmed.is_empty() {
            if !top.text.is_empty() {
                top.text.push(' ');
            }
            top.text.push_str(trimmed);
        }
        pending.clear();
    }

    loop {
        let event = reader.read_event();
        let line = line_of(text, reader.buffer_position());
        match event {
            Err(e) => {
                return Err(PackError::schema(file, line, format!("malformed XML: {e}")))
            }
            Ok(Event::Start(start)) => {
                if let Some(top) = stack.last_mut() {
                    flush_pending(top, &mut pending);
                }
                let mut elem = XmlElement {
                    name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
                    line,
                    ..XmlElement::default()
                };
                for attr in start.attributes() {
                    let attr = attr.map_err(|e| {
                        PackError::schema(file, line, format!("malformed attribute: {e}"))
                    })?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr
                        .unescape_value()
                        .map_err(|e| {
                            PackError::schema(file, line, format!("malformed attribute: {e}"))
                        })?
                        .into_owned();
                    elem.attrs.push((key, value));
                }
                stack.push(elem);
            }
            Ok(Event::End(_)) => {
                if let Some(top) = stack.last_mut() {
                    flush_pending(top, &mut pending);
                }
                let elem = stack.pop().expect("well-formed XML balances end tags");
                match stack.last_mut() {
                    Some(parent) => parent.children.push(elem),
                    None => root = Some(elem),
                }
            }
            Ok(Event::Text(t)) => {
                let decoded = t.decode().map_err(|e| {
                    PackError::schema(file, line, format!("malformed text: {e}"))
                })?;
                pending.push_str(&decoded);
            }
            Ok(Event::GeneralRef(r)) => {
                if let Some(c) = r.resolve_char_ref().map_err(|e| {
                    PackError::schema(file, line, format!("malformed entity: {e}"))
                })? {
                    pending.push(c);
                } else {
                    let name = r.decode().map_err(|e| {
                        PackError::schema(file, line, format!("malformed entity: {e}"))
                    })?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or_else(|| {
                            PackError::schema(
                                file,
                                line,
                                format!("unknown entity '&{name};'"),
                            )
                        })?;
                    pending.push_str(resolved);
                }
            }
            Ok(Event::Eof) => {
                if let Some(top) = stack.last_mut() {
                    flush_pending(top, &mut pending);
                }
                break;
            }
            Ok(_) => {}
        }
    }
    root.ok_or_else(|| PackError::schema(file, 1, "document has no root element"))
}
