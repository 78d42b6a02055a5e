//! Generic attributed element tree.
//!
//! Parses XML text into a tree of [`Element`]s that the DOM loaders consume,
//! and renders a tree back to XML. Markup errors abort parsing: no partial
//! tree is ever returned.

use std::io::{Cursor, Write};
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::error::{Error, ErrorCode};

/// An XML element: tag, ordered attributes, ordered children, optional text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    /// Create an empty element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Element tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute, replacing an existing value of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child with the given tag.
    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Whether a child with the given tag exists.
    #[must_use]
    pub fn has_child(&self, tag: &str) -> bool {
        self.child(tag).is_some()
    }

    /// Append a child.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Builder form of [`push_child`](Self::push_child).
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Text content, trimmed of surrounding whitespace.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Builder form of [`set_text`](Self::set_text).
    #[must_use]
    pub fn with_text(mut self, text: impl ToString) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Text of the first child with the given tag.
    #[must_use]
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(Element::text)
    }

    /// Parse the text of the first child with the given tag.
    ///
    /// Returns `None` when the child is absent. A child with no text parses
    /// from the empty string.
    pub fn child_value<T: FromStr>(&self, tag: &str) -> Option<Result<T, T::Err>> {
        self.child(tag).map(|c| c.text().unwrap_or_default().parse())
    }

    /// Render this element as an XML document.
    pub fn to_xml_string(&self) -> Result<String, Error> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
            .map_err(|e| write_error(&e))?;
        self.write_into(&mut writer)?;
        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| Error::new(ErrorCode::ElementInvalid, format!("invalid UTF-8: {e}")))
    }

    fn write_into<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (k, v) in &self.attributes {
            start.push_attribute((k.as_str(), v.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| write_error(&e));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| write_error(&e))?;
        if let Some(text) = &self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| write_error(&e))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.tag.as_str())))
            .map_err(|e| write_error(&e))
    }
}

fn write_error(e: &impl std::fmt::Display) -> Error {
    Error::new(ErrorCode::ElementInvalid, format!("failed to write XML: {e}"))
}

/// Parse XML text into an element tree.
///
/// # Errors
///
/// Returns a [`ErrorCode::ParseError`] for malformed markup: unterminated or
/// mismatched tags, bad attribute syntax, multiple root elements, or no root
/// element at all.
pub fn parse_element_str(xml: &str) -> Result<Element, Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(start_element(e)?),
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(ref e)) => {
                let element = stack.pop().ok_or_else(|| {
                    Error::parse(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| Error::parse(format!("invalid text content: {e}")))?;
                append_text(&mut stack, &text);
            }
            Ok(Event::CData(ref c)) => {
                let text = String::from_utf8_lossy(c);
                append_text(&mut stack, &text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::parse(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::parse(format!("unterminated element <{}>", open.tag)));
    }
    root.ok_or_else(|| Error::parse("document has no root element"))
}

fn start_element(e: &BytesStart) -> Result<Element, Error> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = Element::new(tag);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            Error::parse(format!("malformed attribute on <{}>: {err}", element.tag))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::parse(format!("invalid value for attribute {key}: {err}")))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), Error> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(Error::parse(format!(
            "multiple root elements: found <{}> after the document root",
            element.tag
        )))
    }
}

fn append_text(stack: &mut [Element], text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let Some(top) = stack.last_mut() else {
        debug!(text, "ignoring text outside of the root element");
        return;
    };
    match &mut top.text {
        // Segments split by comments or CDATA stay separate tokens.
        Some(existing) => {
            existing.push(' ');
            existing.push_str(text);
        }
        None => top.text = Some(text.to_string()),
    }
}
