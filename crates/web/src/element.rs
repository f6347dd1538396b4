//! Element construction
//!
//! A small, native stand-in for the browser document: elements carry a
//! tag, an optional id and class, and raw inner HTML. A `Document` keeps
//! elements in insertion order and looks them up by id.

use thiserror::Error;

/// Elements rendered without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Element construction errors
#[derive(Debug, Error, PartialEq)]
pub enum ElementError {
    #[error("invalid tag name: '{0}'")]
    InvalidTag(String),
}

/// A single element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    class_name: Option<String>,
    inner_html: String,
}

/// Create an element with an optional class and inner HTML
///
/// Empty class names and empty inner HTML leave the element untouched.
pub fn create_element(
    tag: &str,
    class_name: Option<&str>,
    inner_html: &str,
) -> Result<Element, ElementError> {
    let mut element = Element::new(tag)?;
    if let Some(class_name) = class_name.filter(|c| !c.is_empty()) {
        element.class_name = Some(class_name.to_string());
    }
    if !inner_html.is_empty() {
        element.inner_html = inner_html.to_string();
    }
    Ok(element)
}

impl Element {
    /// Create an empty element
    ///
    /// Tag names must start with an ASCII letter and contain only ASCII
    /// letters, digits or `-`. They are stored lowercase.
    pub fn new(tag: &str) -> Result<Self, ElementError> {
        let mut chars = tag.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ElementError::InvalidTag(tag.to_string()));
        }

        Ok(Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            class_name: None,
            inner_html: String::new(),
        })
    }

    /// Builder-style id setter
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    /// Replace the element's content
    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
    }

    /// Serialize as HTML
    ///
    /// Attribute values are escaped; inner HTML is emitted verbatim.
    pub fn to_html(&self) -> String {
        let mut out = format!("<{}", self.tag);
        if let Some(id) = &self.id {
            out.push_str(&format!(" id=\"{}\"", escape_attribute(id)));
        }
        if let Some(class_name) = &self.class_name {
            out.push_str(&format!(" class=\"{}\"", escape_attribute(class_name)));
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return out;
        }

        out.push_str(&self.inner_html);
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Ordered collection of elements addressable by id
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to the end of the document
    pub fn append(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// First element with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == Some(id))
    }

    pub fn get_element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == Some(id))
    }

    /// Serialize every element, in order
    pub fn to_html(&self) -> String {
        self.elements.iter().map(Element::to_html).collect()
    }
}
