use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("could not serialize response document: {0}")]
    Write(#[from] quick_xml::Error),
    #[error("serialized response document is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Mutable element tree the response document is assembled in before
/// serialization.
///
/// Element names are stored verbatim with their prefix (`ext:TransferHeader`);
/// the envelope carries the namespace declarations. Attribute and child order
/// is insertion order, which keeps repeated runs over the same transfer
/// byte-identical.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<ResponseNode>,
}

impl ResponseNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(name);
        node.text = Some(text.into());
        node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[ResponseNode] {
        &self.children
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn push(&mut self, child: ResponseNode) {
        self.children.push(child);
    }

    /// First direct child with the given prefixed name.
    pub fn child(&self, name: &str) -> Option<&ResponseNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Walks `path` one segment at a time, creating each segment that does
    /// not exist yet, and returns the node at the end of the path. Existing
    /// children are reused, so materializing the same path twice changes
    /// nothing. Leading slashes are ignored.
    pub fn ensure_path(&mut self, path: &str) -> &mut ResponseNode {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return self;
        }
        let (segment, rest) = match path.split_once('/') {
            Some((segment, rest)) => (segment, rest),
            None => (path, ""),
        };
        let index = match self.children.iter().position(|child| child.name == segment) {
            Some(index) => index,
            None => {
                self.children.push(ResponseNode::new(segment));
                self.children.len() - 1
            }
        };
        self.children[index].ensure_path(rest)
    }

    /// Serializes the tree as a standalone document with an XML declaration,
    /// two-space indentation, and escaped text content.
    pub fn to_xml(&self) -> Result<String, EmitError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_into(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner().into_inner())?)
    }

    fn write_into(&self, writer: &mut Writer<Cursor<Vec<u8>>>) -> Result<(), EmitError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }
        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}
