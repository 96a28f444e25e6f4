//! XML content types for tree nodes.
//!
//! This module provides `XmlContent`, the closed set of node kinds a document
//! tree is made of, and the three leaf kinds (text, CDATA and comment).

use std::fmt;
use std::io::Write;

use super::identity::{IdGenerator, NodeId};
use super::XmlElement;
use crate::error::Result;
use crate::xml::XmlPrinter;

/// A node of a document tree.
#[derive(Debug, Clone)]
pub enum XmlContent {
    /// An element with a name, attributes and children.
    Element(XmlElement),
    /// Character data, escaped on output.
    Text(XmlText),
    /// A CDATA section, written verbatim inside `<![CDATA[...]]>`.
    CData(XmlCData),
    /// A comment.
    Comment(XmlComment),
}

impl XmlContent {
    /// Returns the identity of this node, assigning one on first call.
    pub fn id(&self) -> u64 {
        self.node_id().get()
    }

    /// Returns the identity of this node, drawing a new one from `generator`
    /// if none has been assigned yet.
    pub fn id_from(&self, generator: &IdGenerator) -> u64 {
        self.node_id().get_from(generator)
    }

    /// Returns the identity if it has already been assigned.
    pub fn peek_id(&self) -> Option<u64> {
        self.node_id().peek()
    }

    fn node_id(&self) -> &NodeId {
        match self {
            XmlContent::Element(e) => &e.id,
            XmlContent::Text(t) => &t.id,
            XmlContent::CData(c) => &c.id,
            XmlContent::Comment(c) => &c.id,
        }
    }

    /// Shallow equality: elements compare name and attributes, leaves compare
    /// their payload. Nodes of different kinds are never equal.
    pub fn content_equals(&self, other: &XmlContent) -> bool {
        match (self, other) {
            (XmlContent::Element(a), XmlContent::Element(b)) => a.content_equals(b),
            (XmlContent::Text(a), XmlContent::Text(b)) => a == b,
            (XmlContent::CData(a), XmlContent::CData(b)) => a == b,
            (XmlContent::Comment(a), XmlContent::Comment(b)) => a == b,
            _ => false,
        }
    }

    /// Structural equality including children for elements.
    ///
    /// See [`XmlElement::deep_equals`].
    pub fn deep_equals(&self, other: &XmlContent) -> bool {
        match (self, other) {
            (XmlContent::Element(a), XmlContent::Element(b)) => a.deep_equals(b),
            _ => self.content_equals(other),
        }
    }

    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, XmlContent::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, XmlContent::Text(_))
    }

    /// Returns true if this is a CDATA node.
    pub fn is_cdata(&self) -> bool {
        matches!(self, XmlContent::CData(_))
    }

    /// Returns true if this is a comment node.
    pub fn is_comment(&self) -> bool {
        matches!(self, XmlContent::Comment(_))
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is an element node.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a reference to the text, if this is a text node.
    pub fn as_text(&self) -> Option<&XmlText> {
        match self {
            XmlContent::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Returns a reference to the CDATA section, if this is a CDATA node.
    pub fn as_cdata(&self) -> Option<&XmlCData> {
        match self {
            XmlContent::CData(c) => Some(c),
            _ => None,
        }
    }

    /// Returns a reference to the comment, if this is a comment node.
    pub fn as_comment(&self) -> Option<&XmlComment> {
        match self {
            XmlContent::Comment(c) => Some(c),
            _ => None,
        }
    }

    /// Writes this node and its subtree as XML.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        XmlPrinter::new(writer).print(self)
    }

    /// Serializes this node and its subtree to a string.
    pub fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for XmlContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = Vec::new();
        self.write_to(&mut output).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&output))
    }
}

impl From<XmlElement> for XmlContent {
    fn from(element: XmlElement) -> Self {
        XmlContent::Element(element)
    }
}

/// Defines a leaf node kind wrapping a single string payload.
macro_rules! leaf_node {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $printer:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            text: String,
            id: NodeId,
        }

        impl $name {
            /// Creates a new node holding `text`.
            pub fn new(text: impl Into<String>) -> Self {
                $name {
                    text: text.into(),
                    id: NodeId::new(),
                }
            }

            /// Returns the payload.
            pub fn text(&self) -> &str {
                &self.text
            }

            /// Replaces the payload.
            pub fn set_text(&mut self, text: impl Into<String>) {
                self.text = text.into();
            }

            /// Returns the identity of this node, assigning one on first call.
            pub fn id(&self) -> u64 {
                self.id.get()
            }

            /// Returns the identity if it has already been assigned.
            pub fn peek_id(&self) -> Option<u64> {
                self.id.peek()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.text == other.text
            }
        }

        impl Eq for $name {}

        impl From<$name> for XmlContent {
            fn from(node: $name) -> Self {
                XmlContent::$variant(node)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut output = Vec::new();
                XmlPrinter::new(&mut output)
                    .$printer(self)
                    .map_err(|_| fmt::Error)?;
                f.write_str(&String::from_utf8_lossy(&output))
            }
        }
    };
}

leaf_node!(
    /// Character data. Written with `&`, `<`, `>`, `"` and `'` escaped.
    XmlText,
    Text,
    print_text
);

leaf_node!(
    /// A CDATA section. The payload is written verbatim.
    XmlCData,
    CData,
    print_cdata
);

leaf_node!(
    /// A comment (without the `<!--` and `-->` markers).
    XmlComment,
    Comment,
    print_comment
);
