//! The element node: a named container with attributes and children.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use indexmap::IndexMap;

use super::identity::{IdGenerator, NodeId};
use super::{XmlCData, XmlComment, XmlContent, XmlText};
use crate::error::{Error, Result};
use crate::xml::XmlPrinter;

/// Attribute map of an element. Iteration follows insertion order; a `None`
/// value is an attribute written without `="..."`.
pub type Attributes = IndexMap<String, Option<String>>;

/// An XML element with a name, ordered attributes and ordered children.
#[derive(Debug, Clone)]
pub struct XmlElement {
    name: String,
    attributes: Attributes,
    children: Vec<XmlContent>,
    pub(super) id: NodeId,
}

/// Checks that `name` is a non-empty run of non-whitespace characters.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}

impl XmlElement {
    /// Creates an element with no attributes and no children.
    ///
    /// Fails with [`Error::InvalidName`] if `name` is empty or contains
    /// whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(XmlElement {
            name,
            attributes: Attributes::new(),
            children: Vec::new(),
            id: NodeId::new(),
        })
    }

    /// Returns the element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the element. On failure the previous name is kept.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Returns the identity of this element, assigning one on first call.
    pub fn id(&self) -> u64 {
        self.id.get()
    }

    /// Returns the identity, drawing a new one from `generator` if none has
    /// been assigned yet.
    pub fn id_from(&self, generator: &IdGenerator) -> u64 {
        self.id.get_from(generator)
    }

    /// Returns the identity if it has already been assigned.
    pub fn peek_id(&self) -> Option<u64> {
        self.id.peek()
    }

    // Attributes

    /// Sets an attribute to a present value, replacing any previous value.
    /// A replaced attribute keeps its position.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.set_attribute_value(name, Some(value.into()))
    }

    /// Sets an attribute without a value; it is written as a bare name.
    pub fn set_attribute_absent(&mut self, name: impl Into<String>) -> &mut Self {
        self.set_attribute_value(name, None)
    }

    /// Sets an attribute to a present or absent value.
    pub fn set_attribute_value(
        &mut self,
        name: impl Into<String>,
        value: Option<String>,
    ) -> &mut Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Removes an attribute, keeping the order of the remaining ones.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Option<String>> {
        self.attributes.shift_remove(name)
    }

    /// Returns true if the attribute is set, with or without a value.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns the attribute value, or `None` if the attribute is unset or
    /// has no value. Use [`attribute`](Self::attribute) to tell those apart.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|v| v.as_deref())
    }

    /// Returns `None` if unset, `Some(None)` if set without a value and
    /// `Some(Some(value))` otherwise.
    pub fn attribute(&self, name: &str) -> Option<Option<&str>> {
        self.attributes.get(name).map(|v| v.as_deref())
    }

    /// Returns all attributes in insertion order.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    // Children

    /// Appends a node and returns a reference to it.
    pub fn add_child(&mut self, child: impl Into<XmlContent>) -> &mut XmlContent {
        let index = self.children.len();
        self.children.push(child.into());
        &mut self.children[index]
    }

    /// Appends a new empty element and returns it for further construction.
    pub fn add_element(&mut self, name: impl Into<String>) -> Result<&mut XmlElement> {
        let element = XmlElement::new(name)?;
        match self.add_child(element) {
            XmlContent::Element(e) => Ok(e),
            _ => unreachable!("add_child returns the node it was given"),
        }
    }

    /// Appends a text node.
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut XmlText {
        match self.add_child(XmlText::new(text)) {
            XmlContent::Text(t) => t,
            _ => unreachable!("add_child returns the node it was given"),
        }
    }

    /// Appends a CDATA section.
    pub fn add_cdata(&mut self, text: impl Into<String>) -> &mut XmlCData {
        match self.add_child(XmlCData::new(text)) {
            XmlContent::CData(c) => c,
            _ => unreachable!("add_child returns the node it was given"),
        }
    }

    /// Appends a comment.
    ///
    /// The payload is written as is. One containing `--` or ending in `-`
    /// only reads back with [`ParseOptions::check_comments`] turned off.
    ///
    /// [`ParseOptions::check_comments`]: crate::xml::ParseOptions::check_comments
    pub fn add_comment(&mut self, text: impl Into<String>) -> &mut XmlComment {
        match self.add_child(XmlComment::new(text)) {
            XmlContent::Comment(c) => c,
            _ => unreachable!("add_child returns the node it was given"),
        }
    }

    /// Returns the children in document order.
    pub fn children(&self) -> &[XmlContent] {
        &self.children
    }

    /// Returns the child list for in-place editing.
    pub fn children_mut(&mut self) -> &mut Vec<XmlContent> {
        &mut self.children
    }

    /// Returns the child at `index`.
    pub fn child(&self, index: usize) -> Option<&XmlContent> {
        self.children.get(index)
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterates over the element children, skipping other node kinds.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlContent::as_element)
    }

    /// Returns the first child element named `name`.
    pub fn get_element(&self, name: &str) -> Option<&XmlElement> {
        self.get_element_at(name, 0)
    }

    /// Returns the `index`-th (0-based) child element named `name`.
    pub fn get_element_at(&self, name: &str, index: usize) -> Option<&XmlElement> {
        self.elements().filter(|e| e.name == name).nth(index)
    }

    /// Returns the first child element named `name` for editing.
    pub fn get_element_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.get_element_at_mut(name, 0)
    }

    /// Returns the `index`-th (0-based) child element named `name` for
    /// editing.
    pub fn get_element_at_mut(&mut self, name: &str, index: usize) -> Option<&mut XmlElement> {
        self.children
            .iter_mut()
            .filter_map(XmlContent::as_element_mut)
            .filter(|e| e.name == name)
            .nth(index)
    }

    /// Returns every child element named `name`, in document order.
    pub fn get_elements(&self, name: &str) -> Vec<&XmlElement> {
        self.elements().filter(|e| e.name == name).collect()
    }

    /// Returns the serialized content of the first child element named
    /// `element_name`: the XML of each of its children, concatenated.
    ///
    /// Fails with [`Error::ElementNotFound`] if there is no such child.
    pub fn get_value(&self, element_name: &str) -> Result<String> {
        let element = self
            .get_element(element_name)
            .ok_or_else(|| Error::ElementNotFound(element_name.to_string()))?;

        let mut output = Vec::new();
        let mut printer = XmlPrinter::new(&mut output);
        for child in &element.children {
            printer.print(child)?;
        }
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    // Equality

    /// Two elements are equal if they have the same name, the same attribute
    /// names and the same value for every attribute. Children are not
    /// compared; see [`deep_equals`](Self::deep_equals).
    pub fn content_equals(&self, other: &XmlElement) -> bool {
        if self.name != other.name || self.attributes.len() != other.attributes.len() {
            return false;
        }
        self.attributes
            .iter()
            .all(|(key, value)| other.attributes.get(key) == Some(value))
    }

    /// Compares this element along with its children, recursively.
    ///
    /// Children are matched regardless of order, one to one: every child on
    /// the left must pair with a distinct, deep-equal child on the right.
    pub fn deep_equals(&self, other: &XmlElement) -> bool {
        if !self.content_equals(other) || self.children.len() != other.children.len() {
            return false;
        }

        // Greedy pairing is exact: deep equality is an equivalence relation.
        let mut used = vec![false; other.children.len()];
        self.children.iter().all(|left| {
            let found = other
                .children
                .iter()
                .zip(used.iter_mut())
                .find(|(right, taken)| !**taken && left.deep_equals(right));
            match found {
                Some((_, taken)) => {
                    *taken = true;
                    true
                }
                None => false,
            }
        })
    }

    // Output

    /// Writes this element and its subtree as XML.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        XmlPrinter::new(writer).print_element(self)
    }

    /// Serializes this element and its subtree to a string.
    pub fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut output = Vec::new();
        self.write_to(&mut output).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&output))
    }
}

impl Drop for XmlElement {
    // Iterative: stack use stays flat however deep the tree is.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let XmlContent::Element(mut element) = node {
                pending.append(&mut element.children);
            }
        }
    }
}

impl FromStr for XmlElement {
    type Err = Error;

    fn from_str(xml: &str) -> Result<Self> {
        crate::xml::parse_str(xml)
    }
}
