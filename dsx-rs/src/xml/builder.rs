//! Event-driven tree construction.
//!
//! [`TreeBuilder`] turns a flat stream of open/close/text/comment/CDATA
//! events into an element tree using a stack of open elements. An element is
//! attached to its parent when it closes, right after the
//! [`ContentListener`] has seen it.

use tracing::trace;

use crate::error::{Error, ReadCause, Result};
use crate::node::{XmlCData, XmlComment, XmlElement};

/// Observer notified as elements are completed during a parse.
///
/// The element passed to [`element_closed`](Self::element_closed) is fully
/// built and not yet attached to its parent.
#[allow(unused_variables)]
pub trait ContentListener {
    /// Called once for every element when its end tag is reached.
    fn element_closed(&mut self, element: &XmlElement) {}
}

/// A listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultListener;

impl ContentListener for DefaultListener {}

/// Adapts a closure into a [`ContentListener`].
pub struct FnListener<F>(pub F);

impl<F: FnMut(&XmlElement)> ContentListener for FnListener<F> {
    fn element_closed(&mut self, element: &XmlElement) {
        (self.0)(element)
    }
}

/// Stack-based reducer from parse events to an element tree.
pub struct TreeBuilder<'l, L: ContentListener + ?Sized> {
    stack: Vec<XmlElement>,
    root: Option<XmlElement>,
    listener: &'l mut L,
}

fn structure_error(message: impl Into<String>) -> Error {
    let message = message.into();
    Error::Read {
        message: format!("A parser problem occurred: {message}"),
        node: None,
        source: ReadCause::Structure(message),
    }
}

impl<'l, L: ContentListener + ?Sized> TreeBuilder<'l, L> {
    /// Creates a builder reporting completed elements to `listener`.
    pub fn new(listener: &'l mut L) -> Self {
        TreeBuilder {
            stack: Vec::new(),
            root: None,
            listener,
        }
    }

    /// Opens an element. Attributes are given in document order; `None`
    /// marks an attribute without a value.
    pub fn start_element<I>(&mut self, name: &str, attributes: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(structure_error(format!(
                "second root element <{name}> after the document element"
            )));
        }

        let mut element = XmlElement::new(name)
            .map_err(|_| structure_error(format!("invalid element name {name:?}")))?;
        for (key, value) in attributes {
            element.set_attribute_value(key, value);
        }
        trace!(name, depth = self.stack.len(), "open element");
        self.stack.push(element);
        Ok(())
    }

    /// Closes the innermost open element.
    pub fn end_element(&mut self) -> Result<()> {
        let element = self
            .stack
            .pop()
            .ok_or_else(|| structure_error("end tag without a matching start tag"))?;
        trace!(name = element.name(), depth = self.stack.len(), "close element");

        self.listener.element_closed(&element);

        match self.stack.last_mut() {
            Some(parent) => {
                parent.add_child(element);
            }
            None => self.root = Some(element),
        }
        Ok(())
    }

    /// Appends character data to the innermost open element.
    ///
    /// Whitespace outside the document element is ignored; any other text
    /// there is an error.
    pub fn characters(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(top) => {
                top.add_text(text);
                Ok(())
            }
            None if text.chars().all(char::is_whitespace) => Ok(()),
            None => Err(structure_error(format!(
                "text {text:?} outside the document element"
            ))),
        }
    }

    /// Appends a comment to the innermost open element. Comments outside the
    /// document element are dropped.
    pub fn comment(&mut self, text: &str) -> Result<()> {
        if let Some(top) = self.stack.last_mut() {
            top.add_child(XmlComment::new(text));
        }
        Ok(())
    }

    /// Appends a CDATA section to the innermost open element.
    pub fn cdata(&mut self, text: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(top) => {
                top.add_child(XmlCData::new(text));
                Ok(())
            }
            None => Err(structure_error("CDATA section outside the document element")),
        }
    }

    /// Returns the innermost element that is still open.
    pub fn peek_top(&self) -> Option<&XmlElement> {
        self.stack.last()
    }

    /// Returns the number of open elements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the completed root element.
    pub fn finish(self) -> Result<XmlElement> {
        if let Some(open) = self.stack.last() {
            return Err(structure_error(format!(
                "document ended inside <{}>",
                open.name()
            )));
        }
        self.root
            .ok_or_else(|| structure_error("document has no root element"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn attrs(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn test_builds_tree_from_events() {
        let mut listener = DefaultListener;
        let mut builder = TreeBuilder::new(&mut listener);
        builder.start_element("root", attrs(&[("a", Some("1"))])).unwrap();
        builder.start_element("child", Vec::new()).unwrap();
        builder.characters("text").unwrap();
        builder.end_element().unwrap();
        builder.comment("c").unwrap();
        builder.cdata("<raw>").unwrap();
        builder.end_element().unwrap();

        let root = builder.finish().unwrap();
        assert_eq!(
            root.to_xml(),
            r#"<root a="1"><child>text</child><!--c--><![CDATA[<raw>]]></root>"#
        );
    }

    #[test]
    fn test_character_events_are_not_merged() {
        let mut listener = DefaultListener;
        let mut builder = TreeBuilder::new(&mut listener);
        builder.start_element("a", Vec::new()).unwrap();
        builder.characters("one").unwrap();
        builder.characters("two").unwrap();
        builder.end_element().unwrap();

        let root = builder.finish().unwrap();
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn test_listener_sees_detached_elements_in_close_order() {
        let mut closed = Vec::new();
        let mut listener = FnListener(|e: &XmlElement| {
            closed.push((e.name().to_string(), e.child_count()));
        });
        let mut builder = TreeBuilder::new(&mut listener);
        builder.start_element("a", Vec::new()).unwrap();
        builder.start_element("b", Vec::new()).unwrap();
        builder.characters("x").unwrap();
        builder.end_element().unwrap();
        builder.start_element("c", Vec::new()).unwrap();
        builder.end_element().unwrap();
        builder.end_element().unwrap();
        builder.finish().unwrap();

        assert_eq!(
            closed,
            vec![
                ("b".to_string(), 1),
                ("c".to_string(), 0),
                ("a".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_peek_top_reports_innermost_open_element() {
        let mut listener = DefaultListener;
        let mut builder = TreeBuilder::new(&mut listener);
        assert!(builder.peek_top().is_none());

        builder.start_element("outer", Vec::new()).unwrap();
        builder.start_element("inner", Vec::new()).unwrap();
        builder.characters("partial").unwrap();

        assert_eq!(builder.depth(), 2);
        assert_eq!(builder.peek_top().unwrap().to_xml(), "<inner>partial</inner>");
        assert!(builder.finish().is_err());
    }

    #[test]
    fn test_structural_errors() {
        let mut listener = DefaultListener;
        let mut builder = TreeBuilder::new(&mut listener);
        assert!(builder.end_element().is_err());
        assert!(builder.characters("stray").is_err());
        assert!(builder.cdata("stray").is_err());
        builder.characters(" \n").unwrap();
        builder.comment("prolog").unwrap();

        builder.start_element("a", Vec::new()).unwrap();
        builder.end_element().unwrap();
        let err = builder.start_element("b", Vec::new()).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_invalid_name_is_structure_error() {
        let mut listener = DefaultListener;
        let mut builder = TreeBuilder::new(&mut listener);
        let err = builder.start_element("", Vec::new()).unwrap_err();
        assert!(err.is_malformed());
        assert!(matches!(
            err,
            Error::Read {
                source: ReadCause::Structure(_),
                ..
            }
        ));
    }

    #[test]
    fn test_missing_root() {
        let mut listener = DefaultListener;
        let builder = TreeBuilder::new(&mut listener);
        assert!(builder.finish().is_err());
    }

    #[test]
    fn test_bare_attribute_from_events() {
        let mut listener = DefaultListener;
        let mut builder = TreeBuilder::new(&mut listener);
        builder
            .start_element("a", attrs(&[("flag", None), ("k", Some(""))]))
            .unwrap();
        builder.end_element().unwrap();
        assert_eq!(builder.finish().unwrap().to_xml(), r#"<a flag k=""/>"#);
    }
}
