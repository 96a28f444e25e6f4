//! DSX - an in-memory XML document model
//!
//! This library keeps an XML document as a fully materialized tree of typed
//! nodes that can be built programmatically, parsed from text, compared
//! structurally and written back out.
//!
//! # Overview
//!
//! - [`XmlContent`] is the closed set of node kinds: elements, text, CDATA
//!   sections and comments.
//! - [`XmlElement`] is the only container. Attributes keep insertion order
//!   and may be present without a value; children keep document order.
//! - [`XmlParser`] drives quick-xml and rebuilds the tree through a
//!   [`TreeBuilder`], notifying a [`ContentListener`] as each element closes.
//! - [`XmlPrinter`] writes a tree as XML, escaping attribute values and text
//!   and self-closing childless elements.
//!
//! Element equality comes in two strengths: [`XmlElement::content_equals`]
//! looks at name and attributes only, [`XmlElement::deep_equals`] also
//! matches children one to one, in any order.
//!
//! # Example
//!
//! ```
//! use xml_dsx::{parse_str, XmlElement};
//!
//! let mut root = XmlElement::new("root")?;
//! root.set_attribute("a", "1");
//! root.add_element("child")?.add_text("text");
//! root.add_comment("c");
//!
//! let xml = root.to_xml();
//! assert_eq!(xml, r#"<root a="1"><child>text</child><!--c--></root>"#);
//! assert!(parse_str(&xml)?.deep_equals(&root));
//! # Ok::<(), xml_dsx::Error>(())
//! ```
//!
//! Parsing never touches anything outside the document: there is no
//! namespace processing, no validation and no DTD or external entity
//! loading.

pub mod error;
pub mod node;
pub mod xml;

// Re-export commonly used types
pub use error::{Error, ReadCause, Result};
pub use node::{
    Attributes, IdGenerator, NodeId, XmlCData, XmlComment, XmlContent, XmlElement, XmlText,
};
pub use xml::{
    parse_file, parse_reader, parse_str, print_to_string, print_to_string_pretty,
    print_to_string_with, ContentListener, DefaultListener, FnListener, ParseOptions, TreeBuilder,
    XmlParser, XmlPrinter, XmlPrinterOptions,
};
