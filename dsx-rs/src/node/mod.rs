//! Node structures for XML tree representation.
//!
//! A document is a tree of [`XmlContent`] values. [`XmlElement`] is the only
//! container; it owns its attributes and children exclusively, and there are
//! no references from a child back to its parent.
//!
//! Every node carries a lazily assigned identity (see [`IdGenerator`]) that
//! plays no part in equality.

mod element;
mod identity;
mod xml_content;

pub use element::{Attributes, XmlElement};
pub use identity::{IdGenerator, NodeId};
pub use xml_content::{XmlCData, XmlComment, XmlContent, XmlText};
