//! Error types for the XML document model.

use thiserror::Error;

/// Result type alias for document model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, reading or writing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a document failed.
    ///
    /// `node` holds the serialized innermost element that was still open
    /// when reading stopped, if any.
    #[error("{message}{}", snapshot_suffix(.node))]
    Read {
        /// Human-readable description of the failure.
        message: String,
        /// Snapshot of the deepest open element at the point of failure.
        node: Option<String>,
        /// The underlying cause.
        #[source]
        source: ReadCause,
    },

    /// An element name contained whitespace.
    #[error("The element's name can't contain white spaces: {0:?}")]
    InvalidName(String),

    /// A named child element was required but not present.
    #[error("No child element named {0:?}")]
    ElementNotFound(String),

    /// Writing to the output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if this error reports ill-formed markup or document structure.
    pub fn is_malformed(&self) -> bool {
        match self {
            Error::Read { source, .. } => match source {
                ReadCause::Xml(quick_xml::Error::Io(_)) => false,
                ReadCause::Xml(_) | ReadCause::Structure(_) => true,
                ReadCause::Io(_) | ReadCause::Config(_) => false,
            },
            _ => false,
        }
    }

    /// Returns true if this error was caused by a failing source or sink.
    pub fn is_io(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Read { source, .. } => matches!(
                source,
                ReadCause::Io(_) | ReadCause::Xml(quick_xml::Error::Io(_))
            ),
            _ => false,
        }
    }

    /// Returns the diagnostic snapshot attached to a read error.
    pub fn node_snapshot(&self) -> Option<&str> {
        match self {
            Error::Read { node, .. } => node.as_deref(),
            _ => None,
        }
    }
}

fn snapshot_suffix(node: &Option<String>) -> String {
    match node {
        Some(node) => format!(", node = {node}"),
        None => String::new(),
    }
}

/// The underlying cause of a [`Error::Read`].
#[derive(Error, Debug)]
pub enum ReadCause {
    /// Error reported by the quick-xml tokenizer.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// The source could not be opened or read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Well-formed tokens in an impossible order (unbalanced tags, content
    /// outside the root element, more than one root).
    #[error("{0}")]
    Structure(String),

    /// The reader could not be set up.
    #[error("{0}")]
    Config(String),
}
