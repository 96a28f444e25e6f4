//! XML printer that outputs node trees.
//!
//! Compact output is exact: attributes in insertion order, childless elements
//! self-closed, nothing added between nodes. Parsing the output yields the
//! same tree.

use std::io::Write;

use quick_xml::escape::escape;

use crate::error::Result;
use crate::node::{XmlCData, XmlComment, XmlContent, XmlElement, XmlText};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Options for XML printing.
#[derive(Debug, Clone)]
pub struct XmlPrinterOptions {
    /// Put each child of element-only content on its own indented line.
    ///
    /// Elements that hold text or CDATA, and everything inside them, are
    /// still printed inline so character data is never altered.
    pub pretty_print: bool,
    /// Emit an XML declaration before the root element in
    /// [`XmlPrinter::print_document`].
    pub xml_declaration: bool,
    /// Spaces per nesting level when pretty printing.
    pub indent: usize,
}

impl Default for XmlPrinterOptions {
    fn default() -> Self {
        XmlPrinterOptions {
            pretty_print: false,
            xml_declaration: false,
            indent: 2,
        }
    }
}

/// XML printer that outputs node trees.
pub struct XmlPrinter<W: Write> {
    writer: W,
    options: XmlPrinterOptions,
    depth: usize,
    /// Set while printing inside mixed content.
    inline: bool,
}

impl<W: Write> XmlPrinter<W> {
    /// Creates a new XML printer.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, XmlPrinterOptions::default())
    }

    /// Creates a new XML printer with the given options.
    pub fn with_options(writer: W, options: XmlPrinterOptions) -> Self {
        XmlPrinter {
            writer,
            options,
            depth: 0,
            inline: false,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Prints a root element as a document, with the declaration if enabled.
    pub fn print_document(&mut self, root: &XmlElement) -> Result<()> {
        if self.options.xml_declaration {
            self.writer.write_all(XML_DECLARATION.as_bytes())?;
            if self.options.pretty_print {
                writeln!(self.writer)?;
            }
        }
        self.print_element(root)?;
        if self.options.pretty_print {
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Prints a node and its subtree.
    pub fn print(&mut self, content: &XmlContent) -> Result<()> {
        match content {
            XmlContent::Element(element) => self.print_element(element),
            XmlContent::Text(text) => self.print_text(text),
            XmlContent::CData(cdata) => self.print_cdata(cdata),
            XmlContent::Comment(comment) => self.print_comment(comment),
        }
    }

    /// Prints an element and its subtree.
    pub fn print_element(&mut self, element: &XmlElement) -> Result<()> {
        write!(self.writer, "<{}", element.name())?;
        for (name, value) in element.attributes() {
            write!(self.writer, " {name}")?;
            if let Some(value) = value {
                write!(self.writer, "=\"{}\"", escape(value.as_str()))?;
            }
        }

        if element.child_count() == 0 {
            self.writer.write_all(b"/>")?;
            return Ok(());
        }
        self.writer.write_all(b">")?;

        let mixed = element
            .children()
            .iter()
            .any(|c| c.is_text() || c.is_cdata());
        let layout = self.options.pretty_print && !self.inline && !mixed;
        let was_inline = self.inline;
        self.inline = self.inline || mixed;
        self.depth += 1;

        for child in element.children() {
            if layout {
                self.newline()?;
            }
            self.print(child)?;
        }

        self.depth -= 1;
        self.inline = was_inline;
        if layout {
            self.newline()?;
        }
        write!(self.writer, "</{}>", element.name())?;
        Ok(())
    }

    /// Prints escaped character data.
    pub fn print_text(&mut self, text: &XmlText) -> Result<()> {
        self.writer.write_all(escape(text.text()).as_bytes())?;
        Ok(())
    }

    /// Prints a CDATA section. An embedded `]]>` is split across two
    /// sections.
    pub fn print_cdata(&mut self, cdata: &XmlCData) -> Result<()> {
        let body = cdata.text().replace("]]>", "]]]]><![CDATA[>");
        write!(self.writer, "<![CDATA[{body}]]>")?;
        Ok(())
    }

    /// Prints a comment. The payload is not checked for `--`.
    pub fn print_comment(&mut self, comment: &XmlComment) -> Result<()> {
        write!(self.writer, "<!--{}-->", comment.text())?;
        Ok(())
    }

    fn newline(&mut self) -> Result<()> {
        let width = self.depth * self.options.indent;
        write!(self.writer, "\n{:width$}", "")?;
        Ok(())
    }
}

/// Prints an element tree to a string.
pub fn print_to_string(root: &XmlElement) -> Result<String> {
    print_to_string_with(root, XmlPrinterOptions::default())
}

/// Prints an element tree to a string with pretty printing.
pub fn print_to_string_pretty(root: &XmlElement) -> Result<String> {
    let options = XmlPrinterOptions {
        pretty_print: true,
        ..XmlPrinterOptions::default()
    };
    print_to_string_with(root, options)
}

/// Prints an element tree as a document using the given options.
pub fn print_to_string_with(root: &XmlElement, options: XmlPrinterOptions) -> Result<String> {
    let mut output = Vec::new();
    XmlPrinter::with_options(&mut output, options).print_document(root)?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
