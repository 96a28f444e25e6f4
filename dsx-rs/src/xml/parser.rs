//! XML parser that builds element trees.
//!
//! The parser drives quick-xml's streaming [`Reader`] and feeds the events
//! to a [`TreeBuilder`]. It is deliberately inert towards anything outside
//! the document:
//!
//! - names are taken verbatim; prefixes are not resolved against namespace
//!   declarations (a plain `Reader`, never an `NsReader`, is used),
//! - nothing is validated against a schema or DTD,
//! - `<!DOCTYPE ...>` is skipped, so no external subset, parameter entity or
//!   external entity is ever loaded. References to entities other than the
//!   five predefined ones fail as malformed input.

use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, instrument, trace};

use super::builder::{ContentListener, DefaultListener, TreeBuilder};
use crate::error::{Error, ReadCause, Result};
use crate::node::XmlElement;

/// Options for XML parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Trim leading and trailing whitespace from every text run and drop
    /// runs that are only whitespace.
    pub trim_text: bool,
    /// Reject comments containing `--`.
    pub check_comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            trim_text: false,
            check_comments: true,
        }
    }
}

/// XML parser that builds element trees.
#[derive(Debug, Clone, Default)]
pub struct XmlParser {
    options: ParseOptions,
}

impl XmlParser {
    /// Creates a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    pub fn with_options(options: ParseOptions) -> Self {
        XmlParser { options }
    }

    /// Returns the options in effect.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<XmlElement> {
        self.parse_str_with(xml, &mut DefaultListener)
    }

    /// Parses XML from a string, reporting each completed element to
    /// `listener`.
    #[instrument(level = "debug", skip_all, fields(len = xml.len()))]
    pub fn parse_str_with<L>(&self, xml: &str, listener: &mut L) -> Result<XmlElement>
    where
        L: ContentListener + ?Sized,
    {
        self.parse(Reader::from_str(xml), listener)
    }

    /// Parses XML from a buffered reader.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<XmlElement> {
        self.parse_reader_with(reader, &mut DefaultListener)
    }

    /// Parses XML from a buffered reader, reporting each completed element
    /// to `listener`.
    #[instrument(level = "debug", skip_all)]
    pub fn parse_reader_with<R, L>(&self, reader: R, listener: &mut L) -> Result<XmlElement>
    where
        R: BufRead,
        L: ContentListener + ?Sized,
    {
        self.parse(Reader::from_reader(reader), listener)
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<XmlElement> {
        self.parse_file_with(path, &mut DefaultListener)
    }

    /// Parses XML from a file, reporting each completed element to
    /// `listener`.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn parse_file_with<P, L>(&self, path: P, listener: &mut L) -> Result<XmlElement>
    where
        P: AsRef<Path>,
        L: ContentListener + ?Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Read {
            message: format!("Invalid file {}", path.display()),
            node: None,
            source: ReadCause::Io(e),
        })?;
        self.parse(Reader::from_reader(BufReader::new(file)), listener)
    }

    fn parse<R, L>(&self, mut reader: Reader<R>, listener: &mut L) -> Result<XmlElement>
    where
        R: BufRead,
        L: ContentListener + ?Sized,
    {
        let config = reader.config_mut();
        config.check_end_names = true;
        config.check_comments = self.options.check_comments;
        config.trim_text(false);

        let mut builder = TreeBuilder::new(listener);
        let outcome = self.read_events(&mut reader, &mut builder);
        let snapshot = builder.peek_top().map(XmlElement::to_xml);
        let result = outcome.and_then(|()| builder.finish());

        match result {
            Ok(root) => {
                debug!(root = root.name(), "parse complete");
                Ok(root)
            }
            Err(err) => {
                let err = attach_snapshot(err, snapshot);
                debug!(error = %err, "parse failed");
                Err(err)
            }
        }
    }

    fn read_events<R, L>(
        &self,
        reader: &mut Reader<R>,
        builder: &mut TreeBuilder<'_, L>,
    ) -> Result<()>
    where
        R: BufRead,
        L: ContentListener + ?Sized,
    {
        let mut buf = Vec::new();
        // Text and entity references of one character run, joined.
        let mut pending = String::new();

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(err) => {
                    // Keep the text read so far in the diagnostic snapshot.
                    self.flush_text(&mut pending, builder).ok();
                    return Err(xml_error(err, reader.error_position()));
                }
            };

            match event {
                Event::Text(e) => {
                    let raw = check(reader, reader.decoder().decode(&e))?;
                    pending.push_str(&check(reader, unescape(&raw))?);
                }
                Event::GeneralRef(e) => {
                    let resolved = check(reader, reader.decoder().decode(&e)).and_then(|name| {
                        let reference = format!("&{name};");
                        check(reader, unescape(&reference)).map(Cow::into_owned)
                    });
                    match resolved {
                        Ok(text) => pending.push_str(&text),
                        Err(err) => {
                            self.flush_text(&mut pending, builder).ok();
                            return Err(err);
                        }
                    }
                }
                Event::Start(e) => {
                    self.flush_text(&mut pending, builder)?;
                    let (name, attributes) = check(reader, read_start(reader, &e))?;
                    builder.start_element(&name, attributes)?;
                }
                // `<a/>` arrives as one event and is opened and closed here.
                Event::Empty(e) => {
                    self.flush_text(&mut pending, builder)?;
                    let (name, attributes) = check(reader, read_start(reader, &e))?;
                    builder.start_element(&name, attributes)?;
                    builder.end_element()?;
                }
                Event::End(_) => {
                    self.flush_text(&mut pending, builder)?;
                    builder.end_element()?;
                }
                Event::CData(e) => {
                    self.flush_text(&mut pending, builder)?;
                    let text = check(reader, reader.decoder().decode(&e))?;
                    builder.cdata(&text)?;
                }
                Event::Comment(e) => {
                    self.flush_text(&mut pending, builder)?;
                    let text = check(reader, reader.decoder().decode(&e))?;
                    builder.comment(&text)?;
                }
                Event::Decl(e) => {
                    self.flush_text(&mut pending, builder)?;
                    if let Some(label) = e.encoding() {
                        check_encoding(&check(reader, label)?)?;
                    }
                }
                Event::PI(_) => {
                    self.flush_text(&mut pending, builder)?;
                }
                Event::DocType(_) => {
                    trace!("skipping document type declaration");
                }
                Event::Eof => {
                    self.flush_text(&mut pending, builder)?;
                    break;
                }
            }
            buf.clear();
        }

        Ok(())
    }

    fn flush_text<L>(&self, pending: &mut String, builder: &mut TreeBuilder<'_, L>) -> Result<()>
    where
        L: ContentListener + ?Sized,
    {
        if pending.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(pending);
        if !self.options.trim_text {
            return builder.characters(&text);
        }
        match text.trim() {
            "" => Ok(()),
            trimmed => builder.characters(trimmed),
        }
    }
}

type Start = (String, Vec<(String, Option<String>)>);

/// Decodes an element's name and attributes.
fn read_start<R>(
    reader: &Reader<R>,
    start: &BytesStart<'_>,
) -> std::result::Result<Start, quick_xml::Error> {
    let name = reader.decoder().decode(start.name().as_ref())?.into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, Some(value)));
    }
    Ok((name, attributes))
}

/// Converts a tokenizer-level failure into a read error at the reader's
/// current position.
fn check<T, E, R>(reader: &Reader<R>, result: std::result::Result<T, E>) -> Result<T>
where
    E: Into<quick_xml::Error>,
{
    result.map_err(|e| xml_error(e.into(), reader.buffer_position()))
}

fn xml_error(err: quick_xml::Error, position: impl fmt::Display) -> Error {
    let message = match err {
        quick_xml::Error::Io(_) => "A reader problem occurred".to_string(),
        _ => format!("A parser problem occurred at position {position}"),
    };
    Error::Read {
        message,
        node: None,
        source: ReadCause::Xml(err),
    }
}

/// Input is always decoded as UTF-8; a declaration naming anything else
/// cannot be honoured.
fn check_encoding(label: &[u8]) -> Result<()> {
    const SUPPORTED: [&[u8]; 4] = [b"utf-8", b"utf8", b"us-ascii", b"ascii"];
    if SUPPORTED.iter().any(|s| label.eq_ignore_ascii_case(s)) {
        return Ok(());
    }
    let label = String::from_utf8_lossy(label);
    Err(Error::Read {
        message: format!("A configuration problem occurred: unsupported encoding {label}"),
        node: None,
        source: ReadCause::Config(format!("unsupported encoding {label}")),
    })
}

fn attach_snapshot(err: Error, snapshot: Option<String>) -> Error {
    match err {
        Error::Read {
            message,
            node: None,
            source,
        } => Error::Read {
            message,
            node: snapshot,
            source,
        },
        other => other,
    }
}

/// Parses XML from a file with default options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<XmlElement> {
    XmlParser::new().parse_file(path)
}

/// Parses XML from a string with default options.
pub fn parse_str(xml: &str) -> Result<XmlElement> {
    XmlParser::new().parse_str(xml)
}

/// Parses XML from a buffered reader with default options.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<XmlElement> {
    XmlParser::new().parse_reader(reader)
}
