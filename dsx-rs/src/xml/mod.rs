//! XML parsing and output.
//!
//! [`XmlParser`] reads documents through quick-xml and hands the events to a
//! [`TreeBuilder`]; [`XmlPrinter`] writes trees back out.

mod builder;
mod parser;
mod printer;

pub use builder::{ContentListener, DefaultListener, FnListener, TreeBuilder};
pub use parser::{parse_file, parse_reader, parse_str, ParseOptions, XmlParser};
pub use printer::{
    print_to_string, print_to_string_pretty, print_to_string_with, XmlPrinter, XmlPrinterOptions,
};
