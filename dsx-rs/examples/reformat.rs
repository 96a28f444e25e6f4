//! Example: Re-indent an XML document
//!
//! Parses a document and writes it back to stdout, pretty printed and with
//! an XML declaration. Character data is left untouched.
//!
//! Usage: cargo run --example reformat <input.xml>

use std::env;
use std::io;
use xml_dsx::{FnListener, XmlParser, XmlPrinter, XmlPrinterOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <input.xml>", args[0]);
        std::process::exit(1);
    }

    let input_file = &args[1];

    eprintln!("Parsing: {}", input_file);
    let mut elements = 0usize;
    let mut listener = FnListener(|_: &xml_dsx::XmlElement| elements += 1);
    let root = XmlParser::new().parse_file_with(input_file, &mut listener)?;
    eprintln!("Read {} elements", elements);

    let options = XmlPrinterOptions {
        pretty_print: true,
        xml_declaration: true,
        ..XmlPrinterOptions::default()
    };
    let mut printer = XmlPrinter::with_options(io::stdout().lock(), options);
    printer.print_document(&root)?;

    Ok(())
}
