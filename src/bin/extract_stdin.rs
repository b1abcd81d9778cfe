//! Read HTML from stdin and print the extracted content.
//!
//! Usage: `extract_stdin [FORMAT] [URL] < page.html`
//!
//! FORMAT is one of `txt`, `csv`, `json`, `xml`, `xmltei` (default `txt`).
//! Exits with status 1 when the document is discarded. Logging goes to
//! stderr and is configured through `RUST_LOG`.

use std::io::{self, Read};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use trafilatura_core::{extract_bytes, Options, OutputFormat};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let output_format = match args.next().map(|f| f.parse::<OutputFormat>()) {
        None => OutputFormat::Txt,
        Some(Ok(format)) => format,
        Some(Err(err)) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    let opts = Options {
        output_format,
        url: args.next(),
        ..Options::default()
    };

    let mut html = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut html) {
        eprintln!("failed to read from stdin: {err}");
        return ExitCode::FAILURE;
    }

    match extract_bytes(&html, &opts) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
