//! Command-line front end for hwptext.
//!
//! # Usage
//!
//! ```bash
//! # Print one document
//! hwptext report.hwp
//!
//! # Write to a file with box-drawn tables
//! hwptext report.hwpx --table-style boxed -o report.txt
//!
//! # Convert many documents in parallel
//! hwptext *.hwp --output-dir ./text/
//! ```

use clap::Parser;
use hwptext::batch::{BatchItem, convert_paths};
use hwptext::ole::HwpMetadata;
use hwptext::{ConvertOptions, FormatKind, TableStyle, TextOptions};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Convert HWP and HWPX documents to plain text
#[derive(Parser, Debug)]
#[command(name = "hwptext")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input documents
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (single input only)
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Directory for `<name>.txt` outputs
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Input format (hwp or hwpx); by default taken from the extension
    #[arg(long)]
    format: Option<FormatKind>,

    /// Table layout (delimited or boxed)
    #[arg(long, default_value = "delimited")]
    table_style: TableStyle,

    /// Include footnotes and endnotes
    #[arg(long)]
    include_notes: bool,

    /// Include page headers and footers
    #[arg(long)]
    include_headers: bool,

    /// Include hidden comments
    #[arg(long)]
    include_comments: bool,

    /// Fail on broken record nesting instead of repairing it
    #[arg(long)]
    strict: bool,

    /// Print summary metadata before the text (HWP only)
    #[arg(long)]
    metadata: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .with_text(
                TextOptions::new()
                    .with_table_style(self.table_style)
                    .with_notes(self.include_notes)
                    .with_headers_footers(self.include_headers)
                    .with_comments(self.include_comments),
            )
            .with_strict_structure(self.strict)
            .with_metadata(self.metadata)
    }
}

fn metadata_block(meta: &HwpMetadata) -> String {
    let mut block = String::new();
    for (key, value) in meta.fields() {
        block.push_str(&format!("{}: {}\n", key, value));
    }
    block.push('\n');
    block
}

fn render(item: &BatchItem, text: &str) -> String {
    let mut out = item.metadata.as_ref().map(metadata_block).unwrap_or_default();
    out.push_str(text);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn output_path(dir: &Path, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    dir.join(stem).with_extension("txt")
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    if args.output.is_some() && args.inputs.len() > 1 {
        eprintln!("error: --output takes a single input; use --output-dir");
        return ExitCode::FAILURE;
    }
    if let Some(dir) = &args.output_dir
        && let Err(err) = fs::create_dir_all(dir)
    {
        eprintln!("error: {}: {}", dir.display(), err);
        return ExitCode::FAILURE;
    }

    let options = args.convert_options();
    let items = convert_paths(&args.inputs, args.format, &options);
    let several = items.len() > 1;
    let mut failed = false;
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    for item in &items {
        let text = match &item.result {
            Ok(text) => render(item, text),
            Err(err) => {
                eprintln!("error: {}: {}", item.path.display(), err);
                failed = true;
                continue;
            },
        };

        let written = if let Some(path) = &args.output {
            fs::write(path, text)
        } else if let Some(dir) = &args.output_dir {
            fs::write(output_path(dir, &item.path), text)
        } else if several {
            write!(stdout, "==> {} <==\n{}\n", item.path.display(), text)
        } else {
            stdout.write_all(text.as_bytes())
        };

        if let Err(err) = written {
            eprintln!("error: {}: {}", item.path.display(), err);
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "hwptext",
            "a.hwp",
            "b.hwpx",
            "--output-dir",
            "out",
            "--table-style",
            "boxed",
            "--include-notes",
            "--format",
            "hwpx",
        ])
        .unwrap();
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.format, Some(FormatKind::Hwpx));
        let options = args.convert_options();
        assert_eq!(options.text.table_style, TableStyle::Boxed);
        assert!(options.text.include_notes);
        assert!(!options.strict_structure);
    }

    #[test]
    fn test_output_conflicts_with_output_dir() {
        assert!(Args::try_parse_from(["hwptext", "a.hwp", "-o", "a.txt", "--output-dir", "d"]).is_err());
        assert!(Args::try_parse_from(["hwptext"]).is_err());
        assert!(Args::try_parse_from(["hwptext", "a.hwp", "--table-style", "html"]).is_err());
    }

    #[test]
    fn test_metadata_block_precedes_text() {
        let options = Args::try_parse_from(["hwptext", "a.hwp", "--metadata"])
            .unwrap()
            .convert_options();
        assert!(options.include_metadata);

        let mut item = BatchItem {
            path: PathBuf::from("a.hwp"),
            format: Some(FormatKind::Hwp),
            result: Ok("body".to_string()),
            metadata: None,
        };
        assert_eq!(render(&item, "body"), "body\n");

        item.metadata = Some(HwpMetadata {
            title: Some("제목".to_string()),
            ..HwpMetadata::default()
        });
        assert_eq!(render(&item, "body"), "Title: 제목\n\nbody\n");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("docs/보고서.hwp")),
            Path::new("out").join("보고서.txt")
        );
    }
}
