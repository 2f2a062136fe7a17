/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Streams the records of an XML document to stdout as JSON.
 */

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xml_records::{FieldRecord, FieldsAccumulator, RecordsBuilder, TextMode};

#[derive(Parser, Debug)]
#[command(name = "xmlrec")]
#[command(version)]
#[command(about = "Extract repeated records from an XML document as JSON", long_about = None)]
struct Args {
    /// XML document to read
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Element path of the record roots, e.g. rss/channel/item
    #[arg(short, long)]
    path: String,

    /// Separator between element names in the path
    #[arg(long, default_value_t = '/')]
    separator: char,

    /// Keep whitespace around text content
    #[arg(long)]
    preserve_whitespace: bool,

    /// Stop after N records
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Skip records without this field (repeatable)
    #[arg(short, long, value_name = "FIELD")]
    require: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Jsonl)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One JSON object per line
    Jsonl,
    /// A single JSON array
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xmlrec=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let text_mode = if args.preserve_whitespace {
        TextMode::Preserved
    } else {
        TextMode::Trimmed
    };

    let mut records = RecordsBuilder::new()
        .from_file(&args.input)
        .path(args.path.as_str())
        .separator(args.separator)
        .text_mode(text_mode)
        .accumulator(FieldsAccumulator::with_required(args.require.clone()))
        .build()
        .context("Invalid extraction settings")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let limit = args.limit.unwrap_or(usize::MAX);

    let count = write_records(records.by_ref().take(limit), args.format, &mut out)
        .with_context(|| format!("Failed to extract records from {:?}", args.input))?;
    out.flush().context("Failed to write output")?;

    tracing::info!(
        records = count,
        skipped = records.skipped(),
        "extraction finished"
    );
    records.close();
    Ok(())
}

/// Write every record in `format`, returning how many were written.
fn write_records<I>(records: I, format: Format, out: &mut impl Write) -> Result<usize>
where
    I: Iterator<Item = xml_records::Result<FieldRecord>>,
{
    let mut count = 0;
    if format == Format::Json {
        out.write_all(b"[")?;
    }

    for record in records {
        let record = record?;
        match format {
            Format::Jsonl => {
                serde_json::to_writer(&mut *out, &record)?;
                out.write_all(b"\n")?;
            }
            Format::Json => {
                if count > 0 {
                    out.write_all(b",")?;
                }
                out.write_all(b"\n  ")?;
                serde_json::to_writer(&mut *out, &record)?;
            }
        }
        count += 1;
    }

    if format == Format::Json {
        if count > 0 {
            out.write_all(b"\n")?;
        }
        out.write_all(b"]\n")?;
    }
    Ok(count)
}
