//! pagetext - Extract reading-ordered text from page dumps
//!
//! Reads JSON page dumps (one page object or an array of them), runs the
//! layout pipeline over every page and writes plain text, JSON or the
//! detected tables.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use folio_core::{LayoutParams, PageInput, PageResult, PageText, extract_pages};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Output format.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Format {
    /// Page text, each page followed by a form feed (default)
    #[default]
    Text,
    /// Page text, marks and tables as JSON lines, one page per line
    Json,
    /// Detected tables only, cells separated by tabs
    Tables,
}

/// Extract reading-ordered text from page dumps.
#[derive(Parser, Debug)]
#[command(name = "pagetext")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more JSON page dump files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// JSON file with layout parameters; missing fields keep their defaults
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Keep hyphens at the end of wrapped lines
    #[arg(long = "no-hyphens", action = ArgAction::SetTrue)]
    no_hyphens: bool,

    /// Disable table detection
    #[arg(long = "no-tables", action = ArgAction::SetTrue)]
    no_tables: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: Format,

    /// Output file name ("-" for stdout)
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

fn init_logging(debug: bool) {
    let fallback = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn build_params(args: &Args) -> Result<LayoutParams> {
    let mut params = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => LayoutParams::default(),
    };
    if args.no_hyphens {
        params.do_hyphens = false;
    }
    if args.no_tables {
        params.detect_tables = false;
        params.use_ruled_tables = false;
    }
    params.validate().context("invalid layout parameters")?;
    Ok(params)
}

/// Loads every page in `path`. Pages without a number are numbered by
/// position in the file.
fn load_pages(path: &Path) -> Result<Vec<PageInput>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file) }?;
    let value: serde_json::Value =
        serde_json::from_slice(&mmap).with_context(|| format!("parsing {}", path.display()))?;
    let mut pages: Vec<PageInput> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    for (i, page) in pages.iter_mut().enumerate() {
        if page.page == 0 {
            page.page = i + 1;
        }
    }
    Ok(pages)
}

fn write_text<W: Write>(out: &mut W, page: &PageText) -> io::Result<()> {
    out.write_all(page.text.as_bytes())?;
    out.write_all(b"\n\x0c")
}

fn write_json<W: Write>(out: &mut W, page: &PageText) -> Result<()> {
    serde_json::to_writer(&mut *out, page)?;
    out.write_all(b"\n")?;
    Ok(())
}

fn write_tables<W: Write>(out: &mut W, page: &PageText) -> io::Result<()> {
    for (n, table) in page.tables.iter().enumerate() {
        writeln!(out, "# page {} table {} ({}x{})", page.page, n + 1, table.w, table.h)?;
        for row in &table.cells {
            let cells: Vec<String> = row.iter().map(|c| c.text.replace(['\t', '\n'], " ")).collect();
            writeln!(out, "{}", cells.join("\t"))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Runs one file and writes its pages. Returns the number of failed pages.
fn process_file<W: Write>(
    path: &Path,
    out: &mut W,
    params: &LayoutParams,
    format: Format,
) -> Result<usize> {
    let pages = load_pages(path)?;
    debug!(file = %path.display(), pages = pages.len(), "loaded");

    let mut failed = 0;
    for PageResult { page, result } in extract_pages(&pages, params) {
        match result {
            Ok(text) => match format {
                Format::Text => write_text(out, &text)?,
                Format::Json => write_json(out, &text)?,
                Format::Tables => write_tables(out, &text)?,
            },
            Err(err) => {
                error!(file = %path.display(), page, "{err}");
                failed += 1;
            }
        }
    }
    Ok(failed)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);
    let params = build_params(&args)?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("creating output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    let mut failed = 0;
    for path in &args.files {
        failed += process_file(path, &mut output, &params, args.format)
            .with_context(|| format!("processing {}", path.display()))?;
    }
    output.flush()?;

    if failed > 0 {
        bail!("{failed} page(s) failed");
    }
    Ok(())
}
