//! Command-line front end: split a .docx/.odt document into articles and print or export them.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use article_model::{ArticleRecord, DocumentInfo};
use clap::{Parser, ValueEnum};
use doc_splitter::config::{load_profile, save_profile, OutputFormat, SplitConfig, SplitMode};
use doc_splitter::csv_export::{to_csv_string, write_csv_file, CsvEncoding};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Delimiter,
    BlankLines,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Html,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EncodingArg {
    Utf8,
    Utf8Bom,
    Windows1252,
}

impl From<EncodingArg> for CsvEncoding {
    fn from(e: EncodingArg) -> Self {
        match e {
            EncodingArg::Utf8 => CsvEncoding::Utf8,
            EncodingArg::Utf8Bom => CsvEncoding::Utf8Bom,
            EncodingArg::Windows1252 => CsvEncoding::Windows1252,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "article-split", version, about = "Split .docx/.odt documents into articles and export them as CSV")]
struct Cli {
    /// Document to process (.docx or .odt)
    file: PathBuf,

    /// Splitting convention
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Body rendering (HTML keeps bold/italic/underline/links; .docx only)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Literal text that starts each article
    #[arg(long)]
    delimiter: Option<String>,

    /// Comma-separated metadata fields, e.g. "#Titulo, #Autor"
    #[arg(long)]
    fields: Option<String>,

    /// Marker that starts the footer inside an article body
    #[arg(long, conflicts_with = "no_footer")]
    footer_marker: Option<String>,

    /// Do not split off a footer
    #[arg(long)]
    no_footer: bool,

    /// JSON profile with the splitting settings; flags override it
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Write the effective settings to this JSON profile
    #[arg(long)]
    save_profile: Option<PathBuf>,

    /// Append table cell text after the body paragraphs (.docx)
    #[arg(long)]
    include_tables: bool,

    /// Keep text before the first delimiter as an article
    #[arg(long)]
    keep_preamble: bool,

    /// Also accept metadata lines without the tag prefix ("Titulo: ...")
    #[arg(long)]
    accept_unprefixed: bool,

    /// Blank lines between articles in blank-lines mode
    #[arg(long)]
    min_blank_lines: Option<usize>,

    /// Write the records as CSV to this file ("-" for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Character encoding of the CSV file
    #[arg(long, value_enum, default_value = "utf8")]
    encoding: EncodingArg,

    /// Print document info and records as JSON
    #[arg(long, conflicts_with = "print_text")]
    json: bool,

    /// Print the extracted text only
    #[arg(long)]
    print_text: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    info: &'a DocumentInfo,
    columns: Vec<String>,
    articles: &'a [ArticleRecord],
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    // Logs go to stderr so stdout stays usable for CSV/JSON.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn build_config(cli: &Cli) -> Result<SplitConfig> {
    let mut cfg = match &cli.profile {
        Some(p) => load_profile(p)?,
        None => SplitConfig::default(),
    };
    if let Some(m) = cli.mode {
        cfg.mode = match m {
            ModeArg::Delimiter => SplitMode::Delimiter,
            ModeArg::BlankLines => SplitMode::BlankLines,
        };
    }
    if let Some(f) = cli.format {
        cfg.output_format = match f {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Html => OutputFormat::Html,
        };
    }
    if let Some(d) = &cli.delimiter {
        cfg.delimiter = d.clone();
    }
    if let Some(list) = &cli.fields {
        cfg.set_fields_from_list(list);
    }
    if let Some(m) = &cli.footer_marker {
        cfg.footer_marker = Some(m.clone());
    }
    if cli.no_footer {
        cfg.footer_marker = None;
    }
    if let Some(n) = cli.min_blank_lines {
        cfg.blank.min_blank_lines = n;
    }
    cfg.include_tables |= cli.include_tables;
    cfg.keep_preamble |= cli.keep_preamble;
    cfg.accept_unprefixed |= cli.accept_unprefixed;
    cfg.validate()?;
    Ok(cfg)
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = build_config(cli)?;
    tracing::debug!(?cfg, "effective split settings");
    if let Some(p) = &cli.save_profile {
        save_profile(p, &cfg)?;
    }

    let out = doc_splitter::process_path(&cli.file, &cfg)
        .with_context(|| format!("failed to process `{}`", cli.file.display()))?;

    let stdout = std::io::stdout();
    let mut w = stdout.lock();

    if cli.print_text {
        writeln!(w, "{}", out.text)?;
        return Ok(());
    }

    match cli.csv.as_deref() {
        Some(p) if p == Path::new("-") => {
            let encoding: CsvEncoding = cli.encoding.into();
            w.write_all(&encoding.encode(&to_csv_string(&out.articles, &cfg)?)?)?;
        }
        Some(p) => {
            write_csv_file(p, &out.articles, &cfg, cli.encoding.into())?;
            eprintln!("wrote {} articles to {}", out.articles.len(), p.display());
        }
        None => {}
    }

    if cli.json {
        let report = JsonReport { info: &out.info, columns: cfg.columns(), articles: &out.articles };
        serde_json::to_writer_pretty(&mut w, &report)?;
        writeln!(w)?;
    } else if cli.csv.is_none() {
        print_articles(&mut w, &out.info, &out.articles, &cfg)?;
    }
    Ok(())
}

fn print_articles<W: Write>(w: &mut W, info: &DocumentInfo, articles: &[ArticleRecord], cfg: &SplitConfig) -> Result<()> {
    writeln!(w, "Found {} articles in {}", articles.len(), info.file_name)?;
    for (i, a) in articles.iter().enumerate() {
        writeln!(w, "----- Article {} -----", i + 1)?;
        for f in &cfg.fields {
            let v = a.field(f);
            if !v.is_empty() {
                writeln!(w, "{}: {}", f, v)?;
            }
        }
        writeln!(w, "{}:", cfg.body_column)?;
        writeln!(w, "{}", a.body)?;
        if a.has_footer() {
            writeln!(w, "{}:", cfg.footer_column)?;
            writeln!(w, "{}", a.footer_text())?;
        }
    }
    Ok(())
}
