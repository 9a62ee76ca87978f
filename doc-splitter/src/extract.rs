use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::config::{OutputFormat, SplitConfig};
use crate::error::{DocError, Result};
use crate::reader_docx::{self, DocxOptions};
use crate::reader_odt;

pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const ODT_MIME: &str = "application/vnd.oasis.opendocument.text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Docx,
    Odt,
}

impl DocFormat {
    /// Detect from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "docx" => Ok(DocFormat::Docx),
            "odt" => Ok(DocFormat::Odt),
            "" => Err(DocError::UnsupportedFormat("(no extension)".into())),
            other => Err(DocError::UnsupportedFormat(format!(".{}", other))),
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            DocFormat::Docx => DOCX_MIME,
            DocFormat::Odt => ODT_MIME,
        }
    }

    pub fn backend(self) -> &'static str {
        match self {
            DocFormat::Docx => "docx",
            DocFormat::Odt => "odt",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub output_format: OutputFormat,
    pub include_tables: bool,
    /// Line starts that must not be wrapped in `<p>` in HTML mode.
    pub raw_prefixes: Vec<String>,
}

impl ExtractOptions {
    pub fn from_config(cfg: &SplitConfig) -> Self {
        let mut raw_prefixes = vec![cfg.delimiter.clone()];
        raw_prefixes.extend(cfg.field_prefixes());
        if cfg.accept_unprefixed {
            raw_prefixes.extend(cfg.fields.iter().map(|f| format!("{}:", f)));
        }
        Self { output_format: cfg.output_format, include_tables: cfg.include_tables, raw_prefixes }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// All lines joined with `\n`.
    pub text: String,
    pub format: DocFormat,
    /// Format actually produced; ODT always yields text.
    pub output_format: OutputFormat,
    pub paragraph_count: usize,
    pub table_count: usize,
}

pub fn extract_path(path: &Path, opts: &ExtractOptions) -> Result<ExtractedText> {
    let format = DocFormat::from_path(path)?;
    if !path.exists() {
        return Err(DocError::NotFound(path.display().to_string()));
    }
    let file = File::open(path).map_err(DocError::read)?;
    extract_reader(BufReader::new(file), format, opts)
}

/// Extract from an in-memory or streamed document, e.g. an uploaded file.
pub fn extract_reader<R: Read + Seek>(source: R, format: DocFormat, opts: &ExtractOptions) -> Result<ExtractedText> {
    match format {
        DocFormat::Docx => {
            let dopts = DocxOptions {
                output_format: opts.output_format,
                include_tables: opts.include_tables,
                raw_prefixes: opts.raw_prefixes.clone(),
            };
            let c = reader_docx::read_docx(source, &dopts)?;
            Ok(ExtractedText {
                text: c.lines.join("\n"),
                format,
                output_format: opts.output_format,
                paragraph_count: c.paragraph_count,
                table_count: c.table_count,
            })
        }
        DocFormat::Odt => {
            if opts.output_format == OutputFormat::Html {
                tracing::warn!("HTML output is only available for .docx; reading .odt as text");
            }
            let c = reader_odt::read_odt(source)?;
            Ok(ExtractedText {
                text: c.lines.join("\n"),
                format,
                output_format: OutputFormat::Text,
                paragraph_count: c.paragraph_count,
                table_count: c.table_count,
            })
        }
    }
}
