pub mod config;
pub mod csv_export;
pub mod error;
pub mod extract;
pub mod reader_docx;
pub mod reader_odt;
pub mod splitter;
mod xml_util;

use article_model::{ArticleRecord, DocumentInfo};
use chrono::{DateTime, Utc};
use sha2::Digest;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

pub use config::{OutputFormat, SplitConfig, SplitMode, SPLIT_DEFAULTS};
pub use error::{DocError, Result};
pub use extract::{DocFormat, ExtractOptions, ExtractedText};

/// Result bundle including file-level metadata, the extracted text and the articles.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub info: DocumentInfo,
    pub text: String,
    pub articles: Vec<ArticleRecord>,
}

/// Extract, split and describe the document at `path`.
pub fn process_path(path: &Path, cfg: &SplitConfig) -> Result<ProcessOutput> {
    cfg.validate()?;
    let extracted = extract::extract_path(path, &ExtractOptions::from_config(cfg))?;
    let mut out = finish(extracted, path.display().to_string(), file_name_of(path), cfg)?;
    enrich_file_info(&mut out.info, path);
    Ok(out)
}

/// Same as [`process_path`] for a document held in memory, e.g. an upload.
/// `name` supplies the extension used to pick the reader.
pub fn process_bytes(bytes: &[u8], name: &str, cfg: &SplitConfig) -> Result<ProcessOutput> {
    cfg.validate()?;
    let format = DocFormat::from_path(Path::new(name))?;
    let extracted = extract::extract_reader(Cursor::new(bytes), format, &ExtractOptions::from_config(cfg))?;
    let mut out = finish(extracted, name.to_string(), file_name_of(Path::new(name)), cfg)?;
    out.info.file_size_bytes = Some(bytes.len() as u64);
    out.info.content_sha256 = Some(hex::encode(sha2::Sha256::digest(bytes)));
    Ok(out)
}

fn finish(extracted: ExtractedText, uri: String, file_name: String, cfg: &SplitConfig) -> Result<ProcessOutput> {
    // ODT has no HTML rendering, so footer matching must follow what was produced.
    let effective;
    let cfg = if extracted.output_format != cfg.output_format {
        effective = SplitConfig { output_format: extracted.output_format, ..cfg.clone() };
        &effective
    } else {
        cfg
    };
    let articles = splitter::split(&extracted.text, cfg)?;

    let mut info = DocumentInfo::new(uri, extracted.format.mime());
    info.file_name = file_name;
    info.reader_backend = extracted.format.backend().into();
    info.paragraph_count = extracted.paragraph_count;
    info.table_count = extracted.table_count;
    info.article_count = articles.len();
    info.extracted_at = Utc::now().to_rfc3339();
    info.ingest_tool = Some("doc-splitter".into());
    info.ingest_tool_version = Some(env!("CARGO_PKG_VERSION").into());
    tracing::info!(file = %info.file_name, articles = articles.len(), "processed document");

    Ok(ProcessOutput { info, text: extracted.text, articles })
}

fn file_name_of(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

// --- Metadata enrichment helpers --------------------------------------------------------------

fn enrich_file_info(info: &mut DocumentInfo, path: &Path) {
    if let Ok(md) = std::fs::metadata(path) {
        info.file_size_bytes = Some(md.len());
        if let Ok(ct) = md.created() {
            info.created_at_meta = Some(system_time_to_rfc3339(ct));
        }
        if let Ok(mt) = md.modified() {
            info.updated_at_meta = Some(system_time_to_rfc3339(mt));
        }
    }
    if let Some(hex) = compute_sha256_hex(path) {
        info.content_sha256 = Some(hex);
    }
}

fn compute_sha256_hex(path: &Path) -> Option<String> {
    let f = File::open(path).ok()?;
    let mut reader = BufReader::new(f);
    let mut hasher = sha2::Sha256::new();
    let mut buf = [0u8; 32 * 1024];
    loop {
        let n = reader.read(&mut buf).ok()?;
        if n == 0 { break; }
        hasher.update(&buf[..n]);
    }
    Some(hex::encode(hasher.finalize()))
}

fn system_time_to_rfc3339(t: std::time::SystemTime) -> String {
    let dt: DateTime<Utc> = t.into();
    dt.to_rfc3339()
}
