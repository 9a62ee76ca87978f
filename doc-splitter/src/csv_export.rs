use std::io::Write;
use std::path::Path;

use article_model::ArticleRecord;
use csv::WriterBuilder;
use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use crate::config::SplitConfig;
use crate::error::{DocError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CsvEncoding {
    #[default]
    Utf8,
    /// UTF-8 with a byte order mark, which spreadsheet tools use to detect UTF-8.
    Utf8Bom,
    Windows1252,
}

impl CsvEncoding {
    pub const ALL: [CsvEncoding; 3] = [CsvEncoding::Utf8, CsvEncoding::Utf8Bom, CsvEncoding::Windows1252];

    pub fn label(self) -> &'static str {
        match self {
            CsvEncoding::Utf8 => "UTF-8",
            CsvEncoding::Utf8Bom => "UTF-8 (BOM)",
            CsvEncoding::Windows1252 => "Windows-1252",
        }
    }

    /// Encode UTF-8 CSV text into the target byte representation.
    pub fn encode(self, csv_utf8: &str) -> Result<Vec<u8>> {
        match self {
            CsvEncoding::Utf8 => Ok(csv_utf8.as_bytes().to_vec()),
            CsvEncoding::Utf8Bom => {
                let mut out = Vec::with_capacity(csv_utf8.len() + 3);
                out.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
                out.extend_from_slice(csv_utf8.as_bytes());
                Ok(out)
            }
            CsvEncoding::Windows1252 => {
                let (encoded, _, had_errors) = WINDOWS_1252.encode(csv_utf8);
                if had_errors {
                    return Err(DocError::Export(format!("output contains characters not representable in {}", self.label())));
                }
                Ok(encoded.into_owned())
            }
        }
    }
}

/// Write header (fields, body column, footer column) and one row per record.
pub fn write_csv<W: Write>(records: &[ArticleRecord], cfg: &SplitConfig, out: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer
        .write_record(cfg.columns())
        .map_err(|e| DocError::Export(format!("failed to write CSV header: {e}")))?;
    for rec in records {
        writer
            .write_record(rec.row(&cfg.fields))
            .map_err(|e| DocError::Export(format!("failed to write CSV row {}: {e}", rec.order + 1)))?;
    }
    writer
        .flush()
        .map_err(|e| DocError::Export(format!("failed to finalize CSV writer: {e}")))?;
    Ok(())
}

pub fn to_csv_string(records: &[ArticleRecord], cfg: &SplitConfig) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, cfg, &mut buffer)?;
    let (text, _, had_errors) = UTF_8.decode(&buffer);
    if had_errors {
        return Err(DocError::Export("invalid UTF-8 output".into()));
    }
    Ok(text.into_owned())
}

pub fn write_csv_file(path: &Path, records: &[ArticleRecord], cfg: &SplitConfig, encoding: CsvEncoding) -> Result<()> {
    let csv_utf8 = to_csv_string(records, cfg)?;
    let bytes = encoding.encode(&csv_utf8)?;
    std::fs::write(path, bytes).map_err(|e| DocError::Export(format!("failed to write `{}`: {e}", path.display())))?;
    tracing::info!(path = %path.display(), rows = records.len(), encoding = encoding.label(), "wrote CSV");
    Ok(())
}
