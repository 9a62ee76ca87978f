//! Shared models used across crates

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bump when the serialized shape of the records changes incompatibly.
pub const SCHEMA_MAJOR: u16 = 1;

/// One article split out of a document: metadata fields, body and optional footer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Stable order of the article within the source (0-based).
    pub order: u32,
    /// Metadata values keyed by field name. Every configured field is present.
    pub fields: BTreeMap<String, String>,
    /// Body text with all metadata lines removed.
    pub body: String,
    /// Text after the footer marker; `None` when the marker was not found.
    pub footer: Option<String>,
}

impl ArticleRecord {
    /// Create a record with every field in `field_names` set to an empty string.
    pub fn with_fields<S: AsRef<str>>(order: u32, field_names: &[S]) -> Self {
        let fields = field_names
            .iter()
            .map(|f| (f.as_ref().to_string(), String::new()))
            .collect();
        Self { order, fields, body: String::new(), footer: None }
    }

    /// Value of a metadata field, or `""` when unknown.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn footer_text(&self) -> &str {
        self.footer.as_deref().unwrap_or("")
    }

    pub fn has_footer(&self) -> bool {
        self.footer.as_deref().map(|f| !f.is_empty()).unwrap_or(false)
    }

    /// Tabular row: one value per field in `field_names` order, then body, then footer.
    pub fn row<'a, S: AsRef<str>>(&'a self, field_names: &[S]) -> Vec<&'a str> {
        let mut out: Vec<&str> = Vec::with_capacity(field_names.len() + 2);
        for f in field_names {
            out.push(self.field(f.as_ref()));
        }
        out.push(&self.body);
        out.push(self.footer_text());
        out
    }
}

/// File-level information collected while processing one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub schema_version: u16,
    /// URI or file path string for the source document.
    pub source_uri: String,
    pub file_name: String,
    /// MIME-like content type of the source.
    pub source_mime: String,
    /// Reader that produced the text ("docx", "odt").
    pub reader_backend: String,
    pub paragraph_count: usize,
    pub table_count: usize,
    pub article_count: usize,
    pub file_size_bytes: Option<u64>,
    pub content_sha256: Option<String>,
    /// RFC 3339 timestamp of the extraction.
    pub extracted_at: String,
    pub created_at_meta: Option<String>,
    pub updated_at_meta: Option<String>,
    pub ingest_tool: Option<String>,
    pub ingest_tool_version: Option<String>,
}

impl DocumentInfo {
    pub fn new(source_uri: impl Into<String>, source_mime: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_MAJOR,
            source_uri: source_uri.into(),
            source_mime: source_mime.into(),
            ..Default::default()
        }
    }
}
