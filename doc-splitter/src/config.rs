use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocError, Result};

/// Default article conventions shared by the library, the CLI and the viewer.
#[derive(Debug, Clone, Copy)]
pub struct SplitDefaults {
    pub delimiter: &'static str,
    pub tag_prefix: &'static str,
    pub fields: &'static [&'static str],
    pub footer_marker: &'static str,
    pub footer_column: &'static str,
    pub body_column: &'static str,
    pub min_blank_lines: usize,
    pub title_blank_lines: usize,
    pub csv_file_name: &'static str,
}

pub const SPLIT_DEFAULTS: SplitDefaults = SplitDefaults {
    delimiter: "==Artigo_inicio==",
    tag_prefix: "#",
    fields: &["Titulo", "SubTitulo", "Autor", "Data", "Tag", "Pag", "Numero", "Imagens"],
    footer_marker: "#Rodape:",
    footer_column: "Rodape",
    body_column: "BODY",
    min_blank_lines: 3,
    title_blank_lines: 2,
    csv_file_name: "articles.csv",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitMode {
    /// Articles start at an explicit delimiter line and carry tagged metadata lines.
    #[default]
    Delimiter,
    /// Articles are separated by runs of blank lines; no metadata tags.
    BlankLines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    /// DOCX runs rendered with inline HTML (bold, italic, underline, links).
    Html,
}

impl OutputFormat {
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Text => "Text",
            OutputFormat::Html => "HTML",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlankLineConfig {
    /// Blank lines that separate two articles.
    pub min_blank_lines: usize,
    /// Blank lines that separate an article's title from its body.
    pub title_blank_lines: usize,
}

impl Default for BlankLineConfig {
    fn default() -> Self {
        Self {
            min_blank_lines: SPLIT_DEFAULTS.min_blank_lines,
            title_blank_lines: SPLIT_DEFAULTS.title_blank_lines,
        }
    }
}

/// Complete splitting profile. Serialized as JSON for load/save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub mode: SplitMode,
    pub output_format: OutputFormat,
    pub delimiter: String,
    /// Prefix in front of a field name on a metadata line (`#Titulo: ...`).
    pub tag_prefix: String,
    /// Field names without the prefix, in column order.
    pub fields: Vec<String>,
    /// Also treat `Titulo: ...` (no prefix) as a metadata line.
    pub accept_unprefixed: bool,
    pub footer_marker: Option<String>,
    pub footer_column: String,
    pub body_column: String,
    /// Keep the text before the first delimiter as an article.
    pub keep_preamble: bool,
    pub include_tables: bool,
    pub blank: BlankLineConfig,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            mode: SplitMode::default(),
            output_format: OutputFormat::default(),
            delimiter: SPLIT_DEFAULTS.delimiter.into(),
            tag_prefix: SPLIT_DEFAULTS.tag_prefix.into(),
            fields: SPLIT_DEFAULTS.fields.iter().map(|f| f.to_string()).collect(),
            accept_unprefixed: false,
            footer_marker: Some(SPLIT_DEFAULTS.footer_marker.into()),
            footer_column: SPLIT_DEFAULTS.footer_column.into(),
            body_column: SPLIT_DEFAULTS.body_column.into(),
            keep_preamble: false,
            include_tables: false,
            blank: BlankLineConfig::default(),
        }
    }
}

impl SplitConfig {
    /// Metadata line prefixes as they appear in the text, e.g. `#Titulo:`.
    pub fn field_prefixes(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| format!("{}{}:", self.tag_prefix, f))
            .collect()
    }

    /// Footer marker as it appears in the extracted text for the current output format.
    pub fn effective_footer_marker(&self) -> Option<String> {
        let marker = self.footer_marker.as_deref().filter(|m| !m.is_empty())?;
        Some(match self.output_format {
            OutputFormat::Text => marker.to_string(),
            OutputFormat::Html => format!("<p>{}", marker),
        })
    }

    /// Header row for tabular export.
    pub fn columns(&self) -> Vec<String> {
        let mut cols = self.fields.clone();
        cols.push(self.body_column.clone());
        cols.push(self.footer_column.clone());
        cols
    }

    /// Set the fields from a comma-separated list as typed in a form.
    pub fn set_fields_from_list(&mut self, list: &str) {
        self.fields = parse_field_list(list, &self.tag_prefix);
    }

    pub fn validate(&self) -> Result<()> {
        match self.mode {
            SplitMode::Delimiter => {
                if self.delimiter.trim().is_empty() {
                    return Err(DocError::Config("article delimiter must not be empty".into()));
                }
                if self.fields.is_empty() {
                    return Err(DocError::Config("at least one metadata field is required".into()));
                }
            }
            SplitMode::BlankLines => {
                if self.blank.min_blank_lines == 0 {
                    return Err(DocError::Config("min_blank_lines must be at least 1".into()));
                }
            }
        }
        let mut seen = HashSet::new();
        for f in &self.fields {
            if f.trim().is_empty() {
                return Err(DocError::Config("empty field name".into()));
            }
            if f.contains(':') {
                return Err(DocError::Config(format!("field name `{}` must not contain ':'", f)));
            }
            if !seen.insert(f.as_str()) {
                return Err(DocError::Config(format!("duplicate field `{}`", f)));
            }
        }
        let reserved = [self.body_column.as_str(), self.footer_column.as_str()];
        if let Some(clash) = self.fields.iter().find(|f| reserved.contains(&f.as_str())) {
            return Err(DocError::Config(format!("field `{}` clashes with a reserved column", clash)));
        }
        Ok(())
    }
}

/// Parse a comma-separated field list (`"#Titulo, Autor, ,Data"` -> `[Titulo, Autor, Data]`).
pub fn parse_field_list(list: &str, tag_prefix: &str) -> Vec<String> {
    list.split(',')
        .map(|s| {
            let s = s.trim();
            let s = if tag_prefix.is_empty() { s } else { s.strip_prefix(tag_prefix).unwrap_or(s) };
            s.trim().to_string()
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Inverse of [`parse_field_list`], used to prefill the form.
pub fn format_field_list(fields: &[String], tag_prefix: &str) -> String {
    fields
        .iter()
        .map(|f| format!("{}{}", tag_prefix, f))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn load_profile(path: &Path) -> Result<SplitConfig> {
    let body = std::fs::read_to_string(path)
        .map_err(|e| DocError::Config(format!("failed to read `{}`: {e}", path.display())))?;
    let cfg: SplitConfig = serde_json::from_str(&body)
        .map_err(|e| DocError::Config(format!("invalid profile `{}`: {e}", path.display())))?;
    cfg.validate()?;
    tracing::debug!(path = %path.display(), "loaded split profile");
    Ok(cfg)
}

pub fn save_profile(path: &Path, cfg: &SplitConfig) -> Result<()> {
    let body = serde_json::to_string_pretty(cfg)
        .map_err(|e| DocError::Config(format!("serialize profile failed: {e}")))?;
    std::fs::write(path, body)
        .map_err(|e| DocError::Config(format!("failed to write `{}`: {e}", path.display())))?;
    Ok(())
}
