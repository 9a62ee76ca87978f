//! Text-to-records splitting.
//!
//! Two conventions are supported:
//! - delimiter mode: articles start at a literal delimiter; lines such as `#Titulo: ...`
//!   carry metadata, everything else is body, and an optional footer marker splits off
//!   a trailing footer;
//! - blank-line mode: articles are separated by runs of blank lines and an article's
//!   title is separated from its body by a shorter run.

use article_model::ArticleRecord;
use regex::Regex;

use crate::config::{BlankLineConfig, OutputFormat, SplitConfig, SplitMode};
use crate::error::{DocError, Result};

/// Validate `cfg`, then split `text` according to `cfg.mode`.
pub fn split(text: &str, cfg: &SplitConfig) -> Result<Vec<ArticleRecord>> {
    cfg.validate()?;
    match cfg.mode {
        SplitMode::Delimiter => Ok(split_articles(text, cfg)),
        SplitMode::BlankLines => blank_line_records(text, cfg),
    }
}

/// Delimiter mode. Records come out in document order; empty partitions are skipped.
fn split_articles(text: &str, cfg: &SplitConfig) -> Vec<ArticleRecord> {
    let mut parts = text.split(cfg.delimiter.as_str());
    if !cfg.keep_preamble {
        if let Some(pre) = parts.next() {
            if !pre.trim().is_empty() {
                tracing::warn!(chars = pre.trim().len(), "text before the first delimiter ignored");
            }
        }
    }

    let prefixes = cfg.field_prefixes();
    let footer_marker = cfg.effective_footer_marker();
    let mut out: Vec<ArticleRecord> = Vec::new();

    for raw in parts {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let mut rec = ArticleRecord::with_fields(out.len() as u32, &cfg.fields);
        let mut body_lines: Vec<&str> = Vec::new();

        for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match match_field(line, cfg, &prefixes) {
                Some((field, value)) => rec.set_field(field, value),
                None => body_lines.push(line),
            }
        }

        let body = body_lines.join("\n");
        let body = body.trim();
        match footer_marker.as_deref().and_then(|m| split_footer(body, m, cfg)) {
            Some((b, f)) => {
                rec.body = b;
                rec.footer = Some(f);
            }
            None => rec.body = body.to_string(),
        }
        out.push(rec);
    }
    tracing::debug!(articles = out.len(), delimiter = %cfg.delimiter, "split by delimiter");
    out
}

/// Match a metadata line. Returns the configured field name and the trimmed value.
fn match_field<'a>(line: &'a str, cfg: &'a SplitConfig, prefixes: &[String]) -> Option<(&'a str, &'a str)> {
    for (field, prefix) in cfg.fields.iter().zip(prefixes) {
        if let Some(rest) = line.strip_prefix(prefix.as_str()) {
            return Some((field.as_str(), rest.trim()));
        }
    }
    if cfg.accept_unprefixed {
        for field in &cfg.fields {
            if let Some(rest) = line.strip_prefix(field.as_str()).and_then(|r| r.strip_prefix(':')) {
                return Some((field.as_str(), rest.trim()));
            }
        }
    }
    None
}

/// Split the body once on the footer marker. In HTML mode the footer keeps the
/// opening `<p>` that the marker consumed.
fn split_footer(body: &str, marker: &str, cfg: &SplitConfig) -> Option<(String, String)> {
    let (before, after) = body.split_once(marker)?;
    let footer = match cfg.output_format {
        OutputFormat::Text => after.trim().to_string(),
        OutputFormat::Html => format!("<p>{}", after),
    };
    Some((before.trim().to_string(), footer))
}

fn blank_run_regex(blank_lines: usize) -> Result<Regex> {
    // N blank lines means N + 1 consecutive line breaks (with optional whitespace).
    Regex::new(&format!(r"(?:\n\s*){{{},}}", blank_lines + 1))
        .map_err(|e| DocError::Config(format!("invalid blank-line pattern: {e}")))
}

/// Split on runs of at least `min_blank_lines` blank lines; pieces are trimmed and
/// empty ones dropped.
pub fn split_blank_lines(text: &str, blank: &BlankLineConfig) -> Result<Vec<String>> {
    let re = blank_run_regex(blank.min_blank_lines)?;
    Ok(re
        .split(text)
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect())
}

/// Split an article once into `(title, body)` on a run of `title_blank_lines` blank lines.
/// Without such a gap the title is empty and the whole article is the body.
pub fn split_title_body(article: &str, title_blank_lines: usize) -> Result<(String, String)> {
    let re = blank_run_regex(title_blank_lines)?;
    let mut it = re.splitn(article, 2);
    let first = it.next().unwrap_or("").trim();
    match it.next() {
        Some(rest) => Ok((first.to_string(), rest.trim().to_string())),
        None => Ok((String::new(), first.to_string())),
    }
}

/// Blank-line mode as records: the title goes into the first configured field.
fn blank_line_records(text: &str, cfg: &SplitConfig) -> Result<Vec<ArticleRecord>> {
    let articles = split_blank_lines(text, &cfg.blank)?;
    let mut out = Vec::with_capacity(articles.len());
    for (i, article) in articles.iter().enumerate() {
        let mut rec = ArticleRecord::with_fields(i as u32, &cfg.fields);
        let (title, body) = if cfg.blank.title_blank_lines > 0 {
            split_title_body(article, cfg.blank.title_blank_lines)?
        } else {
            (String::new(), article.clone())
        };
        rec.body = match cfg.fields.first() {
            Some(title_field) => {
                rec.set_field(title_field.clone(), title);
                body
            }
            None => article.clone(),
        };
        out.push(rec);
    }
    tracing::debug!(articles = out.len(), min_blank_lines = cfg.blank.min_blank_lines, "split by blank lines");
    Ok(out)
}
