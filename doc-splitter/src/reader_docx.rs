use crate::config::OutputFormat;
use crate::error::{DocError, Result};
use crate::xml_util::{attr_val, escape_attr, escape_html, local_name, read_optional_zip_entry, read_zip_entry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};

#[derive(Debug, Clone, Default)]
pub struct DocxOptions {
    pub output_format: OutputFormat,
    /// Append table cell text after the body paragraphs.
    pub include_tables: bool,
    /// In HTML mode, paragraphs starting with one of these stay unwrapped
    /// (article delimiter and metadata lines).
    pub raw_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DocxContent {
    /// Output lines: body paragraphs, then table cells when requested.
    pub lines: Vec<String>,
    /// Body paragraphs (outside tables), empty ones included.
    pub paragraph_count: usize,
    pub table_count: usize,
}

#[derive(Debug, Default)]
struct RunState {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
}

impl RunState {
    fn to_html(&self) -> String {
        if self.text.is_empty() { return String::new(); }
        let mut s = escape_html(&self.text);
        if self.bold { s = format!("<b>{}</b>", s); }
        if self.italic { s = format!("<i>{}</i>", s); }
        if self.underline { s = format!("<u>{}</u>", s); }
        s
    }
}

#[derive(Debug, Default)]
struct HyperlinkState {
    url: Option<String>,
    text: String,
}

/// `w:b`, `w:i` and `w:u` are on unless their value turns them off.
fn toggle_on(e: &BytesStart<'_>) -> bool {
    match attr_val(e, b"val") {
        Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "off" | "none"),
        None => true,
    }
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => {
                if local_name(e.name().as_ref()) == b"Relationship" {
                    if let (Some(id), Some(target)) = (attr_val(&e, b"Id"), attr_val(&e, b"Target")) {
                        map.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocError::Read(format!("invalid document relationships: {e}"))),
            _ => {}
        }
    }
    Ok(map)
}

/// Delimiter and metadata paragraphs are matched on their plain text and emitted
/// unescaped; everything else is wrapped in `<p>`.
fn render_paragraph_html(plain: &str, inner: &str, raw_prefixes: &[String]) -> String {
    if plain.is_empty() {
        String::new()
    } else if raw_prefixes.iter().any(|p| !p.is_empty() && plain.trim_start().starts_with(p.as_str())) {
        plain.to_string()
    } else {
        format!("<p>{}</p>", inner)
    }
}

/// Text boxes and the VML fallback of alternate content hold their own paragraphs,
/// which are not part of the surrounding paragraph's text.
fn is_skipped_container(name: &[u8]) -> bool {
    matches!(name, b"txbxContent" | b"Fallback")
}

/// DOCX reader: opens the zip, walks word/document.xml and collects body paragraphs
/// (plain text or inline HTML) followed by table cells when requested.
pub fn read_docx<R: Read + Seek>(source: R, opts: &DocxOptions) -> Result<DocxContent> {
    let mut zip = zip::ZipArchive::new(source).map_err(|e| DocError::Read(format!("not a valid .docx (zip) file: {e}")))?;
    let doc_xml = read_zip_entry(&mut zip, "word/document.xml")?;
    let rels = match opts.output_format {
        OutputFormat::Html => match read_optional_zip_entry(&mut zip, "word/_rels/document.xml.rels")? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        },
        OutputFormat::Text => HashMap::new(),
    };

    let html = opts.output_format == OutputFormat::Html;
    let mut reader = Reader::from_str(&doc_xml);
    reader.trim_text(false);
    let mut buf = Vec::new();

    let mut out = DocxContent::default();
    let mut cells: Vec<String> = Vec::new();

    let mut tbl_depth = 0usize;
    let mut cell_paras: Option<Vec<String>> = None;
    let mut in_p = false;
    let mut para_plain = String::new();
    let mut para_html = String::new();
    let mut run: Option<RunState> = None;
    let mut in_rpr = false;
    let mut in_t = false;
    let mut link: Option<HyperlinkState> = None;
    let mut skip_depth = 0usize;

    loop {
        buf.clear();
        let ev = reader
            .read_event_into(&mut buf)
            .map_err(|e| DocError::Read(format!("invalid word/document.xml: {e}")))?;
        // Self-closing elements behave like a start immediately followed by an end.
        let (start, end, empty) = match &ev {
            Event::Start(e) => (Some(e.clone()), None, false),
            Event::Empty(e) => (Some(e.clone()), Some(e.name().as_ref().to_vec()), true),
            Event::End(e) => (None, Some(e.name().as_ref().to_vec()), false),
            Event::Text(t) => {
                if in_t && skip_depth == 0 {
                    if let Some(r) = run.as_mut() {
                        let s = t.unescape().map_err(DocError::read)?;
                        r.text.push_str(&s);
                    }
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        if let Some(e) = &start {
            let qname = e.name();
            if is_skipped_container(local_name(qname.as_ref())) {
                if !empty { skip_depth += 1; }
                continue;
            }
            if skip_depth > 0 { continue; }
        }
        if skip_depth > 0 {
            if let Some(name) = &end {
                if is_skipped_container(local_name(name)) { skip_depth -= 1; }
            }
            continue;
        }

        if let Some(e) = start {
            match local_name(e.name().as_ref()) {
                b"tbl" => {
                    tbl_depth += 1;
                    if tbl_depth == 1 { out.table_count += 1; }
                }
                b"tc" if tbl_depth == 1 => { cell_paras = Some(Vec::new()); }
                b"p" => { in_p = true; para_plain.clear(); para_html.clear(); }
                b"hyperlink" if in_p => {
                    let url = attr_val(&e, b"id").and_then(|id| rels.get(&id).cloned());
                    link = Some(HyperlinkState { url, text: String::new() });
                }
                b"r" if in_p => { run = Some(RunState::default()); }
                b"rPr" if run.is_some() => { in_rpr = !empty; }
                b"b" if in_rpr => { if let Some(r) = run.as_mut() { r.bold = toggle_on(&e); } }
                b"i" if in_rpr => { if let Some(r) = run.as_mut() { r.italic = toggle_on(&e); } }
                b"u" if in_rpr => { if let Some(r) = run.as_mut() { r.underline = toggle_on(&e); } }
                b"t" => { in_t = !empty; }
                b"tab" if !in_rpr => { if let Some(r) = run.as_mut() { r.text.push('\t'); } }
                b"br" | b"cr" => { if let Some(r) = run.as_mut() { r.text.push('\n'); } }
                _ => {}
            }
        }

        if let Some(name) = end {
            match local_name(&name) {
                b"t" => { in_t = false; }
                b"rPr" => { in_rpr = false; }
                b"r" => {
                    if let Some(r) = run.take() {
                        para_plain.push_str(&r.text);
                        match link.as_mut() {
                            Some(l) => l.text.push_str(&r.text),
                            None => para_html.push_str(&r.to_html()),
                        }
                    }
                }
                b"hyperlink" => {
                    if let Some(l) = link.take() {
                        if !l.text.is_empty() {
                            match l.url {
                                Some(url) => para_html.push_str(&format!("<a href=\"{}\">{}</a>", escape_attr(&url), escape_html(&l.text))),
                                None => para_html.push_str(&escape_html(&l.text)),
                            }
                        }
                    }
                }
                b"p" if in_p => {
                    in_p = false;
                    if tbl_depth == 0 {
                        let text = if html { render_paragraph_html(&para_plain, &para_html, &opts.raw_prefixes) } else { para_plain.clone() };
                        out.lines.push(text);
                        out.paragraph_count += 1;
                    } else if let Some(c) = cell_paras.as_mut() {
                        c.push(para_plain.clone());
                    }
                    para_plain.clear();
                    para_html.clear();
                }
                b"tc" if tbl_depth == 1 => {
                    if let Some(c) = cell_paras.take() { cells.push(c.join("\n")); }
                }
                b"tbl" => { tbl_depth = tbl_depth.saturating_sub(1); }
                _ => {}
            }
        }
    }

    if opts.include_tables {
        out.lines.extend(cells);
    }
    tracing::debug!(paragraphs = out.paragraph_count, tables = out.table_count, lines = out.lines.len(), "read docx");
    Ok(out)
}
