use crate::error::{DocError, Result};
use crate::xml_util::{attr_val, local_name, read_zip_entry};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};

#[derive(Debug, Clone, Default)]
pub struct OdtContent {
    /// Trimmed paragraph and heading texts in document order.
    pub lines: Vec<String>,
    /// Non-empty paragraphs and headings.
    pub paragraph_count: usize,
    pub table_count: usize,
}

/// ODT reader: collects every `text:p` / `text:h` from content.xml in document order,
/// trimmed, skipping empty ones. Nested paragraphs (lists, table cells, notes) get their
/// own line at the position of their start tag.
pub fn read_odt<R: Read + Seek>(source: R) -> Result<OdtContent> {
    let mut zip = zip::ZipArchive::new(source).map_err(|e| DocError::Read(format!("not a valid .odt (zip) file: {e}")))?;
    let content_xml = read_zip_entry(&mut zip, "content.xml")?;

    let mut reader = Reader::from_str(&content_xml);
    reader.trim_text(false);
    let mut buf = Vec::new();

    // Slots are reserved at the start tag so output follows start order.
    let mut slots: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    // Annotations and note citations carry text that is not part of the paragraph.
    let mut skip_depth = 0usize;
    let mut table_count = 0usize;

    loop {
        buf.clear();
        let ev = reader
            .read_event_into(&mut buf)
            .map_err(|e| DocError::Read(format!("invalid content.xml: {e}")))?;
        match ev {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"annotation" | b"note-citation" => { skip_depth += 1; }
                _ if skip_depth > 0 => {}
                b"p" | b"h" => { open.push(slots.len()); slots.push(String::new()); }
                b"table" => { table_count += 1; }
                _ => {}
            },
            Event::Empty(e) => {
                if skip_depth > 0 { continue; }
                let top = match open.last() { Some(&i) => i, None => continue };
                match local_name(e.name().as_ref()) {
                    b"s" => {
                        let n = attr_val(&e, b"c").and_then(|c| c.parse::<usize>().ok()).unwrap_or(1);
                        slots[top].push_str(&" ".repeat(n));
                    }
                    b"tab" => slots[top].push('\t'),
                    b"line-break" => slots[top].push('\n'),
                    _ => {}
                }
            }
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"annotation" | b"note-citation" => { skip_depth = skip_depth.saturating_sub(1); }
                _ if skip_depth > 0 => {}
                b"p" | b"h" => { open.pop(); }
                _ => {}
            },
            Event::Text(t) => {
                if skip_depth > 0 { continue; }
                if let Some(&top) = open.last() {
                    let s = t.unescape().map_err(DocError::read)?;
                    slots[top].push_str(&s);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let lines: Vec<String> = slots
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let out = OdtContent { paragraph_count: lines.len(), lines, table_count };
    tracing::debug!(paragraphs = out.paragraph_count, tables = out.table_count, "read odt");
    Ok(out)
}
