use quick_xml::events::BytesStart;
use std::io::{Read, Seek};

use crate::error::{DocError, Result};

pub(crate) fn local_name(q: &[u8]) -> &[u8] {
    match q.iter().position(|&b| b == b':') { Some(i) => &q[i + 1..], None => q }
}

pub(crate) fn attr_val(e: &BytesStart<'_>, key_local: &[u8]) -> Option<String> {
    for attr in e.attributes().with_checks(false).flatten() {
        if local_name(attr.key.as_ref()) == key_local {
            return Some(match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            });
        }
    }
    None
}

/// Read one member of a zip container as UTF-8 text.
pub(crate) fn read_zip_entry<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Result<String> {
    let mut f = zip
        .by_name(name)
        .map_err(|_| DocError::Read(format!("missing {}", name)))?;
    let mut s = String::new();
    f.read_to_string(&mut s)
        .map_err(|e| DocError::Read(format!("failed to read {}: {e}", name)))?;
    Ok(s)
}

/// Like [`read_zip_entry`] but `None` when the member does not exist.
pub(crate) fn read_optional_zip_entry<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut f = match zip.by_name(name) {
        Ok(f) => f,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(DocError::Read(format!("failed to open {}: {e}", name))),
    };
    let mut s = String::new();
    f.read_to_string(&mut s)
        .map_err(|e| DocError::Read(format!("failed to read {}: {e}", name)))?;
    Ok(Some(s))
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_attr(s: &str) -> String {
    escape_html(s).replace('"', "&quot;")
}
