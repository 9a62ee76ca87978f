#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zw = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        zw.start_file(*name, FileOptions::default()).expect("start zip entry");
        zw.write_all(body.as_bytes()).expect("write zip entry");
    }
    zw.finish().expect("finish zip").into_inner()
}

/// One plain paragraph with a single run.
pub fn para(text: &str) -> String {
    if text.is_empty() {
        return "<w:p/>".to_string();
    }
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text)
}

pub fn paras(lines: &[&str]) -> String {
    lines.iter().map(|l| para(l)).collect()
}

pub fn document_xml(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"{W_NS}\" xmlns:r=\"{R_NS}\"><w:body>{body}<w:sectPr/></w:body></w:document>"
    )
}

pub fn docx_bytes(body: &str) -> Vec<u8> {
    zip_bytes(&[("word/document.xml", &document_xml(body))])
}

pub fn docx_bytes_with_rels(body: &str, rels: &str) -> Vec<u8> {
    zip_bytes(&[
        ("word/document.xml", &document_xml(body)),
        ("word/_rels/document.xml.rels", rels),
    ])
}

pub fn odt_bytes(text_body: &str) -> Vec<u8> {
    let content = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <office:document-content \
           xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\" \
           xmlns:text=\"urn:oasis:names:tc:opendocument:xmlns:text:1.0\" \
           xmlns:table=\"urn:oasis:names:tc:opendocument:xmlns:table:1.0\" \
           xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\
         <office:body><office:text>{text_body}</office:text></office:body></office:document-content>"
    );
    zip_bytes(&[
        ("mimetype", "application/vnd.oasis.opendocument.text"),
        ("content.xml", &content),
    ])
}

/// A two-article sample in the default convention.
pub fn sample_lines() -> Vec<&'static str> {
    vec![
        "==Artigo_inicio==",
        "#Titulo: Primeiro",
        "#Autor: Ana",
        "Corpo do primeiro artigo.",
        "",
        "Segunda linha.",
        "#Rodape: Fonte: arquivo",
        "==Artigo_inicio==",
        "#Titulo: Segundo",
        "#Data: 2024-05-01",
        "Texto do segundo.",
    ]
}
