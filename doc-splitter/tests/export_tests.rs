mod common;

use common::{docx_bytes, odt_bytes, paras, sample_lines};
use doc_splitter::config::{load_profile, save_profile, OutputFormat, SplitConfig, SplitMode};
use doc_splitter::csv_export::{to_csv_string, write_csv_file, CsvEncoding};
use doc_splitter::{process_bytes, process_path, DocError};

#[test]
fn csv_has_one_column_per_field_plus_body_and_footer() {
    let cfg = SplitConfig::default();
    let out = process_bytes(&docx_bytes(&paras(&sample_lines())), "revista.docx", &cfg).expect("process");
    let csv = to_csv_string(&out.articles, &cfg).expect("csv");

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(csv.as_bytes());
    let header: Vec<String> = reader.headers().expect("header").iter().map(str::to_string).collect();
    assert_eq!(
        header,
        vec!["Titulo", "SubTitulo", "Autor", "Data", "Tag", "Pag", "Numero", "Imagens", "BODY", "Rodape"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "Primeiro");
    assert_eq!(&rows[0][2], "Ana");
    assert_eq!(&rows[0][8], "Corpo do primeiro artigo.\nSegunda linha.");
    assert_eq!(&rows[0][9], "Fonte: arquivo");
    assert_eq!(&rows[1][3], "2024-05-01");
    assert_eq!(&rows[1][9], "");
}

#[test]
fn process_bytes_fills_document_info() {
    let cfg = SplitConfig::default();
    let bytes = docx_bytes(&paras(&sample_lines()));
    let out = process_bytes(&bytes, "in/revista.docx", &cfg).expect("process");
    assert_eq!(out.info.file_name, "revista.docx");
    assert_eq!(out.info.reader_backend, "docx");
    assert_eq!(out.info.article_count, 2);
    assert_eq!(out.info.paragraph_count, sample_lines().len());
    assert_eq!(out.info.file_size_bytes, Some(bytes.len() as u64));
    assert_eq!(out.info.content_sha256.as_deref().map(str::len), Some(64));
    assert!(!out.info.extracted_at.is_empty());
}

#[test]
fn process_path_reads_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("edicao.odt");
    let body: String = sample_lines()
        .iter()
        .map(|l| format!("<text:p>{}</text:p>", l))
        .collect();
    std::fs::write(&path, odt_bytes(&body)).expect("write odt");

    let cfg = SplitConfig::default();
    let out = process_path(&path, &cfg).expect("process");
    assert_eq!(out.articles.len(), 2);
    assert_eq!(out.articles[0].footer.as_deref(), Some("Fonte: arquivo"));
    assert_eq!(out.info.reader_backend, "odt");
    assert!(out.info.file_size_bytes.unwrap_or(0) > 0);
}

#[test]
fn html_mode_on_odt_still_finds_the_footer() {
    let body: String = sample_lines().iter().map(|l| format!("<text:p>{}</text:p>", l)).collect();
    let cfg = SplitConfig { output_format: OutputFormat::Html, ..SplitConfig::default() };
    let out = process_bytes(&odt_bytes(&body), "x.odt", &cfg).expect("process");
    assert_eq!(out.articles[0].footer.as_deref(), Some("Fonte: arquivo"));
}

#[test]
fn html_mode_on_docx_wraps_body_but_not_metadata() {
    let cfg = SplitConfig { output_format: OutputFormat::Html, ..SplitConfig::default() };
    let out = process_bytes(&docx_bytes(&paras(&sample_lines())), "x.docx", &cfg).expect("process");
    let first = &out.articles[0];
    assert_eq!(first.field("Titulo"), "Primeiro");
    assert_eq!(first.body, "<p>Corpo do primeiro artigo.</p>\n<p>Segunda linha.</p>");
    assert_eq!(first.footer.as_deref(), Some("<p> Fonte: arquivo</p>"));
}

#[test]
fn blank_line_mode_through_pipeline() {
    let lines = ["Titulo A", "", "", "Corpo A", "", "", "", "Titulo B", "", "", "Corpo B"];
    let cfg = SplitConfig { mode: SplitMode::BlankLines, ..SplitConfig::default() };
    let out = process_bytes(&docx_bytes(&paras(&lines)), "x.docx", &cfg).expect("process");
    assert_eq!(out.articles.len(), 2);
    assert_eq!(out.articles[1].field("Titulo"), "Titulo B");
    assert_eq!(out.articles[1].body, "Corpo B");
}

#[test]
fn unsupported_upload_name_is_rejected() {
    let err = process_bytes(b"%PDF-1.4", "scan.pdf", &SplitConfig::default()).unwrap_err();
    assert!(matches!(err, DocError::UnsupportedFormat(_)));
}

#[test]
fn csv_file_encodings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = SplitConfig::default();
    let out = process_bytes(&docx_bytes(&paras(&sample_lines())), "x.docx", &cfg).expect("process");

    let utf8 = dir.path().join("utf8.csv");
    write_csv_file(&utf8, &out.articles, &cfg, CsvEncoding::Utf8).expect("utf8");
    let bom = dir.path().join("bom.csv");
    write_csv_file(&bom, &out.articles, &cfg, CsvEncoding::Utf8Bom).expect("bom");
    let plain = std::fs::read(&utf8).expect("read utf8");
    let with_bom = std::fs::read(&bom).expect("read bom");
    assert_eq!(&with_bom[..3], &[0xEF, 0xBB, 0xBF]);
    assert_eq!(&with_bom[3..], &plain[..]);

    let latin = dir.path().join("latin.csv");
    let mut recs = out.articles.clone();
    recs[0].body = "Edição".into();
    write_csv_file(&latin, &recs, &cfg, CsvEncoding::Windows1252).expect("latin");
    let bytes = std::fs::read(&latin).expect("read latin");
    assert!(bytes.windows(2).any(|w| w == &[0xE7u8, 0xE3][..]));

    recs[0].body = "emoji 🙂".into();
    let err = write_csv_file(&latin, &recs, &cfg, CsvEncoding::Windows1252).unwrap_err();
    assert!(matches!(err, DocError::Export(_)));
}

#[test]
fn profiles_round_trip_through_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("perfil.json");
    let mut cfg = SplitConfig { delimiter: "---artigo---".into(), keep_preamble: true, ..SplitConfig::default() };
    cfg.set_fields_from_list("Title, Author");
    save_profile(&path, &cfg).expect("save");
    let loaded = load_profile(&path).expect("load");
    assert_eq!(loaded, cfg);

    std::fs::write(&path, r#"{"delimiter": "@@", "mode": "blank-lines"}"#).expect("write partial");
    let partial = load_profile(&path).expect("partial profile");
    assert_eq!(partial.delimiter, "@@");
    assert_eq!(partial.mode, SplitMode::BlankLines);
    assert_eq!(partial.fields, SplitConfig::default().fields);

    std::fs::write(&path, "{ not json").expect("write broken");
    assert!(matches!(load_profile(&path), Err(DocError::Config(_))));
}
