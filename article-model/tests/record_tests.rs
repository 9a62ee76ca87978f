use article_model::{ArticleRecord, DocumentInfo, SCHEMA_MAJOR};

const FIELDS: [&str; 3] = ["Titulo", "Autor", "Data"];

#[test]
fn with_fields_defaults_every_key_to_empty() {
    let rec = ArticleRecord::with_fields(0, &FIELDS);
    assert_eq!(rec.fields.len(), 3);
    for f in FIELDS {
        assert_eq!(rec.field(f), "");
    }
    assert!(rec.footer.is_none());
    assert!(!rec.has_footer());
}

#[test]
fn row_follows_field_order_then_body_and_footer() {
    let mut rec = ArticleRecord::with_fields(2, &FIELDS);
    rec.set_field("Autor", "Ana");
    rec.set_field("Titulo", "Manchete");
    rec.body = "texto".into();
    rec.footer = Some("nota".into());

    assert_eq!(rec.row(&FIELDS), vec!["Manchete", "Ana", "", "texto", "nota"]);
    assert!(rec.has_footer());
}

#[test]
fn unknown_field_reads_as_empty() {
    let rec = ArticleRecord::with_fields(0, &FIELDS);
    assert_eq!(rec.field("Imagens"), "");
    assert_eq!(rec.row(&["Imagens"]), vec!["", "", ""]);
}

#[test]
fn set_field_overwrites_previous_value() {
    let mut rec = ArticleRecord::with_fields(0, &FIELDS);
    rec.set_field("Titulo", "A");
    rec.set_field("Titulo", "B");
    assert_eq!(rec.field("Titulo"), "B");
    assert_eq!(rec.fields.len(), 3);
}

#[test]
fn document_info_serializes_with_schema_version() {
    let info = DocumentInfo::new("in/a.docx", "application/test");
    assert_eq!(info.schema_version, SCHEMA_MAJOR);
    let json = serde_json::to_string(&info).expect("serialize info");
    assert!(json.contains("\"source_uri\":\"in/a.docx\""));
    let back: DocumentInfo = serde_json::from_str(&json).expect("deserialize info");
    assert_eq!(back, info);
}
