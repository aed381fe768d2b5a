use invreport_ingest::{read_extract, FieldValue, FormatDescriptor, RecordParser};
use std::io::Write;

/// Build an extract line: 56-char head, tokens padded to column 148,
/// 35-char continuation, then the free tail.
fn extract_line(sku: &str, desc: &str, head_tail: &str, continuation: &str, tail: &str) -> String {
    format!(
        "{:<6}{:8}{:<31}{:<4} {:<6}{:<92}{:<35}{}",
        sku, "", desc, "0001", "000010", head_tail, continuation, tail
    )
}

fn write_extract(lines: &[String], line_ending: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        write!(file, "{line}{line_ending}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_reads_records_and_skips_blank_lines() {
    let lines = vec![
        extract_line(
            "100200",
            "USB-C CABLE 2M",
            "EA 12.50 1 0 0 0 0 A N 77",
            "BRAIDED BLACK",
            "X PN-4411 3 0 4-",
        ),
        String::new(),
        "      ".to_string(),
        extract_line("100201", "HDMI ADAPTER", "EA 8.25 2 0 0 0 0 D 5 6", "", "Y PN-9 1.5-"),
    ];
    let file = write_extract(&lines, "\n");

    let records = read_extract(file.path(), &RecordParser::default()).unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.get(0), Some(&FieldValue::text("100200")));
    assert_eq!(first.get(1), Some(&FieldValue::text("USB-C CABLE 2M")));
    assert_eq!(first.get(5), Some(&FieldValue::Float(12.5)));
    assert_eq!(first.get(11), Some(&FieldValue::text("A")));
    // marker skipped, following token kept verbatim
    assert_eq!(first.get(12), Some(&FieldValue::text("77")));
    assert_eq!(first.get(13), Some(&FieldValue::text("BRAIDED BLACK")));
    assert_eq!(first.get(15), Some(&FieldValue::text("PN-4411")));
    assert_eq!(first.fields.last(), Some(&FieldValue::Int(-4)));

    let second = &records[1];
    assert_eq!(second.get(12), Some(&FieldValue::Int(5)));
    // the extra head-tail token is dropped once 13 fields are reached
    assert_eq!(second.get(13), Some(&FieldValue::text("")));
    assert_eq!(second.fields.last(), Some(&FieldValue::Float(-1.5)));
}

#[test]
fn test_crlf_and_invalid_utf8_are_tolerated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let line = extract_line("100300", "CAF", "EA 1 2", "", "9");
    file.write_all(line.as_bytes()).unwrap();
    file.write_all(b"\r\n").unwrap();
    // latin-1 byte in the description column
    file.write_all(b"100301        CAF\xC9 LATIN\r\n").unwrap();
    file.flush().unwrap();

    let records = read_extract(file.path(), &RecordParser::default()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].fields.last(), Some(&FieldValue::Int(9)));
    assert_eq!(records[1].get(0), Some(&FieldValue::text("100301")));
    assert!(records[1].get(1).unwrap().to_string().starts_with("CAF"));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("A764Y.TXT");
    let err = read_extract(&path, &RecordParser::default()).unwrap_err();
    assert!(format!("{err:#}").contains("A764Y.TXT"));
}

#[test]
fn test_configured_descriptor() {
    let format = FormatDescriptor::from_json(r#"[6, "  ", 10]"#).unwrap();
    let parser = RecordParser::new(format);
    let file = write_extract(&["ABC123  SHORT DESC 4- 2".to_string()], "\n");

    let records = read_extract(file.path(), &parser).unwrap();
    assert_eq!(
        records[0].fields,
        vec![
            FieldValue::text("ABC123"),
            FieldValue::text("SHORT DESC"),
            FieldValue::Int(-4),
            FieldValue::Int(2),
            FieldValue::text(""),
        ]
    );
}
