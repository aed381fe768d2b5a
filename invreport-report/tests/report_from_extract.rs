use chrono::NaiveDate;
use invreport_core::{default_periods, FiscalCalendar};
use invreport_ingest::{parse_extract_text, FieldValue, RecordParser};
use invreport_report::{
    output_file_name, save_csv, InventoryReport, Logo, ReportAssembler, ReportCell, XlsxRenderer,
};

/// One item line laid out like the real extract, with 37 positional fields.
fn item_line(
    sku: &str,
    desc: &str,
    unit_cost: &str,
    status: &str,
    continuation: &str,
    pn: &str,
) -> String {
    let head_tail = format!("EA {unit_cost} 0 0 0 0 0 {status} N X");
    let tail = format!("Z {pn} 0 0 0 0 12 0 0 5 0 0 0 40 0 0 7 30 9 8 7 6 5");
    format!(
        "{:<6}{:8}{:<31}{:<4} {:<6}{:<92}{:<35}{}",
        sku, "", desc, "0001", "000010", head_tail, continuation, tail
    )
}

fn extract_text() -> String {
    [
        item_line("100200", "USB-C CABLE 2M", "12.50", "A", "BRAIDED BLACK", "PN-4411"),
        String::new(),
        item_line("100201", "HDMI ADAPTER", "8.25-", "D", "", "778899"),
    ]
    .join("\n")
}

fn report() -> InventoryReport {
    let calendar = FiscalCalendar::new(
        default_periods(),
        NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
    )
    .unwrap();
    let records = parse_extract_text(&extract_text(), &RecordParser::default());
    ReportAssembler::new(&calendar).assemble(&records).unwrap()
}

fn value(cell: &ReportCell) -> &FieldValue {
    match cell {
        ReportCell::Value(v) => v,
        ReportCell::Formula(f) => panic!("formula {f}"),
    }
}

#[test]
fn test_extract_to_report_rows() {
    let report = report();
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.report_date, "3/2/2025");
    assert_eq!(report.this_period, "2/23/2025");
    assert_eq!(report.next_period, "3/30/2025");
    // March: prior months wrap past January into the same table
    let months: Vec<&str> = report.prior_months.values().map(String::as_str).collect();
    assert_eq!(months, ["Oct", "Nov", "Dec", "Jan", "Feb"]);

    let row = &report.rows[0];
    assert_eq!(value(&row[0]), &FieldValue::text("100200"));
    assert_eq!(value(&row[1]), &FieldValue::text("USB-C CABLE 2M BRAIDED BLACK"));
    assert_eq!(value(&row[2]), &FieldValue::text("PN-4411"));
    assert_eq!(value(&row[3]), &FieldValue::text("A"));
    assert_eq!(value(&row[4]), &FieldValue::Int(12));
    assert_eq!(value(&row[5]), &FieldValue::Int(5));
    assert_eq!(value(&row[6]), &FieldValue::Int(40));
    assert_eq!(value(&row[8]), &FieldValue::Float(12.5));
    assert_eq!(value(&row[14]), &FieldValue::Int(7));
    assert_eq!(value(&row[20]), &FieldValue::Int(30));
    assert_eq!(value(&row[15]), &FieldValue::Int(9));
    assert_eq!(value(&row[19]), &FieldValue::Int(5));

    let second = &report.rows[1];
    assert_eq!(value(&second[1]), &FieldValue::text("HDMI ADAPTER"));
    assert_eq!(value(&second[2]), &FieldValue::text("778899"));
    assert_eq!(value(&second[8]), &FieldValue::Float(-8.25));
}

#[test]
fn test_xlsx_written_with_missing_logo() {
    let dir = tempfile::tempdir().unwrap();
    let report = report();
    let path = dir.path().join(output_file_name("A764Y", &report.report_date));

    XlsxRenderer::new("A764Y")
        .logos(vec![Logo {
            row: 0,
            col: 0,
            path: dir.path().join("Logos/UAG.png"),
        }])
        .save(&report, &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(path.ends_with("A764Y 3-2-2025.xlsx"));
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_invalid_sheet_name_is_an_error() {
    let err = XlsxRenderer::new("bad/name").render_to_bytes(&report()).unwrap_err();
    assert!(err.to_string().contains("bad/name"));
}

#[test]
fn test_csv_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    save_csv(&report(), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("IM SKU#,Product Description,MFG. P/N,Status Code"));
    assert!(header.contains(",MTD Unit Sales,Feb,Jan,Dec,Nov,Oct,YTD Unit Sales,"));
    let first = lines.next().unwrap();
    assert!(first.starts_with("100200,USB-C CABLE 2M BRAIDED BLACK,PN-4411,A,12,5,40,,12.5,"));
    assert_eq!(lines.count(), 1);
}
