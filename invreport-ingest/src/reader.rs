//! Read an inventory extract into parsed records, one record per non-blank line.

use anyhow::{Context, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::parser::RecordParser;
use crate::types::ParsedRecord;

fn parse_raw_line(raw: &str, parser: &RecordParser) -> Option<ParsedRecord> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(parser.parse_line(raw.trim_start()))
}

/// Parse extract text already in memory. Blank lines produce no record.
pub fn parse_extract_text(text: &str, parser: &RecordParser) -> Vec<ParsedRecord> {
    text.lines()
        .filter_map(|line| parse_raw_line(line, parser))
        .collect()
}

/// Read and parse an extract file line by line.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the run.
pub fn read_extract(path: impl AsRef<Path>, parser: &RecordParser) -> Result<Vec<ParsedRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (n, chunk) in reader.split(b'\n').enumerate() {
        let bytes = chunk.with_context(|| format!("reading line {} of {}", n + 1, path.display()))?;
        let line = String::from_utf8_lossy(&bytes);
        if let Some(record) = parse_raw_line(line.trim_end_matches('\r'), parser) {
            records.push(record);
        }
    }

    debug!("parsed {} records from {}", records.len(), path.display());
    Ok(records)
}
