//! invreport-ingest: fixed-width inventory extract parsing.

pub mod error;
pub mod format;
pub mod number;
pub mod parser;
pub mod reader;
pub mod types;

pub use error::IngestError;
pub use format::{FormatDescriptor, FormatElement};
pub use number::{is_numeric_token, normalize_number};
pub use parser::RecordParser;
pub use reader::{parse_extract_text, read_extract};
pub use types::{FieldValue, ParsedRecord};
