//! Hybrid fixed-width / whitespace record parser for inventory extract lines.
//!
//! Layout of one line (character columns):
//!
//! ```text
//! |<- descriptor ->|<- tokens to col 148 ->|<- 35-char continuation ->|<- tokens ->|
//! ```
//!
//! The head is cut by the format descriptor. Tokens after it fill the record up
//! to 13 fields, then the fixed continuation description is read, then every
//! remaining token is appended. Malformed data never fails: short lines yield
//! empty slots and unrecognized tokens stay text.

use std::collections::VecDeque;

use crate::format::{FormatDescriptor, FormatElement};
use crate::number::{is_numeric_token, normalize_number};
use crate::types::{FieldValue, ParsedRecord};

/// Column where the free-form head tail ends and the continuation begins.
pub const HEAD_TAIL_END: usize = 148;
/// Width of the long description continuation slot.
pub const CONTINUATION_WIDTH: usize = 35;
/// Fields collected before the continuation slot.
pub const HEAD_FIELDS: usize = 13;

/// Placeholder column in the extract; it never carries a value.
const SKIP_MARKER: &str = "N";

fn classify(token: &str) -> FieldValue {
    if is_numeric_token(token) {
        normalize_number(token)
    } else {
        FieldValue::text(token)
    }
}

/// Cursor over the whitespace tokens of a line segment.
struct TokenCursor<'a> {
    tokens: VecDeque<&'a str>,
}

impl<'a> TokenCursor<'a> {
    fn new(segment: &'a str) -> Self {
        Self {
            tokens: segment.split_whitespace().collect(),
        }
    }

    /// Next head-tail field. A skip marker is dropped and the token after it
    /// is taken verbatim.
    fn next_head_field(&mut self) -> Option<FieldValue> {
        let token = self.tokens.pop_front()?;
        if token == SKIP_MARKER {
            return self.tokens.pop_front().map(FieldValue::text);
        }
        Some(classify(token))
    }

    fn drain_classified(&mut self) -> impl Iterator<Item = FieldValue> + '_ {
        self.tokens.drain(..).map(classify)
    }
}

/// Characters `[start, end)` of `chars`, clamped to the line.
fn column_slice(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}

#[derive(Debug, Clone)]
pub struct RecordParser {
    format: FormatDescriptor,
    head_tail_end: usize,
    continuation_width: usize,
    head_fields: usize,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(FormatDescriptor::inventory_extract())
    }
}

impl RecordParser {
    pub fn new(format: FormatDescriptor) -> Self {
        Self {
            format,
            head_tail_end: HEAD_TAIL_END,
            continuation_width: CONTINUATION_WIDTH,
            head_fields: HEAD_FIELDS,
        }
    }

    /// Set the column where the continuation slot starts
    pub fn head_tail_end(mut self, column: usize) -> Self {
        self.head_tail_end = column;
        self
    }

    /// Set the continuation slot width
    pub fn continuation_width(mut self, width: usize) -> Self {
        self.continuation_width = width;
        self
    }

    /// Set how many fields are collected before the continuation slot
    pub fn head_fields(mut self, count: usize) -> Self {
        self.head_fields = count;
        self
    }

    /// Parse one non-blank, left-trimmed line.
    pub fn parse_line(&self, line: &str) -> ParsedRecord {
        let chars: Vec<char> = line.chars().collect();
        let mut fields = Vec::with_capacity(self.head_fields + 8);
        let mut idx = 0;

        for element in self.format.elements() {
            if let FormatElement::Width(w) = element {
                fields.push(FieldValue::text(column_slice(&chars, idx, idx + w).trim()));
            }
            idx += element.char_len();
        }

        let head_tail = column_slice(&chars, idx, self.head_tail_end).replace('*', "");
        let mut cursor = TokenCursor::new(&head_tail);
        while fields.len() < self.head_fields {
            match cursor.next_head_field() {
                Some(field) => fields.push(field),
                None => break,
            }
        }

        let continuation_end = self.head_tail_end + self.continuation_width;
        let continuation = column_slice(&chars, self.head_tail_end, continuation_end);
        fields.push(FieldValue::text(continuation.trim()));

        let tail =
            column_slice(&chars, continuation_end, chars.len()).replace(['*', '%', '`'], "");
        fields.extend(TokenCursor::new(&tail).drain_classified());

        ParsedRecord::from(fields)
    }
}
