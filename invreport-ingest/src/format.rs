//! Format descriptors for the fixed-width head of an extract line.

use serde_json::Value;

use crate::error::{IngestError, Result};

/// Width of the item identifier column.
pub const ID_WIDTH: usize = 6;
/// Width of the first description column.
pub const DESCRIPTION_WIDTH: usize = 31;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatElement {
    /// Consume this many characters and emit them, trimmed, as a field.
    Width(usize),
    /// Skip as many characters as the literal has. Content is not checked.
    Literal(String),
}

impl FormatElement {
    /// Characters this element consumes.
    pub fn char_len(&self) -> usize {
        match self {
            FormatElement::Width(w) => *w,
            FormatElement::Literal(s) => s.chars().count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    elements: Vec<FormatElement>,
}

impl FormatDescriptor {
    pub fn new(elements: Vec<FormatElement>) -> Self {
        Self { elements }
    }

    /// Head layout of the inventory extract:
    /// item id, 8 spaces, description, two short numeric columns.
    pub fn inventory_extract() -> Self {
        Self::new(vec![
            FormatElement::Width(ID_WIDTH),
            FormatElement::Literal(" ".repeat(8)),
            FormatElement::Width(DESCRIPTION_WIDTH),
            FormatElement::Literal(String::new()),
            FormatElement::Width(4),
            FormatElement::Literal(" ".to_string()),
            FormatElement::Width(6),
        ])
    }

    /// Build from loosely typed config values: integers are widths, strings
    /// are literals, anything else is rejected.
    pub fn from_values(values: &[Value]) -> Result<Self> {
        let elements = values
            .iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::String(s) => Ok(FormatElement::Literal(s.clone())),
                Value::Number(n) => n
                    .as_u64()
                    .and_then(|w| usize::try_from(w).ok())
                    .map(FormatElement::Width)
                    .ok_or_else(|| invalid(index, value)),
                other => Err(invalid(index, other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(elements))
    }

    /// Parse a JSON array such as `[6, "        ", 31, "", 4, " ", 6]`.
    pub fn from_json(text: &str) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_str(text)?;
        Self::from_values(&values)
    }

    pub fn elements(&self) -> &[FormatElement] {
        &self.elements
    }

    /// Total characters consumed by the descriptor.
    pub fn char_len(&self) -> usize {
        self.elements.iter().map(FormatElement::char_len).sum()
    }

    /// Inverse of [`FormatDescriptor::from_values`], for writing config files.
    pub fn to_values(&self) -> Vec<Value> {
        self.elements
            .iter()
            .map(|e| match e {
                FormatElement::Width(w) => Value::from(*w),
                FormatElement::Literal(s) => Value::from(s.as_str()),
            })
            .collect()
    }
}

impl Default for FormatDescriptor {
    fn default() -> Self {
        Self::inventory_extract()
    }
}

fn invalid(index: usize, value: &Value) -> IngestError {
    IngestError::InvalidFormatDescriptor {
        index,
        found: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_extract_layout() {
        let fmt = FormatDescriptor::inventory_extract();
        assert_eq!(fmt.elements().len(), 7);
        assert_eq!(fmt.char_len(), 56);
    }

    #[test]
    fn test_from_json_matches_builtin() {
        let fmt = FormatDescriptor::from_json(r#"[6, "        ", 31, "", 4, " ", 6]"#).unwrap();
        assert_eq!(fmt, FormatDescriptor::inventory_extract());
        assert_eq!(FormatDescriptor::from_values(&fmt.to_values()).unwrap(), fmt);
    }

    #[test]
    fn test_rejects_non_width_elements() {
        for (json, index, found) in [
            (r#"[6, true]"#, 1, "true"),
            (r#"[6, 2.5]"#, 1, "2.5"),
            (r#"[-1]"#, 0, "-1"),
            (r#"[6, " ", null]"#, 2, "null"),
            (r#"[[1]]"#, 0, "[1]"),
        ] {
            match FormatDescriptor::from_json(json) {
                Err(IngestError::InvalidFormatDescriptor { index: i, found: f }) => {
                    assert_eq!(i, index, "{json}");
                    assert_eq!(f, found, "{json}");
                }
                other => panic!("{json}: expected descriptor error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(matches!(
            FormatDescriptor::from_json("{\"width\": 6}"),
            Err(IngestError::DescriptorSyntax(_))
        ));
    }
}
