use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell.
///
/// Ingestion hands us whatever the parser produced (text, numbers, booleans or
/// nothing at all). Every comparison site matches on the variant explicitly
/// instead of relying on string coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Render the value the way a reviewer sees it in the grid.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// True for absent cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            CellValue::Bool(_) => false,
        }
    }

    /// Trimmed, lowercased text used for case-insensitive comparisons.
    pub fn normalized(&self) -> String {
        self.as_text().trim().to_lowercase()
    }

    /// Whether the cell literally repeats its column header, which happens when
    /// a header row bleeds into the data during parsing.
    pub fn repeats_header(&self, header: &str) -> bool {
        match self {
            CellValue::Text(s) => {
                let header = header.trim();
                !header.is_empty() && s.trim().eq_ignore_ascii_case(header)
            }
            CellValue::Number(_) | CellValue::Bool(_) | CellValue::Empty => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

// Integral values print without a trailing ".0" so "1000" and 1000.0 compare equal.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_handles_every_variant() {
        assert_eq!(CellValue::text("abc").as_text(), "abc");
        assert_eq!(CellValue::Number(1000.0).as_text(), "1000");
        assert_eq!(CellValue::Number(12.5).as_text(), "12.5");
        assert_eq!(CellValue::Bool(true).as_text(), "true");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_is_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("   ").is_blank());
        assert!(!CellValue::text(" x ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(!CellValue::Bool(false).is_blank());
    }

    #[test]
    fn test_repeats_header_is_case_insensitive() {
        assert!(CellValue::text(" state ").repeats_header("State"));
        assert!(!CellValue::text("CA").repeats_header("State"));
        assert!(!CellValue::Empty.repeats_header("State"));
        assert!(!CellValue::text("").repeats_header(""));
    }

    #[test]
    fn test_deserialize_untagged() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"["a", 3, 2.5, true, null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::text("a"),
                CellValue::Number(3.0),
                CellValue::Number(2.5),
                CellValue::Bool(true),
                CellValue::Empty,
            ]
        );
    }
}
