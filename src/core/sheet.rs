use super::cell::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of the file-identifier column.
pub const FILE_COLUMN_INDEX: usize = 0;
/// Index of the contract-source column (URL or document reference).
pub const CONTRACT_COLUMN_INDEX: usize = 1;
/// First header that reviewers can edit.
pub const FIRST_EDITABLE_INDEX: usize = 2;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One data row: header name to cell value. Missing headers read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, header: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(header.into(), value.into());
        self
    }

    pub fn get(&self, header: &str) -> &CellValue {
        self.cells.get(header).unwrap_or(&EMPTY_CELL)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A parsed sheet. Header order is significant: the first two headers are
/// reserved, everything from index 2 onward is reviewer-editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a sheet from positional rows, pairing each value with its header.
    /// Extra values beyond the header count are dropped.
    pub fn from_positional<H, R, V>(name: impl Into<String>, headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<V>>,
        V: Into<CellValue>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|values| {
                headers
                    .iter()
                    .cloned()
                    .zip(values.into_iter().map(Into::into))
                    .collect::<Row>()
            })
            .collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn editable_headers(&self) -> &[String] {
        self.headers.get(FIRST_EDITABLE_INDEX..).unwrap_or(&[])
    }

    pub fn contract_header(&self) -> Option<&str> {
        self.headers.get(CONTRACT_COLUMN_INDEX).map(String::as_str)
    }

    pub fn file_header(&self) -> Option<&str> {
        self.headers.get(FILE_COLUMN_INDEX).map(String::as_str)
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// All sheets of one uploaded file, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sheet {
        Sheet::from_positional(
            "Contracts",
            ["File", "ContractURL", "Amount", "State"],
            vec![vec!["a.pdf", "http://x/a.pdf", "1000", "CA"]],
        )
    }

    #[test]
    fn test_editable_headers_skip_reserved_columns() {
        let sheet = sample();
        assert_eq!(sheet.editable_headers(), &["Amount", "State"]);
        assert_eq!(sheet.contract_header(), Some("ContractURL"));
        assert_eq!(sheet.file_header(), Some("File"));
    }

    #[test]
    fn test_short_header_list_has_no_editable_fields() {
        let sheet = Sheet::new("s", vec!["File".into()]);
        assert!(sheet.editable_headers().is_empty());
        assert_eq!(sheet.contract_header(), None);
    }

    #[test]
    fn test_missing_cell_reads_empty() {
        let sheet = sample();
        let row = sheet.row(0).unwrap();
        assert_eq!(row.get("State"), &CellValue::text("CA"));
        assert_eq!(row.get("Nope"), &CellValue::Empty);
        assert!(sheet.row(5).is_none());
    }

    #[test]
    fn test_workbook_lookup() {
        let wb = Workbook::new(vec![sample()]);
        assert!(wb.sheet("Contracts").is_some());
        assert!(wb.sheet("Other").is_none());
        assert_eq!(wb.sheet_names().collect::<Vec<_>>(), vec!["Contracts"]);
    }
}
