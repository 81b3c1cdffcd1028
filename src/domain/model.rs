use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single cell of a unified table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Integer(i64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Option<String>> for CellValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(CellValue::Null, CellValue::Text)
    }
}

impl From<Option<&str>> for CellValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(CellValue::Null, |s| CellValue::Text(s.to_string()))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl fmt::Display for CellValue {
    /// Renders the value the way a CSV field carries it; `Null` is empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One grid as handed over by the table extractor: row 0 is the header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTable {
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Builds a table from string literals; `None` cells stay null.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = Option<&'static str>>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        }
    }

    pub fn header(&self) -> Option<&[Option<String>]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<Option<String>>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// A grid needs a header and at least one data row to contribute anything.
    pub fn has_data(&self) -> bool {
        self.rows.len() > 1
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Ordered column labels plus a row-major value store.
///
/// Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnifiedTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl UnifiedTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding with nulls or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, label: &str) -> Option<&CellValue> {
        let col = self.column_index(label)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All values of one column, top to bottom.
    pub fn column_values(&self, label: &str) -> Option<Vec<&CellValue>> {
        let col = self.column_index(label)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// One JSON object per row, keys in column order.
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(label, cell)| {
                        let value = match cell {
                            CellValue::Null => serde_json::Value::Null,
                            CellValue::Integer(n) => serde_json::Value::from(*n),
                            CellValue::Text(s) => serde_json::Value::String(s.clone()),
                        };
                        (label.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnType {
    Text,
    NullableInteger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Ordered column label → type mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetSchema {
    columns: Vec<(String, ColumnType)>,
}

impl TargetSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, label: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push((label.into(), column_type));
        self
    }

    /// The layout of the Rol de Procedimentos annex table.
    pub fn rol_procedimentos() -> Self {
        [
            "PROCEDIMENTO",
            "RN (alteração)",
            "VIGÊNCIA",
            "OD",
            "AMB",
            "HCO",
            "HSO",
            "REF",
            "PAC",
            "DUT",
            "SUBGRUPO",
            "GRUPO",
            "CAPÍTULO",
        ]
        .into_iter()
        .fold(Self::new(), |schema, label| {
            let column_type = if label == "DUT" {
                ColumnType::NullableInteger
            } else {
                ColumnType::Text
            };
            schema.with_column(label, column_type)
        })
    }

    pub fn columns(&self) -> &[(String, ColumnType)] {
        &self.columns
    }

    pub fn get(&self, label: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, t)| *t)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<Vec<ColumnSpec>> for TargetSchema {
    fn from(specs: Vec<ColumnSpec>) -> Self {
        Self {
            columns: specs
                .into_iter()
                .map(|spec| (spec.name, spec.column_type))
                .collect(),
        }
    }
}

/// Column label → (code → long-form description).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegendMap {
    columns: HashMap<String, HashMap<String, String>>,
}

impl LegendMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(
        mut self,
        column: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.columns
            .entry(column.into())
            .or_default()
            .insert(code.into(), description.into());
        self
    }

    /// The footer legend of the annex, applied to its `OD` and `AMB` columns.
    pub fn rol_procedimentos() -> Self {
        let footer = [("OD", "Seg. Odontológica"), ("AMB", "Seg. Ambulatorial")];
        ["OD", "AMB"]
            .into_iter()
            .flat_map(|column| footer.iter().map(move |(code, desc)| (column, *code, *desc)))
            .fold(Self::new(), |legend, (column, code, desc)| {
                legend.with_code(column, code, desc)
            })
    }

    pub fn codes_for(&self, column: &str) -> Option<&HashMap<String, String>> {
        self.columns.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<HashMap<String, HashMap<String, String>>> for LegendMap {
    fn from(columns: HashMap<String, HashMap<String, String>>) -> Self {
        Self { columns }
    }
}

/// Counters collected while a run normalizes its tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub pages: usize,
    pub tables_collected: usize,
    pub tables_skipped: usize,
    pub rows_unified: usize,
    pub rows_dropped: usize,
    pub legend_substitutions: usize,
    pub integer_misses: usize,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: UnifiedTable,
    pub stats: TransformStats,
    pub csv_output: String,
}
