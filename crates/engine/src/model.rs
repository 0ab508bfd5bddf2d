//! Canonical record model for a SKU catalog sheet.
//!
//! Rows are fixed-arity records read through [`cell_text`]: any column past the
//! end of a row is treated as an empty cell. Nothing here relies on sparse
//! arrays or ambient state.

use serde::{Deserialize, Serialize};

// ============================================================================
// Specifications
// ============================================================================

/// One allowed value of a specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecValue {
    pub id: String,
    /// What the user picks in the grid.
    pub display_value: String,
    /// What this value contributes to a SKU. May be empty.
    #[serde(default)]
    pub sku_fragment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SpecValue {
    pub fn new(
        id: impl Into<String>,
        display_value: impl Into<String>,
        sku_fragment: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_value: display_value.into(),
            sku_fragment: sku_fragment.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A named product attribute with an ordered list of allowed values.
///
/// `order` decides where the attribute's fragment lands in a composed SKU,
/// independent of which column the attribute is shown in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub values: Vec<SpecValue>,
}

impl Specification {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: SpecValue) -> Self {
        self.values.push(value);
        self
    }

    /// Find the value whose display label matches `text` exactly.
    pub fn value_for(&self, text: &str) -> Option<&SpecValue> {
        self.values.iter().find(|v| v.display_value == text)
    }

    /// True if any value carries a color.
    pub fn has_colors(&self) -> bool {
        self.values.iter().any(|v| v.color.is_some())
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Role a column plays in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// The identifier column. Always column 0, system-written.
    Sku,
    /// Bound to a specification; its value feeds SKU composition.
    Spec,
    /// Free text, never validated or composed.
    #[default]
    Free,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: String,
    pub kind: ColumnKind,
    /// Required iff `kind` is [`ColumnKind::Spec`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_id: Option<String>,
    pub header: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

impl ColumnDef {
    pub fn sku(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ColumnKind::Sku,
            spec_id: None,
            header: header.into(),
            width: None,
        }
    }

    pub fn spec(id: impl Into<String>, spec_id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ColumnKind::Spec,
            spec_id: Some(spec_id.into()),
            header: header.into(),
            width: None,
        }
    }

    pub fn free(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ColumnKind::Free,
            spec_id: None,
            header: header.into(),
            width: None,
        }
    }
}

// ============================================================================
// Cells
// ============================================================================

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            _ => None,
        }
    }
}

/// Cell formatting. Every field is optional and independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    /// Background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    /// Font color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fc: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
}

impl CellStyle {
    pub fn is_empty(&self) -> bool {
        *self == CellStyle::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// String form used for comparison, composition and display text.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(default, skip_serializing_if = "CellStyle::is_empty")]
    pub style: CellStyle,
    #[serde(default)]
    pub is_checkbox: bool,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain text cell whose value and display text agree.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        Self {
            value: Some(CellValue::Text(s.clone())),
            display_text: Some(s),
            ..Self::default()
        }
    }

    pub fn checkbox(checked: bool) -> Self {
        Self {
            value: Some(CellValue::Bool(checked)),
            is_checkbox: true,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    /// Cell text: the value's string form when non-empty, else the display
    /// text, else "".
    pub fn text_value(&self) -> String {
        if let Some(value) = &self.value {
            let s = value.as_text();
            if !s.is_empty() {
                return s;
            }
        }
        self.display_text.clone().unwrap_or_default()
    }

    /// Overwrite value and display text with the same string.
    pub fn set_text(&mut self, s: &str) {
        self.value = Some(CellValue::Text(s.to_string()));
        self.display_text = Some(s.to_string());
    }
}

pub type Row = Vec<Cell>;

/// Text of the cell at `col`, or "" when the row is too short.
pub fn cell_text(row: &[Cell], col: usize) -> String {
    row.get(col).map(Cell::text_value).unwrap_or_default()
}

/// Build a row of text cells. Handy for tests and importers.
pub fn text_row<S: AsRef<str>>(values: &[S]) -> Row {
    values.iter().map(|v| Cell::text(v.as_ref())).collect()
}

// ============================================================================
// Sheets
// ============================================================================

/// Saved `{rows, columns}` pair used by the edit history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub specifications: Vec<Specification>,
}

impl Sheet {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Header text for every column, in column order.
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
        }
    }

    /// Indices of `Spec` columns whose specification is missing from this sheet.
    pub fn dangling_spec_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, col)| col.kind == ColumnKind::Spec)
            .filter(|(_, col)| match &col.spec_id {
                Some(id) => !self.specifications.iter().any(|s| &s.id == id),
                None => true,
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_value_prefers_value() {
        let cell = Cell {
            value: Some(CellValue::text("Red")),
            display_text: Some("ignored".to_string()),
            ..Cell::default()
        };
        assert_eq!(cell.text_value(), "Red");
    }

    #[test]
    fn test_text_value_falls_back_to_display_text() {
        let cell = Cell {
            value: Some(CellValue::text("")),
            display_text: Some("Blue".to_string()),
            ..Cell::default()
        };
        assert_eq!(cell.text_value(), "Blue");
        assert_eq!(Cell::new().text_value(), "");
    }

    #[test]
    fn test_number_text_drops_integral_fraction() {
        assert_eq!(CellValue::Number(42.0).as_text(), "42");
        assert_eq!(CellValue::Number(2.5).as_text(), "2.5");
        assert_eq!(CellValue::Bool(true).as_text(), "true");
    }

    #[test]
    fn test_cell_text_out_of_range_is_empty() {
        let row = text_row(&["SKU-1", "Red"]);
        assert_eq!(cell_text(&row, 1), "Red");
        assert_eq!(cell_text(&row, 7), "");
    }

    #[test]
    fn test_dangling_spec_columns() {
        let mut sheet = Sheet::new("s1", "Products");
        sheet.specifications.push(Specification::new("color", "Color", 0));
        sheet.columns = vec![
            ColumnDef::sku("c0", "SKU"),
            ColumnDef::spec("c1", "color", "Color"),
            ColumnDef::spec("c2", "size", "Size"),
            ColumnDef::free("c3", "Notes"),
        ];
        assert_eq!(sheet.dangling_spec_columns(), vec![2]);
    }

    #[test]
    fn test_cell_value_deserializes_untagged() {
        let v: CellValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, CellValue::Bool(true));
        let v: CellValue = serde_json::from_str("3").unwrap();
        assert_eq!(v, CellValue::Number(3.0));
        let v: CellValue = serde_json::from_str("\"Red\"").unwrap();
        assert_eq!(v, CellValue::text("Red"));
    }

    #[test]
    fn test_style_is_empty() {
        assert!(CellStyle::default().is_empty());
        let style = CellStyle { bold: true, ..CellStyle::default() };
        assert!(!style.is_empty());
    }
}
