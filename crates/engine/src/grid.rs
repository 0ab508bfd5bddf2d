//! Translation between the canonical record model and the display grid.
//!
//! The display widget works with [`DisplayCell`]s: read-only flags, dropdown
//! metadata and a single style token string. The canonical model keeps a
//! structured [`CellStyle`]; the token only exists on this boundary.
//!
//! Style token format: `;`-separated entries, any order:
//! `bg:<color>`, `fc:<color>`, `bold`, `italic`, `align:<left|center|right>`.
//! Unknown entries are ignored when decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Alignment, Cell, CellStyle, CellValue, ColumnDef, ColumnKind, Row, Specification};
use crate::registry::SpecRegistry;

// ============================================================================
// Display types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCell {
    pub value: Option<CellValue>,
    #[serde(default)]
    pub read_only: bool,
    /// Allowed values, for cells in a spec column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropdown_options: Option<Vec<String>>,
    /// display value -> color, when the specification defines colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_colors: Option<BTreeMap<String, String>>,
    /// Color of the currently selected value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub is_checkbox: bool,
}

/// `None` is an empty slot in the widget's matrix.
pub type DisplayRow = Vec<Option<DisplayCell>>;
pub type DisplayMatrix = Vec<DisplayRow>;

// ============================================================================
// Canonical -> display
// ============================================================================

/// Render canonical rows for the display widget.
///
/// Columns past the end of `columns` are treated as `Free`.
pub fn to_display(
    rows: &[Row],
    columns: &[ColumnDef],
    specs: &[Specification],
) -> DisplayMatrix {
    let registry = SpecRegistry::new(specs, columns);
    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| Some(display_cell(cell, col, &registry)))
                .collect()
        })
        .collect()
}

fn display_cell(cell: &Cell, col: usize, registry: &SpecRegistry<'_>) -> DisplayCell {
    let value = if cell.is_checkbox {
        Some(CellValue::Bool(checkbox_state(cell)))
    } else {
        shown_value(cell)
    };

    let mut out = DisplayCell {
        value,
        style: encode_style(&cell.style),
        is_checkbox: cell.is_checkbox,
        ..DisplayCell::default()
    };

    match registry.column_kind(col) {
        ColumnKind::Sku => out.read_only = true,
        ColumnKind::Spec => {
            if let Some(spec) = registry.bound_spec(col) {
                out.dropdown_options = Some(registry.display_values(&spec.id));
                out.option_colors = registry.color_map(&spec.id);
                if out.option_colors.is_some() {
                    let current = cell.text_value();
                    out.value_color = registry
                        .color_of(&spec.id, current.trim())
                        .map(str::to_string);
                }
            }
        }
        ColumnKind::Free => {}
    }

    out
}

/// The stored value, unless its text is empty and display text exists. Same
/// fallback as `Cell::text_value`.
fn shown_value(cell: &Cell) -> Option<CellValue> {
    match (&cell.value, &cell.display_text) {
        (Some(value), _) if !value.as_text().is_empty() => Some(value.clone()),
        (_, Some(text)) => Some(CellValue::Text(text.clone())),
        (value, None) => value.clone(),
    }
}

/// Strict boolean for a checkbox cell, whatever was stored.
fn checkbox_state(cell: &Cell) -> bool {
    match &cell.value {
        Some(CellValue::Bool(b)) => *b,
        Some(CellValue::Text(s)) => s == "true" || s == "TRUE",
        Some(CellValue::Number(_)) => false,
        None => matches!(cell.display_text.as_deref(), Some("true") | Some("TRUE")),
    }
}

// ============================================================================
// Display -> canonical
// ============================================================================

/// Convert the widget's matrix back to canonical rows.
///
/// Empty slots become empty cells. Non-checkbox cells get their display text
/// set to the value's string form; checkbox cells carry no display text.
pub fn from_display(matrix: &[DisplayRow]) -> Vec<Row> {
    matrix
        .iter()
        .map(|row| row.iter().map(|slot| record_cell(slot.as_ref())).collect())
        .collect()
}

fn record_cell(slot: Option<&DisplayCell>) -> Cell {
    let Some(cell) = slot else {
        return Cell::default();
    };
    let display_text = if cell.is_checkbox {
        None
    } else {
        cell.value.as_ref().map(CellValue::as_text)
    };
    Cell {
        value: cell.value.clone(),
        display_text,
        style: cell.style.as_deref().map(decode_style).unwrap_or_default(),
        is_checkbox: cell.is_checkbox,
    }
}

// ============================================================================
// Style tokens
// ============================================================================

/// Fold a structured style into one token. `None` for an empty style.
pub fn encode_style(style: &CellStyle) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(bg) = &style.bg {
        parts.push(format!("bg:{}", bg));
    }
    if let Some(fc) = &style.fc {
        parts.push(format!("fc:{}", fc));
    }
    if style.bold {
        parts.push("bold".to_string());
    }
    if style.italic {
        parts.push("italic".to_string());
    }
    if let Some(align) = style.align {
        parts.push(format!("align:{}", align.as_str()));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(";"))
    }
}

/// Extract discrete style fields from a token.
pub fn decode_style(token: &str) -> CellStyle {
    let mut style = CellStyle::default();
    for part in token.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = match part.split_once(':') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (part, None),
        };
        match (key, value) {
            ("bg", Some(v)) if !v.is_empty() => style.bg = Some(v.to_string()),
            ("fc", Some(v)) if !v.is_empty() => style.fc = Some(v.to_string()),
            ("bold", None) => style.bold = true,
            ("italic", None) => style.italic = true,
            ("align", Some(v)) => style.align = Alignment::parse(v),
            _ => {}
        }
    }
    style
}
