//! Catalog validation
//!
//! Derives advisory findings from the current rows. Nothing here mutates state
//! or blocks a write: invalid values stay in the sheet exactly as entered.
//!
//! ## Matching
//!
//! - **Stale values**: case-sensitive, trimmed. "Red" != "red".
//! - **Duplicate SKUs**: trimmed identifier text, empty identifiers ignored.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{cell_text, ColumnDef, ColumnKind, Row, Specification};
use crate::registry::SpecRegistry;

// ============================================================================
// Core Types
// ============================================================================

/// Which check produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationKind {
    /// A spec cell holds a value its specification no longer offers.
    StaleValue,
    /// Two or more rows share the same SKU.
    DuplicateSku,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationKind::StaleValue => write!(f, "stale-value"),
            ValidationKind::DuplicateSku => write!(f, "duplicate-sku"),
        }
    }
}

/// A single finding, addressed by row and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row: usize,
    pub column: usize,
    pub message: String,
    pub kind: ValidationKind,
}

// ============================================================================
// Checks
// ============================================================================

/// Spec cells whose text is not among the bound specification's values.
///
/// Empty cells are valid (unset). `Free` and `Sku` columns are never checked,
/// and a `Spec` column whose specification has disappeared is skipped.
/// Results are in row-major order.
pub fn find_stale_values(
    rows: &[Row],
    columns: &[ColumnDef],
    specs: &[Specification],
) -> Vec<ValidationError> {
    let registry = SpecRegistry::new(specs, columns);

    let spec_columns: Vec<(usize, &Specification)> = columns
        .iter()
        .enumerate()
        .filter(|(_, col)| col.kind == ColumnKind::Spec)
        .filter_map(|(idx, _)| registry.bound_spec(idx).map(|spec| (idx, spec)))
        .collect();

    let mut errors = Vec::new();
    for (row_idx, row) in rows.iter().enumerate() {
        for &(col_idx, spec) in &spec_columns {
            let text = cell_text(row, col_idx);
            let text = text.trim();
            if text.is_empty() || spec.value_for(text).is_some() {
                continue;
            }
            errors.push(ValidationError {
                row: row_idx,
                column: col_idx,
                message: format!("\"{}\" is not a valid value for {}", text, spec.name),
                kind: ValidationKind::StaleValue,
            });
        }
    }
    errors
}

/// Rows sharing a non-empty SKU.
///
/// Groups are reported in the order their SKU first appears; within a group,
/// rows are ascending. Every member of a group gets one finding listing all
/// rows of that group.
pub fn find_duplicate_skus(rows: &[Row]) -> Vec<ValidationError> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: FxHashMap<String, Vec<usize>> = FxHashMap::default();

    for (row_idx, row) in rows.iter().enumerate() {
        let sku = cell_text(row, 0).trim().to_string();
        if sku.is_empty() {
            continue;
        }
        groups
            .entry(sku.clone())
            .or_insert_with(|| {
                order.push(sku);
                Vec::new()
            })
            .push(row_idx);
    }

    let mut errors = Vec::new();
    for sku in &order {
        let members = &groups[sku];
        if members.len() < 2 {
            continue;
        }
        let listed = members
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        for &row_idx in members {
            errors.push(ValidationError {
                row: row_idx,
                column: 0,
                message: format!("Duplicate SKU \"{}\" in rows {}", sku, listed),
                kind: ValidationKind::DuplicateSku,
            });
        }
    }
    errors
}

/// All findings: stale values first, then duplicate SKUs.
pub fn validate(
    rows: &[Row],
    columns: &[ColumnDef],
    specs: &[Specification],
) -> Vec<ValidationError> {
    let mut errors = find_stale_values(rows, columns, specs);
    errors.extend(find_duplicate_skus(rows));
    errors
}
