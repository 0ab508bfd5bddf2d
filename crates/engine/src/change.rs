//! Row-level change detection between two canonical matrices.

use crate::model::{cell_text, Cell, Row};

/// Indices of rows whose attribute cells differ between `previous` and `current`.
///
/// Column 0 (the SKU) is never compared. Cells are compared by trimmed text.
/// A row missing from either side, or with a different length, is always
/// reported.
///
/// `previous` must be captured before any propagation runs on `current`.
pub fn find_changed_rows(previous: &[Row], current: &[Row]) -> Vec<usize> {
    let len = previous.len().max(current.len());
    (0..len)
        .filter(|&idx| match (previous.get(idx), current.get(idx)) {
            (Some(old), Some(new)) => row_changed(old, new),
            _ => true,
        })
        .collect()
}

fn row_changed(old: &[Cell], new: &[Cell]) -> bool {
    if old.len() != new.len() {
        return true;
    }
    (1..new.len()).any(|col| cell_text(old, col).trim() != cell_text(new, col).trim())
}
