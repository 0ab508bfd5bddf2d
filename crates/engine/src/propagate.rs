//! Auto-SKU propagation: writes composed SKUs back into column 0.
//!
//! All functions here mutate the matrix they are given.

use crate::change::find_changed_rows;
use crate::compose::{compose_sku, SkuSettings};
use crate::model::{Cell, ColumnDef, Row, Specification};

/// Everything the composer needs besides the row itself.
#[derive(Debug, Clone, Copy)]
pub struct SkuContext<'a> {
    /// Header of every column, identifier column included.
    pub headers: &'a [String],
    pub specs: &'a [Specification],
    pub settings: &'a SkuSettings,
}

impl<'a> SkuContext<'a> {
    pub fn new(headers: &'a [String], specs: &'a [Specification], settings: &'a SkuSettings) -> Self {
        Self { headers, specs, settings }
    }
}

/// Column headers in column order.
pub fn column_headers(columns: &[ColumnDef]) -> Vec<String> {
    columns.iter().map(|c| c.header.clone()).collect()
}

/// Recompute the SKU of a single row.
///
/// Out-of-range rows and an empty header set are no-ops. A row shorter than
/// the header set is padded with empty cells before the write.
pub fn update_row_sku(rows: &mut [Row], row_index: usize, ctx: &SkuContext<'_>) {
    if ctx.headers.is_empty() {
        return;
    }
    let Some(row) = rows.get_mut(row_index) else {
        return;
    };

    if row.len() < ctx.headers.len() {
        row.resize_with(ctx.headers.len(), Cell::default);
    }

    let values: Vec<String> = row[1..].iter().map(Cell::text_value).collect();
    let sku = compose_sku(&values, &ctx.headers[1..], ctx.specs, ctx.settings);
    row[0].set_text(&sku);
}

/// Recompute SKUs for the rows that changed between `old` and `new`.
///
/// Returns the changed row indices. `old` must be the state before this edit;
/// `new` is rewritten in place.
pub fn process_auto_sku(old: &[Row], new: &mut [Row], ctx: &SkuContext<'_>) -> Vec<usize> {
    let changed = find_changed_rows(old, new);
    for &idx in &changed {
        update_row_sku(new, idx, ctx);
    }
    log::debug!("auto-sku: {} changed row(s) recomputed", changed.len());
    changed
}

/// Recompute every row's SKU. Used after a bulk load, where there is no
/// previous matrix to diff against.
pub fn process_auto_sku_for_all_rows(rows: &mut [Row], ctx: &SkuContext<'_>) {
    for idx in 0..rows.len() {
        update_row_sku(rows, idx, ctx);
    }
    log::debug!("auto-sku: recomputed all {} row(s)", rows.len());
}
