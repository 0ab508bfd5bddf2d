//! Edit session over a catalog of sheets.
//!
//! Every mutation goes through one pipeline: detect changed rows against the
//! previous state, recompute their SKUs, store, revalidate, and record the
//! pre-edit snapshot when something changed. Undo and redo feed snapshots back
//! through the same pipeline with history recording suspended.
//!
//! All methods take `&mut self` and run to completion, so passes never
//! interleave.

use serde::{Deserialize, Serialize};

use crate::compose::SkuSettings;
use crate::grid::{from_display, to_display, DisplayMatrix, DisplayRow};
use crate::history::History;
use crate::model::{Cell, Row, Sheet, Snapshot, Specification};
use crate::propagate::{column_headers, process_auto_sku, process_auto_sku_for_all_rows, SkuContext};
use crate::validation::{validate, ValidationError};

// ============================================================================
// Catalog
// ============================================================================

/// An ordered set of sheets with one active sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    sheets: Vec<Sheet>,
    active_sheet: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Sheet::new("sheet-1", "Sheet1"))
    }
}

impl Catalog {
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheets: vec![sheet],
            active_sheet: 0,
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn active_sheet_index(&self) -> usize {
        self.active_sheet
    }

    pub fn active_sheet(&self) -> &Sheet {
        &self.sheets[self.active_sheet]
    }

    pub fn active_sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheets[self.active_sheet]
    }

    /// Append a sheet and return its index.
    pub fn add_sheet(&mut self, sheet: Sheet) -> usize {
        self.sheets.push(sheet);
        self.sheets.len() - 1
    }

    pub fn set_active_sheet(&mut self, index: usize) -> bool {
        if index < self.sheets.len() {
            self.active_sheet = index;
            true
        } else {
            false
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// What a single pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Rows whose attributes changed and whose SKUs were recomputed.
    pub changed_rows: Vec<usize>,
    /// True if the pre-edit state was pushed onto the history.
    pub recorded: bool,
}

#[derive(Debug, Clone)]
pub struct CatalogSession {
    catalog: Catalog,
    settings: SkuSettings,
    history: History,
    errors: Vec<ValidationError>,
}

impl CatalogSession {
    pub fn new(catalog: Catalog, settings: SkuSettings) -> Self {
        Self::with_history(catalog, settings, History::new())
    }

    pub fn with_history(catalog: Catalog, settings: SkuSettings, history: History) -> Self {
        let mut session = Self {
            catalog,
            settings,
            history,
            errors: Vec::new(),
        };
        session.revalidate();
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sheet(&self) -> &Sheet {
        self.catalog.active_sheet()
    }

    pub fn settings(&self) -> &SkuSettings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Findings from the last pass.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// The active sheet rendered for the display widget.
    pub fn display(&self) -> DisplayMatrix {
        let sheet = self.sheet();
        to_display(&sheet.rows, &sheet.columns, &sheet.specifications)
    }

    // ------------------------------------------------------------------------
    // Live edits
    // ------------------------------------------------------------------------

    /// Take the widget's full matrix after a user edit.
    pub fn apply_display_edit(&mut self, matrix: &[DisplayRow]) -> EditOutcome {
        self.commit_rows(from_display(matrix))
    }

    /// Set one attribute cell. Column 0 is system-written and refused, as are
    /// rows that do not exist.
    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> bool {
        if col == 0 {
            log::debug!("session: refusing direct edit of SKU cell at row {}", row);
            return false;
        }
        let mut rows = self.sheet().rows.clone();
        let Some(target) = rows.get_mut(row) else {
            return false;
        };
        if target.len() <= col {
            target.resize_with(col + 1, Cell::default);
        }
        target[col].set_text(text);
        self.commit_rows(rows);
        true
    }

    /// Append an empty row sized to the current columns. Returns its index.
    pub fn add_row(&mut self) -> usize {
        let mut rows = self.sheet().rows.clone();
        let width = self.sheet().columns.len().max(1);
        rows.push(vec![Cell::default(); width]);
        let index = rows.len() - 1;
        self.commit_rows(rows);
        index
    }

    pub fn delete_row(&mut self, row: usize) -> bool {
        let mut rows = self.sheet().rows.clone();
        if row >= rows.len() {
            return false;
        }
        rows.remove(row);
        self.commit_rows(rows);
        true
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let live = self.sheet().snapshot();
        match self.history.undo(live) {
            Some(target) => {
                self.apply_snapshot(target);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(target) => {
                self.apply_snapshot(target);
                true
            }
            None => false,
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Snapshot { rows, columns } = snapshot;
        self.catalog.active_sheet_mut().columns = columns;
        self.commit_rows(rows);
        self.history.finish_apply();
    }

    // ------------------------------------------------------------------------
    // Bulk operations
    // ------------------------------------------------------------------------

    /// Replace the active sheet's rows after an import. Every SKU is
    /// recomputed and history is cleared.
    pub fn load_rows(&mut self, mut rows: Vec<Row>) {
        {
            let sheet = self.catalog.active_sheet();
            let headers = column_headers(&sheet.columns);
            let ctx = SkuContext::new(&headers, &sheet.specifications, &self.settings);
            process_auto_sku_for_all_rows(&mut rows, &ctx);
        }
        self.catalog.active_sheet_mut().rows = rows;
        self.history.clear();
        self.revalidate();
    }

    /// Replace the active sheet wholesale (rows, columns and specifications).
    pub fn load_sheet(&mut self, mut sheet: Sheet) {
        let rows = std::mem::take(&mut sheet.rows);
        *self.catalog.active_sheet_mut() = sheet;
        self.load_rows(rows);
    }

    /// Switch sheets. History never spans sheets.
    pub fn set_active_sheet(&mut self, index: usize) -> bool {
        if !self.catalog.set_active_sheet(index) {
            return false;
        }
        self.history.clear();
        self.revalidate();
        true
    }

    pub fn add_sheet(&mut self, sheet: Sheet) -> usize {
        self.catalog.add_sheet(sheet)
    }

    /// React to registry drift: take the current specifications, recompute
    /// every SKU and revalidate. Not recorded as an edit.
    pub fn refresh_specifications(&mut self, specs: Vec<Specification>) {
        let sheet = self.catalog.active_sheet_mut();
        sheet.specifications = specs;
        let headers = column_headers(&sheet.columns);
        let ctx = SkuContext::new(&headers, &sheet.specifications, &self.settings);
        process_auto_sku_for_all_rows(&mut sheet.rows, &ctx);
        self.revalidate();
    }

    pub fn set_settings(&mut self, settings: SkuSettings) {
        self.settings = settings;
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    fn commit_rows(&mut self, mut rows: Vec<Row>) -> EditOutcome {
        let sheet = self.catalog.active_sheet();
        let headers = column_headers(&sheet.columns);
        let ctx = SkuContext::new(&headers, &sheet.specifications, &self.settings);
        let changed_rows = process_auto_sku(&sheet.rows, &mut rows, &ctx);

        let recorded = if changed_rows.is_empty() {
            false
        } else {
            self.history.record_edit(sheet.snapshot())
        };

        self.catalog.active_sheet_mut().rows = rows;
        self.revalidate();

        EditOutcome { changed_rows, recorded }
    }

    fn revalidate(&mut self) {
        let sheet = self.catalog.active_sheet();
        self.errors = validate(&sheet.rows, &sheet.columns, &sheet.specifications);
        if !self.errors.is_empty() {
            log::debug!("validation: {} finding(s) on '{}'", self.errors.len(), sheet.name);
        }
    }
}
