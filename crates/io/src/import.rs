//! Bulk import: raw matrix to a ready catalog sheet.
//!
//! Row 0 is taken as the header as given, so spec columns may appear in any
//! order next to free columns. Header repair only runs when row 0 names no
//! column at all, or when the caller forces it. Columns are then derived from
//! the header and SKUs propagated over every data row. The result carries no
//! history.

use std::path::Path;

use skugrid_engine::header::repair_header;
use skugrid_engine::model::{cell_text, Cell, ColumnDef, Row, Sheet, Specification};
use skugrid_engine::propagate::{column_headers, process_auto_sku_for_all_rows, SkuContext};
use skugrid_engine::registry::SpecRegistry;
use skugrid_engine::SkuSettings;

use crate::error::IoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Header text of the identifier column.
    pub sku_header: String,
    /// Prepend the canonical header whenever row 0 does not match it exactly,
    /// even if row 0 already names columns.
    pub repair_header: bool,
    /// `None` = sniff from the file.
    pub delimiter: Option<u8>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            sku_header: "SKU".to_string(),
            repair_header: false,
            delimiter: None,
        }
    }
}

/// Column 0 is the identifier column. A header equal to a specification name
/// binds that specification; anything else is free text.
pub fn derive_columns(header: &[Cell], specs: &[Specification], sku_header: &str) -> Vec<ColumnDef> {
    let registry = SpecRegistry::new(specs, &[]);
    let width = header.len().max(1);

    (0..width)
        .map(|col| {
            let text = cell_text(header, col).trim().to_string();
            let id = format!("col-{}", col);
            if col == 0 {
                let text = if text.is_empty() { sku_header.to_string() } else { text };
                return ColumnDef::sku(id, text);
            }
            match registry.spec_by_name(&text) {
                Some(spec) => ColumnDef::spec(id, spec.id.clone(), text),
                None => ColumnDef::free(id, text),
            }
        })
        .collect()
}

/// True if `row` reads as a header: column 0 is the identifier header or some
/// other cell names a specification.
pub fn looks_like_header(row: &[Cell], specs: &[Specification], sku_header: &str) -> bool {
    if cell_text(row, 0).trim() == sku_header.trim() {
        return true;
    }
    let registry = SpecRegistry::new(specs, &[]);
    (1..row.len()).any(|col| registry.spec_by_name(cell_text(row, col).trim()).is_some())
}

/// Turn a raw matrix (header row first) into a sheet with SKUs filled in.
pub fn build_sheet(
    name: &str,
    matrix: Vec<Row>,
    specs: Vec<Specification>,
    options: &ImportOptions,
    settings: &SkuSettings,
) -> Sheet {
    let headerless = matrix
        .first()
        .is_some_and(|row| !looks_like_header(row, &specs, &options.sku_header));
    let mut matrix = if options.repair_header || headerless {
        repair_header(&matrix, &specs, &options.sku_header).into_owned()
    } else {
        matrix
    };

    let header = if matrix.is_empty() {
        Vec::new()
    } else {
        matrix.remove(0)
    };
    let columns = derive_columns(&header, &specs, &options.sku_header);
    let mut rows = matrix;

    let headers = column_headers(&columns);
    let ctx = SkuContext::new(&headers, &specs, settings);
    process_auto_sku_for_all_rows(&mut rows, &ctx);
    log::debug!(
        "import: {} row(s), {} column(s) into sheet '{}'",
        rows.len(),
        columns.len(),
        name
    );

    let mut sheet = Sheet::new(name.to_lowercase(), name);
    sheet.columns = columns;
    sheet.rows = rows;
    sheet.specifications = specs;

    let dangling = sheet.dangling_spec_columns();
    if !dangling.is_empty() {
        log::warn!("import: spec columns {:?} have no specification", dangling);
    }
    sheet
}

/// Read a delimited file and run the import pipeline on it.
pub fn import_sheet(
    path: &Path,
    specs: Vec<Specification>,
    options: &ImportOptions,
    settings: &SkuSettings,
) -> Result<Sheet, IoError> {
    let matrix = crate::csv::read_matrix(path, options.delimiter)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1");
    Ok(build_sheet(name, matrix, specs, options, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skugrid_engine::model::{text_row, ColumnKind};
    use skugrid_engine::SpecValue;

    fn specs() -> Vec<Specification> {
        vec![
            Specification::new("color", "Color", 1)
                .with_value(SpecValue::new("red", "Red", "R"))
                .with_value(SpecValue::new("blue", "Blue", "B")),
            Specification::new("size", "Size", 0).with_value(SpecValue::new("s", "Small", "S")),
        ]
    }

    #[test]
    fn test_derive_columns() {
        let header = text_row(&["", "Color", "Notes", " Size "]);
        let columns = derive_columns(&header, &specs(), "SKU");
        let kinds: Vec<ColumnKind> = columns.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ColumnKind::Sku, ColumnKind::Spec, ColumnKind::Free, ColumnKind::Spec]);
        assert_eq!(columns[0].header, "SKU");
        assert_eq!(columns[3].spec_id.as_deref(), Some("size"));
    }

    #[test]
    fn test_canonical_header_is_used_directly() {
        let matrix = vec![text_row(&["SKU", "Size", "Color"]), text_row(&["", "Small", "Blue"])];
        let sheet = build_sheet("Shirts", matrix, specs(), &ImportOptions::default(), &SkuSettings::default());
        assert_eq!(sheet.headers(), vec!["SKU", "Size", "Color"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(cell_text(&sheet.rows[0], 0), "S-B");
    }

    #[test]
    fn test_looks_like_header() {
        assert!(looks_like_header(&text_row(&["SKU"]), &specs(), "SKU"));
        assert!(looks_like_header(&text_row(&["Code", "Notes", "Color"]), &specs(), "SKU"));
        assert!(!looks_like_header(&text_row(&["", "Small", "Red"]), &specs(), "SKU"));
        assert!(!looks_like_header(&[], &specs(), "SKU"));
    }

    #[test]
    fn test_reordered_header_binds_columns_by_name() {
        let matrix = vec![text_row(&["SKU", "Color", "Size"]), text_row(&["", "Red", "Small"])];
        let sheet = build_sheet("Shirts", matrix, specs(), &ImportOptions::default(), &SkuSettings::default());
        assert_eq!(sheet.headers(), vec!["SKU", "Color", "Size"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(cell_text(&sheet.rows[0], 0), "S-R");
    }

    #[test]
    fn test_free_column_is_kept() {
        let matrix = vec![
            text_row(&["SKU", "Size", "Color", "Notes"]),
            text_row(&["", "Small", "Red", "hi"]),
        ];
        let sheet = build_sheet("Shirts", matrix, specs(), &ImportOptions::default(), &SkuSettings::default());
        assert_eq!(sheet.headers(), vec!["SKU", "Size", "Color", "Notes"]);
        assert_eq!(sheet.columns[3].kind, ColumnKind::Free);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(cell_text(&sheet.rows[0], 0), "S-R");
        assert_eq!(cell_text(&sheet.rows[0], 3), "hi");
    }

    #[test]
    fn test_forced_repair_keeps_old_header_as_data() {
        let options = ImportOptions {
            repair_header: true,
            ..ImportOptions::default()
        };
        let matrix = vec![text_row(&["SKU", "Color", "Size"]), text_row(&["", "Red", "Small"])];
        let sheet = build_sheet("Shirts", matrix, specs(), &options, &SkuSettings::default());
        assert_eq!(sheet.headers(), vec!["SKU", "Size", "Color"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(cell_text(&sheet.rows[0], 1), "Color");
    }

    #[test]
    fn test_headerless_matrix_gets_canonical_header() {
        let matrix = vec![text_row(&["", "Small", "Red"])];
        let sheet = build_sheet("Shirts", matrix, specs(), &ImportOptions::default(), &SkuSettings::default());
        assert_eq!(sheet.headers(), vec!["SKU", "Size", "Color"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(cell_text(&sheet.rows[0], 0), "S-R");
    }

    #[test]
    fn test_custom_identifier_header_is_kept() {
        let matrix = vec![
            text_row(&["Code", "Color", "Notes"]),
            text_row(&["", "Red", "first"]),
        ];
        let sheet = build_sheet("Shirts", matrix, specs(), &ImportOptions::default(), &SkuSettings::default());
        assert_eq!(sheet.headers(), vec!["Code", "Color", "Notes"]);
        assert_eq!(cell_text(&sheet.rows[0], 0), "R");
    }

    #[test]
    fn test_empty_matrix() {
        let sheet = build_sheet("Empty", Vec::new(), specs(), &ImportOptions::default(), &SkuSettings::default());
        assert_eq!(sheet.headers(), vec!["SKU"]);
        assert!(sheet.rows.is_empty());
    }
}
