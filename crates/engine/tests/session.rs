use skugrid_engine::header::{canonical_header, repair_header};
use skugrid_engine::model::{cell_text, text_row, ColumnDef, Row, Sheet, SpecValue, Specification};
use skugrid_engine::validation::{find_duplicate_skus, ValidationKind};
use skugrid_engine::{Catalog, CatalogSession, SkuSettings};

fn product_specs() -> Vec<Specification> {
    vec![
        Specification::new("temp", "Temperature", 0)
            .with_value(SpecValue::new("t29", "29deg C", "29C"))
            .with_value(SpecValue::new("t35", "35deg C", "35C")),
        Specification::new("color", "Color", 1)
            .with_value(SpecValue::new("red", "Red", "R"))
            .with_value(SpecValue::new("blue", "Blue", "B")),
        Specification::new("type", "Type", 2)
            .with_value(SpecValue::new("std", "Standard", "STD"))
            .with_value(SpecValue::new("pro", "Pro", "PRO")),
    ]
}

fn product_sheet() -> Sheet {
    let mut sheet = Sheet::new("products", "Products");
    sheet.specifications = product_specs();
    sheet.columns = vec![
        ColumnDef::sku("sku", "SKU"),
        ColumnDef::spec("c-temp", "temp", "Temperature"),
        ColumnDef::spec("c-color", "color", "Color"),
        ColumnDef::spec("c-type", "type", "Type"),
    ];
    sheet
}

fn loaded_session(rows: Vec<Row>) -> CatalogSession {
    let mut session = CatalogSession::new(
        Catalog::new(product_sheet()),
        SkuSettings::default().with_delimiter("-"),
    );
    session.load_rows(rows);
    session
}

fn skus(session: &CatalogSession) -> Vec<String> {
    session.sheet().rows.iter().map(|r| cell_text(r, 0)).collect()
}

fn color_of_row(session: &CatalogSession, row: usize) -> String {
    cell_text(&session.sheet().rows[row], 2)
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn end_to_end_compose_and_recompose() {
    let mut session = loaded_session(vec![
        text_row(&["", "29deg C", "Red", "Standard"]),
        text_row(&["", "35deg C", "Red", "Pro"]),
    ]);
    assert_eq!(skus(&session), vec!["29C-R-STD", "35C-R-PRO"]);

    let mut display = session.display();
    display[0][2].as_mut().unwrap().value = Some("Blue".into());
    let outcome = session.apply_display_edit(&display);

    assert_eq!(outcome.changed_rows, vec![0]);
    assert_eq!(skus(&session), vec!["29C-B-STD", "35C-R-PRO"]);
}

#[test]
fn stale_values_are_stored_but_flagged() {
    let mut session = loaded_session(vec![text_row(&["", "29deg C", "Red", "Standard"])]);
    assert!(session.set_cell(0, 2, "Purple"));

    assert_eq!(color_of_row(&session, 0), "Purple");
    assert_eq!(skus(&session), vec!["29C-STD"]);
    let errors = session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ValidationKind::StaleValue);
    assert_eq!((errors[0].row, errors[0].column), (0, 2));
}

#[test]
fn duplicate_detection_matches_reference_case() {
    let rows = vec![text_row(&["R-S"]), text_row(&["B-L"]), text_row(&["R-S"])];
    let flagged: Vec<usize> = find_duplicate_skus(&rows).iter().map(|e| e.row).collect();
    assert_eq!(flagged, vec![0, 2]);
}

// -------------------------------------------------------------------------
// Undo / redo
// -------------------------------------------------------------------------

#[test]
fn undo_redo_trace() {
    let mut session = loaded_session(vec![text_row(&["", "29deg C", "Red", "Standard"])]);
    assert!(session.history().is_empty());

    // Edit A: Red -> Blue
    session.set_cell(0, 2, "Blue");
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().cursor(), None);

    // Edit B: Standard -> Pro
    session.set_cell(0, 3, "Pro");
    assert_eq!(session.history().len(), 2);
    assert_eq!(skus(&session), vec!["29C-B-PRO"]);

    // Undo -> state before B, live saved at the end.
    assert!(session.undo());
    assert_eq!(skus(&session), vec!["29C-B-STD"]);
    assert_eq!(session.history().cursor(), Some(1));
    assert_eq!(session.history().len(), 3);

    // Undo -> state before A.
    assert!(session.undo());
    assert_eq!(skus(&session), vec!["29C-R-STD"]);
    assert_eq!(session.history().cursor(), Some(0));
    assert!(!session.undo());

    // Redo -> state before B.
    assert!(session.redo());
    assert_eq!(skus(&session), vec!["29C-B-STD"]);
    assert_eq!(session.history().cursor(), Some(1));

    // Redo -> live.
    assert!(session.redo());
    assert_eq!(skus(&session), vec!["29C-B-PRO"]);
    assert_eq!(session.history().cursor(), None);
    assert!(!session.redo());
}

#[test]
fn edit_after_undo_drops_redo_branch() {
    let mut session = loaded_session(vec![text_row(&["", "29deg C", "Red", "Standard"])]);
    session.set_cell(0, 2, "Blue");
    session.set_cell(0, 3, "Pro");
    session.undo();

    session.set_cell(0, 1, "35deg C");
    assert_eq!(skus(&session), vec!["35C-B-STD"]);
    assert_eq!(session.history().cursor(), None);
    assert!(!session.can_redo());
}

#[test]
fn bulk_load_clears_history() {
    let mut session = loaded_session(vec![text_row(&["", "29deg C", "Red", "Standard"])]);
    session.set_cell(0, 2, "Blue");
    assert!(session.can_undo());

    session.load_rows(vec![text_row(&["", "35deg C", "Blue", "Pro"])]);
    assert!(!session.can_undo());
    assert_eq!(skus(&session), vec!["35C-B-PRO"]);
}

// -------------------------------------------------------------------------
// Header repair
// -------------------------------------------------------------------------

#[test]
fn header_repair_after_spec_reorder() {
    let mut specs = product_specs();
    let header = text_row(&canonical_header(&specs, "SKU"));
    let matrix = vec![header, text_row(&["", "29deg C", "Red", "Standard"])];
    assert!(matches!(
        repair_header(&matrix, &specs, "SKU"),
        std::borrow::Cow::Borrowed(_)
    ));

    // Move Type to the front: the stored header is now stale.
    specs[2].order = -1;
    let repaired = repair_header(&matrix, &specs, "SKU");
    assert_eq!(repaired.len(), 3);
    assert_eq!(cell_text(&repaired[0], 1), "Type");
    assert_eq!(repaired[1], matrix[0]);
}
