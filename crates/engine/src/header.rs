//! Header repair for raw matrices coming from import or from a registry that
//! has drifted (renamed or reordered specifications).

use std::borrow::Cow;

use crate::model::{cell_text, text_row, Cell, Row, Specification};
use crate::registry::ordered_specs;

/// `[sku_header, spec names by order...]`
pub fn canonical_header(specs: &[Specification], sku_header: &str) -> Vec<String> {
    std::iter::once(sku_header.to_string())
        .chain(ordered_specs(specs).into_iter().map(|s| s.name.clone()))
        .collect()
}

/// True if `row` spells out `expected`, comparing trimmed text and ignoring
/// trailing empty cells.
pub fn is_canonical_header(row: &[Cell], expected: &[String]) -> bool {
    let mut len = row.len();
    while len > 0 && cell_text(row, len - 1).trim().is_empty() {
        len -= 1;
    }
    len == expected.len()
        && expected
            .iter()
            .enumerate()
            .all(|(col, name)| cell_text(row, col).trim() == name.trim())
}

/// Make sure row 0 of `matrix` is the canonical header.
///
/// Returns `Cow::Borrowed(matrix)` untouched when it already is, so callers can
/// detect the no-op with `matches!(.., Cow::Borrowed(_))` or pointer equality.
/// Otherwise the header is synthesized and every existing row shifts down by
/// one.
pub fn repair_header<'a>(
    matrix: &'a [Row],
    specs: &[Specification],
    sku_header: &str,
) -> Cow<'a, [Row]> {
    let expected = canonical_header(specs, sku_header);
    if let Some(first) = matrix.first() {
        if is_canonical_header(first, &expected) {
            return Cow::Borrowed(matrix);
        }
    }

    log::debug!("header repair: synthesizing header {:?}", expected);
    let mut repaired = Vec::with_capacity(matrix.len() + 1);
    repaired.push(text_row(&expected));
    repaired.extend_from_slice(matrix);
    Cow::Owned(repaired)
}
