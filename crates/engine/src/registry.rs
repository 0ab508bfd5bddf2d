//! Read-only view over a sheet's specifications and columns.
//!
//! The engine never creates, renames or deletes specifications. It receives
//! the current registry state as plain slices on every call and reads it
//! through this view.

use std::collections::BTreeMap;

use crate::model::{ColumnDef, ColumnKind, Specification};

#[derive(Debug, Clone, Copy)]
pub struct SpecRegistry<'a> {
    specs: &'a [Specification],
    columns: &'a [ColumnDef],
}

impl<'a> SpecRegistry<'a> {
    pub fn new(specs: &'a [Specification], columns: &'a [ColumnDef]) -> Self {
        Self { specs, columns }
    }

    pub fn specifications(&self) -> &'a [Specification] {
        self.specs
    }

    pub fn columns(&self) -> &'a [ColumnDef] {
        self.columns
    }

    pub fn spec(&self, id: &str) -> Option<&'a Specification> {
        self.specs.iter().find(|s| s.id == id)
    }

    pub fn spec_by_name(&self, name: &str) -> Option<&'a Specification> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Specifications sorted ascending by `order`. Ties keep definition order.
    pub fn ordered(&self) -> Vec<&'a Specification> {
        ordered_specs(self.specs)
    }

    /// Role of column `col`. Columns past the end are `Free`.
    pub fn column_kind(&self, col: usize) -> ColumnKind {
        self.columns.get(col).map(|c| c.kind).unwrap_or(ColumnKind::Free)
    }

    /// Specification bound to column `col`, if it is a `Spec` column whose
    /// specification still exists.
    pub fn bound_spec(&self, col: usize) -> Option<&'a Specification> {
        let column = self.columns.get(col)?;
        if column.kind != ColumnKind::Spec {
            return None;
        }
        column.spec_id.as_deref().and_then(|id| self.spec(id))
    }

    /// Display values of a specification in definition order.
    pub fn display_values(&self, spec_id: &str) -> Vec<String> {
        self.spec(spec_id)
            .map(|s| s.values.iter().map(|v| v.display_value.clone()).collect())
            .unwrap_or_default()
    }

    /// display value -> color, for specifications that define colors.
    pub fn color_map(&self, spec_id: &str) -> Option<BTreeMap<String, String>> {
        let spec = self.spec(spec_id)?;
        if !spec.has_colors() {
            return None;
        }
        Some(
            spec.values
                .iter()
                .filter_map(|v| v.color.clone().map(|c| (v.display_value.clone(), c)))
                .collect(),
        )
    }

    /// Color of the value currently selected in a spec cell.
    pub fn color_of(&self, spec_id: &str, display_value: &str) -> Option<&'a str> {
        self.spec(spec_id)?
            .value_for(display_value)?
            .color
            .as_deref()
    }
}

/// Sort specifications by `order` without copying them.
pub fn ordered_specs(specs: &[Specification]) -> Vec<&Specification> {
    let mut ordered: Vec<&Specification> = specs.iter().collect();
    ordered.sort_by_key(|s| s.order);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpecValue;

    fn specs() -> Vec<Specification> {
        vec![
            Specification::new("color", "Color", 1)
                .with_value(SpecValue::new("red", "Red", "R").with_color("#ff0000"))
                .with_value(SpecValue::new("blue", "Blue", "B")),
            Specification::new("size", "Size", 0)
                .with_value(SpecValue::new("small", "Small", "S")),
        ]
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::sku("c0", "SKU"),
            ColumnDef::spec("c1", "color", "Color"),
            ColumnDef::spec("c2", "gone", "Weight"),
            ColumnDef::free("c3", "Notes"),
        ]
    }

    #[test]
    fn test_ordered_by_order_field() {
        let specs = specs();
        let cols = columns();
        let reg = SpecRegistry::new(&specs, &cols);
        let names: Vec<&str> = reg.ordered().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Size", "Color"]);
    }

    #[test]
    fn test_bound_spec_skips_dangling_and_free() {
        let specs = specs();
        let cols = columns();
        let reg = SpecRegistry::new(&specs, &cols);
        assert_eq!(reg.bound_spec(1).map(|s| s.id.as_str()), Some("color"));
        assert!(reg.bound_spec(2).is_none());
        assert!(reg.bound_spec(3).is_none());
        assert_eq!(reg.column_kind(99), ColumnKind::Free);
    }

    #[test]
    fn test_colors() {
        let specs = specs();
        let cols = columns();
        let reg = SpecRegistry::new(&specs, &cols);
        let colors = reg.color_map("color").unwrap();
        assert_eq!(colors.get("Red").map(String::as_str), Some("#ff0000"));
        assert!(!colors.contains_key("Blue"));
        assert!(reg.color_map("size").is_none());
        assert_eq!(reg.color_of("color", "Red"), Some("#ff0000"));
        assert_eq!(reg.color_of("color", "Blue"), None);
    }
}
