//! SKU composition.
//!
//! A SKU is built by walking specifications in `order`, not columns, so the
//! result does not depend on where an attribute sits in the row.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::Specification;
use crate::registry::ordered_specs;

/// Formatting applied to a composed SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkuSettings {
    pub delimiter: String,
    pub prefix: String,
    pub suffix: String,
}

impl Default for SkuSettings {
    fn default() -> Self {
        Self {
            delimiter: "-".to_string(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

impl SkuSettings {
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Compose a SKU from one row's attribute texts.
///
/// `values[i]` is the text of the cell under `headers[i]`; the identifier cell
/// is not part of either slice. Values past the end of `headers` are ignored.
///
/// Returns "" when no fragment applies. Prefix and suffix are only added
/// around a non-empty fragment list.
pub fn compose_sku<V: AsRef<str>, H: AsRef<str>>(
    values: &[V],
    headers: &[H],
    specs: &[Specification],
    settings: &SkuSettings,
) -> String {
    let mut by_header: FxHashMap<&str, &str> = FxHashMap::default();
    for (header, value) in headers.iter().zip(values.iter()) {
        let text = value.as_ref().trim();
        if !text.is_empty() {
            by_header.insert(header.as_ref(), text);
        }
    }

    let fragments: Vec<&str> = ordered_specs(specs)
        .into_iter()
        .filter_map(|spec| {
            let text = by_header.get(spec.name.as_str())?;
            let value = spec.value_for(text)?;
            if value.sku_fragment.is_empty() {
                None
            } else {
                Some(value.sku_fragment.as_str())
            }
        })
        .collect();

    if fragments.is_empty() {
        return String::new();
    }

    format!(
        "{}{}{}",
        settings.prefix,
        fragments.join(&settings.delimiter),
        settings.suffix
    )
}
