// Specification registry files (specs.json / specs.toml)

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use skugrid_engine::Specification;

use crate::error::IoError;

/// On-disk registry document.
///
/// ```toml
/// [[specifications]]
/// id = "color"
/// name = "Color"
/// order = 1
///
/// [[specifications.values]]
/// id = "red"
/// display_value = "Red"
/// sku_fragment = "R"
/// color = "#ff0000"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub specifications: Vec<Specification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFormat {
    Json,
    Toml,
}

impl RegistryFormat {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(IoError::UnsupportedFormat(format!(
                "{} (expected .json or .toml)",
                path.display()
            ))),
        }
    }
}

pub fn load_specs(path: &Path) -> Result<Vec<Specification>, IoError> {
    let format = RegistryFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let specs = parse_specs(&content, format)?;
    log::debug!("registry: loaded {} specification(s) from {}", specs.len(), path.display());
    Ok(specs)
}

pub fn parse_specs(content: &str, format: RegistryFormat) -> Result<Vec<Specification>, IoError> {
    let file: RegistryFile = match format {
        RegistryFormat::Json => serde_json::from_str(content)?,
        RegistryFormat::Toml => toml::from_str(content)?,
    };
    validate(&file.specifications)?;
    Ok(file.specifications)
}

pub fn save_specs(specs: &[Specification], path: &Path) -> Result<(), IoError> {
    validate(specs)?;
    let file = RegistryFile {
        specifications: specs.to_vec(),
    };
    let text = match RegistryFormat::from_path(path)? {
        RegistryFormat::Json => serde_json::to_string_pretty(&file)?,
        RegistryFormat::Toml => toml::to_string_pretty(&file)?,
    };
    std::fs::write(path, text).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Specification ids and names must be unique; value ids and display values
/// must be unique within their specification.
pub fn validate(specs: &[Specification]) -> Result<(), IoError> {
    let mut ids = FxHashSet::default();
    let mut names = FxHashSet::default();

    for spec in specs {
        if spec.name.trim().is_empty() {
            return Err(IoError::Registry(format!("specification '{}' has an empty name", spec.id)));
        }
        if !ids.insert(spec.id.as_str()) {
            return Err(IoError::Registry(format!("duplicate specification id '{}'", spec.id)));
        }
        if !names.insert(spec.name.as_str()) {
            return Err(IoError::Registry(format!("duplicate specification name '{}'", spec.name)));
        }

        let mut value_ids = FxHashSet::default();
        let mut labels = FxHashSet::default();
        for value in &spec.values {
            if !value_ids.insert(value.id.as_str()) {
                return Err(IoError::Registry(format!(
                    "specification '{}': duplicate value id '{}'",
                    spec.name, value.id
                )));
            }
            if !labels.insert(value.display_value.as_str()) {
                return Err(IoError::Registry(format!(
                    "specification '{}': duplicate value '{}'",
                    spec.name, value.display_value
                )));
            }
        }
    }
    Ok(())
}
