// Application settings
// Loaded from ~/.config/skugrid/settings.json

use serde::{Deserialize, Serialize};
use skugrid_engine::SkuSettings;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // SKU composition
    #[serde(rename = "sku.delimiter")]
    pub delimiter: String,

    #[serde(rename = "sku.prefix")]
    pub prefix: String,

    #[serde(rename = "sku.suffix")]
    pub suffix: String,

    /// Header text of the identifier column.
    #[serde(rename = "sku.identifierHeader")]
    pub identifier_header: String,

    // Import
    /// Always put the canonical header in front when row 0 differs from it.
    #[serde(rename = "import.repairHeader")]
    pub repair_header: bool,

    #[serde(rename = "import.delimiter")]
    pub import_delimiter: Option<char>, // None = sniff
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // SKU
            delimiter: "-".to_string(),
            prefix: String::new(),
            suffix: String::new(),
            identifier_header: "SKU".to_string(),
            // Import
            repair_header: false,
            import_delimiter: None,
        }
    }
}

const DEFAULT_CONFIG: &str = r#"{
    // SKU composition
    "sku.delimiter": "-",
    "sku.prefix": "",
    "sku.suffix": "",
    "sku.identifierHeader": "SKU",

    // Import (null delimiter = detect from the file)
    "import.repairHeader": false,
    "import.delimiter": null
}
"#;

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skugrid");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = Self::create_default_file(&path) {
                log::warn!("{}", e);
            }
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(serde_json::from_str(&cleaned)?)
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(write_err)
    }

    /// Create default settings file with comments
    pub fn create_default_file(path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, DEFAULT_CONFIG).map_err(write_err)
    }

    /// The composition settings the engine consumes.
    pub fn sku_settings(&self) -> SkuSettings {
        SkuSettings::default()
            .with_delimiter(self.delimiter.clone())
            .with_prefix(self.prefix.clone())
            .with_suffix(self.suffix.clone())
    }
}
