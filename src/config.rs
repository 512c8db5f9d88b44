//! Site configuration module.
//!
//! Handles loading, validating, and merging `jemsite.toml`. Stock defaults are
//! serialized to a TOML table, the user's file is merged on top, and the
//! result is deserialized and validated. A site with no config file builds
//! with the defaults.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── jemsite.toml         # Optional, overrides stock defaults
//! ├── MENU                 # Menu description (name configurable)
//! ├── index.jemdoc
//! ├── index_cn.jemdoc
//! └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! stylesheet = "jemdoc.css" # Relative path written into every page
//! menu_file = "MENU"        # Menu description file in the source directory
//! extension = "jemdoc"      # Extension of markup documents
//! default_title = ""        # Title for documents without a `# ` line
//!
//! [pages]
//! names = ["index", "research", "publications", "teaching", "people", "joinus", "contact"]
//!
//! [locale]
//! secondary_suffix = "_cn"  # index_cn.jemdoc is the Chinese variant of index
//!
//! [images]
//! width = "131px"           # Used when an image fence omits its width
//! height = "160px"          # Used when an image fence omits its height
//! alt = "photo"             # Used when an image fence omits its alt text
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the source directory.
pub const CONFIG_FILE: &str = "jemsite.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `jemsite.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Stylesheet path referenced from every generated page.
    pub stylesheet: String,
    /// Menu description file, relative to the source directory.
    pub menu_file: String,
    /// Extension of markup documents, without the dot.
    pub extension: String,
    /// Page title when a document has no `# ` title line.
    pub default_title: String,
    /// Pages converted when no input file is given.
    pub pages: PagesConfig,
    /// Locale detection from file names.
    pub locale: LocaleConfig,
    /// Fallbacks for image fences.
    pub images: ImagesConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            stylesheet: "jemdoc.css".to_string(),
            menu_file: "MENU".to_string(),
            extension: "jemdoc".to_string(),
            default_title: String::new(),
            pages: PagesConfig::default(),
            locale: LocaleConfig::default(),
            images: ImagesConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("stylesheet", &self.stylesheet),
            ("menu_file", &self.menu_file),
            ("extension", &self.extension),
            ("locale.secondary_suffix", &self.locale.secondary_suffix),
            ("images.width", &self.images.width),
            ("images.height", &self.images.height),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "extension must not start with a dot".into(),
            ));
        }
        if self.pages.names.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "pages.names must not contain empty names".into(),
            ));
        }
        Ok(())
    }
}

/// The fixed page manifest used in batch mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Base page names; each is converted in every locale.
    pub names: Vec<String>,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            names: [
                "index",
                "research",
                "publications",
                "teaching",
                "people",
                "joinus",
                "contact",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// How the secondary locale is marked in file names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocaleConfig {
    /// Stem suffix of Chinese pages (`index_cn.jemdoc`).
    pub secondary_suffix: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            secondary_suffix: "_cn".to_string(),
        }
    }
}

/// Values used when an image fence leaves a field empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub width: String,
    pub height: String,
    pub alt: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            width: "131px".to_string(),
            height: "160px".to_string(),
            alt: "photo".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of documents converted in parallel.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `jemsite.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `jemsite.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `jemsite.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# jemsite configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Stylesheet referenced from every page, relative to the page.
stylesheet = "jemdoc.css"

# Menu description file in the source directory. A missing file means
# pages are rendered without a menu.
menu_file = "MENU"

# Extension of markup documents (without the dot).
extension = "jemdoc"

# Title used when a document has no "# Title" line.
default_title = ""

# ---------------------------------------------------------------------------
# Batch manifest
# ---------------------------------------------------------------------------
[pages]
# Pages converted when jemsite runs without an input file. Each name is
# converted in both locales: index.jemdoc and index_cn.jemdoc.
names = ["index", "research", "publications", "teaching", "people", "joinus", "contact"]

# ---------------------------------------------------------------------------
# Locales
# ---------------------------------------------------------------------------
[locale]
# File stem suffix marking the Chinese variant of a page.
secondary_suffix = "_cn"

# ---------------------------------------------------------------------------
# Image blocks
# ---------------------------------------------------------------------------
[images]
# Used when a ~~~ image block leaves the field empty.
width = "131px"
height = "160px"
alt = "photo"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum documents converted in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
