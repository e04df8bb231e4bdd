//! Library settings

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Template used when none is configured
pub const DEFAULT_TEMPLATE_PATH: &str = "template/Blank.xlsx";

/// Environment variable that overrides the template path
pub const TEMPLATE_PATH_ENV: &str = "SHEETFILL_TEMPLATE_PATH";

/// Settings for template-based workbook operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Settings {
    /// Workbook opened when an operation names no template of its own
    pub template_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
        }
    }
}

impl Settings {
    /// Settings with the given template path
    pub fn new<P: Into<PathBuf>>(template_path: P) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    /// Settings from `SHEETFILL_TEMPLATE_PATH`, falling back to the default
    pub fn from_env() -> Self {
        Self::from_template_var(std::env::var_os(TEMPLATE_PATH_ENV))
    }

    fn from_template_var(value: Option<OsString>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(path) => Self::new(path),
            None => Self::default(),
        }
    }

    /// The configured template path
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }
}
