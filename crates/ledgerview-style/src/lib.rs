//! Utility-CSS configuration for the ledger UI
//!
//! Pure data: which files the class generator scans and how the theme is
//! extended. Serializes to the generator's configuration shape.

pub mod error;

use ledgerview_config::StyleSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use error::StyleError;

/// Default sans-serif fallback chain of the class generator
pub const DEFAULT_SANS: &[&str] = &[
    "ui-sans-serif",
    "system-ui",
    "sans-serif",
    "\"Apple Color Emoji\"",
    "\"Segoe UI Emoji\"",
    "\"Segoe UI Symbol\"",
    "\"Noto Color Emoji\"",
];

/// Theme keys merged into the generator defaults
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeExtension {
    #[serde(rename = "fontFamily", default)]
    pub font_family: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub extend: ThemeExtension,
}

/// Utility-CSS generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Globs of files scanned for class names
    pub content: Vec<String>,
    pub theme: Theme,
    pub plugins: Vec<String>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::ledger_ui()
    }
}

impl StyleConfig {
    /// The ledger UI configuration: root HTML entry plus everything under `src`
    pub fn ledger_ui() -> Self {
        Self::from_settings(&StyleSettings::default())
    }

    pub fn from_settings(settings: &StyleSettings) -> Self {
        let mut sans = vec![settings.font.clone()];
        sans.extend(DEFAULT_SANS.iter().map(|s| s.to_string()));

        let mut font_family = BTreeMap::new();
        font_family.insert("sans".to_string(), sans);

        Self {
            content: settings.content.clone(),
            theme: Theme {
                extend: ThemeExtension { font_family },
            },
            plugins: vec![],
        }
    }

    /// The extended sans-serif stack
    pub fn sans_stack(&self) -> &[String] {
        self.theme
            .extend
            .font_family
            .get("sans")
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// CSS `font-family` value for the sans stack
    pub fn sans_css(&self) -> String {
        self.sans_stack()
            .iter()
            .map(|font| {
                if font.contains(' ') && !font.starts_with('"') {
                    format!("\"{}\"", font)
                } else {
                    font.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// List files under `root` the generator would scan, sorted and deduplicated
    pub fn scan(&self, root: &Path) -> Result<Vec<PathBuf>, StyleError> {
        let mut files = Vec::new();

        for entry in &self.content {
            for pattern in expand_braces(entry) {
                let relative = pattern.strip_prefix("./").unwrap_or(&pattern);
                let full = root.join(relative);

                if !is_glob(relative) {
                    if !full.is_file() {
                        return Err(StyleError::FileNotFound {
                            path: full.display().to_string(),
                        });
                    }
                    files.push(full);
                    continue;
                }

                let full_str = full.to_string_lossy();
                let paths = glob::glob(&full_str).map_err(|e| StyleError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
                for path in paths {
                    let path = path.map_err(|e| StyleError::Unreadable {
                        path: e.path().display().to_string(),
                        message: e.error().to_string(),
                    })?;
                    if path.is_file() {
                        files.push(path);
                    }
                }
            }
        }

        files.sort();
        files.dedup();
        log::debug!("Style content scan matched {} files", files.len());
        Ok(files)
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand `{a,b}` alternatives in a glob, e.g. `*.{html,js}` -> `*.html`, `*.js`
///
/// Nested groups are expanded recursively. An unbalanced `{` is kept as text.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        let i = open + i;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(i),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| {
            let alternative = &pattern[w[0] + 1..w[1]];
            expand_braces(&format!("{}{}{}", prefix, alternative, suffix))
        })
        .collect()
}
