//! `lineview.toml` config loading.

use serde::{Deserialize, Serialize};

use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Report layout knobs.
    #[serde(default)]
    pub report: ReportLayout,
}

/// Layout constants for the rendered pages. Kept as data so the renderer
/// never hard-codes table sizes or pixel widths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReportLayout {
    /// Rows in the "most expensive lines" table.
    #[serde(default = "default_max_expensive_lines")]
    pub max_expensive_lines: usize,

    /// "called from" badges shown per line.
    #[serde(default = "default_max_call_badges")]
    pub max_call_badges: usize,

    /// Full width of the per-line box chart, in pixels.
    #[serde(default = "default_box_width_px")]
    pub box_width_px: u32,
}

fn default_max_expensive_lines() -> usize {
    10
}

fn default_max_call_badges() -> usize {
    5
}

fn default_box_width_px() -> u32 {
    100
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            max_expensive_lines: default_max_expensive_lines(),
            max_call_badges: default_max_call_badges(),
            box_width_px: default_box_width_px(),
        }
    }
}

impl Config {
    pub fn load_optional(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(s) => match toml::from_str::<Config>(&s) {
                Ok(cfg) => cfg,
                Err(err) => {
                    tracing::warn!("failed to parse config {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!("failed to read config {}: {err}", path.display());
                Self::default()
            }
        }
    }
}
