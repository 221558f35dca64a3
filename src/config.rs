use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::Band;

/// Viewer settings, read from an optional JSON file and overridden by CLI flags.
///
/// ```json
/// {
///   "data_path": "data/exam_data.csv",
///   "default_exam": "midterm 1",
///   "default_band": "good",
///   "window_width": 1200.0,
///   "window_height": 900.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// File loaded at startup.
    pub data_path: Option<PathBuf>,
    /// Initially selected exam (`None` or "all" selects every exam).
    pub default_exam: Option<String>,
    /// Initially selected band (`None` selects every band).
    pub default_band: Option<Band>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            default_exam: None,
            default_band: None,
            window_width: 1200.0,
            window_height: 900.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(
        mut self,
        data_path: Option<PathBuf>,
        exam: Option<String>,
        band: Option<Band>,
    ) -> Self {
        if data_path.is_some() {
            self.data_path = data_path;
        }
        if exam.is_some() {
            self.default_exam = exam;
        }
        if band.is_some() {
            self.default_band = band;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = ViewerConfig::from_json(r#"{ "default_band": "average" }"#).unwrap();
        assert_eq!(
            cfg,
            ViewerConfig {
                default_band: Some(Band::Average),
                ..ViewerConfig::default()
            }
        );
    }

    #[test]
    fn invalid_band_is_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "default_band": "excellent" }"#).is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let cfg = ViewerConfig::from_json(
            r#"{ "data_path": "a.csv", "default_exam": "final", "default_band": "bad" }"#,
        )
        .unwrap()
        .with_overrides(Some(PathBuf::from("b.csv")), None, Some(Band::Good));

        assert_eq!(cfg.data_path, Some(PathBuf::from("b.csv")));
        assert_eq!(cfg.default_exam.as_deref(), Some("final"));
        assert_eq!(cfg.default_band, Some(Band::Good));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{ "window_width": 800 }"#).unwrap();
        let cfg = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(cfg.window_width, 800.0);
        assert!(ViewerConfig::from_file(&dir.path().join("missing.json")).is_err());
    }
}
