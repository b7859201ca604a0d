use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sidefx_preset::UnsetCurvePolicy;

/// Persisted generator defaults. Command line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Policy for curve slots a shape leaves unset.
    pub unset_curves: UnsetCurvePolicy,
    /// Encode shapes in parallel.
    pub parallel: bool,
    /// Shape table to use instead of the built-in shapes.
    pub shapes: Option<PathBuf>,
    /// Where to write the library; stdout when unset.
    pub output: Option<PathBuf>,
}

pub fn default_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push("SideFXPresetGen");
    base.push("settings.json");
    Some(base)
}

/// Loads an explicitly requested settings file. Failures are errors.
pub fn load_from(path: &Path) -> Result<GeneratorSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid settings file", path.display()))
}

/// Loads the per-user settings. Returns defaults if loading fails.
pub fn load_default() -> GeneratorSettings {
    let Some(path) = default_path() else {
        return GeneratorSettings::default();
    };
    if !path.exists() {
        return GeneratorSettings::default();
    }
    match load_from(&path) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(?err, "ignoring unreadable settings file");
            GeneratorSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "unset_curves": "zero" }"#).unwrap();
        let settings = load_from(&path).unwrap();
        assert_eq!(
            settings,
            GeneratorSettings {
                unset_curves: UnsetCurvePolicy::Zero,
                ..GeneratorSettings::default()
            }
        );
    }

    #[test]
    fn explicit_file_errors_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(load_from(&path).is_err());
        fs::write(&path, "{ not json").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(err.to_string().contains("is not a valid settings file"));
    }

    #[test]
    fn defaults_keep_placeholder_curves() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.unset_curves, UnsetCurvePolicy::Placeholder);
        assert!(!settings.parallel);
        assert!(settings.output.is_none());
    }
}
