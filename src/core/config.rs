//! Harness configuration, loadable from `appsettings.json`

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{HarnessError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "appsettings.json";

/// Iteration counts for one harness run. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct HarnessConfig {
    #[serde(rename = "WarmupIterations", deserialize_with = "validate_positive_usize")]
    warmup_iterations: usize,
    #[serde(rename = "MeasuredIterations", deserialize_with = "validate_positive_usize")]
    measured_iterations: usize,
}

fn validate_positive_usize<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = usize::deserialize(deserializer)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be positive"))
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: 20,
            measured_iterations: 50,
        }
    }
}

impl HarnessConfig {
    pub fn new(warmup_iterations: usize, measured_iterations: usize) -> Result<Self> {
        if warmup_iterations < 1 {
            return Err(HarnessError::invalid("warmup iterations must be at least 1"));
        }
        if measured_iterations < 1 {
            return Err(HarnessError::invalid("measured iterations must be at least 1"));
        }
        Ok(Self {
            warmup_iterations,
            measured_iterations,
        })
    }

    pub fn warmup_iterations(&self) -> usize {
        self.warmup_iterations
    }

    pub fn measured_iterations(&self) -> usize {
        self.measured_iterations
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Like [`HarnessConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match fs::read_to_string(path.as_ref()) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.as_ref().display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn zero_counts_are_rejected() {
        assert!(matches!(HarnessConfig::new(0, 10), Err(HarnessError::InvalidConfiguration(_))));
        assert!(matches!(HarnessConfig::new(10, 0), Err(HarnessError::InvalidConfiguration(_))));
        assert!(HarnessConfig::new(1, 1).is_ok());
    }

    #[test]
    fn parses_pascal_case_keys() {
        let config: HarnessConfig =
            serde_json::from_str(r#"{"WarmupIterations": 5, "MeasuredIterations": 12}"#).unwrap();
        assert_eq!(config.warmup_iterations(), 5);
        assert_eq!(config.measured_iterations(), 12);
    }

    #[test]
    fn zero_in_file_is_rejected() {
        let parsed = serde_json::from_str::<HarnessConfig>(r#"{"WarmupIterations": 0, "MeasuredIterations": 12}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = HarnessConfig::new(3, 7).unwrap();
        config.save(&path).unwrap();
        assert_eq!(HarnessConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = HarnessConfig::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, HarnessConfig::default());
        assert!(HarnessConfig::load(dir.path().join("absent.json")).is_err());
    }
}
