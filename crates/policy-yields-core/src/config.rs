//! Evaluation options and preview configuration.

use std::path::{Path, PathBuf};

use policy_yields_protocol::PlayerId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Knobs for one evaluation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Maximum depth of requirement-set references followed while evaluating
    /// one subject. Reference cycles stop here instead of recursing forever.
    pub max_requirement_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_requirement_depth: 32,
        }
    }
}

/// Preview binary configuration, loaded from YAML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// World snapshot to evaluate
    pub snapshot: PathBuf,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Evaluate for this player instead of the snapshot's local player
    pub player: Option<PlayerId>,
    pub eval: EvalOptions,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("snapshot.yaml"),
            log_filter: "policy_yields_core=info".to_string(),
            player: None,
            eval: EvalOptions::default(),
        }
    }
}

impl PreviewConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = PreviewConfig::from_yaml("player: 2\n").unwrap();
        assert_eq!(config.player, Some(PlayerId(2)));
        assert_eq!(config.log_filter, "policy_yields_core=info");
        assert_eq!(config.eval.max_requirement_depth, 32);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "snapshot: worlds/antiquity.yaml").unwrap();
        writeln!(file, "eval:").unwrap();
        writeln!(file, "  max_requirement_depth: 4").unwrap();

        let config = PreviewConfig::load(file.path()).unwrap();
        assert_eq!(config.snapshot, PathBuf::from("worlds/antiquity.yaml"));
        assert_eq!(config.eval.max_requirement_depth, 4);
        assert_eq!(config.player, None);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PreviewConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
