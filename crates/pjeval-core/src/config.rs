use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Paths for one evaluation run. Every field has a default, so a config
/// file only needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default = "default_queries_path")]
    pub queries: PathBuf,
    #[serde(default = "default_responses_path")]
    pub responses: PathBuf,
    #[serde(default = "default_output_path")]
    pub output: PathBuf,
}

fn default_queries_path() -> PathBuf {
    PathBuf::from("data/evaluation/test-queries.json")
}

fn default_responses_path() -> PathBuf {
    PathBuf::from("data/evaluation/test-responses.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/evaluation/evaluation-report.json")
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            queries: default_queries_path(),
            responses: default_responses_path(),
            output: default_output_path(),
        }
    }
}

impl EvalConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))
    }
}
