//! Compiler-only configuration knobs, loaded the way `sonido-config` loads
//! effect presets: TOML on disk, deserialized with `serde`, validated before
//! use.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Tunables for the optimizer and task graph builder. None of these change
/// the meaning of a correctly-terminating compilation; they only bound or
/// annotate its execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphDslConfig {
    /// Upper bound on the optimizer's outer fixpoint loop (§4.4.1). `None`
    /// (the default) matches the original, unbounded behavior; set this to
    /// guard against a pathological or buggy rule set that never reaches a
    /// fixpoint.
    pub max_optimizer_iterations: Option<u32>,

    /// When true, dead-node sweep diagnostics are logged at `debug` instead
    /// of `trace`. Useful while developing new optimization rules.
    pub verbose_dead_node_sweep: bool,
}

/// Error loading or validating a [`GraphDslConfig`].
#[derive(Debug, thiserror::Error)]
pub enum GraphDslConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file contents were not valid TOML for this schema.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The parsed config failed validation.
    #[error("invalid config: {0}")]
    Validation(String),
}

impl GraphDslConfig {
    /// Parses a config from a TOML string and validates it.
    pub fn from_toml_str(s: &str) -> Result<Self, GraphDslConfigError> {
        let config: GraphDslConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GraphDslConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GraphDslConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validates constraints the `serde` schema can't express on its own.
    pub fn validate(&self) -> Result<(), GraphDslConfigError> {
        if let Some(max) = self.max_optimizer_iterations {
            if max == 0 {
                return Err(GraphDslConfigError::Validation(
                    "max_optimizer_iterations must be at least 1 if set".to_string(),
                ));
            }
        }
        Ok(())
    }
}
