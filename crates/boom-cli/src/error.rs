//! Error types for the `boom` binary.
//!
//! [`CliError`] wraps every failure mode of loading inputs, evaluating
//! chromosomes and writing output, so command handlers can propagate with
//! `?`.

use std::path::PathBuf;

use boom_core::{ConfigError, EngineError, SetupError};

/// Top-level error for the `boom` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A chromosome or the configuration was rejected before replay.
    #[error("setup error: {source}")]
    Setup {
        /// The underlying setup error.
        #[from]
        source: SetupError,
    },

    /// A replay failed.
    #[error("evaluation error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },

    /// A chromosome file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Writing to stdout failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A JSON output line could not be encoded.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The configuration could not be rendered as YAML.
    #[error("YAML error: {source}")]
    Yaml {
        /// The underlying serialization error.
        #[from]
        source: serde_yml::Error,
    },
}
