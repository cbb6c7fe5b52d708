//! Error types for outline-build.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for outline-build operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading configuration.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file or compile database.
    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(outline::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML config")]
    #[diagnostic(code(outline::config::toml), help("outline.toml accepts [parser] and [outline] tables"))]
    ParseToml(#[from] toml::de::Error),

    /// Failed to parse JSON (compile_commands.json).
    #[error("Failed to parse JSON")]
    #[diagnostic(code(outline::config::json))]
    ParseJson(#[from] serde_json::Error),

    /// The compile database has no entry for the source file.
    #[error("No compile command for {}", .0.display())]
    #[diagnostic(
        code(outline::config::no_command),
        help("regenerate compile_commands.json or pass -I/-D flags directly")
    )]
    CommandNotFound(PathBuf),
}
