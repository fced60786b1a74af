//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use charmplan_config::ConfigError;
use charmplan_core::CoreError;

/// Process exit codes. Usage errors exit with 2 from clap itself.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CHANGES_PENDING: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input documents ──────────────────────────────────────────────
    #[error("File not found: {path}")]
    #[diagnostic(
        code(charmplan::not_found),
        help("Check the path passed to --old, --new, --tracked or --snapshot.")
    )]
    FileNotFound { path: String },

    #[error("Could not parse {path}")]
    #[diagnostic(
        code(charmplan::parse),
        help(
            "{reason}\n\
             Documents are read as TOML, YAML or JSON based on the file extension."
        )
    )]
    Parse { path: String, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(charmplan::validation))]
    Validation { field: String, reason: String },

    #[error("Invalid resource ID '{id}'")]
    #[diagnostic(
        code(charmplan::invalid_id),
        help("Resource IDs are written as <model>:<application>, e.g. prod:postgresql")
    )]
    InvalidId { id: String },

    // ── Reconciliation ───────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(charmplan::core))]
    Core(CoreError),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(charmplan::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("Could not load configuration")]
    #[diagnostic(
        code(charmplan::config),
        help(
            "Check the config file (charmplan config path) and any CHARMPLAN_* \
             environment variables."
        )
    )]
    Config(#[source] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(charmplan::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Parse { .. } | Self::Validation { .. } | Self::InvalidId { .. } => {
                exit_code::INVALID_INPUT
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::FileNotFound {
                path: path.display().to_string(),
            },
            ConfigError::Parse { path, source } => Self::Parse {
                path: path.display().to_string(),
                reason: source.to_string(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(err) => Self::Io(err),
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidResourceId { id } => Self::InvalidId { id },
            other => Self::Core(other),
        }
    }
}
