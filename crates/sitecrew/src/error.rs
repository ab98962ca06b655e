//! CLI error type bridging domain, config, and usage failures.

use miette::Diagnostic;
use thiserror::Error;

use sitecrew_core::{CoreError, status_and_code};

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    /// A domain operation failed; `code` is the machine-readable error code
    /// from the wire contract (CONFLICT, VALIDATION_ERROR, ...).
    #[error("{code}: {source}")]
    Domain {
        code: &'static str,
        #[source]
        source: CoreError,
    },

    #[error(transparent)]
    Config(#[from] sitecrew_config::ConfigError),

    #[error("{0}")]
    #[diagnostic(help("run with --help for usage"))]
    Usage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let (_, code) = status_and_code(&err);
        Self::Domain { code, source: err }
    }
}

impl CliError {
    /// Process exit code: conflicts get their own code so scripts can retry.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Domain { source, .. } => {
                let (status, _) = status_and_code(source);
                match status {
                    409 => 3,
                    404 => 4,
                    _ => 1,
                }
            }
            _ => 1,
        }
    }
}
