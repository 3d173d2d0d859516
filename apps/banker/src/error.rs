//! CLI error handling

use std::fmt;

use banker_errors::UserFacingError;
use banker_types::ProcessId;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration or manifest error
    Config(banker_errors::Error),
    /// Pool error that ended the run
    Pool(banker_errors::Error),
    /// The checked manifest starts in an unsafe state
    UnsafeManifest { blocked: Vec<ProcessId> },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Pool(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::UnsafeManifest { blocked } => {
                let blocked: Vec<String> = blocked.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "initial state is unsafe; blocked processes: {}",
                    blocked.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) | CliError::Pool(e) => Some(e),
            CliError::UnsafeManifest { .. } => None,
        }
    }
}

impl From<banker_errors::Error> for CliError {
    fn from(e: banker_errors::Error) -> Self {
        match e {
            banker_errors::Error::Config(_) => CliError::Config(e),
            other => CliError::Pool(other),
        }
    }
}
