use thiserror::Error;
use tracing::{error, warn};

use crate::remap::RemapEdge;

/// Error severity, used when surfacing failures to a user-facing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning, // caller mistake, nothing changed
    Error,   // the engine refused or failed
}

/// Domain errors for trigger registration and key queries
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected before any dispatcher call; nothing was changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("key '{key}' is invalid or its state could not be determined")]
    IndeterminateKeyState { key: String },

    #[error("dispatcher rejected {operation}: {message}")]
    Dispatcher {
        operation: &'static str,
        message: String,
    },

    #[error("unsupported: {0}")]
    Unsupported(String),

    /// One member of a remapped key failed. `edge` names the failing member.
    #[error("remap {edge} edge failed (rolled back: {rolled_back}): {source}")]
    Remap {
        edge: RemapEdge,
        rolled_back: bool,
        #[source]
        source: Box<Error>,
    },

    #[error("dispatcher not initialized")]
    NotInitialized,

    #[error("dispatcher already initialized")]
    AlreadyInitialized,
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn dispatcher(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Dispatcher {
            operation,
            message: message.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidArgument(_)
            | Self::IndeterminateKeyState { .. }
            | Self::Unsupported(_)
            | Self::AlreadyInitialized => ErrorSeverity::Warning,
            Self::Dispatcher { .. } | Self::Remap { .. } | Self::NotInitialized => {
                ErrorSeverity::Error
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for logging a failure and carrying on.
///
/// Includes the caller's file/line via `#[track_caller]`.
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
