//! Error types.
//!
//! Library code returns [`CatalogueError`]; the binary converts it into an
//! [`AppError`] carrying the process exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, merging and deriving the catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// A data line could not be parsed. Aborts the whole load.
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The reference system used to normalize signal metrics is absent.
    #[error("Reference system '{0}' is not present in the filtered catalogue.")]
    ReferenceNotFound(String),

    /// The reference system is present but its raw metric cannot normalize anything.
    #[error("Reference system '{name}' has an unusable {metric} value ({value}).")]
    InvalidReference {
        name: String,
        metric: &'static str,
        value: f64,
    },

    /// A local cache file is missing and could not be fetched.
    #[error(
        "Missing catalogue file '{}'. Run `tepcat fetch` or place the table there manually.",
        .0.display()
    )]
    MissingCatalogue(PathBuf),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote table could not be fetched. Recovered by falling back to the cache.
    #[error("Catalogue fetch failed: {0}")]
    Fetch(String),

    #[error("Ranking requires transmission signal metrics (use `--derive signal`).")]
    RankingUnavailable,
}

impl CatalogueError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit code used when this error terminates the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            CatalogueError::Parse { .. }
            | CatalogueError::MissingCatalogue(_)
            | CatalogueError::Io { .. } => 2,
            CatalogueError::ReferenceNotFound(_)
            | CatalogueError::InvalidReference { .. }
            | CatalogueError::Fetch(_)
            | CatalogueError::RankingUnavailable => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CatalogueError> for AppError {
    fn from(err: CatalogueError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_reports_path_and_line() {
        let err = CatalogueError::Parse {
            path: PathBuf::from("tepcat2.txt"),
            line: 7,
            message: "bad token".to_string(),
        };
        assert_eq!(err.to_string(), "tepcat2.txt:7: bad token");
        assert_eq!(AppError::from(err).exit_code(), 2);
    }

    #[test]
    fn reference_errors_use_signal_exit_code() {
        let err = CatalogueError::ReferenceNotFound("HD209458b".to_string());
        let app = AppError::from(err);
        assert_eq!(app.exit_code(), 4);
        assert!(app.to_string().contains("HD209458b"));
    }
}
