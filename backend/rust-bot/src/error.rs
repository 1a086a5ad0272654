use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading one of the JSON documents under the data directory.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file {0} not found")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DocumentError {
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            DocumentError::NotFound(path.to_path_buf())
        } else {
            DocumentError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Errors returned by the Bot API client.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("file {0} not found")]
    FileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API error ({method}): {description}")]
    Api { method: String, description: String },
}

/// Errors raised while routing an inbound message to its handler.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("message {0} has no sender")]
    MissingSender(i64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = DocumentError::from_io(
            Path::new("stats/answers.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, DocumentError::NotFound(_)));
        assert_eq!(err.to_string(), "file stats/answers.json not found");
    }

    #[test]
    fn other_io_errors_keep_source() {
        let err = DocumentError::from_io(
            Path::new("stats/stats.json"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, DocumentError::Io { .. }));
    }
}
