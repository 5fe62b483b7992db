use std::path::PathBuf;

/// Fatal load-stage failures.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("input file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("unsupported input {path}: {message}")]
    Format { path: PathBuf, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub(crate) fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }
}
