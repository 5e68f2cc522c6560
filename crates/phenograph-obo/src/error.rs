use thiserror::Error;

#[derive(Debug, Error)]
pub enum OboError {
    /// Malformed input. `line` is 1-based.
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OboError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// Line number of a format error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Format { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
