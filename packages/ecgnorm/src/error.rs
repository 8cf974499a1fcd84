use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to load {format} file: {message}")]
    ParseError {
        format: &'static str,
        message: String,
    },

    #[error("No valid data found in .mat file")]
    NoData,

    #[error("No .mat variable matches {selector}; candidates: {candidates:?}")]
    VariableNotFound {
        selector: String,
        candidates: Vec<String>,
    },

    #[error("Ambiguous .mat variables, expected exactly one: {candidates:?}")]
    AmbiguousVariable { candidates: Vec<String> },

    #[error("{context} size mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    #[error(".mat variable '{variable}' cannot be reshaped to (1000,12) (shape {shape:?})")]
    ReshapeError { variable: String, shape: Vec<usize> },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<NormalizeError>,
    },
}

impl NormalizeError {
    pub(crate) fn parse(format: &'static str, message: impl Into<String>) -> Self {
        NormalizeError::ParseError {
            format,
            message: message.into(),
        }
    }

    pub(crate) fn shape(
        context: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        NormalizeError::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Attach the offending input path. Already-attributed errors are left alone.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            NormalizeError::InFile { .. } => self,
            other => NormalizeError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying cause with any file attribution stripped.
    pub fn root(&self) -> &NormalizeError {
        match self {
            NormalizeError::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// True for errors caused by the caller's input rather than its content.
    pub fn is_input_error(&self) -> bool {
        matches!(self.root(), NormalizeError::UnsupportedFormat(_))
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
