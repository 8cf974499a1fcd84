use crate::error::{NormalizeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How the pipeline was invoked. Text formats are only accepted in batch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Single,
    Batch,
}

/// Ingestion strategy chosen from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// MATLAB Level 5 container
    Mat,
    /// Headerless native-endian int16 samples
    Dat,
    /// JSON nested array, `.json` or `.txt`
    Json,
}

impl SourceFormat {
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Mat => "MAT",
            SourceFormat::Dat => "DAT",
            SourceFormat::Json => "JSON",
        }
    }

    pub fn from_extension(ext: &str, mode: Mode) -> Option<Self> {
        match (ext.to_lowercase().as_str(), mode) {
            ("mat", _) => Some(SourceFormat::Mat),
            ("dat", _) => Some(SourceFormat::Dat),
            ("json" | "txt", Mode::Batch) => Some(SourceFormat::Json),
            _ => None,
        }
    }

    /// Extensions recognized in `mode`, without the leading dot
    pub fn supported_extensions(mode: Mode) -> Vec<&'static str> {
        match mode {
            Mode::Single => vec!["mat", "dat"],
            Mode::Batch => vec!["mat", "dat", "json", "txt"],
        }
    }

    /// Map a path to its ingestion strategy. Only the extension is consulted;
    /// the file is never opened here.
    pub fn sniff(path: &Path, mode: Mode) -> Result<Self> {
        let ext = extension(path);
        Self::from_extension(ext.trim_start_matches('.'), mode).ok_or_else(|| {
            let shown = if ext.is_empty() { "(none)" } else { ext.as_str() };
            NormalizeError::UnsupportedFormat(shown.to_string())
        })
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower-cased extension with its leading dot, or an empty string.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}
