//! Normalize 12-lead ECG recordings into canonical 1000 × 12 NumPy arrays.
//!
//! ```no_run
//! use ecgnorm::Normalizer;
//! use std::path::Path;
//!
//! let conversion = Normalizer::default()
//!     .convert(Path::new("patient.mat"), Path::new("patient.npy"))
//!     .unwrap();
//! println!("{} -> {}", conversion.input.display(), conversion.output.display());
//! ```

pub mod emitter;
pub mod error;
pub mod format;
pub mod npy;
pub mod pipeline;
pub mod readers;
pub mod selector;
pub mod shape;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::{NormalizeError, Result};
pub use format::{Mode, SourceFormat};
pub use pipeline::{BatchReport, FailurePolicy, FileOutcome, Normalized, Normalizer, NormalizerConfig};
pub use selector::{FirstVariable, NamedVariable, PatternVariable, UniqueVariable, VariableSelector};
pub use types::*;
