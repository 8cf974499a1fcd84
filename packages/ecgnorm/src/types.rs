use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Time samples per lead in a canonical matrix (10 s at 100 Hz).
pub const CANONICAL_SAMPLES: usize = 1000;

/// Number of ECG leads.
pub const LEADS: usize = 12;

/// Element count of a canonical matrix.
pub const CANONICAL_LEN: usize = CANONICAL_SAMPLES * LEADS;

/// Which axis of an extracted matrix carries the leads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// rows = leads, columns = time
    LeadMajor,
    /// rows = time, columns = leads
    TimeMajor,
}

impl Orientation {
    /// A matrix whose first dimension is the lead count is taken as lead-major.
    pub fn infer(rows: usize) -> Self {
        if rows == LEADS {
            Orientation::LeadMajor
        } else {
            Orientation::TimeMajor
        }
    }
}

/// Element type of a sample matrix, named the way NumPy names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl DType {
    pub fn name(&self) -> &'static str {
        match self {
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    /// Bytes per element
    pub fn size(&self) -> usize {
        match self {
            DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::UInt16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 2-D sample matrix tagged with its element type.
///
/// Every dtype a MAT-file numeric class can carry is represented so that
/// conversion never widens or narrows the source samples.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Int8(Array2<i8>),
    Int16(Array2<i16>),
    Int32(Array2<i32>),
    Int64(Array2<i64>),
    UInt8(Array2<u8>),
    UInt16(Array2<u16>),
    UInt32(Array2<u32>),
    UInt64(Array2<u64>),
    Float32(Array2<f32>),
    Float64(Array2<f64>),
}

/// Evaluate `$body` with `$arr` bound to the inner array of any variant.
macro_rules! with_samples {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            $crate::types::Samples::Int8($arr) => $body,
            $crate::types::Samples::Int16($arr) => $body,
            $crate::types::Samples::Int32($arr) => $body,
            $crate::types::Samples::Int64($arr) => $body,
            $crate::types::Samples::UInt8($arr) => $body,
            $crate::types::Samples::UInt16($arr) => $body,
            $crate::types::Samples::UInt32($arr) => $body,
            $crate::types::Samples::UInt64($arr) => $body,
            $crate::types::Samples::Float32($arr) => $body,
            $crate::types::Samples::Float64($arr) => $body,
        }
    };
}

/// Like `with_samples!`, but re-wraps the resulting array in the same variant.
macro_rules! map_samples {
    ($value:expr, $arr:ident => $body:expr) => {
        match $value {
            $crate::types::Samples::Int8($arr) => $crate::types::Samples::Int8($body),
            $crate::types::Samples::Int16($arr) => $crate::types::Samples::Int16($body),
            $crate::types::Samples::Int32($arr) => $crate::types::Samples::Int32($body),
            $crate::types::Samples::Int64($arr) => $crate::types::Samples::Int64($body),
            $crate::types::Samples::UInt8($arr) => $crate::types::Samples::UInt8($body),
            $crate::types::Samples::UInt16($arr) => $crate::types::Samples::UInt16($body),
            $crate::types::Samples::UInt32($arr) => $crate::types::Samples::UInt32($body),
            $crate::types::Samples::UInt64($arr) => $crate::types::Samples::UInt64($body),
            $crate::types::Samples::Float32($arr) => $crate::types::Samples::Float32($body),
            $crate::types::Samples::Float64($arr) => $crate::types::Samples::Float64($body),
        }
    };
}

pub(crate) use map_samples;
pub(crate) use with_samples;

impl Samples {
    pub fn dtype(&self) -> DType {
        match self {
            Samples::Int8(_) => DType::Int8,
            Samples::Int16(_) => DType::Int16,
            Samples::Int32(_) => DType::Int32,
            Samples::Int64(_) => DType::Int64,
            Samples::UInt8(_) => DType::UInt8,
            Samples::UInt16(_) => DType::UInt16,
            Samples::UInt32(_) => DType::UInt32,
            Samples::UInt64(_) => DType::UInt64,
            Samples::Float32(_) => DType::Float32,
            Samples::Float64(_) => DType::Float64,
        }
    }

    /// (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        with_samples!(self, arr => arr.dim())
    }

    pub fn len(&self) -> usize {
        with_samples!(self, arr => arr.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out every sample as f64 in logical row-major order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        with_samples!(self, arr => arr.iter().map(|&v| v as f64).collect())
    }
}

/// Output of an extractor: raw samples plus orientation metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMatrix {
    pub samples: Samples,
    pub orientation: Orientation,
    /// Source variable name, for container formats
    pub variable: Option<String>,
}

impl ExtractedMatrix {
    pub fn new(samples: Samples, orientation: Orientation) -> Self {
        Self {
            samples,
            orientation,
            variable: None,
        }
    }

    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    pub fn dim(&self) -> (usize, usize) {
        self.samples.dim()
    }
}

/// A time-major 1000 × 12 matrix, ready for emission.
///
/// Only constructed through `shape::ensure_canonical`, so the shape invariant
/// always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalMatrix {
    samples: Samples,
}

impl CanonicalMatrix {
    pub(crate) fn new_unchecked(samples: Samples) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn into_samples(self) -> Samples {
        self.samples
    }

    pub fn dtype(&self) -> DType {
        self.samples.dtype()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.samples.dim()
    }
}

/// Result of converting one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub input: PathBuf,
    pub output: PathBuf,
    pub extension: String,
    pub dtype: DType,
    pub variable: Option<String>,
}
