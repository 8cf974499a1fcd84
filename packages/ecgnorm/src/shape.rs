//! Shape normalization: orientation, stride decimation, reshape fallback and
//! the canonical 1000 × 12 invariant.
//!
//! Decimation is plain sample dropping. No anti-aliasing filter is applied,
//! so outputs stay bit-identical to stride indexing of the source.

use crate::error::{NormalizeError, Result};
use crate::types::{
    map_samples, CanonicalMatrix, ExtractedMatrix, Orientation, Samples, CANONICAL_LEN,
    CANONICAL_SAMPLES, LEADS,
};
use ndarray::s;

/// Format a (rows, cols) pair the way NumPy prints shapes.
pub fn fmt_shape(dim: (usize, usize)) -> String {
    format!("({}, {})", dim.0, dim.1)
}

pub fn transpose(samples: Samples) -> Samples {
    map_samples!(samples, arr => arr.reversed_axes())
}

/// Reorient so rows index time.
pub fn to_time_major(extracted: ExtractedMatrix) -> Samples {
    match extracted.orientation {
        Orientation::LeadMajor => transpose(extracted.samples),
        Orientation::TimeMajor => extracted.samples,
    }
}

/// Stride that brings `time_samples` down to roughly 1000 rows.
///
/// Recordings shorter than 1000 samples cannot be decimated and are rejected
/// instead of producing a zero stride.
pub fn decimation_factor(time_samples: usize, context: &str) -> Result<usize> {
    let factor = time_samples / CANONICAL_SAMPLES;
    if factor == 0 {
        return Err(NormalizeError::shape(
            format!("{} decimation", context),
            format!("at least {} time samples", CANONICAL_SAMPLES),
            time_samples,
        ));
    }
    Ok(factor)
}

/// Keep every `step`-th row.
pub fn decimate_rows(samples: Samples, step: usize) -> Samples {
    let step = step.max(1) as isize;
    map_samples!(samples, arr => arr.slice_move(s![..;step, ..]))
}

/// Keep every `step`-th column.
pub fn decimate_cols(samples: Samples, step: usize) -> Samples {
    let step = step.max(1) as isize;
    map_samples!(samples, arr => arr.slice_move(s![.., ..;step]))
}

/// Reshape fallback for container variables. A matrix already at 1000 × 12
/// passes through; any other element count cannot be reshaped and is
/// rejected with the variable named. A 12000-element matrix of another shape
/// is left as is so the canonical check rejects it instead of reflowing
/// samples across leads.
pub fn reshape_canonical(samples: Samples, variable: &str) -> Result<Samples> {
    if samples.len() == CANONICAL_LEN {
        return Ok(samples);
    }
    let (rows, cols) = samples.dim();
    Err(NormalizeError::ReshapeError {
        variable: variable.to_string(),
        shape: vec![rows, cols],
    })
}

/// The invariant every format must satisfy before emission.
pub fn ensure_canonical(samples: Samples) -> Result<CanonicalMatrix> {
    let dim = samples.dim();
    if dim != (CANONICAL_SAMPLES, LEADS) {
        return Err(NormalizeError::shape(
            "canonical matrix",
            fmt_shape((CANONICAL_SAMPLES, LEADS)),
            fmt_shape(dim),
        ));
    }
    Ok(CanonicalMatrix::new_unchecked(samples))
}
