/// MAT-file extractor
///
/// Parses MATLAB Level 5 containers straight from the in-memory payload, so no
/// temporary file is ever materialized. The data variable is picked by a
/// `VariableSelector` among the non-reserved names.
///
/// Normalization happens in a fixed order:
/// 1. lead-major (12 × N) arrays are transposed to time-major
/// 2. rows are decimated with stride `floor(N / 1000)`
/// 3. an element count other than 12000 fails the reshape fallback, and any
///    other shape that is still not 1000 × 12 is rejected
use super::Extractor;
use crate::error::{NormalizeError, Result};
use crate::format::SourceFormat;
use crate::selector::VariableSelector;
use crate::shape::{decimate_rows, decimation_factor, fmt_shape, reshape_canonical, to_time_major};
use crate::types::{ExtractedMatrix, Orientation, Samples, CANONICAL_SAMPLES, LEADS};
use matfile::{MatFile, NumericData};
use ndarray::{Array2, ShapeBuilder};
use std::io::Cursor;

/// Names with this prefix are container metadata, never data.
pub const RESERVED_PREFIX: &str = "__";

pub struct MatExtractor<'a> {
    selector: &'a dyn VariableSelector,
}

impl<'a> MatExtractor<'a> {
    pub fn new(selector: &'a dyn VariableSelector) -> Self {
        Self { selector }
    }

    /// Collapse MATLAB's trailing singleton dimensions to a (rows, cols) pair.
    fn matrix_dims(name: &str, size: &[usize]) -> Result<(usize, usize)> {
        let mut dims = size.to_vec();
        while dims.len() > 2 && dims.last() == Some(&1) {
            dims.pop();
        }
        match dims.as_slice() {
            [rows, cols] => Ok((*rows, *cols)),
            _ => Err(NormalizeError::shape(
                format!(".mat variable '{}'", name),
                "a 2-D array",
                format!("{:?}", size),
            )),
        }
    }

    /// Build samples from MATLAB's column-major storage, keeping the class dtype.
    fn load_samples(name: &str, data: &NumericData, rows: usize, cols: usize) -> Result<Samples> {
        let samples = match data {
            NumericData::Int8 { real, imag } => {
                Samples::Int8(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::Int16 { real, imag } => {
                Samples::Int16(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::Int32 { real, imag } => {
                Samples::Int32(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::Int64 { real, imag } => {
                Samples::Int64(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::UInt8 { real, imag } => {
                Samples::UInt8(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::UInt16 { real, imag } => {
                Samples::UInt16(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::UInt32 { real, imag } => {
                Samples::UInt32(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::UInt64 { real, imag } => {
                Samples::UInt64(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::Single { real, imag } => {
                Samples::Float32(column_major(name, real, imag.is_some(), rows, cols)?)
            }
            NumericData::Double { real, imag } => {
                Samples::Float64(column_major(name, real, imag.is_some(), rows, cols)?)
            }
        };
        Ok(samples)
    }
}

fn column_major<T: Clone>(
    name: &str,
    real: &[T],
    complex: bool,
    rows: usize,
    cols: usize,
) -> Result<Array2<T>> {
    if complex {
        return Err(NormalizeError::parse(
            ".mat",
            format!("variable '{}' is complex-valued", name),
        ));
    }
    Array2::from_shape_vec((rows, cols).f(), real.to_vec()).map_err(|e| {
        NormalizeError::parse(
            ".mat",
            format!(
                "variable '{}' holds {} values, which does not fit {}: {}",
                name,
                real.len(),
                fmt_shape((rows, cols)),
                e
            ),
        )
    })
}

impl Extractor for MatExtractor<'_> {
    fn extract(&self, payload: &[u8]) -> Result<ExtractedMatrix> {
        let mat_file = MatFile::parse(Cursor::new(payload))
            .map_err(|e| NormalizeError::parse(".mat", format!("{:?}", e)))?;

        let arrays: Vec<&matfile::Array> = mat_file
            .arrays()
            .iter()
            .filter(|a| !a.name().starts_with(RESERVED_PREFIX))
            .collect();
        let names: Vec<&str> = arrays.iter().map(|a| a.name()).collect();

        let index = self.selector.select(&names)?;
        let array = arrays[index];
        let name = array.name();
        log::info!(
            "Variable '{}' shape: {:?} (selector: {})",
            name,
            array.size(),
            self.selector.name()
        );

        let (rows, cols) = Self::matrix_dims(name, array.size())?;
        let samples = Self::load_samples(name, array.data(), rows, cols)?;

        Ok(ExtractedMatrix::new(samples, Orientation::infer(rows)).with_variable(name))
    }

    fn normalize(&self, extracted: ExtractedMatrix) -> Result<Samples> {
        let variable = extracted
            .variable
            .clone()
            .unwrap_or_else(|| "<unnamed>".to_string());

        let time_major = to_time_major(extracted);
        let factor = decimation_factor(time_major.dim().0, &format!(".mat variable '{}'", variable))?;
        log::debug!("Decimating '{}' with stride {}", variable, factor);

        let decimated = decimate_rows(time_major, factor);
        log::info!("Reshaped to: {}", fmt_shape(decimated.dim()));

        let samples = reshape_canonical(decimated, &variable)?;
        if samples.dim() != (CANONICAL_SAMPLES, LEADS) {
            return Err(NormalizeError::shape(
                format!(".mat variable '{}'", variable),
                fmt_shape((CANONICAL_SAMPLES, LEADS)),
                fmt_shape(samples.dim()),
            ));
        }
        Ok(samples)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Mat
    }
}
