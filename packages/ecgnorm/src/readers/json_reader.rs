/// JSON / text extractor
///
/// Accepts a UTF-8 JSON nested array of 12 leads × 5000 samples (500 Hz over
/// 10 s). Normalization keeps every 5th sample (100 Hz) and transposes to
/// time-major.
use super::Extractor;
use crate::error::{NormalizeError, Result};
use crate::format::SourceFormat;
use crate::shape::{decimate_cols, fmt_shape, transpose};
use crate::types::{ExtractedMatrix, Orientation, Samples, LEADS};
use ndarray::Array2;

/// Samples per lead expected in a text recording
pub const JSON_SAMPLES: usize = 5000;

/// 500 Hz → 100 Hz
pub const JSON_STRIDE: usize = 5;

pub struct JsonExtractor;

impl Extractor for JsonExtractor {
    fn extract(&self, payload: &[u8]) -> Result<ExtractedMatrix> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| NormalizeError::parse("JSON", format!("invalid UTF-8: {}", e)))?;
        let rows: Vec<Vec<f64>> = serde_json::from_str(text)
            .map_err(|e| NormalizeError::parse("JSON", e.to_string()))?;

        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != JSON_SAMPLES)
        {
            let actual = if rows.len() == LEADS {
                format!("row {} with {} samples", idx, row.len())
            } else {
                format!("{} rows", rows.len())
            };
            return Err(NormalizeError::shape(
                "JSON array",
                fmt_shape((LEADS, JSON_SAMPLES)),
                actual,
            ));
        }
        if rows.len() != LEADS {
            return Err(NormalizeError::shape(
                "JSON array",
                fmt_shape((LEADS, JSON_SAMPLES)),
                fmt_shape((rows.len(), JSON_SAMPLES)),
            ));
        }

        let matrix = Array2::from_shape_fn((LEADS, JSON_SAMPLES), |(lead, t)| rows[lead][t]);
        Ok(ExtractedMatrix::new(
            Samples::Float64(matrix),
            Orientation::LeadMajor,
        ))
    }

    fn normalize(&self, extracted: ExtractedMatrix) -> Result<Samples> {
        let decimated = decimate_cols(extracted.samples, JSON_STRIDE);
        Ok(transpose(decimated))
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }
}
