/// Raw `.dat` extractor
///
/// The payload is a headerless run of native-endian int16 samples, already
/// time-major: sample 0 of leads 1..12, then sample 1, and so on.
use super::Extractor;
use crate::error::{NormalizeError, Result};
use crate::format::SourceFormat;
use crate::types::{ExtractedMatrix, Orientation, Samples, CANONICAL_LEN, CANONICAL_SAMPLES, LEADS};
use byteorder::{ByteOrder, NativeEndian};
use ndarray::Array2;

pub struct DatExtractor;

impl Extractor for DatExtractor {
    fn extract(&self, payload: &[u8]) -> Result<ExtractedMatrix> {
        if payload.len() % 2 != 0 {
            return Err(NormalizeError::parse(
                ".dat",
                format!(
                    "buffer size ({} bytes) must be a multiple of the int16 element size",
                    payload.len()
                ),
            ));
        }

        let count = payload.len() / 2;
        if count != CANONICAL_LEN {
            return Err(NormalizeError::shape(".dat", CANONICAL_LEN, count));
        }

        let mut values = vec![0i16; count];
        NativeEndian::read_i16_into(payload, &mut values);

        let matrix = Array2::from_shape_vec((CANONICAL_SAMPLES, LEADS), values)
            .map_err(|e| NormalizeError::parse(".dat", e.to_string()))?;

        Ok(ExtractedMatrix::new(
            Samples::Int16(matrix),
            Orientation::TimeMajor,
        ))
    }

    fn normalize(&self, extracted: ExtractedMatrix) -> Result<Samples> {
        Ok(extracted.samples)
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::Dat
    }
}
