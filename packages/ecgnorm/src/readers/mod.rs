/// Extractors
///
/// One extractor per ingestion strategy. Each turns an in-memory payload into
/// an `ExtractedMatrix` and knows the format-specific steps that bring that
/// matrix to 1000 × 12. The final shape invariant is checked by the pipeline,
/// not here.
use crate::error::Result;
use crate::format::SourceFormat;
use crate::selector::VariableSelector;
use crate::types::{ExtractedMatrix, Samples};

pub mod dat_reader;
pub mod json_reader;
pub mod mat_reader;

pub use dat_reader::DatExtractor;
pub use json_reader::JsonExtractor;
pub use mat_reader::MatExtractor;

/// Trait implemented by every format extractor
pub trait Extractor {
    /// Decode raw bytes into a sample matrix with orientation metadata
    fn extract(&self, payload: &[u8]) -> Result<ExtractedMatrix>;

    /// Format-specific orientation, decimation and reshape steps
    fn normalize(&self, extracted: ExtractedMatrix) -> Result<Samples>;

    fn format(&self) -> SourceFormat;
}

/// Factory for creating extractors based on the sniffed format
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// `selector` is only consulted by container formats.
    pub fn create<'a>(
        format: SourceFormat,
        selector: &'a dyn VariableSelector,
    ) -> Box<dyn Extractor + 'a> {
        match format {
            SourceFormat::Mat => Box::new(MatExtractor::new(selector)),
            SourceFormat::Dat => Box::new(DatExtractor),
            SourceFormat::Json => Box::new(JsonExtractor),
        }
    }
}
