//! The normalizer pipeline: sniff → extract → normalize → emit, plus the
//! sequential batch driver.

use crate::emitter::{batch_output_path, emit, ensure_output_dir};
use crate::error::Result;
use crate::format::{extension, Mode, SourceFormat};
use crate::readers::ExtractorFactory;
use crate::selector::{FirstVariable, VariableSelector};
use crate::shape::{ensure_canonical, fmt_shape};
use crate::types::{CanonicalMatrix, Conversion};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What a batch does when one file fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure; nothing is reported as converted
    #[default]
    Abort,
    /// Record the failure and keep going
    Continue,
}

/// Pipeline configuration
pub struct NormalizerConfig {
    /// Chooses the data variable in `.mat` containers
    pub selector: Box<dyn VariableSelector>,

    pub failure_policy: FailurePolicy,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            selector: Box::new(FirstVariable),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// A file brought to canonical shape but not yet written
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub matrix: CanonicalMatrix,
    pub format: SourceFormat,
    /// Lower-cased source extension, with the dot
    pub extension: String,
    pub variable: Option<String>,
    /// Shape as extracted, before any normalization
    pub source_shape: (usize, usize),
}

/// Outcome of one file in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Converted { input: PathBuf, output: PathBuf },
    Failed { input: PathBuf, error: String },
}

/// Per-file outcomes of a batch, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn outputs(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Converted { output, .. } => Some(output.as_path()),
                FileOutcome::Failed { .. } => None,
            })
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.outputs().len()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Successful output paths joined with commas: the line handed to callers.
    pub fn joined_outputs(&self) -> String {
        self.outputs()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub struct Normalizer {
    config: NormalizerConfig,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Run extraction and normalization on an in-memory payload.
    pub fn normalize_bytes(&self, format: SourceFormat, payload: &[u8]) -> Result<Normalized> {
        let extractor = ExtractorFactory::create(format, self.config.selector.as_ref());
        let extracted = extractor.extract(payload)?;
        let source_shape = extracted.dim();
        let variable = extracted.variable.clone();
        log::debug!(
            "Extracted {} matrix {} ({:?}, {})",
            format,
            fmt_shape(source_shape),
            extracted.orientation,
            extracted.samples.dtype()
        );

        let samples = extractor.normalize(extracted)?;
        let matrix = ensure_canonical(samples)?;

        Ok(Normalized {
            matrix,
            format,
            extension: String::new(),
            variable,
            source_shape,
        })
    }

    /// Sniff, read and normalize one file. The format is resolved before the
    /// file is opened, so unsupported inputs never touch the disk.
    pub fn normalize_file(&self, input: &Path, mode: Mode) -> Result<Normalized> {
        let run = || -> Result<Normalized> {
            let format = SourceFormat::sniff(input, mode)?;
            let payload = std::fs::read(input)?;
            let mut normalized = self.normalize_bytes(format, &payload)?;
            normalized.extension = extension(input);
            Ok(normalized)
        };
        run().map_err(|e| e.in_file(input))
    }

    /// Single-file mode: normalize `input` and write it to exactly `output`.
    /// Nothing is written unless normalization succeeds.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<Conversion> {
        self.convert_with_mode(input, output, Mode::Single)
    }

    fn convert_with_mode(&self, input: &Path, output: &Path, mode: Mode) -> Result<Conversion> {
        let normalized = self.normalize_file(input, mode)?;
        let output = emit(&normalized.matrix, output).map_err(|e| e.in_file(output))?;
        Ok(Conversion {
            input: input.to_path_buf(),
            output,
            extension: normalized.extension,
            dtype: normalized.matrix.dtype(),
            variable: normalized.variable,
        })
    }

    /// Batch mode: convert `inputs` in order into `output_dir`.
    ///
    /// Under `FailurePolicy::Abort` the first failure is returned as the error
    /// and no report is produced; files converted before it remain on disk.
    /// Under `FailurePolicy::Continue` every file is attempted and failures are
    /// recorded in the report.
    pub fn convert_batch(&self, inputs: &[PathBuf], output_dir: &Path) -> Result<BatchReport> {
        ensure_output_dir(output_dir).map_err(|e| e.in_file(output_dir))?;

        let total = inputs.len();
        let mut report = BatchReport::default();
        for (i, input) in inputs.iter().enumerate() {
            log::info!("[{}/{}] {}", i + 1, total, input.display());
            let output = batch_output_path(input, output_dir);

            match self.convert_with_mode(input, &output, Mode::Batch) {
                Ok(conversion) => report.outcomes.push(FileOutcome::Converted {
                    input: input.clone(),
                    output: conversion.output,
                }),
                Err(err) => match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::Continue => {
                        log::warn!("{}", err);
                        report.outcomes.push(FileOutcome::Failed {
                            input: input.clone(),
                            error: err.to_string(),
                        });
                    }
                },
            }
        }

        log::info!(
            "Batch complete: {}/{} succeeded, {}/{} failed",
            report.succeeded(),
            total,
            report.failed(),
            total
        );
        Ok(report)
    }
}
