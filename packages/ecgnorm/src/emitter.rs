//! Emitter: writes canonical matrices as `.npy` artifacts.

use crate::error::Result;
use crate::npy;
use crate::types::CanonicalMatrix;
use std::path::{Path, PathBuf};

/// Extension of every emitted artifact, without the dot
pub const OUTPUT_EXTENSION: &str = "npy";

/// `<output_dir>/<input stem>.npy`
pub fn batch_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION))
}

/// Create the output directory and its parents. Existing directories are fine.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Write `matrix` to exactly `output` and hand the path back.
pub fn emit(matrix: &CanonicalMatrix, output: &Path) -> Result<PathBuf> {
    npy::write_npy(output, matrix.samples())?;
    log::info!("Saved {} ({} {:?})", output.display(), matrix.dtype(), matrix.dim());
    Ok(output.to_path_buf())
}
