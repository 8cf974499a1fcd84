use crate::cli::ValidateArgs;
use crate::exit_codes;
use crate::output;
use ecgnorm::format::extension;
use ecgnorm::shape::{ensure_canonical, fmt_shape};
use ecgnorm::{npy, Mode, Normalizer, NormalizerConfig};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize, Default)]
struct ValidateOutput {
    file: String,
    exists: bool,
    valid: bool,
    format: Option<String>,
    variable: Option<String>,
    source_shape: Option<String>,
    dtype: Option<String>,
    shape: Option<String>,
    error: Option<String>,
}

fn validate_npy(path: &Path, result: &mut ValidateOutput) -> Result<(), String> {
    result.format = Some("NPY".to_string());
    let samples = npy::read_npy(path).map_err(|e| e.to_string())?;
    result.source_shape = Some(fmt_shape(samples.dim()));
    result.dtype = Some(samples.dtype().to_string());
    let matrix = ensure_canonical(samples).map_err(|e| e.to_string())?;
    result.shape = Some(fmt_shape(matrix.dim()));
    Ok(())
}

fn validate_source(
    normalizer: &Normalizer,
    path: &Path,
    mode: Mode,
    result: &mut ValidateOutput,
) -> Result<(), String> {
    let normalized = normalizer
        .normalize_file(path, mode)
        .map_err(|e| e.to_string())?;
    result.format = Some(normalized.format.to_string());
    result.variable = normalized.variable;
    result.source_shape = Some(fmt_shape(normalized.source_shape));
    result.dtype = Some(normalized.matrix.dtype().to_string());
    result.shape = Some(fmt_shape(normalized.matrix.dim()));
    Ok(())
}

pub fn execute(args: ValidateArgs) -> i32 {
    let path = Path::new(&args.input);
    let mode = if args.single { Mode::Single } else { Mode::Batch };

    let selector = match args.selector.build() {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };
    let normalizer = Normalizer::new(NormalizerConfig {
        selector,
        ..Default::default()
    });

    let mut result = ValidateOutput {
        file: args.input.clone(),
        exists: path.is_file(),
        ..Default::default()
    };

    let outcome = if extension(path) == format!(".{}", ecgnorm::emitter::OUTPUT_EXTENSION) {
        validate_npy(path, &mut result)
    } else {
        validate_source(&normalizer, path, mode, &mut result)
    };
    result.valid = outcome.is_ok();
    result.error = outcome.err();

    if args.json {
        if let Err(e) = output::print_json(&result) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    } else if let Some(ref err) = result.error {
        eprintln!("Error: {}", err);
    } else {
        println!(
            "File '{}' is valid ({}, {} {} -> {})",
            args.input,
            result.format.as_deref().unwrap_or_default(),
            result.dtype.as_deref().unwrap_or_default(),
            result.source_shape.as_deref().unwrap_or_default(),
            result.shape.as_deref().unwrap_or_default()
        );
    }

    if result.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::INPUT_ERROR
    }
}
