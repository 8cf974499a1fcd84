use crate::cli::ConvertArgs;
use crate::exit_codes;
use ecgnorm::shape::fmt_shape;
use ecgnorm::{Normalizer, NormalizerConfig, CANONICAL_SAMPLES, LEADS};
use std::path::Path;

pub fn execute(args: ConvertArgs) -> i32 {
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

    match normalizer.convert(Path::new(&args.input), Path::new(&args.output)) {
        Ok(conversion) => {
            println!(
                "Saved {} (shape: {}, dtype: {}, source: {})",
                conversion.output.display(),
                fmt_shape((CANONICAL_SAMPLES, LEADS)),
                conversion.dtype,
                conversion.extension
            );
            exit_codes::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_input_error() {
                exit_codes::INPUT_ERROR
            } else {
                exit_codes::EXECUTION_ERROR
            }
        }
    }
}
