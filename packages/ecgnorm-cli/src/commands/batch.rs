use crate::cli::BatchArgs;
use crate::exit_codes;
use crate::output;
use ecgnorm::{FileOutcome, Normalizer, NormalizerConfig};
use std::path::{Path, PathBuf};

pub fn execute(args: BatchArgs) -> i32 {
    let selector = match args.selector.build() {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let (inputs, output_dir) = args.split_paths();
    let inputs: Vec<PathBuf> = inputs.iter().map(PathBuf::from).collect();

    let normalizer = Normalizer::new(NormalizerConfig {
        selector,
        failure_policy: args.on_error.into(),
    });

    // Under the abort policy any failure surfaces here and the success line
    // is never printed.
    let report = match normalizer.convert_batch(&inputs, Path::new(output_dir)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return if e.is_input_error() {
                exit_codes::INPUT_ERROR
            } else {
                exit_codes::EXECUTION_ERROR
            };
        }
    };

    for outcome in &report.outcomes {
        if let FileOutcome::Failed { error, .. } = outcome {
            eprintln!("Error: {}", error);
        }
    }

    if let Some(ref path) = args.report {
        if let Err(e) = output::write_report(&report, Path::new(path)) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    if let Err(e) = output::print_line(&report.joined_outputs()) {
        eprintln!("Error: {}", e);
        return exit_codes::EXECUTION_ERROR;
    }

    if report.failed() == 0 {
        exit_codes::SUCCESS
    } else if report.succeeded() > 0 {
        exit_codes::PARTIAL_FAILURE
    } else {
        exit_codes::EXECUTION_ERROR
    }
}
