use clap::{Args, Parser, Subcommand, ValueEnum};
use ecgnorm::{
    FailurePolicy, FirstVariable, NamedVariable, PatternVariable, UniqueVariable,
    VariableSelector,
};

#[derive(Parser)]
#[command(
    name = "ecgnorm",
    version,
    about = "Normalize 12-lead ECG recordings into canonical 1000x12 NumPy arrays",
    long_about = "Convert ECG recordings (.mat, .dat, and in batch mode .json/.txt) into\n\
                  NumPy .npy arrays of 1000 time samples x 12 leads."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a single .mat or .dat file to an explicit output path
    Convert(ConvertArgs),
    /// Convert many files into an output directory and print the output paths
    Batch(BatchArgs),
    /// Check that a file converts cleanly without writing anything
    Validate(ValidateArgs),
}

/// How the `.mat` data variable is chosen
#[derive(Args, Debug, Clone, Default)]
pub struct SelectorArgs {
    /// Exact .mat variable name to convert
    #[arg(long, env = "ECGNORM_VARIABLE", conflicts_with_all = ["variable_pattern", "require_unique"])]
    pub variable: Option<String>,

    /// Convert the first .mat variable whose name matches this glob (e.g. "ecg*")
    #[arg(long, conflicts_with = "require_unique")]
    pub variable_pattern: Option<String>,

    /// Fail instead of guessing when a .mat file holds several variables
    #[arg(long, default_value_t = false)]
    pub require_unique: bool,
}

impl SelectorArgs {
    pub fn build(&self) -> Result<Box<dyn VariableSelector>, String> {
        if let Some(ref name) = self.variable {
            return Ok(Box::new(NamedVariable(name.clone())));
        }
        if let Some(ref pattern) = self.variable_pattern {
            let selector = PatternVariable::new(pattern)
                .map_err(|e| format!("Invalid variable pattern '{}': {}", pattern, e))?;
            return Ok(Box::new(selector));
        }
        if self.require_unique {
            return Ok(Box::new(UniqueVariable));
        }
        Ok(Box::new(FirstVariable))
    }
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Input recording (.mat or .dat)
    pub input: String,

    /// Output path, written exactly as given (no .npy suffix is appended)
    pub output: String,

    #[command(flatten)]
    pub selector: SelectorArgs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnError {
    /// Stop the batch at the first failing file
    Abort,
    /// Convert what can be converted and report failures
    Continue,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => FailurePolicy::Abort,
            OnError::Continue => FailurePolicy::Continue,
        }
    }
}

#[derive(Args)]
pub struct BatchArgs {
    /// Input files followed by the output directory
    #[arg(required = true, num_args = 2.., value_name = "PATHS")]
    pub paths: Vec<String>,

    /// What to do when a file fails to convert
    #[arg(long, value_enum, env = "ECGNORM_ON_ERROR", default_value_t = OnError::Abort)]
    pub on_error: OnError,

    /// Write a JSON report of every file's outcome to this path
    #[arg(long)]
    pub report: Option<String>,

    #[command(flatten)]
    pub selector: SelectorArgs,
}

impl BatchArgs {
    /// (inputs, output directory)
    pub fn split_paths(&self) -> (&[String], &str) {
        match self.paths.split_last() {
            Some((dir, inputs)) => (inputs, dir.as_str()),
            None => (&[], ""),
        }
    }
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input file path (.mat, .dat, .json, .txt, or an emitted .npy)
    pub input: String,

    /// Reject .json/.txt like single-file conversion does
    #[arg(long, default_value_t = false)]
    pub single: bool,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(flatten)]
    pub selector: SelectorArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_split_paths() {
        let cli = Cli::try_parse_from(["ecgnorm", "batch", "a.mat", "b.dat", "out"]).unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch command");
        };
        let (inputs, dir) = args.split_paths();
        assert_eq!(inputs, ["a.mat".to_string(), "b.dat".to_string()]);
        assert_eq!(dir, "out");
        assert_eq!(args.on_error, OnError::Abort);
    }

    #[test]
    fn test_batch_requires_input_and_dir() {
        assert!(Cli::try_parse_from(["ecgnorm", "batch", "out"]).is_err());
    }

    #[test]
    fn test_on_error_continue() {
        let cli = Cli::try_parse_from([
            "ecgnorm",
            "batch",
            "--on-error",
            "continue",
            "a.dat",
            "out",
        ])
        .unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(FailurePolicy::from(args.on_error), FailurePolicy::Continue);
    }

    #[test]
    fn test_convert_output_help_mentions_exact_path() {
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        let convert = cmd.find_subcommand_mut("convert").unwrap();
        let output = convert
            .get_arguments()
            .find(|a| a.get_id() == "output")
            .unwrap();
        let help = output.get_help().unwrap().to_string();
        assert!(help.contains("no .npy suffix is appended"));
    }

    #[test]
    fn test_selector_flags_conflict() {
        assert!(Cli::try_parse_from([
            "ecgnorm",
            "convert",
            "a.mat",
            "a.npy",
            "--variable",
            "val",
            "--require-unique",
        ])
        .is_err());
    }

    #[test]
    fn test_selector_build() {
        assert_eq!(SelectorArgs::default().build().unwrap().name(), "first");

        let named = SelectorArgs {
            variable: Some("val".to_string()),
            ..Default::default()
        };
        assert_eq!(named.build().unwrap().name(), "named");

        let pattern = SelectorArgs {
            variable_pattern: Some("ecg*".to_string()),
            ..Default::default()
        };
        assert_eq!(pattern.build().unwrap().name(), "pattern");

        let bad = SelectorArgs {
            variable_pattern: Some("ecg[".to_string()),
            ..Default::default()
        };
        assert!(bad.build().is_err());

        let unique = SelectorArgs {
            require_unique: true,
            ..Default::default()
        };
        assert_eq!(unique.build().unwrap().name(), "unique");
    }
}
