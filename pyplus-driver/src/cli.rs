use clap::{Args, Parser, Subcommand};
use pyplus_common::PyPlusError;
use pyplus_translate::{DefaultParamPolicy, GenericParamPolicy, TranslatorConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pyplus",
    about = "Translate Python scripts into C++",
    long_about = "pyplus - Python to C++ translator\n\n\
                  Reads the JSON syntax tree of a script and emits C++. Constructs without a \
                  direct counterpart are kept as commented original source for manual porting.",
    version
)]
pub struct Cli {
    /// Log translation decisions (RUST_LOG overrides the level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate syntax trees into C++ files
    Translate {
        /// Parser output (JSON syntax tree) of each script
        #[arg(value_name = "AST_JSON", required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the generated files (stdout for a single input if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Original script, used to recover skipped source text (single input only)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Also write `<stem>.diagnostics.json` with every skipped construct
        #[arg(long)]
        diagnostics: bool,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// List the locations that need manual porting
    Check {
        #[arg(value_name = "AST_JSON", required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        policy: PolicyArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// Translator configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Unannotated parameters: template or skip
    #[arg(long, value_name = "POLICY")]
    pub generic_params: Option<GenericParamPolicy>,

    /// Default parameter values: keep or skip
    #[arg(long, value_name = "POLICY")]
    pub default_params: Option<DefaultParamPolicy>,
}

impl PolicyArgs {
    /// Configuration file (or defaults) with the command-line flags applied on top
    pub fn resolve(&self) -> Result<TranslatorConfig, PyPlusError> {
        let mut config = match &self.config {
            Some(path) => TranslatorConfig::load(path)?,
            None => TranslatorConfig::default(),
        };
        if let Some(policy) = self.generic_params {
            config = config.with_generic_params(policy);
        }
        if let Some(policy) = self.default_params {
            config = config.with_default_params(policy);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_arguments() {
        let cli = Cli::try_parse_from([
            "pyplus",
            "translate",
            "a.json",
            "b.json",
            "-o",
            "out",
            "--generic-params",
            "skip",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Translate {
                inputs,
                output,
                diagnostics,
                policy,
                ..
            } => {
                assert_eq!(inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert_eq!(output, Some(PathBuf::from("out")));
                assert!(!diagnostics);
                assert_eq!(policy.generic_params, Some(GenericParamPolicy::Skip));
                assert_eq!(policy.default_params, None);
            }
            other => panic!("Expected translate, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = Cli::try_parse_from(["pyplus", "check", "a.json", "--default-params", "drop"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Cli::try_parse_from(["pyplus", "check"]).is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let policy = PolicyArgs {
            default_params: Some(DefaultParamPolicy::Skip),
            ..PolicyArgs::default()
        };
        let config = policy.resolve().unwrap();
        assert_eq!(config.generic_params, GenericParamPolicy::Template);
        assert_eq!(config.default_params, DefaultParamPolicy::Skip);
    }
}
