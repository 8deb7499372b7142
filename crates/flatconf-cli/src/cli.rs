//! flatconf CLI - Converts profile-aware YAML configuration into properties files
//!
//! Usage:
//!   flatconf --input-dir config --output-dir build/config
//!   flatconf -i config -o build/config --env-dir env

use clap::{ArgAction, Parser};
use colored::Colorize;
use flatconf_core::{Pipeline, PipelineOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// flatconf - Flatten bootstrap.yml, application.yml and application-<profile>.yml
/// into one application-<profile>.properties per profile
#[derive(Parser, Debug)]
#[command(name = "flatconf")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Directory holding the YAML documents
    #[arg(short, long, default_value = ".")]
    input_dir: PathBuf,

    /// Directory the properties files are written to (created if missing)
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Directory of <profile>.json environment files used for ${KEY} substitution
    #[arg(short, long)]
    env_dir: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Don't list the written files
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> PipelineOptions {
        let options = PipelineOptions::default()
            .with_input_dir(&self.input_dir)
            .with_output_dir(&self.output_dir);
        match &self.env_dir {
            Some(env_dir) => options.with_env_dir(env_dir),
            None => options,
        }
    }

    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI with the process arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    execute(&cli)
}

fn execute(cli: &Cli) -> ExitCode {
    let pipeline = Pipeline::new(cli.options());
    log::debug!("Running with {:?}", pipeline.options());

    match pipeline.run() {
        Ok(report) => {
            if !cli.quiet {
                for file in &report.files {
                    println!("{} Wrote {}", "✓".green(), file.display());
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e.to_string().red());
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["flatconf"]).unwrap();

        assert_eq!(cli.input_dir, PathBuf::from("."));
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.env_dir, None);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "flatconf",
            "--input-dir",
            "conf",
            "-o",
            "out",
            "--env-dir",
            "env",
            "-vv",
        ])
        .unwrap();
        let options = cli.options();

        assert_eq!(options.input_dir, PathBuf::from("conf"));
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.env_dir, Some(PathBuf::from("env")));
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_unknown_option_is_usage_error() {
        let err = Cli::try_parse_from(["flatconf", "--bogus"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_execute_success_and_failure() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let input_dir = input.path().to_str().unwrap();
        let output_dir = output.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["flatconf", "-i", input_dir, "-o", output_dir, "-q"])
            .unwrap();
        assert_eq!(execute(&cli), ExitCode::from(1));

        std::fs::write(input.path().join("application.yml"), "a: 1\n").unwrap();
        std::fs::write(input.path().join("application-dev.yml"), "b: 2\n").unwrap();
        assert_eq!(execute(&cli), ExitCode::SUCCESS);

        let content =
            std::fs::read_to_string(output.path().join("application-dev.properties")).unwrap();
        assert_eq!(content, "a=1\nb=2\n");
    }
}
