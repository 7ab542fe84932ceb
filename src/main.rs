//! Command-line driver: parse and lower Argon source files.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use argonc::{BuildMode, Config, Diagnostics};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "argonc", version, about = "Argon compiler front end")]
struct Cli {
    /// Source files to compile.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write lowered output to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Add DIR to the include search path.
    #[arg(short = 'I', value_name = "DIR")]
    include: Vec<PathBuf>,

    /// Define macro NAME (default value 1).
    #[arg(short = 'D', value_name = "NAME[=VALUE]")]
    define: Vec<String>,

    /// Check syntax only; do not lower.
    #[arg(long, alias = "fsyntax-only")]
    syntax_only: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config {
            input_files: self.files,
            include_paths: self.include,
            output: self.output,
            build_mode: if self.syntax_only {
                BuildMode::SyntaxOnly
            } else {
                BuildMode::Lower
            },
            verbose: self.verbose,
            ..Config::default()
        };
        for definition in &self.define {
            config.define(definition);
        }
        config
    }
}

/// Log filter used when `RUST_LOG` is unset.
const fn default_log_level(config: &Config) -> &'static str {
    if config.verbose { "debug" } else { "warn" }
}

fn main() -> ExitCode {
    let config = Cli::parse().into_config();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(default_log_level(&config))
            }),
        )
        .with_writer(std::io::stderr)
        .try_init();
    let diagnostics = Diagnostics::new();
    let outcome = argonc::run(&config, &diagnostics);

    for diagnostic in diagnostics.diagnostics() {
        eprintln!("{diagnostic}");
    }

    if config.build_mode == BuildMode::Lower {
        let lowered = outcome.lowered();
        match &config.output {
            Some(path) => {
                if let Err(e) = fs::write(path, lowered) {
                    eprintln!("{}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            }
            None => print!("{lowered}"),
        }
    }

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{} of {} file(s) failed",
            outcome.failed.len(),
            config.input_files.len()
        );
        ExitCode::FAILURE
    }
}
