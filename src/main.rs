//! QR code generator CLI.

use clap::Parser;
use qrstudio::logging::{init_logging, LogConfig, LogFormat};
use std::io::{self, IsTerminal};

mod cli;
mod commands;

use crate::cli::{Cli, ColorArg, Command, LogFormatArg};
use crate::commands::{run_export, run_kinds, run_preview, run_validate};

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Kinds => run_kinds(),
        Command::Validate(args) => run_validate(args),
        Command::Preview(args) => run_preview(args),
        Command::Export(args) => run_export(args),
    };
    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let ansi = match cli.color {
        ColorArg::Always => true,
        ColorArg::Never => false,
        ColorArg::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::from_verbosity(cli.verbose)
        .with_format(format)
        .with_ansi(ansi)
        .with_log_file(cli.log_file.clone())
        .with_timestamps(cli.log_timestamps)
}
