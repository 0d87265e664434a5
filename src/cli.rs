//! CLI argument definitions for the QR code generator.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use qrstudio::{parse_assignment, Background, Color, ContentKind, ExportFormat, Field, Resolution};

#[derive(Parser)]
#[command(
    name = "qrstudio",
    version,
    about = "Generate styled QR codes for links, WiFi, locations, chats, mail and files",
    long_about = "Build a QR code from typed fields, preview it in the terminal and export it.\n\n\
                  Exports are written as qrcode.png, qrcode.jpg, qrcode.svg or qrcode.pdf."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Control ANSI color in log output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log output format (pretty for humans, json for machines).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the content kinds and their fields.
    Kinds,

    /// Print the payload and its validation result.
    Validate(InputArgs),

    /// Show the code in the terminal.
    Preview(PreviewArgs),

    /// Export the code to a file.
    Export(ExportArgs),
}

/// Where the data record comes from.
#[derive(Args)]
pub struct InputArgs {
    /// Content kind of a fresh record.
    #[arg(short, long, value_name = "KIND", conflicts_with = "data")]
    pub kind: Option<ContentKind>,

    /// TOML data record to start from.
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Set a field, e.g. `--field ssid=Home`. Repeatable.
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(Field, String)>,

    /// Upload a local file and use it as the file reference (audio, file, image).
    #[arg(long, value_name = "PATH")]
    pub upload: Option<PathBuf>,
}

/// Style preset and per-flag overrides.
#[derive(Args)]
pub struct StyleArgs {
    /// TOML style preset.
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Module color (#RGB or #RRGGBB).
    #[arg(long, value_name = "COLOR")]
    pub fg: Option<Color>,

    /// Background color, or `transparent`.
    #[arg(long, value_name = "COLOR", conflicts_with = "transparent")]
    pub bg: Option<Background>,

    /// Leave the background transparent.
    #[arg(long)]
    pub transparent: bool,

    /// Two-color gradient for the modules.
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    pub gradient: Option<Vec<Color>>,

    /// Brand logo name, `custom` or `none`.
    #[arg(long, value_name = "NAME")]
    pub logo: Option<String>,

    /// Custom logo image (path, file:// URL). Implies `--logo custom`.
    #[arg(long = "custom-logo", value_name = "REF")]
    pub custom_logo: Option<String>,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Also write the preview markup to this file.
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Output format: png, jpg, svg or pdf.
    #[arg(long, value_name = "FORMAT", default_value = "png")]
    pub format: ExportFormat,

    /// Canvas size: small (500), medium (1000) or large (2000).
    #[arg(long, value_name = "SIZE", default_value = "medium")]
    pub resolution: Resolution,

    /// Directory receiving the file.
    #[arg(short, long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

/// CLI color choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_flags() {
        let cli = Cli::try_parse_from([
            "qrstudio",
            "-vv",
            "export",
            "--kind",
            "wifi",
            "--field",
            "ssid=Home",
            "-f",
            "password=a=b",
            "--gradient",
            "#000",
            "#4F46E5",
            "--format",
            "pdf",
            "--resolution",
            "large",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.log_timestamps);
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.input.kind, Some(ContentKind::Wifi));
        assert_eq!(
            args.input.fields,
            vec![(Field::Ssid, "Home".to_string()), (Field::Password, "a=b".to_string())]
        );
        assert_eq!(args.style.gradient, Some(vec![Color::BLACK, Color::INDIGO]));
        assert_eq!(args.format, ExportFormat::Pdf);
        assert_eq!(args.resolution, Resolution::Large);
    }

    #[test]
    fn test_global_log_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qrstudio", "kinds", "--log-timestamps", "--log-format", "json"]).unwrap();
        assert!(cli.log_timestamps);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
    }

    #[test]
    fn test_kind_and_data_conflict() {
        assert!(Cli::try_parse_from(["qrstudio", "validate", "--kind", "url", "--data", "x.toml"]).is_err());
    }
}
