//! Subcommand implementations.

use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result};
use qrstudio::render::to_terminal_string;
use qrstudio::{
    upload_file, Background, BrandLogo, ColorMode, ContentKind, DataRecord, Exporter, Field, Logo, ObjectUrlStore,
    Preview, Session, StyleRecord, WifiEncryption,
};
use tracing::{info, warn};

use crate::cli::{ExportArgs, InputArgs, PreviewArgs, StyleArgs};

pub fn run_kinds() -> Result<i32> {
    print!("{}", kinds_listing());
    Ok(0)
}

/// Content kinds with their fields, then the accepted encryption and logo names.
fn kinds_listing() -> String {
    let mut out = String::from("Kinds:\n");
    for kind in ContentKind::ALL {
        let fields: Vec<&str> = Field::ALL
            .into_iter()
            .filter(|field| field.applies_to(kind))
            .map(Field::name)
            .collect();
        let _ = writeln!(out, "  {:<10} {:<12} {}", kind.name(), kind.label(), fields.join(", "));
    }
    out.push_str("WiFi encryption:\n");
    for encryption in WifiEncryption::ALL {
        let _ = writeln!(out, "  {:<10} {}", encryption.token(), encryption.label());
    }
    out.push_str("Logos:\n");
    for brand in BrandLogo::ALL {
        let _ = writeln!(out, "  {:<10} {}", brand.name(), brand.label());
    }
    let _ = writeln!(out, "  {:<10} {}", "custom", "image given with --custom-logo");
    out
}

pub fn run_validate(args: &InputArgs) -> Result<i32> {
    let store = ObjectUrlStore::new();
    let session = build_session(args, StyleRecord::default(), &store)?;
    let result = session.validation();
    println!("payload: {}", session.payload());
    if result.is_valid {
        println!("valid");
        Ok(0)
    } else {
        println!("invalid: {}", result.message);
        Ok(1)
    }
}

pub fn run_preview(args: &PreviewArgs) -> Result<i32> {
    let store = ObjectUrlStore::new();
    let style = build_style(&args.style)?;
    let session = build_session(&args.input, style, &store)?;

    match session.preview(&store).context("failed to render preview")? {
        Preview::Placeholder(text) => {
            println!("{text}");
            Ok(1)
        }
        Preview::Code(rendered) => {
            println!("{}", to_terminal_string(&rendered.payload)?);
            println!("{}", rendered.payload);
            if let Some(path) = &args.svg {
                fs::write(path, &rendered.svg).with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "saved preview markup");
            }
            Ok(0)
        }
    }
}

pub fn run_export(args: &ExportArgs) -> Result<i32> {
    let store = ObjectUrlStore::new();
    let style = build_style(&args.style)?;
    let session = build_session(&args.input, style, &store)?;

    let validation = session.validation();
    if !validation.is_valid {
        warn!(message = %validation.message, "exporting data that does not validate");
    }

    let exporter = Exporter::new(&store);
    let Some(file) = session.export(&exporter, &store, args.format, args.resolution)? else {
        if session.payload().is_empty() {
            eprintln!("nothing to export: the payload is empty");
        } else {
            eprintln!("export aborted; run with -v for details");
        }
        return Ok(1);
    };
    let path = exporter.download(&file, &args.out_dir)?;
    println!("{}", path.display());
    Ok(0)
}

/// Assembles the session from a data file or a fresh record, then applies
/// field flags and the upload in that order.
fn build_session(args: &InputArgs, style: StyleRecord, store: &ObjectUrlStore) -> Result<Session> {
    let mut session = match &args.data {
        Some(path) => Session::with_record(DataRecord::from_toml_file(path)?, style),
        None => {
            let mut session = Session::new(args.kind.unwrap_or(ContentKind::Url));
            session.style = style;
            session
        }
    };

    for (field, value) in &args.fields {
        session.set_field(*field, value)?;
    }
    if let Some(path) = &args.upload {
        let url = upload_file(store, session.kind(), path)?;
        session.set_field(Field::FileUrl, &url)?;
    }
    Ok(session)
}

fn build_style(args: &StyleArgs) -> Result<StyleRecord> {
    let mut style = match &args.style {
        Some(path) => StyleRecord::from_toml_file(path)?,
        None => StyleRecord::default(),
    };

    if let Some(fg) = args.fg {
        style.color_mode = ColorMode::Single;
        style.fg_color = fg;
    }
    if let Some(bg) = args.bg {
        style.background = bg;
    }
    if args.transparent {
        style.background = Background::Transparent;
    }
    if let Some([start, end]) = args.gradient.as_deref() {
        style.color_mode = ColorMode::Gradient;
        style.gradient_start = *start;
        style.gradient_end = *end;
    }
    match (&args.logo, &args.custom_logo) {
        (Some(name), custom) => style.logo = Logo::from_name(name, custom.as_deref())?,
        (None, Some(custom)) => style.logo = Logo::Custom(custom.clone()),
        (None, None) => {}
    }
    Ok(style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use qrstudio::Color;

    use crate::cli::{Cli, Command};

    fn preview_args(argv: &[&str]) -> PreviewArgs {
        let mut full = vec!["qrstudio", "preview"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Preview(args) => args,
            _ => panic!("expected preview"),
        }
    }

    #[test]
    fn test_kinds_listing_names_every_choice() {
        let listing = kinds_listing();
        assert!(listing.contains("  wifi       WiFi         ssid, password, encryption\n"));
        assert!(listing.contains("  nopass     No Password\n"));
        assert!(listing.contains("  twitter    X (Twitter)\n"));
        for brand in BrandLogo::ALL {
            assert!(listing.contains(brand.label()), "{}", brand.name());
        }
    }

    #[test]
    fn test_style_overrides() {
        let args = preview_args(&["--gradient", "#111", "#222", "--transparent", "--logo", "twitter"]);
        let style = build_style(&args.style).unwrap();
        assert_eq!(style.color_mode, ColorMode::Gradient);
        assert_eq!(style.gradient_start, Color::rgb(0x11, 0x11, 0x11));
        assert_eq!(style.background, Background::Transparent);
        assert_eq!(style.logo, Logo::Brand(BrandLogo::Twitter));
    }

    #[test]
    fn test_custom_logo_implies_custom() {
        let args = preview_args(&["--custom-logo", "logo.png"]);
        assert_eq!(
            build_style(&args.style).unwrap().logo,
            Logo::Custom("logo.png".to_string())
        );
    }

    #[test]
    fn test_fields_apply_to_fresh_record() {
        let args = preview_args(&["-k", "mail", "-f", "email=a@b.com", "-f", "subject=Hi"]);
        let store = ObjectUrlStore::new();
        let session = build_session(&args.input, StyleRecord::default(), &store).unwrap();
        assert_eq!(session.payload(), "mailto:a@b.com?subject=Hi");
    }

    #[test]
    fn test_field_for_other_kind_fails() {
        let args = preview_args(&["-k", "url", "-f", "ssid=Home"]);
        let store = ObjectUrlStore::new();
        assert!(build_session(&args.input, StyleRecord::default(), &store).is_err());
    }
}
