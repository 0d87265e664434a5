//! Error types for the payload, style, rendering and export stages.
//!
//! Input validation is advisory and lives in [`crate::validate`]; the
//! enums here cover the failures that stop an operation outright.

use std::path::PathBuf;
use thiserror::Error;

use crate::data::Field;
use crate::kind::ContentKind;

/// Errors raised while editing the data record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The field belongs to a different content kind.
    #[error("field '{field}' does not apply to {kind} codes")]
    NotApplicable { field: Field, kind: ContentKind },

    /// Unknown field name.
    #[error("unknown field: {name}")]
    UnknownField { name: String },

    /// Unknown WiFi encryption mode.
    #[error("unknown encryption mode '{value}', expected WPA, WEP or nopass")]
    UnknownEncryption { value: String },

    /// Unknown content kind name.
    #[error("unknown content kind: {name}")]
    UnknownKind { name: String },

    /// A `name=value` assignment without the `=`.
    #[error("expected name=value, got '{input}'")]
    MalformedAssignment { input: String },
}

/// Errors raised while building or loading a style record.
#[derive(Debug, Error)]
pub enum StyleError {
    /// Color string is not `#RGB` or `#RRGGBB`.
    #[error("invalid color '{value}', expected #RGB or #RRGGBB")]
    InvalidColor { value: String },

    /// Unknown logo name.
    #[error("unknown logo: {name}")]
    UnknownLogo { name: String },

    /// `custom` logo chosen without an image reference.
    #[error("custom logo selected without a custom_logo_url")]
    MissingCustomLogo,
}

/// Errors raised while loading a TOML style preset or data record.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the record.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised while producing QR markup.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Payload does not fit in any QR version at level H.
    #[error("payload does not fit in a QR code: {0}")]
    Matrix(#[from] qrcode::types::QrError),

    /// SVG post-processing failed.
    #[error("malformed QR markup: {0}")]
    Markup(String),
}

/// Errors raised while loading a logo image.
///
/// The exporter logs these and carries on without the logo layer.
#[derive(Debug, Error)]
pub enum LogoError {
    /// Remote logos need network access, which the pipeline does not have.
    #[error("remote logo {url} is not supported")]
    Remote { url: String },

    /// The object URL was never created or has been revoked.
    #[error("object URL {url} is not live")]
    Revoked { url: String },

    /// The logo file could not be read.
    #[error("failed to read logo {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The logo bytes are not a decodable image.
    #[error("failed to decode logo: {0}")]
    Decode(String),
}

/// Errors raised while exporting.
///
/// Image-load failures are not errors: they are logged and the export
/// aborts or proceeds without the logo.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Raster encoding failed.
    #[error("failed to encode {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    /// PDF assembly failed.
    #[error("failed to write PDF: {0}")]
    Pdf(String),

    /// Writing the download failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unknown format or resolution name.
    #[error("unknown {what}: {value}")]
    UnknownOption { what: &'static str, value: String },
}

/// Errors raised by file uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Uploads only apply to audio, file and image codes.
    #[error("{kind} codes do not accept uploads")]
    NotAccepted { kind: ContentKind },

    /// The file type is outside the accept filter of the kind.
    #[error("{path} ({mime}) is not an accepted {kind} upload")]
    Rejected {
        path: PathBuf,
        mime: String,
        kind: ContentKind,
    },

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error for the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Logo(#[from] LogoError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

pub type Result<T> = std::result::Result<T, Error>;
