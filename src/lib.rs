//! # qrstudio
//!
//! A Rust library for building typed QR code payloads and exporting styled codes.
//!
//! `qrstudio` turns structured input (a link, WiFi credentials, coordinates, a WhatsApp
//! chat, an email draft or a file reference) into the text a scanner understands, checks
//! it, renders a styled SVG preview and exports the code as PNG, JPG, SVG or PDF.
//!
//! ## Features
//!
//! - Eight content kinds, each with its own payload format and validation rules.
//! - Solid or gradient module colors, solid or transparent backgrounds.
//! - Built-in brand logos or a custom image in the middle of the code.
//! - Exports at 500, 1000 or 2000 pixels; PDFs place the code on an A4 page.
//! - Local uploads for audio, image and document codes through in-memory object URLs.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrstudio = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Fill in a WiFi code and export it as a PNG:
//!
//! ```rust,no_run
//! use qrstudio::{ContentKind, ExportFormat, Exporter, Field, ObjectUrlStore, Resolution, Session};
//!
//! fn main() -> qrstudio::Result<()> {
//!     let store = ObjectUrlStore::new();
//!     let mut session = Session::new(ContentKind::Wifi);
//!     session.set_field(Field::Ssid, "Home")?;
//!     session.set_field(Field::Password, "hunter22")?;
//!     assert_eq!(session.payload(), "WIFI:T:WPA;S:Home;P:hunter22;;");
//!
//!     let exporter = Exporter::new(&store);
//!     if let Some(file) = session.export(&exporter, &store, ExportFormat::Png, Resolution::Medium)? {
//!         exporter.download(&file, "output")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`data`], [`kind`]: the data record per content kind.
//! - [`encode`], [`validate`]: payload text and advisory validation.
//! - [`style`], [`logo`]: colors, backgrounds and logos.
//! - [`render`]: SVG preview markup.
//! - [`export`], [`pdf`]: raster, SVG and PDF downloads.
//! - [`objecturl`], [`upload`]: in-memory blobs and local uploads.
//! - [`session`]: form state tying the above together.

#![forbid(unsafe_code)]

pub mod data;
pub mod encode;
pub mod error;
pub mod export;
pub mod kind;
pub mod logging;
pub mod logo;
pub mod objecturl;
pub mod pdf;
pub mod raster;
pub mod render;
pub mod session;
pub mod style;
pub mod upload;
pub mod validate;

pub use data::{parse_assignment, DataRecord, Field, WifiEncryption};
pub use encode::encode_payload;
pub use error::{Error, Result};
pub use export::{ExportFormat, ExportedFile, Exporter, Resolution};
pub use kind::ContentKind;
pub use objecturl::ObjectUrlStore;
pub use render::{preview, render_svg, Preview, RenderedQr};
pub use session::Session;
pub use style::{Background, BrandLogo, Color, ColorMode, Logo, StyleRecord};
pub use upload::upload_file;
pub use validate::{validate, ValidationResult};
