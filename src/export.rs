//! Export of the rendered code to PNG, JPG, SVG or PDF.
//!
//! The exporter works from rendered markup: it serializes the markup into a
//! temporary object URL, rasterizes it onto a square canvas, draws the logo
//! on top and encodes the result. Loading failures are logged rather than
//! returned; a failed QR load aborts with no file, a failed logo load drops
//! the logo layer.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ImageFormat, Rgb, RgbImage, RgbaImage};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error, info, warn};

use crate::error::ExportError;
use crate::logo::load_logo;
use crate::objecturl::ObjectUrlStore;
use crate::pdf;
use crate::raster::{pixmap_to_rgba, rasterize_svg};
use crate::render::RenderedQr;
use crate::style::{Color, StyleRecord};

/// Base name of every download.
pub const DOWNLOAD_STEM: &str = "qrcode";
/// Logo side relative to the canvas side.
pub const LOGO_SCALE: f32 = 0.2;

/// Output file format.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [ExportFormat::Png, ExportFormat::Jpg, ExportFormat::Svg, ExportFormat::Pdf];

    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpg => "image/jpeg",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpg),
            "svg" => Ok(ExportFormat::Svg),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnknownOption {
                what: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// Canvas size preset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Resolution {
    Small,
    #[default]
    Medium,
    Large,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::Small, Resolution::Medium, Resolution::Large];

    /// Side length of the square canvas.
    pub const fn pixels(self) -> u32 {
        match self {
            Resolution::Small => 500,
            Resolution::Medium => 1000,
            Resolution::Large => 2000,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Resolution::Small => "small",
            Resolution::Medium => "medium",
            Resolution::Large => "large",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let px = self.pixels();
        write!(f, "{} ({px}x{px})", self.name())
    }
}

impl FromStr for Resolution {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExportError::UnknownOption {
                what: "resolution",
                value: s.to_string(),
            })
    }
}

/// A finished export, ready to download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// `qrcode.<ext>`.
    pub fn file_name(&self) -> String {
        format!("{DOWNLOAD_STEM}.{}", self.format.extension())
    }
}

/// Runs exports against an object URL store.
#[derive(Debug)]
pub struct Exporter<'a> {
    store: &'a ObjectUrlStore,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a ObjectUrlStore) -> Self {
        Self { store }
    }

    /// Produces the file for `rendered` in `format` at `resolution`.
    ///
    /// Returns `Ok(None)` when there is nothing to export (empty payload) or
    /// when the export aborted after logging why. Every object URL created
    /// here is revoked before returning.
    pub fn export(
        &self,
        rendered: &RenderedQr,
        style: &StyleRecord,
        format: ExportFormat,
        resolution: Resolution,
    ) -> Result<Option<ExportedFile>, ExportError> {
        if rendered.payload.is_empty() {
            debug!("empty payload, nothing to export");
            return Ok(None);
        }

        let size = resolution.pixels();
        let Some(mut canvas) = tiny_skia::Pixmap::new(size, size) else {
            error!(size, "failed to allocate export canvas");
            return Ok(None);
        };
        if let Some(background) = style.background.color() {
            canvas.fill(background.to_skia());
        }

        let qr_url = self
            .store
            .create_scoped(rendered.svg.clone().into_bytes(), "image/svg+xml;charset=utf-8");
        let qr_image = match qr_url.resolve() {
            Some(blob) => rasterize_svg(&blob.bytes, size, size),
            None => Err(format!("object URL {} is not live", qr_url.url())),
        };
        let qr_image = match qr_image {
            Ok(pixmap) => pixmap,
            Err(err) => {
                error!(error = %err, "error loading QR code image");
                return Ok(None);
            }
        };
        canvas.draw_pixmap(
            0,
            0,
            qr_image.as_ref(),
            &tiny_skia::PixmapPaint::default(),
            tiny_skia::Transform::identity(),
            None,
        );

        let mut image = pixmap_to_rgba(&canvas);
        self.draw_logo(&mut image, style);

        let bytes = finalize(&image, style, format)?;
        debug!(%format, size, len = bytes.len(), "export finished");
        Ok(Some(ExportedFile { format, bytes }))
    }

    /// Draws the logo centered at [`LOGO_SCALE`] of the canvas, or logs why it could not.
    fn draw_logo(&self, image: &mut RgbaImage, style: &StyleRecord) {
        let logo_size = (image.width() as f32 * LOGO_SCALE).round() as u32;
        let logo = load_logo(&style.logo, self.store).and_then(|asset| match asset {
            Some(asset) => asset.rasterize(logo_size).map(Some),
            None => Ok(None),
        });
        match logo {
            Ok(Some(logo)) => {
                let x = (image.width() - logo_size) / 2;
                let y = (image.height() - logo_size) / 2;
                imageops::overlay(image, &logo, x as i64, y as i64);
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "error loading logo image, exporting without it"),
        }
    }

    /// Hands `file` to `dir` as `qrcode.<ext>` through a temporary object URL.
    pub fn download(&self, file: &ExportedFile, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let dir = dir.as_ref();
        let link = self.store.create_scoped(file.bytes.clone(), file.format.mime());
        let path = dir.join(file.file_name());

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| ExportError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let bytes = link.resolve().map(|blob| blob.bytes.clone()).unwrap_or_default();
        fs::write(&path, bytes).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "saved QR code");
        Ok(path)
    }

    /// [`export`](Self::export) followed by [`download`](Self::download).
    pub fn export_to(
        &self,
        rendered: &RenderedQr,
        style: &StyleRecord,
        format: ExportFormat,
        resolution: Resolution,
        dir: impl AsRef<Path>,
    ) -> Result<Option<PathBuf>, ExportError> {
        match self.export(rendered, style, format, resolution)? {
            Some(file) => self.download(&file, dir).map(Some),
            None => Ok(None),
        }
    }
}

fn encode_err(format: &'static str) -> impl FnOnce(image::ImageError) -> ExportError {
    move |source| ExportError::Encode { format, source }
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(encode_err("png"))?;
    Ok(bytes)
}

/// Composites `image` over an opaque `backdrop`.
fn flatten(image: &RgbaImage, backdrop: Color) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let blend = |c: u8, under: u8| ((c as u32 * a as u32 + under as u32 * (255 - a as u32) + 127) / 255) as u8;
        Rgb([blend(r, backdrop.r), blend(g, backdrop.g), blend(b, backdrop.b)])
    })
}

fn finalize(image: &RgbaImage, style: &StyleRecord, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Png => encode_png(image),
        ExportFormat::Jpg => {
            let mut bytes = Vec::new();
            JpegEncoder::new_with_quality(&mut bytes, 100)
                .encode_image(&flatten(image, Color::WHITE))
                .map_err(encode_err("jpg"))?;
            Ok(bytes)
        }
        ExportFormat::Svg => {
            let png = encode_png(image)?;
            Ok(svg_wrapper(&png, image.width(), &style.background.svg_fill()).into_bytes())
        }
        ExportFormat::Pdf => pdf::image_page(&flatten(image, Color::WHITE)),
    }
}

/// Minimal SVG document around a PNG data URI.
fn svg_wrapper(png: &[u8], size: u32, background_fill: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{size}\" height=\"{size}\">\n\
         \t<rect width=\"{size}\" height=\"{size}\" fill=\"{background_fill}\"/>\n\
         \t<image xlink:href=\"data:image/png;base64,{}\" width=\"{size}\" height=\"{size}\"/>\n\
         </svg>\n",
        STANDARD.encode(png)
    )
}
