//! Preview rendering: payload and style to SVG markup.
//!
//! The QR matrix comes from the `qrcode` crate at error-correction level H.
//! This module turns it into markup with a background path, a module path
//! and an optional centered logo, then rewrites the module fill when the
//! style asks for a gradient.

use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Write as _;
use tracing::{debug, warn};

use crate::data::DataRecord;
use crate::encode::encode_payload;
use crate::error::RenderError;
use crate::logo::{load_logo, LogoAsset};
use crate::objecturl::ObjectUrlStore;
use crate::style::{Color, Logo, StyleRecord};
use crate::validate::validate;

/// Pixel size of the preview symbol.
pub const PREVIEW_SIZE: u32 = 280;
/// Pixel size of the logo inside the preview.
pub const PREVIEW_LOGO_SIZE: u32 = 40;
/// Light modules around the symbol.
pub const QUIET_ZONE: usize = 4;
/// `id` of the gradient definition injected in gradient mode.
pub const GRADIENT_ID: &str = "qr-gradient";

/// Placeholder shown while the payload is empty.
pub const EMPTY_PLACEHOLDER: &str = "Enter data to generate a QR code";

/// Module grid of an encoded payload, without quiet zone.
#[derive(Clone, Debug)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Encodes `payload` at error-correction level H.
    pub fn encode(payload: &str) -> Result<Self, RenderError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();
        Ok(Self {
            width: code.width(),
            modules,
        })
    }

    /// Side length in modules.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at (x, y) is dark. Out-of-range coordinates are light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Clears the modules inside the given cell rectangle.
    fn excavate(&mut self, cells: CellRect) {
        for y in cells.y..(cells.y + cells.height).min(self.width) {
            for x in cells.x..(cells.x + cells.width).min(self.width) {
                self.modules[y * self.width + x] = false;
            }
        }
    }
}

/// Rendered preview markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedQr {
    pub payload: String,
    pub svg: String,
    /// Pixel size of the `<svg>` element.
    pub size: u32,
}

/// What the preview area shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Preview {
    /// Explanatory text in place of a code.
    Placeholder(String),
    Code(RenderedQr),
}

/// Logo placement in module units, quiet zone included.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LogoBox {
    x: f64,
    y: f64,
    size: f64,
}

/// Whole modules covered by a [`LogoBox`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRect {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl LogoBox {
    fn centered(cells: usize) -> Self {
        let size = PREVIEW_LOGO_SIZE as f64 * cells as f64 / PREVIEW_SIZE as f64;
        let offset = (cells as f64 - size) / 2.0;
        Self {
            x: offset,
            y: offset,
            size,
        }
    }

    fn cells(self) -> CellRect {
        let x = self.x.floor();
        let y = self.y.floor();
        CellRect {
            x: x as usize,
            y: y as usize,
            width: (self.size + self.x - x).ceil() as usize,
            height: (self.size + self.y - y).ceil() as usize,
        }
    }
}

/// Builds the preview for the current record and style.
///
/// Invalid or empty data yields a placeholder.
pub fn preview(record: &DataRecord, style: &StyleRecord, store: &ObjectUrlStore) -> Result<Preview, RenderError> {
    let payload = encode_payload(record);
    let validation = validate(record);
    if !validation.is_valid {
        return Ok(Preview::Placeholder(format!("Invalid data: {}", validation.message)));
    }
    if payload.is_empty() {
        return Ok(Preview::Placeholder(EMPTY_PLACEHOLDER.to_string()));
    }

    render_payload(&payload, style, store).map(Preview::Code)
}

/// Loads the style's logo from `store` and renders `payload`.
///
/// A logo that cannot be loaded is logged and left out.
pub fn render_payload(payload: &str, style: &StyleRecord, store: &ObjectUrlStore) -> Result<RenderedQr, RenderError> {
    let logo = match load_logo(&style.logo, store) {
        Ok(logo) => logo,
        Err(err) => {
            warn!(error = %err, "logo unavailable, rendering without it");
            None
        }
    };
    render_svg(payload, style, logo.as_ref())
}

/// Renders `payload` as styled SVG markup.
///
/// `logo` is drawn centered at [`PREVIEW_LOGO_SIZE`]; brand logos with dark
/// artwork excavate the modules beneath them and sit on white.
pub fn render_svg(payload: &str, style: &StyleRecord, logo: Option<&LogoAsset>) -> Result<RenderedQr, RenderError> {
    let mut matrix = QrMatrix::encode(payload)?;
    let cells = matrix.width() + 2 * QUIET_ZONE;
    let logo_box = LogoBox::centered(cells);
    let excavate = matches!(style.logo, Logo::Brand(brand) if brand.needs_white_backdrop()) && logo.is_some();

    let backdrop = if excavate {
        let rect = logo_box.cells();
        matrix.excavate(CellRect {
            x: rect.x.saturating_sub(QUIET_ZONE),
            y: rect.y.saturating_sub(QUIET_ZONE),
            ..rect
        });
        Some(rect)
    } else {
        None
    };

    let background_fill = style.background.svg_fill();
    let mut svg = String::new();
    svg += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" version=\"1.1\" \
         width=\"{PREVIEW_SIZE}\" height=\"{PREVIEW_SIZE}\" viewBox=\"0 0 {cells} {cells}\" shape-rendering=\"crispEdges\">"
    );
    let _ = writeln!(svg, "\t<path fill=\"{background_fill}\" d=\"M0,0h{cells}v{cells}H0z\"/>");
    let _ = writeln!(
        svg,
        "\t<path fill=\"{}\" d=\"{}\"/>",
        style.foreground().to_hex(),
        module_path(&matrix)
    );
    if let Some(rect) = backdrop {
        let _ = writeln!(
            svg,
            "\t<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#FFFFFF\"/>",
            rect.x, rect.y, rect.width, rect.height
        );
    }
    if let Some(logo) = logo {
        let _ = writeln!(
            svg,
            "\t<image xlink:href=\"{}\" x=\"{:.4}\" y=\"{:.4}\" width=\"{:.4}\" height=\"{:.4}\" preserveAspectRatio=\"none\"/>",
            logo.data_uri(),
            logo_box.x,
            logo_box.y,
            logo_box.size,
            logo_box.size
        );
    }
    svg += "</svg>\n";

    if let Some((start, end)) = style.gradient() {
        svg = apply_gradient(&svg, start, end, &background_fill)?;
    }

    debug!(modules = matrix.width(), len = payload.len(), "rendered QR markup");
    Ok(RenderedQr {
        payload: payload.to_string(),
        svg,
        size: PREVIEW_SIZE,
    })
}

/// One `M x,y h1v1h-1z` square per dark module, offset by the quiet zone.
fn module_path(matrix: &QrMatrix) -> String {
    let mut d = String::new();
    for y in 0..matrix.width() {
        for x in 0..matrix.width() {
            if matrix.is_dark(x, y) {
                if !d.is_empty() {
                    d.push(' ');
                }
                let _ = write!(d, "M{},{}h1v1h-1z", x + QUIET_ZONE, y + QUIET_ZONE);
            }
        }
    }
    d
}

fn markup_err(err: impl std::fmt::Display) -> RenderError {
    RenderError::Markup(err.to_string())
}

/// Replaces any `<defs>` with a `qr-gradient` linear gradient from `start` to
/// `end` and points every `<path>` not filled with `background_fill` at it.
///
/// Safe to run repeatedly on its own output.
pub fn apply_gradient(svg: &str, start: Color, end: Color, background_fill: &str) -> Result<String, RenderError> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());
    let mut defs_depth = 0usize;
    let mut inserted = false;

    loop {
        let event = reader.read_event().map_err(markup_err)?;
        match event {
            Event::Eof => break,
            Event::Start(e) if e.name().as_ref() == b"defs" => defs_depth += 1,
            Event::End(e) if defs_depth > 0 => {
                if e.name().as_ref() == b"defs" {
                    defs_depth -= 1;
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"defs" => {}
            _ if defs_depth > 0 => {}
            Event::Start(e) if e.name().as_ref() == b"svg" && !inserted => {
                writer.write_event(Event::Start(e)).map_err(markup_err)?;
                write_gradient_defs(&mut writer, start, end)?;
                inserted = true;
            }
            Event::Start(e) if e.name().as_ref() == b"path" => {
                let path = refill_path(&e, background_fill)?;
                writer.write_event(Event::Start(path)).map_err(markup_err)?;
            }
            Event::Empty(e) if e.name().as_ref() == b"path" => {
                let path = refill_path(&e, background_fill)?;
                writer.write_event(Event::Empty(path)).map_err(markup_err)?;
            }
            other => writer.write_event(other).map_err(markup_err)?,
        }
    }

    String::from_utf8(writer.into_inner()).map_err(markup_err)
}

fn write_gradient_defs(writer: &mut Writer<Vec<u8>>, start: Color, end: Color) -> Result<(), RenderError> {
    let mut gradient = BytesStart::new("linearGradient");
    gradient.push_attribute(("id", GRADIENT_ID));
    gradient.push_attribute(("x1", "0%"));
    gradient.push_attribute(("y1", "0%"));
    gradient.push_attribute(("x2", "100%"));
    gradient.push_attribute(("y2", "100%"));

    writer.write_event(Event::Start(BytesStart::new("defs"))).map_err(markup_err)?;
    writer.write_event(Event::Start(gradient)).map_err(markup_err)?;
    for (offset, color) in [("0%", start), ("100%", end)] {
        let mut stop = BytesStart::new("stop");
        stop.push_attribute(("offset", offset));
        stop.push_attribute(("style", format!("stop-color:{};stop-opacity:1", color.to_hex()).as_str()));
        writer.write_event(Event::Empty(stop)).map_err(markup_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("linearGradient")))
        .map_err(markup_err)?;
    writer.write_event(Event::End(BytesEnd::new("defs"))).map_err(markup_err)?;
    Ok(())
}

fn refill_path(element: &BytesStart<'_>, background_fill: &str) -> Result<BytesStart<'static>, RenderError> {
    let gradient_fill = format!("url(#{GRADIENT_ID})");
    let mut path = BytesStart::new("path");
    let mut has_fill = false;
    for attr in element.attributes() {
        let attr = attr.map_err(markup_err)?;
        if attr.key.as_ref() == b"fill" {
            has_fill = true;
            let value = attr.unescape_value().map_err(markup_err)?;
            if value != background_fill {
                path.push_attribute(("fill", gradient_fill.as_str()));
                continue;
            }
        }
        path.push_attribute(attr);
    }
    if !has_fill {
        path.push_attribute(("fill", gradient_fill.as_str()));
    }
    Ok(path)
}

/// Renders `payload` as Unicode half blocks with a quiet zone.
pub fn to_terminal_string(payload: &str) -> Result<String, RenderError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}
