//! SVG rasterization helpers shared by logo loading and export.

use image::{Rgba, RgbaImage};
use resvg::usvg;

/// Parses `svg` and renders it stretched to `width` x `height`.
pub fn rasterize_svg(svg: &[u8], width: u32, height: u32) -> Result<tiny_skia::Pixmap, String> {
    let tree = usvg::Tree::from_data(svg, &usvg::Options::default()).map_err(|e| e.to_string())?;

    let size = tree.size();
    if size.width() <= 0.0 || size.height() <= 0.0 {
        return Err("SVG has empty dimensions".into());
    }
    let transform = tiny_skia::Transform::from_scale(width as f32 / size.width(), height as f32 / size.height());

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or_else(|| format!("cannot allocate {width}x{height} pixmap"))?;
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Converts a premultiplied pixmap into a straight-alpha image buffer.
pub fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *pixel = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Whether `bytes` look like SVG markup.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 2 2" width="2" height="2"><rect width="1" height="2" fill="#FF0000"/></svg>"##;

    #[test]
    fn test_rasterize_scales_to_target() {
        let pixmap = rasterize_svg(SQUARE.as_bytes(), 20, 20).unwrap();
        let img = pixmap_to_rgba(&pixmap);
        assert_eq!(img.dimensions(), (20, 20));
        assert_eq!(img.get_pixel(2, 10), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(17, 10)[3], 0);
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        assert!(rasterize_svg(b"not svg", 10, 10).is_err());
    }

    #[test]
    fn test_svg_sniffing() {
        assert!(looks_like_svg(SQUARE.as_bytes()));
        assert!(looks_like_svg(b"<?xml version=\"1.0\"?>\n<svg/>"));
        assert!(!looks_like_svg(b"\x89PNG\r\n"));
    }
}
