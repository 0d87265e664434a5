//! Single-page PDF holding the exported raster.
//!
//! Page geometry mirrors a portrait A4 sheet measured in millimetres: the
//! image spans the full page width, keeps its aspect ratio and hangs from
//! the top edge.

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::ExportError;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;
const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Placed size of an image on the page, in millimetres.
pub fn placed_size_mm(width_px: u32, height_px: u32) -> (f32, f32) {
    let width = A4_WIDTH_MM;
    let height = height_px as f32 * width / width_px as f32;
    (width, height)
}

fn pdf_err(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

/// Writes `image` onto one A4 page and returns the PDF bytes.
pub fn image_page(image: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let page_width = A4_WIDTH_MM * POINTS_PER_MM;
    let page_height = A4_HEIGHT_MM * POINTS_PER_MM;
    let (placed_width, placed_height) = placed_size_mm(image.width(), image.height());
    let placed_width = placed_width * POINTS_PER_MM;
    let placed_height = placed_height * POINTS_PER_MM;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        image.as_raw().clone(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    placed_width.into(),
                    0.into(),
                    0.into(),
                    placed_height.into(),
                    0.into(),
                    (page_height - placed_height).into(),
                ],
            ),
            Operation::new("Do", vec!["Im1".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().map_err(pdf_err)?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        },
        "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(pdf_err)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_image_fills_width() {
        let (w, h) = placed_size_mm(1000, 1000);
        assert_eq!(w, 210.0);
        assert_eq!(h, 210.0);
        let (_, h) = placed_size_mm(1000, 500);
        assert_eq!(h, 105.0);
    }

    #[test]
    fn test_image_page_is_a_pdf() {
        let img = RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 0]));
        let bytes = image_page(&img).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
