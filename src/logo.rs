//! Logo assets: embedded brand icons and user-supplied images.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::LogoError;
use crate::objecturl::{ObjectUrlStore, OBJECT_URL_PREFIX};
use crate::raster::{looks_like_svg, pixmap_to_rgba, rasterize_svg};
use crate::style::{BrandLogo, Logo};

const SVG_MIME: &str = "image/svg+xml";

/// Embedded artwork of a brand icon.
pub fn brand_svg(brand: BrandLogo) -> &'static str {
    match brand {
        BrandLogo::Whatsapp => include_str!("../assets/logos/whatsapp.svg"),
        BrandLogo::Twitter => include_str!("../assets/logos/twitter.svg"),
        BrandLogo::Youtube => include_str!("../assets/logos/youtube.svg"),
        BrandLogo::Facebook => include_str!("../assets/logos/facebook.svg"),
        BrandLogo::Linkedin => include_str!("../assets/logos/linkedin.svg"),
    }
}

/// Encoded logo image, SVG or raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoAsset {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl LogoAsset {
    pub fn is_svg(&self) -> bool {
        self.mime == SVG_MIME || looks_like_svg(&self.bytes)
    }

    /// `data:` URI for embedding in SVG markup.
    pub fn data_uri(&self) -> String {
        let mime = if self.is_svg() { SVG_MIME } else { self.mime.as_str() };
        format!("data:{mime};base64,{}", STANDARD.encode(&self.bytes))
    }

    /// Decodes the logo into a `size` x `size` image.
    pub fn rasterize(&self, size: u32) -> Result<RgbaImage, LogoError> {
        if self.is_svg() {
            let pixmap = rasterize_svg(&self.bytes, size, size).map_err(LogoError::Decode)?;
            return Ok(pixmap_to_rgba(&pixmap));
        }
        let img = image::load_from_memory(&self.bytes).map_err(|e| LogoError::Decode(e.to_string()))?;
        Ok(imageops::resize(&img.to_rgba8(), size, size, FilterType::Lanczos3))
    }
}

/// Loads the image behind `logo`. `Ok(None)` means no logo is set.
///
/// Custom references may be object URLs from `store`, `file://` URLs or
/// plain paths. Remote URLs are refused.
pub fn load_logo(logo: &Logo, store: &ObjectUrlStore) -> Result<Option<LogoAsset>, LogoError> {
    let asset = match logo {
        Logo::None => return Ok(None),
        Logo::Brand(brand) => LogoAsset {
            mime: SVG_MIME.to_string(),
            bytes: brand_svg(*brand).as_bytes().to_vec(),
        },
        Logo::Custom(reference) => load_custom(reference, store)?,
    };
    debug!(mime = %asset.mime, len = asset.bytes.len(), "loaded logo");
    Ok(Some(asset))
}

fn load_custom(reference: &str, store: &ObjectUrlStore) -> Result<LogoAsset, LogoError> {
    if reference.starts_with(OBJECT_URL_PREFIX) {
        let blob = store.resolve(reference).ok_or_else(|| LogoError::Revoked {
            url: reference.to_string(),
        })?;
        return Ok(LogoAsset {
            mime: blob.mime.clone(),
            bytes: blob.bytes.clone(),
        });
    }
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Err(LogoError::Remote {
            url: reference.to_string(),
        });
    }

    let path = PathBuf::from(reference.strip_prefix("file://").unwrap_or(reference));
    let bytes = fs::read(&path).map_err(|source| LogoError::Read {
        path: path.clone(),
        source,
    })?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(LogoAsset {
        mime: mime.essence_str().to_string(),
        bytes,
    })
}
