//! Visual styling of the generated code: colors, gradient and logo.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, StyleError};

/// An opaque RGB color written as `#RRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    /// Default gradient end.
    pub const INDIGO: Color = Color::rgb(0x4F, 0x46, 0xE5);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `#RRGGBB` form, as used in SVG fills.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 0xFF)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = StyleError;

    /// Parses `#RGB` or `#RRGGBB`; the `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StyleError::InvalidColor { value: s.to_string() };
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Ok(Color::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(invalid()),
        }
    }
}

/// Background behind the modules.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Background {
    Color(Color),
    /// No background: the quiet zone and light modules stay see-through.
    Transparent,
}

impl Background {
    /// Value used for the `fill` attribute of the background path.
    pub fn svg_fill(self) -> String {
        match self {
            Background::Color(color) => color.to_hex(),
            Background::Transparent => "none".to_string(),
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Background::Color(color) => Some(color),
            Background::Transparent => None,
        }
    }
}

impl FromStr for Background {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transparent" | "none" => Ok(Background::Transparent),
            _ => s.parse().map(Background::Color),
        }
    }
}

/// Flat single color or two-color linear gradient.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Single,
    Gradient,
}

/// Built-in brand icons.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BrandLogo {
    Whatsapp,
    Twitter,
    Youtube,
    Facebook,
    Linkedin,
}

impl BrandLogo {
    pub const ALL: [BrandLogo; 5] = [
        BrandLogo::Whatsapp,
        BrandLogo::Twitter,
        BrandLogo::Youtube,
        BrandLogo::Facebook,
        BrandLogo::Linkedin,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            BrandLogo::Whatsapp => "whatsapp",
            BrandLogo::Twitter => "twitter",
            BrandLogo::Youtube => "youtube",
            BrandLogo::Facebook => "facebook",
            BrandLogo::Linkedin => "linkedin",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BrandLogo::Whatsapp => "WhatsApp",
            BrandLogo::Twitter => "X (Twitter)",
            BrandLogo::Youtube => "YouTube",
            BrandLogo::Facebook => "Facebook",
            BrandLogo::Linkedin => "LinkedIn",
        }
    }

    /// Dark artwork on a transparent canvas; the modules under it are
    /// excavated and backed with white so the mark stays legible.
    pub const fn needs_white_backdrop(self) -> bool {
        matches!(self, BrandLogo::Twitter | BrandLogo::Linkedin)
    }
}

/// Logo embedded in the middle of the code.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum Logo {
    #[default]
    None,
    Brand(BrandLogo),
    /// Object URL, `file://` URL or filesystem path of a user image.
    Custom(String),
}

impl Logo {
    /// Resolves a logo name; `custom` takes its reference from `custom_url`.
    pub fn from_name(name: &str, custom_url: Option<&str>) -> Result<Self, StyleError> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "none" | "" => Ok(Logo::None),
            "custom" => match custom_url {
                Some(url) if !url.is_empty() => Ok(Logo::Custom(url.to_string())),
                _ => Err(StyleError::MissingCustomLogo),
            },
            _ => BrandLogo::ALL
                .into_iter()
                .find(|brand| brand.name() == name)
                .map(Logo::Brand)
                .ok_or_else(|| StyleError::UnknownLogo { name: name.clone() }),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Logo::None)
    }
}

/// Style applied to both the preview and the export.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(try_from = "StylePreset")]
pub struct StyleRecord {
    pub color_mode: ColorMode,
    pub fg_color: Color,
    pub background: Background,
    pub gradient_start: Color,
    pub gradient_end: Color,
    pub logo: Logo,
}

impl Default for StyleRecord {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Single,
            fg_color: Color::BLACK,
            background: Background::Color(Color::WHITE),
            gradient_start: Color::BLACK,
            gradient_end: Color::INDIGO,
            logo: Logo::None,
        }
    }
}

impl StyleRecord {
    /// Module color handed to the matrix renderer. In gradient mode this is
    /// the gradient start, which the gradient pass then replaces.
    pub fn foreground(&self) -> Color {
        match self.color_mode {
            ColorMode::Single => self.fg_color,
            ColorMode::Gradient => self.gradient_start,
        }
    }

    /// Gradient endpoints when gradient mode is active.
    pub fn gradient(&self) -> Option<(Color, Color)> {
        match self.color_mode {
            ColorMode::Single => None,
            ColorMode::Gradient => Some((self.gradient_start, self.gradient_end)),
        }
    }

    /// Loads a style preset from TOML. Missing keys keep their defaults.
    ///
    /// ```toml
    /// color_mode = "gradient"
    /// gradient_start = "#000000"
    /// gradient_end = "#4F46E5"
    /// bg_color = "transparent"
    /// logo = "linkedin"
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// On-disk shape of a style preset.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StylePreset {
    color_mode: ColorMode,
    fg_color: String,
    bg_color: String,
    gradient_start: String,
    gradient_end: String,
    logo: String,
    custom_logo_url: Option<String>,
}

impl Default for StylePreset {
    fn default() -> Self {
        let style = StyleRecord::default();
        Self {
            color_mode: style.color_mode,
            fg_color: style.fg_color.to_hex(),
            bg_color: style.background.svg_fill(),
            gradient_start: style.gradient_start.to_hex(),
            gradient_end: style.gradient_end.to_hex(),
            logo: "none".to_string(),
            custom_logo_url: None,
        }
    }
}

impl TryFrom<StylePreset> for StyleRecord {
    type Error = StyleError;

    fn try_from(preset: StylePreset) -> Result<Self, Self::Error> {
        Ok(Self {
            color_mode: preset.color_mode,
            fg_color: preset.fg_color.parse()?,
            background: preset.bg_color.parse()?,
            gradient_start: preset.gradient_start.parse()?,
            gradient_end: preset.gradient_end.parse()?,
            logo: Logo::from_name(&preset.logo, preset.custom_logo_url.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!("#4F46E5".parse::<Color>().unwrap(), Color::INDIGO);
        assert_eq!("#4f46e5".parse::<Color>().unwrap(), Color::INDIGO);
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("000000".parse::<Color>().unwrap(), Color::BLACK);
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("red".parse::<Color>().is_err());
        assert_eq!(Color::rgb(1, 171, 255).to_string(), "#01ABFF");
    }

    #[test]
    fn test_background_parsing() {
        assert_eq!("transparent".parse::<Background>().unwrap(), Background::Transparent);
        assert_eq!("#FFFFFF".parse::<Background>().unwrap(), Background::Color(Color::WHITE));
        assert_eq!(Background::Transparent.svg_fill(), "none");
    }

    #[test]
    fn test_foreground_follows_color_mode() {
        let mut style = StyleRecord {
            fg_color: Color::rgb(10, 20, 30),
            ..StyleRecord::default()
        };
        assert_eq!(style.foreground(), Color::rgb(10, 20, 30));
        assert_eq!(style.gradient(), None);

        style.color_mode = ColorMode::Gradient;
        assert_eq!(style.foreground(), Color::BLACK);
        assert_eq!(style.gradient(), Some((Color::BLACK, Color::INDIGO)));
    }

    #[test]
    fn test_logo_names() {
        assert_eq!(Logo::from_name("none", None).unwrap(), Logo::None);
        assert_eq!(Logo::from_name("LinkedIn", None).unwrap(), Logo::Brand(BrandLogo::Linkedin));
        assert_eq!(
            Logo::from_name("custom", Some("logo.png")).unwrap(),
            Logo::Custom("logo.png".into())
        );
        assert!(matches!(Logo::from_name("custom", None), Err(StyleError::MissingCustomLogo)));
        assert!(matches!(Logo::from_name("myspace", None), Err(StyleError::UnknownLogo { .. })));
    }

    #[test]
    fn test_white_backdrop_brands() {
        let brands: Vec<_> = BrandLogo::ALL
            .into_iter()
            .filter(|b| b.needs_white_backdrop())
            .collect();
        assert_eq!(brands, vec![BrandLogo::Twitter, BrandLogo::Linkedin]);
    }

    #[test]
    fn test_preset_from_toml() {
        let style: StyleRecord = toml::from_str(
            r##"
            color_mode = "gradient"
            gradient_end = "#FF0000"
            bg_color = "transparent"
            logo = "twitter"
            "##,
        )
        .unwrap();
        assert_eq!(style.color_mode, ColorMode::Gradient);
        assert_eq!(style.gradient_start, Color::BLACK);
        assert_eq!(style.gradient_end, Color::rgb(255, 0, 0));
        assert_eq!(style.background, Background::Transparent);
        assert_eq!(style.logo, Logo::Brand(BrandLogo::Twitter));
    }

    #[test]
    fn test_preset_rejects_bad_color() {
        let parsed: Result<StyleRecord, _> = toml::from_str(r##"fg_color = "#XYZ""##);
        assert!(parsed.is_err());
    }
}
