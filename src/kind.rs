//! The purposes a QR code can be generated for.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;

/// Category of content encoded into a QR code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Url,
    Wifi,
    Location,
    Whatsapp,
    Mail,
    Audio,
    File,
    Image,
}

impl ContentKind {
    /// Every kind, in the order the selector presents them.
    pub const ALL: [ContentKind; 8] = [
        ContentKind::Url,
        ContentKind::Wifi,
        ContentKind::Location,
        ContentKind::Whatsapp,
        ContentKind::Mail,
        ContentKind::Audio,
        ContentKind::File,
        ContentKind::Image,
    ];

    /// Lowercase identifier, as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            ContentKind::Url => "url",
            ContentKind::Wifi => "wifi",
            ContentKind::Location => "location",
            ContentKind::Whatsapp => "whatsapp",
            ContentKind::Mail => "mail",
            ContentKind::Audio => "audio",
            ContentKind::File => "file",
            ContentKind::Image => "image",
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            ContentKind::Url => "URL / Link",
            ContentKind::Wifi => "WiFi",
            ContentKind::Location => "Location",
            ContentKind::Whatsapp => "WhatsApp",
            ContentKind::Mail => "Email",
            ContentKind::Audio => "Audio",
            ContentKind::File => "File",
            ContentKind::Image => "Image",
        }
    }

    /// Whether the payload is a hosted or uploaded file reference.
    pub const fn is_file_reference(self) -> bool {
        matches!(self, ContentKind::Audio | ContentKind::File | ContentKind::Image)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldError::UnknownKind { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.name().parse::<ContentKind>(), Ok(kind));
        }
        assert_eq!("WiFi".parse::<ContentKind>(), Ok(ContentKind::Wifi));
        assert!("sms".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_file_reference_kinds() {
        let kinds: Vec<_> = ContentKind::ALL
            .into_iter()
            .filter(|k| k.is_file_reference())
            .collect();
        assert_eq!(kinds, vec![ContentKind::Audio, ContentKind::File, ContentKind::Image]);
    }
}
