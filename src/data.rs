//! The per-kind data record filled in by the user.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConfigError, FieldError};
use crate::kind::ContentKind;

/// Authentication mode of a WiFi network, as written in the `T:` segment.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
pub enum WifiEncryption {
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    #[serde(rename = "WEP")]
    Wep,
    #[serde(rename = "nopass")]
    NoPass,
}

impl WifiEncryption {
    pub const ALL: [WifiEncryption; 3] = [WifiEncryption::Wpa, WifiEncryption::Wep, WifiEncryption::NoPass];

    /// Token used in the WiFi payload.
    pub const fn token(self) -> &'static str {
        match self {
            WifiEncryption::Wpa => "WPA",
            WifiEncryption::Wep => "WEP",
            WifiEncryption::NoPass => "nopass",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WifiEncryption::Wpa => "WPA/WPA2",
            WifiEncryption::Wep => "WEP",
            WifiEncryption::NoPass => "No Password",
        }
    }
}

impl fmt::Display for WifiEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for WifiEncryption {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wpa" | "wpa2" | "wpa/wpa2" => Ok(WifiEncryption::Wpa),
            "wep" => Ok(WifiEncryption::Wep),
            "nopass" | "none" => Ok(WifiEncryption::NoPass),
            _ => Err(FieldError::UnknownEncryption { value: s.to_string() }),
        }
    }
}

/// Data entered for one content kind.
///
/// Each variant carries only the fields of its kind, so a record can never
/// mix WiFi credentials with a mail address.
#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataRecord {
    Url {
        #[serde(default)]
        url: String,
    },
    Wifi {
        #[serde(default)]
        ssid: String,
        #[serde(default)]
        password: String,
        #[serde(default)]
        encryption: WifiEncryption,
    },
    Location {
        #[serde(default)]
        text: String,
    },
    Whatsapp {
        /// `"<+country> <number>"`.
        #[serde(default)]
        phone: String,
        #[serde(default)]
        message: String,
    },
    Mail {
        #[serde(default)]
        email: String,
        #[serde(default)]
        subject: String,
        #[serde(default)]
        body: String,
    },
    Audio {
        #[serde(default)]
        file_url: String,
    },
    File {
        #[serde(default)]
        file_url: String,
    },
    Image {
        #[serde(default)]
        file_url: String,
    },
}

impl DataRecord {
    /// The blank record shown right after `kind` is selected.
    pub fn empty(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Url => DataRecord::Url { url: String::new() },
            ContentKind::Wifi => DataRecord::Wifi {
                ssid: String::new(),
                password: String::new(),
                encryption: WifiEncryption::default(),
            },
            ContentKind::Location => DataRecord::Location { text: String::new() },
            ContentKind::Whatsapp => DataRecord::Whatsapp {
                phone: String::new(),
                message: String::new(),
            },
            ContentKind::Mail => DataRecord::Mail {
                email: String::new(),
                subject: String::new(),
                body: String::new(),
            },
            ContentKind::Audio => DataRecord::Audio { file_url: String::new() },
            ContentKind::File => DataRecord::File { file_url: String::new() },
            ContentKind::Image => DataRecord::Image { file_url: String::new() },
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            DataRecord::Url { .. } => ContentKind::Url,
            DataRecord::Wifi { .. } => ContentKind::Wifi,
            DataRecord::Location { .. } => ContentKind::Location,
            DataRecord::Whatsapp { .. } => ContentKind::Whatsapp,
            DataRecord::Mail { .. } => ContentKind::Mail,
            DataRecord::Audio { .. } => ContentKind::Audio,
            DataRecord::File { .. } => ContentKind::File,
            DataRecord::Image { .. } => ContentKind::Image,
        }
    }

    /// File reference of an audio, file or image record.
    pub fn file_url(&self) -> Option<&str> {
        match self {
            DataRecord::Audio { file_url } | DataRecord::File { file_url } | DataRecord::Image { file_url } => {
                Some(file_url)
            }
            _ => None,
        }
    }

    /// Loads a record from a TOML file with a `kind` key, e.g.
    ///
    /// ```toml
    /// kind = "wifi"
    /// ssid = "Home"
    /// encryption = "nopass"
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

/// An editable input of the data form.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Field {
    Url,
    Ssid,
    Password,
    Encryption,
    Location,
    /// Whole WhatsApp phone, `"<+country> <number>"`.
    Phone,
    /// Country-code half of the WhatsApp phone.
    CountryCode,
    /// Number half of the WhatsApp phone.
    PhoneNumber,
    Message,
    Email,
    Subject,
    Body,
    FileUrl,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Url,
        Field::Ssid,
        Field::Password,
        Field::Encryption,
        Field::Location,
        Field::Phone,
        Field::CountryCode,
        Field::PhoneNumber,
        Field::Message,
        Field::Email,
        Field::Subject,
        Field::Body,
        Field::FileUrl,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Field::Url => "url",
            Field::Ssid => "ssid",
            Field::Password => "password",
            Field::Encryption => "encryption",
            Field::Location => "location",
            Field::Phone => "phone",
            Field::CountryCode => "country_code",
            Field::PhoneNumber => "number",
            Field::Message => "message",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Body => "body",
            Field::FileUrl => "file_url",
        }
    }

    /// Whether the field is part of the form for `kind`.
    pub fn applies_to(self, kind: ContentKind) -> bool {
        match self {
            Field::Url => kind == ContentKind::Url,
            Field::Ssid | Field::Password | Field::Encryption => kind == ContentKind::Wifi,
            Field::Location => kind == ContentKind::Location,
            Field::Phone | Field::CountryCode | Field::PhoneNumber | Field::Message => {
                kind == ContentKind::Whatsapp
            }
            Field::Email | Field::Subject | Field::Body => kind == ContentKind::Mail,
            Field::FileUrl => kind.is_file_reference(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Field::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| FieldError::UnknownField { name: s.to_string() })
    }
}

/// Splits a `name=value` assignment; the value may itself contain `=`.
pub fn parse_assignment(input: &str) -> Result<(Field, String), FieldError> {
    let (name, value) = input.split_once('=').ok_or_else(|| FieldError::MalformedAssignment {
        input: input.to_string(),
    })?;
    Ok((name.parse()?, value.to_string()))
}
