//! Advisory validation of a data record.
//!
//! Validation never blocks editing or rendering; a failing result only makes
//! the preview show a placeholder instead of the code.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::data::{DataRecord, WifiEncryption};

static LAT_LNG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?,-?[0-9]+(\.[0-9]+)?$").expect("valid coordinate regex"));

static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8,15}$").expect("valid phone regex"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const PHONE_FORMAT_MESSAGE: &str = "Invalid phone number, use the format +[country code] [number]";

/// Outcome of validating a data record.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Empty when valid.
    pub message: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Checks `record` against the rules of its kind.
pub fn validate(record: &DataRecord) -> ValidationResult {
    match record {
        DataRecord::Url { url } => validate_url(url),
        DataRecord::Wifi { ssid, password, encryption } => validate_wifi(ssid, password, *encryption),
        DataRecord::Location { text } => validate_location(text),
        DataRecord::Whatsapp { phone, .. } => validate_whatsapp(phone),
        DataRecord::Mail { email, .. } => validate_mail(email),
        DataRecord::Audio { file_url } | DataRecord::File { file_url } | DataRecord::Image { file_url } => {
            validate_file_url(file_url)
        }
    }
}

fn validate_url(url: &str) -> ValidationResult {
    if url.is_empty() {
        return ValidationResult::invalid("URL must not be empty");
    }
    match Url::parse(url) {
        Ok(_) => ValidationResult::valid(),
        Err(_) => ValidationResult::invalid("Invalid URL format, it must start with http:// or https://"),
    }
}

fn validate_wifi(ssid: &str, password: &str, encryption: WifiEncryption) -> ValidationResult {
    if ssid.is_empty() {
        return ValidationResult::invalid("SSID must not be empty");
    }
    if encryption != WifiEncryption::NoPass && password.is_empty() {
        return ValidationResult::invalid("A password is required for the selected encryption");
    }
    ValidationResult::valid()
}

fn validate_location(location: &str) -> ValidationResult {
    if location.is_empty() {
        return ValidationResult::invalid("Location must not be empty");
    }

    if LAT_LNG.is_match(location) {
        let coordinates = location
            .split_once(',')
            .and_then(|(lat, lng)| Some((lat.parse::<f64>().ok()?, lng.parse::<f64>().ok()?)));
        return match coordinates {
            Some((lat, lng)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) => {
                ValidationResult::valid()
            }
            _ => ValidationResult::invalid(
                "Invalid coordinates (latitude: -90 to 90, longitude: -180 to 180)",
            ),
        };
    }

    // length in UTF-16 code units, as browsers count it
    if location.encode_utf16().count() < 3 {
        return ValidationResult::invalid("Address is too short, at least 3 characters");
    }
    ValidationResult::valid()
}

fn validate_whatsapp(phone: &str) -> ValidationResult {
    if phone.is_empty() {
        return ValidationResult::invalid("Phone number must not be empty");
    }
    let parts: Vec<&str> = phone.split(' ').collect();
    let [country, number] = parts.as_slice() else {
        return ValidationResult::invalid(PHONE_FORMAT_MESSAGE);
    };
    if !country.starts_with('+') || !PHONE_NUMBER.is_match(number) {
        return ValidationResult::invalid(PHONE_FORMAT_MESSAGE);
    }
    ValidationResult::valid()
}

fn validate_mail(email: &str) -> ValidationResult {
    if email.is_empty() {
        return ValidationResult::invalid("Email address must not be empty");
    }
    if !EMAIL.is_match(email) {
        return ValidationResult::invalid("Invalid email format");
    }
    ValidationResult::valid()
}

fn validate_file_url(file_url: &str) -> ValidationResult {
    if file_url.is_empty() {
        return ValidationResult::invalid("File URL must not be empty");
    }
    let accepted = ["http://", "https://", "blob:"]
        .iter()
        .any(|scheme| file_url.starts_with(scheme));
    if !accepted {
        return ValidationResult::invalid("Invalid file URL");
    }
    ValidationResult::valid()
}
