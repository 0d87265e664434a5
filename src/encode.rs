//! Payload encoder: turns a [`DataRecord`] into the text stored in the QR symbol.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::data::DataRecord;

/// Characters `encodeURIComponent` leaves untouched besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a query component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Builds the payload string for `record`.
///
/// Returns an empty string when a required field is missing; callers treat
/// an empty payload as "nothing to render".
///
/// # Example
///
/// ```rust
/// use qrstudio::data::{DataRecord, WifiEncryption};
/// use qrstudio::encode::encode_payload;
///
/// let record = DataRecord::Wifi {
///     ssid: "Home".into(),
///     password: String::new(),
///     encryption: WifiEncryption::NoPass,
/// };
/// assert_eq!(encode_payload(&record), "WIFI:T:nopass;S:Home;P:;;");
/// ```
pub fn encode_payload(record: &DataRecord) -> String {
    match record {
        DataRecord::Url { url } => url.clone(),
        DataRecord::Wifi { ssid, password, encryption } => {
            if ssid.is_empty() {
                return String::new();
            }
            format!("WIFI:T:{};S:{};P:{};;", encryption.token(), ssid, password)
        }
        DataRecord::Location { text } => text.clone(),
        DataRecord::Whatsapp { phone, message } => encode_whatsapp(phone, message),
        DataRecord::Mail { email, subject, body } => encode_mail(email, subject, body),
        DataRecord::Audio { file_url } | DataRecord::File { file_url } | DataRecord::Image { file_url } => {
            file_url.clone()
        }
    }
}

fn encode_whatsapp(phone: &str, message: &str) -> String {
    let parts: Vec<&str> = phone.split(' ').collect();
    let [country, number] = parts.as_slice() else {
        return String::new();
    };
    let number: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    if number.is_empty() {
        return String::new();
    }
    let country: String = country
        .chars()
        .filter(|c| *c != '+' && !c.is_whitespace())
        .collect();

    let mut payload = format!("https://wa.me/{country}{number}");
    if !message.is_empty() {
        payload.push_str("?text=");
        payload.push_str(&encode_component(message));
    }
    payload
}

fn encode_mail(email: &str, subject: &str, body: &str) -> String {
    if email.is_empty() {
        return String::new();
    }
    let mut payload = format!("mailto:{email}");
    if !subject.is_empty() {
        payload.push_str("?subject=");
        payload.push_str(&encode_component(subject));
    }
    if !body.is_empty() {
        payload.push(if subject.is_empty() { '?' } else { '&' });
        payload.push_str("body=");
        payload.push_str(&encode_component(body));
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WifiEncryption;
    use crate::kind::ContentKind;

    #[test]
    fn test_empty_records_encode_to_nothing() {
        for kind in ContentKind::ALL {
            assert_eq!(encode_payload(&DataRecord::empty(kind)), "", "{kind}");
        }
    }

    #[test]
    fn test_wifi_payload() {
        let record = DataRecord::Wifi {
            ssid: "Home".into(),
            password: String::new(),
            encryption: WifiEncryption::NoPass,
        };
        assert_eq!(encode_payload(&record), "WIFI:T:nopass;S:Home;P:;;");

        let record = DataRecord::Wifi {
            ssid: "Office".into(),
            password: "s3cret".into(),
            encryption: WifiEncryption::Wpa,
        };
        assert_eq!(encode_payload(&record), "WIFI:T:WPA;S:Office;P:s3cret;;");
    }

    #[test]
    fn test_mail_payload() {
        let mail = |email: &str, subject: &str, body: &str| DataRecord::Mail {
            email: email.into(),
            subject: subject.into(),
            body: body.into(),
        };
        assert_eq!(encode_payload(&mail("a@b.com", "Hi", "")), "mailto:a@b.com?subject=Hi");
        assert_eq!(encode_payload(&mail("a@b.com", "", "See you")), "mailto:a@b.com?body=See%20you");
        assert_eq!(
            encode_payload(&mail("a@b.com", "Q&A", "x=1")),
            "mailto:a@b.com?subject=Q%26A&body=x%3D1"
        );
        assert_eq!(encode_payload(&mail("", "Hi", "there")), "");
    }

    #[test]
    fn test_whatsapp_payload() {
        let wa = |phone: &str, message: &str| DataRecord::Whatsapp {
            phone: phone.into(),
            message: message.into(),
        };
        assert_eq!(encode_payload(&wa("+62 81234", "Hi")), "https://wa.me/6281234?text=Hi");
        assert_eq!(encode_payload(&wa("+1 5550100", "")), "https://wa.me/15550100");
        assert_eq!(
            encode_payload(&wa("+44 7700900", "Hello, world!")),
            "https://wa.me/447700900?text=Hello%2C%20world!"
        );
        assert_eq!(encode_payload(&wa("+62", "Hi")), "");
        assert_eq!(encode_payload(&wa("+62 ", "Hi")), "");
        assert_eq!(encode_payload(&wa("+62 812 34", "")), "");
    }

    #[test]
    fn test_verbatim_payloads() {
        let url = DataRecord::Url { url: "https://example.com".into() };
        assert_eq!(encode_payload(&url), "https://example.com");
        let location = DataRecord::Location { text: "37.7749,-122.4194".into() };
        assert_eq!(encode_payload(&location), "37.7749,-122.4194");
        let image = DataRecord::Image { file_url: "blob:qrstudio/abc".into() };
        assert_eq!(encode_payload(&image), "blob:qrstudio/abc");
    }

    #[test]
    fn test_component_encoding_matches_uri_component() {
        assert_eq!(encode_component("a b/c?d"), "a%20b%2Fc%3Fd");
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_component("é"), "%C3%A9");
    }
}
