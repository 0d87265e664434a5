//! Form state: the selected kind, its data record and the style.

use tracing::debug;

use crate::data::{DataRecord, Field, WifiEncryption};
use crate::encode::encode_payload;
use crate::error::{Error, FieldError, RenderError};
use crate::export::{ExportFormat, ExportedFile, Exporter, Resolution};
use crate::kind::ContentKind;
use crate::objecturl::ObjectUrlStore;
use crate::render::{preview, render_payload, Preview, RenderedQr};
use crate::style::StyleRecord;
use crate::validate::{validate, ValidationResult};

/// Country code offered before the user picks one.
pub const DEFAULT_COUNTRY_CODE: &str = "+62";

/// State behind the generator form.
///
/// Changing the kind discards the previous record; the style survives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    data: DataRecord,
    pub style: StyleRecord,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ContentKind::Url)
    }
}

impl Session {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            data: DataRecord::empty(kind),
            style: StyleRecord::default(),
        }
    }

    /// Starts from a complete record, e.g. one loaded from a file.
    pub fn with_record(data: DataRecord, style: StyleRecord) -> Self {
        Self { data, style }
    }

    pub fn kind(&self) -> ContentKind {
        self.data.kind()
    }

    pub fn data(&self) -> &DataRecord {
        &self.data
    }

    /// Switches to `kind` with an empty record, even if `kind` is already selected.
    pub fn select_kind(&mut self, kind: ContentKind) {
        debug!(from = %self.kind(), to = %kind, "content kind selected");
        self.data = DataRecord::empty(kind);
    }

    /// Applies one form edit and returns the fresh validation result.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<ValidationResult, FieldError> {
        let kind = self.kind();
        if !field.applies_to(kind) {
            return Err(FieldError::NotApplicable { field, kind });
        }

        match (&mut self.data, field) {
            (DataRecord::Url { url }, Field::Url) => *url = value.to_string(),
            (DataRecord::Wifi { ssid, .. }, Field::Ssid) => *ssid = value.to_string(),
            (DataRecord::Wifi { password, .. }, Field::Password) => *password = value.to_string(),
            (DataRecord::Wifi { password, encryption, .. }, Field::Encryption) => {
                *encryption = value.parse()?;
                if *encryption == WifiEncryption::NoPass {
                    password.clear();
                }
            }
            (DataRecord::Location { text }, Field::Location) => *text = value.to_string(),
            (DataRecord::Whatsapp { phone, .. }, Field::Phone) => *phone = value.to_string(),
            (DataRecord::Whatsapp { phone, .. }, Field::CountryCode) => {
                let number = phone_part(phone, 1).unwrap_or_default().to_string();
                *phone = format!("{} {number}", value.trim());
            }
            (DataRecord::Whatsapp { phone, .. }, Field::PhoneNumber) => {
                let country = phone_part(phone, 0)
                    .filter(|code| !code.is_empty())
                    .unwrap_or(DEFAULT_COUNTRY_CODE)
                    .to_string();
                let digits: String = value.chars().filter(char::is_ascii_digit).collect();
                *phone = format!("{country} {digits}");
            }
            (DataRecord::Whatsapp { message, .. }, Field::Message) => *message = value.to_string(),
            (DataRecord::Mail { email, .. }, Field::Email) => *email = value.to_string(),
            (DataRecord::Mail { subject, .. }, Field::Subject) => *subject = value.to_string(),
            (DataRecord::Mail { body, .. }, Field::Body) => *body = value.to_string(),
            (
                DataRecord::Audio { file_url } | DataRecord::File { file_url } | DataRecord::Image { file_url },
                Field::FileUrl,
            ) => *file_url = value.to_string(),
            _ => return Err(FieldError::NotApplicable { field, kind }),
        }
        Ok(self.validation())
    }

    pub fn validation(&self) -> ValidationResult {
        validate(&self.data)
    }

    pub fn payload(&self) -> String {
        encode_payload(&self.data)
    }

    pub fn preview(&self, store: &ObjectUrlStore) -> Result<Preview, RenderError> {
        preview(&self.data, &self.style, store)
    }

    /// Fresh markup of the current payload, independent of any preview.
    ///
    /// Validation is advisory, so invalid data still renders; only an empty
    /// payload yields `None`.
    pub fn render(&self, store: &ObjectUrlStore) -> Result<Option<RenderedQr>, RenderError> {
        let payload = self.payload();
        if payload.is_empty() {
            return Ok(None);
        }
        render_payload(&payload, &self.style, store).map(Some)
    }

    /// Renders and exports the current state.
    pub fn export(
        &self,
        exporter: &Exporter<'_>,
        store: &ObjectUrlStore,
        format: ExportFormat,
        resolution: Resolution,
    ) -> Result<Option<ExportedFile>, Error> {
        let Some(rendered) = self.render(store)? else {
            debug!("empty payload, nothing to export");
            return Ok(None);
        };
        Ok(exporter.export(&rendered, &self.style, format, resolution)?)
    }
}

fn phone_part(phone: &str, index: usize) -> Option<&str> {
    phone.split(' ').nth(index)
}
