use axum::body::Bytes;
use axum::extract::Multipart;
use hydrosense_core::{Field, SensorReadings};

use crate::error::ApiError;

pub const IMAGE_FIELD: &str = "image";
pub const MANUAL_FIELD: &str = "manual";

/// Default when the browser does not label the uploaded file.
const FALLBACK_IMAGE_TYPE: &str = "image/png";

/// An uploaded screenshot and its declared media type.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: String,
    pub data: Bytes,
}

/// Everything the upload / manual-entry form can submit.
#[derive(Debug, Default)]
pub struct AnalyzeForm {
    /// Screenshot; `None` when no file was chosen.
    pub image: Option<Upload>,
    /// The "manually input data" checkbox.
    pub manual: bool,
    /// Values typed into the manual-entry inputs; blank inputs stay `None`.
    pub entered: SensorReadings,
}

impl AnalyzeForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = AnalyzeForm::default();

        while let Some(part) = multipart.next_field().await? {
            let name = part.name().unwrap_or_default().to_string();
            match name.as_str() {
                IMAGE_FIELD => {
                    let content_type = image_type(part.content_type());
                    let data = part.bytes().await?;
                    // Browsers send an empty part when no file was picked.
                    if !data.is_empty() {
                        form.image = Some(Upload { content_type, data });
                    }
                }
                MANUAL_FIELD => form.manual = is_checked(&part.text().await?),
                other => match Field::from_form_name(other) {
                    Some(field) => {
                        let value = parse_entry(field, &part.text().await?)?;
                        form.entered.set(field, value);
                    }
                    None => tracing::debug!(field = other, "ignoring unknown form field"),
                },
            }
        }
        Ok(form)
    }
}

/// Keep only well-formed `image/*` types; the value ends up in a data URL.
fn image_type(declared: Option<&str>) -> String {
    match declared.map(|t| t.trim().to_ascii_lowercase()) {
        Some(t)
            if t.strip_prefix("image/").is_some_and(|sub| {
                !sub.is_empty()
                    && sub.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
            }) =>
        {
            t
        }
        _ => FALLBACK_IMAGE_TYPE.to_string(),
    }
}

fn is_checked(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "" | "off" | "false" | "0")
}

pub(crate) fn parse_entry(field: Field, text: &str) -> Result<Option<f64>, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ApiError::bad_request(format!("Invalid value for {field}: '{text}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_entry_means_not_entered() {
        assert_eq!(parse_entry(Field::Gsr, "  ").unwrap(), None);
        assert_eq!(parse_entry(Field::Gsr, " 512 ").unwrap(), Some(512.0));
        assert_eq!(parse_entry(Field::EnvTemp, "-3.5").unwrap(), Some(-3.5));
    }

    #[test]
    fn garbage_entry_is_rejected_with_field_name() {
        let err = parse_entry(Field::Humidity, "lots").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(err.message.contains("Humidity"));
        assert!(parse_entry(Field::Humidity, "inf").is_err());
    }

    #[test]
    fn upload_type_falls_back_to_png() {
        assert_eq!(image_type(Some("image/jpeg")), "image/jpeg");
        assert_eq!(image_type(Some(" Image/PNG ")), "image/png");
        assert_eq!(image_type(Some("image/svg+xml")), "image/svg+xml");
        assert_eq!(image_type(Some("text/html")), FALLBACK_IMAGE_TYPE);
        assert_eq!(image_type(Some("image/png;x=\"")), FALLBACK_IMAGE_TYPE);
        assert_eq!(image_type(None), FALLBACK_IMAGE_TYPE);
    }

    #[test]
    fn checkbox_values() {
        assert!(is_checked("on"));
        assert!(is_checked("true"));
        assert!(!is_checked(""));
        assert!(!is_checked("off"));
    }
}
