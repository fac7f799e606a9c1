use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PassSlotError, Result};

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// A pass description as returned by the API.
///
/// A pass is addressed by the pair (pass type identifier, serial number);
/// both are assigned by the service and never mutated locally. `url` is
/// present on freshly created passes and lets [`crate::PassesClient::url`]
/// skip a round-trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub pass_type_identifier: String,
    pub serial_number: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub template_id: Option<u64>,
}

/// A location attached to a placeholder value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_text: Option<String>,
}

/// Placeholder name → value mapping submitted on pass creation and updates.
pub type Values = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A pass template description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Template identifier used in resource paths.
///
/// The service accepts numeric ids that callers may hold as floats; the
/// `Display` impl renders them with no fractional digits and no exponent
/// notation, so `6008004.0` becomes `6008004` in the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateId {
    Int(u64),
    Float(f64),
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TemplateId::Int(v) => write!(f, "{v}"),
            TemplateId::Float(v) => write!(f, "{:.0}", v.trunc()),
        }
    }
}

impl From<u64> for TemplateId {
    fn from(v: u64) -> Self {
        TemplateId::Int(v)
    }
}

impl From<u32> for TemplateId {
    fn from(v: u32) -> Self {
        TemplateId::Int(v as u64)
    }
}

impl From<f64> for TemplateId {
    fn from(v: f64) -> Self {
        TemplateId::Float(v)
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// An image slot of a pass or template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "type")]
    pub image_type: String,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Restrictions
// ---------------------------------------------------------------------------

/// Distribution restrictions of a template.
///
/// `date_restriction` must be an ISO-8601 UTC timestamp of the exact form
/// `YYYY-MM-DDTHH:MM:SSZ`; see [`Restrictions::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    #[serde(default)]
    pub quantity_restriction: Option<u64>,
    #[serde(default)]
    pub redemption_restriction: Option<u64>,
    #[serde(default)]
    pub password_protection: Option<String>,
    #[serde(default)]
    pub date_restriction: Option<String>,
    #[serde(default)]
    pub sharing_restriction: bool,
}

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

impl Restrictions {
    /// Check the record before submission.
    ///
    /// The numeric and boolean constraints are enforced by the field types;
    /// what remains is the date profile. A candidate string must parse with
    /// the exact `YYYY-MM-DDTHH:MM:SSZ` format and render back to itself, so
    /// loosely-parsing variants (missing `Z`, unpadded fields) are rejected.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref date) = self.date_restriction {
            let parsed = chrono::NaiveDateTime::parse_from_str(date, DATE_FORMAT)
                .map_err(|e| {
                    PassSlotError::InvalidInput(format!(
                        "dateRestriction '{date}' is not a valid UTC timestamp: {e}"
                    ))
                })?;
            if parsed.format(DATE_FORMAT).to_string() != *date {
                return Err(PassSlotError::InvalidInput(format!(
                    "dateRestriction '{date}' must have the exact form YYYY-MM-DDTHH:MM:SSZ"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Small single-field responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UrlResponse {
    pub url: String,
}
