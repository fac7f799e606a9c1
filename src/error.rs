use thiserror::Error;

/// One field-level failure inside a 422 validation response.
#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: String,
    pub reasons: Vec<String>,
}

/// Error type for PassSlot API operations.
///
/// - `Transport` — network/TLS errors before any HTTP status was obtained
///   (wraps `reqwest::Error`)
/// - `Unauthorized` — HTTP 401, app key rejected
/// - `Validation` — HTTP 422, carries the combined message plus the
///   field-level detail parsed from the response body
/// - `Api` — any other non-2xx status code
/// - `InvalidInput` — local precondition failure (bad restriction record,
///   missing or unsupported image); raised before any request is sent
#[derive(Debug, Error)]
pub enum PassSlotError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unauthorized. Please check your app key and make sure it has access to the template and pass type id")]
    Unauthorized,

    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PassSlotError>;
