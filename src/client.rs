use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{multipart, Client, Response};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{FieldError, PassSlotError, Result};
use crate::images::{self, SkippedImage};
use crate::models::*;

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.passslot.com/v1";

/// User agent sent on every request.
const USER_AGENT: &str = concat!("PassSlotSDK-Rust/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Client configuration. Immutable after the client is built.
#[derive(Debug, Clone)]
pub struct Config {
    /// App key, sent as the HTTP Basic username with an empty password.
    pub app_key: String,
    /// API endpoint base URL.
    pub endpoint: String,
    /// Log request/response lines at debug level.
    pub debug: bool,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// Optional PEM bundle used for TLS verification. When the file does not
    /// exist, the platform trust store is used.
    pub ca_bundle: Option<PathBuf>,
}

impl Config {
    pub fn new(app_key: &str) -> Self {
        Self {
            app_key: app_key.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debug: false,
            timeout: None,
            ca_bundle: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Call layer
// ---------------------------------------------------------------------------

/// Body of an outgoing API call.
pub(crate) enum RequestBody {
    None,
    Json(serde_json::Value),
    Multipart(multipart::Form),
}

/// Decoded payload of a successful API call.
///
/// `Json` when the response content type starts with `application/json`,
/// `Binary` otherwise (pass and image downloads, empty bodies).
#[derive(Debug)]
pub enum ApiPayload {
    Json(serde_json::Value),
    Binary(Vec<u8>),
}

impl ApiPayload {
    /// True for an empty non-JSON body. Delete and push operations map this
    /// to a boolean success result.
    pub fn is_empty(&self) -> bool {
        match self {
            ApiPayload::Binary(bytes) => bytes.is_empty(),
            ApiPayload::Json(_) => false,
        }
    }

    /// Raw bytes of the payload. A JSON payload is re-rendered.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ApiPayload::Binary(bytes) => bytes,
            ApiPayload::Json(value) => value.to_string().into_bytes(),
        }
    }
}

/// Shared logic for building a configured [`Client`] and making requests.
struct BaseClient {
    endpoint: String,
    app_key: String,
    debug: bool,
    http: Client,
}

impl BaseClient {
    fn new(config: Config) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json, */*; q=0.01"),
        );

        // Redirects are never followed; the pass-URL workflow is explicit.
        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none());

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if config.debug {
            builder = builder.connection_verbose(true);
        }
        if let Some(ref path) = config.ca_bundle {
            if path.exists() {
                let pem = fs::read(path).map_err(|e| {
                    PassSlotError::InvalidInput(format!(
                        "Cannot read CA bundle {}: {e}",
                        path.display()
                    ))
                })?;
                builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
            }
        }

        let http = builder.build()?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            app_key: config.app_key,
            debug: config.debug,
            http,
        })
    }

    /// Build the full URL for a given resource path.
    fn url(&self, resource: &str) -> String {
        format!("{}{resource}", self.endpoint)
    }

    /// Perform one API call: build the request, send it, classify the
    /// outcome.
    fn call(&self, method: Method, resource: &str, body: RequestBody) -> Result<ApiPayload> {
        if self.debug {
            debug!(method = %method, resource, "passslot request");
        }

        let mut request = self
            .http
            .request(method.clone(), self.url(resource))
            .basic_auth(&self.app_key, Some(""));

        request = match body {
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
            // POST and PUT always carry a JSON body, an empty object if the
            // operation has none. DELETE never carries a body.
            RequestBody::None if method == Method::POST || method == Method::PUT => {
                request.json(&serde_json::json!({}))
            }
            RequestBody::None => request,
        };

        let response = request.send()?;
        self.handle_response(response)
    }

    /// Status-code classification, strictly in this precedence: 422, 401,
    /// any other non-2xx, then success.
    fn handle_response(&self, response: Response) -> Result<ApiPayload> {
        let status = response.status().as_u16();
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("application/json"))
            .unwrap_or(false);
        let body = response.bytes()?;

        if self.debug {
            debug!(status, bytes = body.len(), "passslot response");
        }

        if status == 422 {
            return Err(validation_error(&body));
        }
        if status == 401 {
            return Err(PassSlotError::Unauthorized);
        }
        if !(200..300).contains(&status) {
            return Err(generic_error(status, &body));
        }

        // An empty successful body is a bare acknowledgement (push, delete),
        // whatever content type the server labels it with.
        if body.is_empty() {
            return Ok(ApiPayload::Binary(Vec::new()));
        }
        if is_json {
            let value = serde_json::from_slice(&body).map_err(|e| PassSlotError::Api {
                status: 0,
                message: format!("Deserialization error: {e}"),
            })?;
            return Ok(ApiPayload::Json(value));
        }
        Ok(ApiPayload::Binary(body.to_vec()))
    }

    // ---- convenience wrappers for common HTTP verbs -----------------------

    fn get(&self, resource: &str) -> Result<ApiPayload> {
        self.call(Method::GET, resource, RequestBody::None)
    }

    fn post_json(&self, resource: &str, body: Option<serde_json::Value>) -> Result<ApiPayload> {
        let body = body.map_or(RequestBody::None, RequestBody::Json);
        self.call(Method::POST, resource, body)
    }

    fn put_json(&self, resource: &str, body: Option<serde_json::Value>) -> Result<ApiPayload> {
        let body = body.map_or(RequestBody::None, RequestBody::Json);
        self.call(Method::PUT, resource, body)
    }

    fn post_multipart(&self, resource: &str, form: multipart::Form) -> Result<ApiPayload> {
        self.call(Method::POST, resource, RequestBody::Multipart(form))
    }

    fn put_multipart(&self, resource: &str, form: multipart::Form) -> Result<ApiPayload> {
        self.call(Method::PUT, resource, RequestBody::Multipart(form))
    }

    fn delete(&self, resource: &str) -> Result<ApiPayload> {
        self.call(Method::DELETE, resource, RequestBody::None)
    }
}

// ---- response-body error construction -------------------------------------

#[derive(Deserialize)]
struct WireValidation {
    message: String,
    #[serde(default)]
    errors: Vec<WireFieldError>,
}

#[derive(Deserialize)]
struct WireFieldError {
    field: String,
    reasons: Vec<String>,
}

/// Build the 422 error. The combined message has the form
/// `"<message>; <field>: <reason1>, <reason2>"` for every field error in
/// order; a body that does not parse falls back to a fixed message.
fn validation_error(body: &[u8]) -> PassSlotError {
    match serde_json::from_slice::<WireValidation>(body) {
        Ok(wire) => {
            let mut message = wire.message;
            for err in &wire.errors {
                message.push_str(&format!("; {}: {}", err.field, err.reasons.join(", ")));
            }
            PassSlotError::Validation {
                message,
                errors: wire
                    .errors
                    .into_iter()
                    .map(|e| FieldError {
                        field: e.field,
                        reasons: e.reasons,
                    })
                    .collect(),
            }
        }
        Err(_) => PassSlotError::Validation {
            message: "Validation Failed".to_string(),
            errors: Vec::new(),
        },
    }
}

/// Build the generic non-2xx error: JSON `message` field if the body parses,
/// raw body text otherwise. The HTTP status is preserved.
fn generic_error(status: u16, body: &[u8]) -> PassSlotError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
    PassSlotError::Api { status, message }
}

/// Decode a JSON payload into a typed record.
fn decode<T: DeserializeOwned>(payload: ApiPayload) -> Result<T> {
    match payload {
        ApiPayload::Json(value) => serde_json::from_value(value).map_err(|e| PassSlotError::Api {
            status: 0,
            message: format!("Deserialization error: {e}"),
        }),
        ApiPayload::Binary(_) => Err(PassSlotError::Api {
            status: 0,
            message: "Expected a JSON response".to_string(),
        }),
    }
}

/// Raw-url-encode a path segment (RFC 3986 unreserved set).
fn percent_encode_path(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push_str(&format!("%{b:02X}"));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Public client
// ---------------------------------------------------------------------------

/// Main entry point for interacting with the PassSlot API.
///
/// ```no_run
/// use passslot_client::PassSlotClient;
///
/// let client = PassSlotClient::new("<your app key>").unwrap();
/// let mut values = passslot_client::Values::new();
/// values.insert("Name".into(), "John".into());
/// values.insert("Balance".into(), 20.50.into());
///
/// let created = client
///     .passes()
///     .create_from_template(6008004u64, &values, &[])
///     .unwrap();
/// println!("pass url: {:?}", created.pass.url);
/// ```
pub struct PassSlotClient {
    base: BaseClient,
}

impl PassSlotClient {
    /// Create a client with the default endpoint.
    pub fn new(app_key: &str) -> Result<Self> {
        Self::with_config(Config::new(app_key))
    }

    /// Create a client from a full [`Config`].
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            base: BaseClient::new(config)?,
        })
    }

    // -- sub-client accessors ------------------------------------------------

    pub fn passes(&self) -> PassesClient<'_> {
        PassesClient { base: &self.base }
    }

    pub fn templates(&self) -> TemplatesClient<'_> {
        TemplatesClient { base: &self.base }
    }
}

/// Result of a pass creation: the created pass plus any images that failed
/// local validation and were left out of the upload.
#[derive(Debug)]
pub struct CreatedPass {
    pub pass: Pass,
    pub skipped_images: Vec<SkippedImage>,
}

// ===========================================================================
// Sub-clients
// ===========================================================================

// ---- Passes ---------------------------------------------------------------

pub struct PassesClient<'a> {
    base: &'a BaseClient,
}

impl PassesClient<'_> {
    /// Create a pass from a template id, with placeholder values and
    /// optional images (`(image type, file path)` pairs).
    ///
    /// Images that fail validation are skipped, not fatal; they are reported
    /// in [`CreatedPass::skipped_images`] and logged at warning level.
    pub fn create_from_template(
        &self,
        template_id: impl Into<TemplateId>,
        values: &Values,
        images: &[(&str, &Path)],
    ) -> Result<CreatedPass> {
        let resource = format!("/templates/{}/pass", template_id.into());
        self.create(&resource, values, images)
    }

    /// Same as [`Self::create_from_template`], addressing the template by
    /// name instead of id.
    pub fn create_from_template_name(
        &self,
        template_name: &str,
        values: &Values,
        images: &[(&str, &Path)],
    ) -> Result<CreatedPass> {
        let resource = format!(
            "/templates/names/{}/pass",
            percent_encode_path(template_name)
        );
        self.create(&resource, values, images)
    }

    fn create(
        &self,
        resource: &str,
        values: &Values,
        images: &[(&str, &Path)],
    ) -> Result<CreatedPass> {
        let mut skipped = Vec::new();

        let payload = if images.is_empty() {
            self.base
                .post_json(resource, Some(serde_json::Value::Object(values.clone())))?
        } else {
            let mut form = multipart::Form::new();
            for &(image_type, path) in images {
                match images::load_image(image_type, path) {
                    Ok(img) => {
                        let part = multipart::Part::bytes(img.bytes)
                            .file_name(img.file_name)
                            .mime_str(img.mime_type)
                            .map_err(|e| PassSlotError::Api {
                                status: 0,
                                message: format!("Invalid MIME type: {e}"),
                            })?;
                        form = form.part(image_type.to_string(), part);
                    }
                    Err(e) => {
                        warn!(image_type, path = %path.display(), error = %e, "image skipped");
                        skipped.push(SkippedImage {
                            image_type: image_type.to_string(),
                            path: path.to_path_buf(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
            let values_json =
                serde_json::to_string(values).map_err(|e| PassSlotError::Api {
                    status: 0,
                    message: format!("Serialization error: {e}"),
                })?;
            let values_part = multipart::Part::text(values_json)
                .mime_str("application/json")
                .map_err(|e| PassSlotError::Api {
                    status: 0,
                    message: format!("Invalid MIME type: {e}"),
                })?;
            form = form.part("values", values_part);
            self.base.post_multipart(resource, form)?
        };

        Ok(CreatedPass {
            pass: decode(payload)?,
            skipped_images: skipped,
        })
    }

    /// List descriptions of all passes, optionally filtered on a pass type.
    pub fn list(&self, pass_type: Option<&str>) -> Result<Vec<Pass>> {
        let mut resource = String::from("/passes");
        if let Some(pass_type) = pass_type {
            resource.push('/');
            resource.push_str(pass_type);
        }
        decode(self.base.get(&resource)?)
    }

    /// Fetch an existing pass by pass type id and serial number.
    pub fn get(&self, pass_type: &str, serial_number: &str) -> Result<Pass> {
        decode(
            self.base
                .get(&format!("/passes/{pass_type}/{serial_number}/passjson"))?,
        )
    }

    /// Full passbook description of a pass, as loosely structured JSON.
    pub fn pass_json(&self, pass: &Pass) -> Result<serde_json::Value> {
        decode(self.base.get(&format!(
            "/passes/{}/{}/passjson",
            pass.pass_type_identifier, pass.serial_number
        ))?)
    }

    /// Download the pkpass file.
    pub fn download(&self, pass: &Pass) -> Result<Vec<u8>> {
        let payload = self.base.get(&format!(
            "/passes/{}/{}",
            pass.pass_type_identifier, pass.serial_number
        ))?;
        Ok(payload.into_bytes())
    }

    /// Current placeholder values of a pass.
    pub fn values(&self, pass: &Pass) -> Result<Values> {
        decode(self.base.get(&format!(
            "/passes/{}/{}/values",
            pass.pass_type_identifier, pass.serial_number
        ))?)
    }

    /// Update a single placeholder value.
    pub fn update_value(
        &self,
        pass: &Pass,
        placeholder_name: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        self.base.put_json(
            &format!(
                "/passes/{}/{}/values/{placeholder_name}",
                pass.pass_type_identifier, pass.serial_number
            ),
            Some(serde_json::json!({ "value": value })),
        )?;
        Ok(())
    }

    /// Replace the placeholder values of a pass.
    pub fn update_values(&self, pass: &Pass, values: &Values) -> Result<()> {
        self.base.put_json(
            &format!(
                "/passes/{}/{}/values",
                pass.pass_type_identifier, pass.serial_number
            ),
            Some(serde_json::Value::Object(values.clone())),
        )?;
        Ok(())
    }

    /// Current status of a pass.
    pub fn status(&self, pass: &Pass) -> Result<String> {
        let resp: StatusResponse = decode(self.base.get(&format!(
            "/passes/{}/{}/status",
            pass.pass_type_identifier, pass.serial_number
        ))?)?;
        Ok(resp.status)
    }

    /// Update the status of a pass.
    pub fn update_status(&self, pass: &Pass, status: &str) -> Result<()> {
        self.base.put_json(
            &format!(
                "/passes/{}/{}/status",
                pass.pass_type_identifier, pass.serial_number
            ),
            Some(serde_json::json!({ "status": status })),
        )?;
        Ok(())
    }

    /// Send a push update to the devices holding the pass. Returns whether
    /// the service acknowledged with an empty body.
    pub fn push(&self, pass: &Pass) -> Result<bool> {
        let payload = self.base.post_json(
            &format!(
                "/passes/{}/{}/push",
                pass.pass_type_identifier, pass.serial_number
            ),
            None,
        )?;
        Ok(payload.is_empty())
    }

    /// Delete a pass.
    pub fn delete(&self, pass: &Pass) -> Result<bool> {
        let payload = self.base.delete(&format!(
            "/passes/{}/{}",
            pass.pass_type_identifier, pass.serial_number
        ))?;
        Ok(payload.is_empty())
    }

    /// Preview URL of a pass. Uses the embedded `url` field when present and
    /// falls back to the dedicated url endpoint.
    pub fn url(&self, pass: &Pass) -> Result<String> {
        if let Some(ref url) = pass.url {
            return Ok(url.clone());
        }
        let resp: UrlResponse = decode(self.base.get(&format!(
            "/passes/{}/{}/url",
            pass.pass_type_identifier, pass.serial_number
        ))?)?;
        Ok(resp.url)
    }

    /// Email the pass to the given address.
    pub fn email(&self, pass: &Pass, email: &str) -> Result<()> {
        self.base.post_json(
            &format!(
                "/passes/{}/{}/email",
                pass.pass_type_identifier, pass.serial_number
            ),
            Some(serde_json::json!({ "email": email })),
        )?;
        Ok(())
    }

    /// Download one image of a pass.
    pub fn image(&self, pass: &Pass, image_type: &str, resolution: &str) -> Result<Vec<u8>> {
        let payload = self.base.get(&format!(
            "/passes/{}/{}/images/{image_type}/{resolution}",
            pass.pass_type_identifier, pass.serial_number
        ))?;
        Ok(payload.into_bytes())
    }

    /// Create or replace one image of a pass. Unlike pass creation, a
    /// failing image here is a fatal precondition error; no request is sent.
    pub fn save_image(
        &self,
        pass: &Pass,
        image_type: &str,
        resolution: &str,
        image: &Path,
    ) -> Result<()> {
        let form = single_image_form(image_type, image)?;
        self.base.post_multipart(
            &format!(
                "/passes/{}/{}/images/{image_type}/{resolution}",
                pass.pass_type_identifier, pass.serial_number
            ),
            form,
        )?;
        Ok(())
    }

    /// Delete one image of a pass.
    pub fn delete_image(&self, pass: &Pass, image_type: &str, resolution: &str) -> Result<bool> {
        let payload = self.base.delete(&format!(
            "/passes/{}/{}/images/{image_type}/{resolution}",
            pass.pass_type_identifier, pass.serial_number
        ))?;
        Ok(payload.is_empty())
    }

    /// List all images of a pass, optionally filtered on a type.
    pub fn images(&self, pass: &Pass, image_type: Option<&str>) -> Result<Vec<Image>> {
        let mut resource = format!(
            "/passes/{}/{}/images",
            pass.pass_type_identifier, pass.serial_number
        );
        if let Some(image_type) = image_type {
            resource.push('/');
            resource.push_str(image_type);
        }
        decode(self.base.get(&resource)?)
    }

    /// Delete all images of a pass, optionally filtered on a type.
    pub fn delete_images(&self, pass: &Pass, image_type: Option<&str>) -> Result<()> {
        let mut resource = format!(
            "/passes/{}/{}/images",
            pass.pass_type_identifier, pass.serial_number
        );
        if let Some(image_type) = image_type {
            resource.push('/');
            resource.push_str(image_type);
        }
        self.base.delete(&resource)?;
        Ok(())
    }
}

// ---- Templates ------------------------------------------------------------

pub struct TemplatesClient<'a> {
    base: &'a BaseClient,
}

impl TemplatesClient<'_> {
    /// List all templates.
    pub fn list(&self) -> Result<Vec<Template>> {
        decode(self.base.get("/templates")?)
    }

    /// Get a single template.
    pub fn get(&self, template_id: impl Into<TemplateId>) -> Result<Template> {
        decode(
            self.base
                .get(&format!("/templates/{}", template_id.into()))?,
        )
    }

    /// Download one image of a template.
    pub fn image(
        &self,
        template_id: impl Into<TemplateId>,
        image_type: &str,
        resolution: &str,
    ) -> Result<Vec<u8>> {
        let payload = self.base.get(&format!(
            "/templates/{}/images/{image_type}/{resolution}",
            template_id.into()
        ))?;
        Ok(payload.into_bytes())
    }

    /// Create or replace one image of a template. A failing image is a
    /// fatal precondition error; no request is sent.
    pub fn save_image(
        &self,
        template_id: impl Into<TemplateId>,
        image_type: &str,
        resolution: &str,
        image: &Path,
    ) -> Result<()> {
        let form = single_image_form(image_type, image)?;
        self.base.post_multipart(
            &format!(
                "/templates/{}/images/{image_type}/{resolution}",
                template_id.into()
            ),
            form,
        )?;
        Ok(())
    }

    /// List all images of a template, optionally narrowed to a type and
    /// resolution. A resolution filter only applies together with a type.
    pub fn images(
        &self,
        template_id: impl Into<TemplateId>,
        image_type: Option<&str>,
        resolution: Option<&str>,
    ) -> Result<Vec<Image>> {
        decode(
            self.base
                .get(&images_resource(template_id.into(), image_type, resolution))?,
        )
    }

    /// Delete all images of a template, optionally narrowed to a type and
    /// resolution.
    pub fn delete_images(
        &self,
        template_id: impl Into<TemplateId>,
        image_type: Option<&str>,
        resolution: Option<&str>,
    ) -> Result<()> {
        self.base
            .delete(&images_resource(template_id.into(), image_type, resolution))?;
        Ok(())
    }

    /// Distribution restrictions of a template.
    pub fn restrictions(&self, template_id: impl Into<TemplateId>) -> Result<Restrictions> {
        decode(
            self.base
                .get(&format!("/templates/{}/restrictions", template_id.into()))?,
        )
    }

    /// Replace the distribution restrictions of a template. The record is
    /// validated locally first and submitted as multipart form fields.
    pub fn save_restrictions(
        &self,
        template_id: impl Into<TemplateId>,
        restrictions: &Restrictions,
    ) -> Result<()> {
        restrictions.validate()?;

        let mut form = multipart::Form::new();
        if let Some(quantity) = restrictions.quantity_restriction {
            form = form.text("quantityRestriction", quantity.to_string());
        }
        if let Some(redemption) = restrictions.redemption_restriction {
            form = form.text("redemptionRestriction", redemption.to_string());
        }
        if let Some(ref password) = restrictions.password_protection {
            form = form.text("passwordProtection", password.clone());
        }
        if let Some(ref date) = restrictions.date_restriction {
            form = form.text("dateRestriction", date.clone());
        }
        form = form.text(
            "sharingRestriction",
            restrictions.sharing_restriction.to_string(),
        );

        self.base.put_multipart(
            &format!("/templates/{}/restrictions", template_id.into()),
            form,
        )?;
        Ok(())
    }
}

/// Build the `/templates/{id}/images[/{type}][/{resolution}]` path.
fn images_resource(
    template_id: TemplateId,
    image_type: Option<&str>,
    resolution: Option<&str>,
) -> String {
    let mut resource = format!("/templates/{template_id}/images");
    if let Some(image_type) = image_type {
        resource.push('/');
        resource.push_str(image_type);
        if let Some(resolution) = resolution {
            resource.push('/');
            resource.push_str(resolution);
        }
    }
    resource
}

/// Multipart form with a single validated `image` part.
fn single_image_form(image_type: &str, image: &Path) -> Result<multipart::Form> {
    let img = images::load_image(image_type, image)?;
    let part = multipart::Part::bytes(img.bytes)
        .file_name(img.file_name)
        .mime_str(img.mime_type)
        .map_err(|e| PassSlotError::Api {
            status: 0,
            message: format!("Invalid MIME type: {e}"),
        })?;
    Ok(multipart::Form::new().part("image", part))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_encoding_leaves_unreserved_alone() {
        assert_eq!(percent_encode_path("Plain-Name_1.0~x"), "Plain-Name_1.0~x");
    }

    #[test]
    fn percent_encoding_escapes_spaces_and_unicode() {
        assert_eq!(percent_encode_path("My Card"), "My%20Card");
        assert_eq!(percent_encode_path("Café"), "Caf%C3%A9");
        assert_eq!(percent_encode_path("a/b"), "a%2Fb");
    }

    #[test]
    fn images_resource_builds_optional_segments() {
        let id = TemplateId::from(7u64);
        assert_eq!(images_resource(id, None, None), "/templates/7/images");
        assert_eq!(
            images_resource(id, Some("icon"), None),
            "/templates/7/images/icon"
        );
        assert_eq!(
            images_resource(id, Some("icon"), Some("2x")),
            "/templates/7/images/icon/2x"
        );
        // resolution without a type is ignored
        assert_eq!(images_resource(id, None, Some("2x")), "/templates/7/images");
    }

    #[test]
    fn validation_error_combines_field_reasons() {
        let body =
            br#"{"message":"Invalid","errors":[{"field":"Name","reasons":["required","too short"]}]}"#;
        match validation_error(body) {
            PassSlotError::Validation { message, errors } => {
                assert_eq!(message, "Invalid; Name: required, too short");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "Name");
                assert_eq!(errors[0].reasons, vec!["required", "too short"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_error_falls_back_on_non_json() {
        match validation_error(b"boom") {
            PassSlotError::Validation { message, errors } => {
                assert_eq!(message, "Validation Failed");
                assert!(errors.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn generic_error_prefers_json_message() {
        match generic_error(500, br#"{"message":"Server error"}"#) {
            PassSlotError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Server error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn generic_error_uses_raw_body_text() {
        match generic_error(500, b"boom") {
            PassSlotError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
