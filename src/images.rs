use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PassSlotError, Result};

/// Image slots supported by the service. A trailing `2x` on a slot name
/// selects the retina variant and is stripped before the membership test.
pub const IMAGE_TYPES: [&str; 6] = ["icon", "logo", "strip", "thumbnail", "background", "footer"];

/// MIME types the service accepts for image uploads. The service matches
/// `image/jpg` literally, not `image/jpeg`.
const ALLOWED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpg", "image/gif"];

/// Check an image type name, bare or with the `2x` retina suffix.
pub fn is_allowed_type(image_type: &str) -> bool {
    IMAGE_TYPES.contains(&image_type)
        || image_type
            .strip_suffix("2x")
            .is_some_and(|bare| IMAGE_TYPES.contains(&bare))
}

/// A validated local image, ready to be attached as a multipart part.
#[derive(Debug)]
pub(crate) struct ImageFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// An image dropped from a bulk pass creation, with the reason it was
/// skipped.
#[derive(Debug, Clone)]
pub struct SkippedImage {
    pub image_type: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Validate and read a local image for upload.
///
/// Fails when the type is not an allowed slot name, the file does not exist,
/// or the detected MIME type is not one of the supported image formats.
/// Nothing touches the network here; callers decide whether a failure is
/// fatal (single-image save) or droppable (bulk pass creation).
pub(crate) fn load_image(image_type: &str, path: &Path) -> Result<ImageFile> {
    if !is_allowed_type(image_type) {
        return Err(PassSlotError::InvalidInput(format!(
            "Image type {image_type} not available"
        )));
    }
    if !path.is_file() {
        return Err(PassSlotError::InvalidInput(format!(
            "No such image {}",
            path.display()
        )));
    }
    let bytes = fs::read(path).map_err(|e| {
        PassSlotError::InvalidInput(format!("Cannot read image {}: {e}", path.display()))
    })?;
    let mime_type = detect_mime(&bytes, path).ok_or_else(|| {
        PassSlotError::InvalidInput(format!(
            "Image mime type of {} not supported",
            path.display()
        ))
    })?;
    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(PassSlotError::InvalidInput(format!(
            "Image mime type {mime_type} not supported"
        )));
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageFile {
        file_name,
        mime_type,
        bytes,
    })
}

/// Detect the MIME type from content magic bytes, falling back to the file
/// extension when the content is not recognized.
fn detect_mime(bytes: &[u8], path: &Path) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.starts_with(b"\xff\xd8\xff") {
        return Some("image/jpg");
    }
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Some("image/png"),
        Some("gif") => Some("image/gif"),
        Some("jpg") | Some("jpeg") => Some("image/jpg"),
        _ => None,
    }
}
