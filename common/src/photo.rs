use serde::{Deserialize, Serialize};
use std::fmt;

use crate::location::GeoLocation;

/// Upload size ceiling for harvest photos and lab report files.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png"];
const DOCUMENT_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

/// Errors from validating an uploaded file's metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadError {
    FileTooLarge { size: u64, limit: u64 },
    UnsupportedType(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooLarge { size, limit } => {
                write!(f, "file too large: {size} bytes (limit {limit})")
            }
            Self::UnsupportedType(ty) => write!(f, "unsupported file type: {ty}"),
        }
    }
}

/// Metadata for an uploaded harvest photo. The file content itself stays
/// with the presentation layer; the core only keeps this reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Geotag extracted from the photo's EXIF data, if any.
    #[serde(default)]
    pub exif_location: Option<GeoLocation>,
}

impl PhotoRef {
    /// Validate and build a photo reference. JPEG/PNG only, 5 MB limit.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
        exif_location: Option<GeoLocation>,
    ) -> Result<PhotoRef, UploadError> {
        let content_type = content_type.into();
        check_upload(&content_type, size_bytes, PHOTO_TYPES)?;
        Ok(PhotoRef {
            file_name: file_name.into(),
            content_type,
            size_bytes,
            exif_location,
        })
    }
}

/// Validate a lab report document upload (PDF, JPG, or PNG).
pub fn check_document_upload(content_type: &str, size_bytes: u64) -> Result<(), UploadError> {
    check_upload(content_type, size_bytes, DOCUMENT_TYPES)
}

fn check_upload(
    content_type: &str,
    size_bytes: u64,
    allowed: &[&str],
) -> Result<(), UploadError> {
    if !allowed.contains(&content_type) {
        return Err(UploadError::UnsupportedType(content_type.to_string()));
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadError::FileTooLarge {
            size: size_bytes,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}
