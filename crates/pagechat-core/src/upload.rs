//! Client-side upload validation.
//!
//! The backend re-validates everything; this is the fast path that mirrors
//! what the server will accept, so a doomed multipart upload is never sent.

use crate::defaults::{MAX_UPLOAD_BYTES, SUPPORTED_EXTENSIONS};

/// Result of upload validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub allowed: bool,
    pub block_reason: Option<String>,
}

impl ValidationResult {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            block_reason: None,
        }
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            block_reason: Some(reason.into()),
        }
    }
}

/// Validate a candidate upload by extension and size.
pub fn validate_upload(filename: &str, size_bytes: u64) -> ValidationResult {
    if size_bytes > MAX_UPLOAD_BYTES {
        return ValidationResult::blocked(format!(
            "File exceeds maximum size of {} bytes",
            MAX_UPLOAD_BYTES
        ));
    }

    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                ValidationResult::allowed()
            } else {
                ValidationResult::blocked(format!("File extension .{} is not supported", ext))
            }
        }
        None => ValidationResult::blocked("File has no extension"),
    }
}
