//! Common utilities for multipart upload handlers.

use std::collections::HashMap;

use axum::extract::Multipart;
use cliphost_core::AppError;

/// One file pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A fully drained multipart form: text fields in arrival order (repeats
/// kept) and file parts keyed by field name.
#[derive(Debug, Default)]
pub struct CollectedMultipart {
    texts: Vec<(String, String)>,
    files: HashMap<String, UploadedFile>,
}

impl CollectedMultipart {
    /// First value of a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a repeated text field, in arrival order.
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.texts
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

#[cfg(test)]
impl CollectedMultipart {
    pub(crate) fn push_text(&mut self, name: &str, value: &str) {
        self.texts.push((name.to_string(), value.to_string()));
    }
}

/// Drain a multipart form into memory. A part with a filename is a file,
/// anything else is text. A file field name may appear only once.
pub async fn collect_multipart(multipart: &mut Multipart) -> Result<CollectedMultipart, AppError> {
    let mut collected = CollectedMultipart::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart request: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if let Some(filename) = field.file_name().map(str::to_string) {
            if collected.files.contains_key(&field_name) {
                return Err(AppError::Validation(format!(
                    "Duplicate file field '{}'",
                    field_name
                )));
            }
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;
            collected.files.insert(
                field_name,
                UploadedFile {
                    filename,
                    content_type,
                    data: data.to_vec(),
                },
            );
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read form field: {}", e)))?;
            collected.texts.push((field_name, value));
        }
    }

    Ok(collected)
}

/// Validate file size against a configured cap.
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::Validation(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Strip MIME parameters: "video/mp4; codecs=avc1" becomes "video/mp4".
fn normalize_mime_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

/// Check a declared content type against an allow-list. `error_message` is
/// the exact client-facing rejection for the route.
pub fn validate_content_type(
    content_type: &str,
    allowed_types: &[&str],
    error_message: &str,
) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_ascii_lowercase();
    if !allowed_types.contains(&normalized.as_str()) {
        return Err(AppError::Validation(error_message.to_string()));
    }
    Ok(())
}
