use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const DEFAULT_MIME: &str = "image/jpeg";

/// An image as it is handed to the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Picks the MIME type from the reported content type, then the file
    /// name, then falls back to JPEG.
    pub fn detect(bytes: Vec<u8>, content_type: Option<&str>, filename: &str) -> Self {
        let mime = content_type
            .filter(|value| value.starts_with("image/"))
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .or_else(|| mime_from_filename(filename).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_MIME.to_string());
        Self::new(bytes, mime)
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

pub fn mime_from_filename(filename: &str) -> Option<&'static str> {
    let (_, extension) = filename.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

pub fn is_image(content_type: Option<&str>, filename: &str) -> bool {
    match content_type {
        Some(value) => value.starts_with("image/"),
        None => mime_from_filename(filename).is_some(),
    }
}
