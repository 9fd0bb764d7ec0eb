//! Image payloads for the multipart upload endpoints.

use reqwest::multipart::{Form, Part};

use social_common::constants::UPLOAD_FIELD;

use crate::errors::{Result, ValidationError};

/// An image ready to be sent as the `file0` multipart field.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Wrap in-memory bytes; the MIME type is guessed from `file_name`.
    ///
    /// Only `image/*` types are accepted, mirroring the picker's filter.
    pub fn new<S: Into<String>>(file_name: S, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first()
            .filter(|m| m.type_() == mime_guess::mime::IMAGE)
            .ok_or_else(|| ValidationError::Invalid(format!("{file_name} is not an image")))?;

        Ok(Self {
            file_name,
            mime: mime.essence_str().to_string(),
            bytes,
        })
    }

    /// Read an image from disk.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ValidationError::Invalid(format!("{} is not a file", path.display())))?;
        let bytes = tokio::fs::read(path).await?;
        Self::new(file_name, bytes)
    }

    /// File name sent with the part.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Guessed MIME type, e.g. `image/png`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn to_form(&self) -> Result<Form> {
        let part = Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)?;
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}
