//! Image validation and upload encoding.

use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, ImageReader};

/// Error type for image loading.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The path does not exist.
    #[error("Image file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but is not a readable, supported image.
    #[error("Invalid image file {}: {reason}", .path.display())]
    Invalid {
        /// File that failed validation.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },
}

impl ImageError {
    fn invalid(path: &Path, reason: impl ToString) -> Self {
        ImageError::Invalid {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// An image ready to be sent inline to the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Where the image was read from.
    pub path: PathBuf,
    /// MIME type of the encoded data.
    pub mime_type: String,
    /// Base64-encoded file contents.
    pub data: String,
    /// Pixel dimensions.
    pub dimensions: (u32, u32),
}

/// Check that `path` exists and holds a supported image.
///
/// Returns the detected format and dimensions. Only the header is decoded.
pub fn validate_image(path: &Path) -> Result<(ImageFormat, (u32, u32)), ImageError> {
    if !path.exists() {
        return Err(ImageError::NotFound(path.to_path_buf()));
    }

    let reader = ImageReader::open(path)
        .map_err(|e| ImageError::invalid(path, e))?
        .with_guessed_format()
        .map_err(|e| ImageError::invalid(path, e))?;

    let format = reader
        .format()
        .ok_or_else(|| ImageError::invalid(path, "unrecognised image format"))?;

    let dimensions = reader
        .into_dimensions()
        .map_err(|e| ImageError::invalid(path, e))?;

    Ok((format, dimensions))
}

/// Validate and load an image for upload.
pub fn load_image(path: &Path) -> Result<ImageInput, ImageError> {
    let (format, dimensions) = validate_image(path)?;
    let bytes = fs::read(path).map_err(|e| ImageError::invalid(path, e))?;

    log::debug!(
        "loaded {} ({}x{}, {} bytes)",
        path.display(),
        dimensions.0,
        dimensions.1,
        bytes.len()
    );

    Ok(ImageInput {
        path: path.to_path_buf(),
        mime_type: format.to_mime_type().to_string(),
        data: STANDARD.encode(&bytes),
        dimensions,
    })
}
