//! Vision model integration.
//!
//! A [`VisionModel`] takes one image plus an instruction and returns the
//! model's description. The CLI wraps that blocking call in a spinner.

pub mod gemini;
pub mod input;

pub use gemini::{FinishReason, GeminiClient};
pub use input::{load_image, validate_image, ImageError, ImageInput};

/// Instruction sent alongside every image.
pub const DESCRIBE_INSTRUCTION: &str = "Generate a single paragraph prompt that could be used \
to recreate this image. Include the main subject, artistic style, composition, colors, \
lighting, and mood in a flowing descriptive paragraph. Focus on being comprehensive but concise.";

/// Error type for vision requests.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    /// The model refused to answer.
    #[error("Content was blocked by safety filters ({0})")]
    Blocked(String),
    /// The model answered with nothing usable.
    #[error("{0}")]
    EmptyResponse(String),
    /// Transport or HTTP failure.
    #[error("Gemini API request failed: {0}")]
    RequestFailed(String),
}

impl From<reqwest::Error> for VisionError {
    fn from(e: reqwest::Error) -> Self {
        VisionError::RequestFailed(e.to_string())
    }
}

/// A model that can describe an image.
pub trait VisionModel {
    /// Display name used in progress messages.
    fn name(&self) -> &str;

    /// Describe `image` following `instruction`.
    ///
    /// Blocks until the model answers or the request fails.
    fn describe(&self, image: &ImageInput, instruction: &str) -> Result<String, VisionError>;
}
