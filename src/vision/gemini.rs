//! Google Gemini `generateContent` client.
//!
//! Sends one instruction plus one inline image and turns the response into
//! plain text or a typed [`VisionError`].

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::input::ImageInput;
use super::{VisionError, VisionModel};

/// Per-request timeout. Vision calls on large images can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

/// Why the model stopped generating.
///
/// Values the API adds later deserialize as [`FinishReason::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Natural end of output.
    Stop,
    /// Token limit reached.
    MaxTokens,
    /// Flagged by the safety filters.
    Safety,
    /// Flagged as reciting training data.
    Recitation,
    /// Unsupported language.
    Language,
    /// Unspecified other reason.
    Other,
    /// Matched a terminology blocklist.
    Blocklist,
    /// Prohibited content.
    ProhibitedContent,
    /// Sensitive personally identifiable information.
    Spii,
    /// Invalid function call produced.
    MalformedFunctionCall,
    /// Generated image flagged by safety filters.
    ImageSafety,
    /// Anything else.
    #[serde(other)]
    Unknown,
}

impl FinishReason {
    /// The name the API uses on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Language => "LANGUAGE",
            FinishReason::Other => "OTHER",
            FinishReason::Blocklist => "BLOCKLIST",
            FinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
            FinishReason::Spii => "SPII",
            FinishReason::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
            FinishReason::ImageSafety => "IMAGE_SAFETY",
            FinishReason::Unknown => "UNKNOWN",
        }
    }

    /// Whether this reason means the content was withheld by a filter.
    pub fn is_blocked(self) -> bool {
        matches!(
            self,
            FinishReason::Safety
                | FinishReason::Recitation
                | FinishReason::Blocklist
                | FinishReason::ProhibitedContent
                | FinishReason::Spii
                | FinishReason::ImageSafety
        )
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body of `generateContent`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates, best first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt itself.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One generated answer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<CandidateContent>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Content of a candidate.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    /// Ordered parts; only text parts are used.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A single response part.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    /// Text, if this is a text part.
    #[serde(default)]
    pub text: Option<String>,
}

/// Prompt-level feedback.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the whole prompt was rejected.
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Turn a parsed response into the description text.
pub fn extract_description(response: GenerateContentResponse) -> Result<String, VisionError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(VisionError::Blocked(reason));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(VisionError::EmptyResponse(
            "No response candidates from Gemini API".to_string(),
        ));
    };

    if let Some(reason) = candidate.finish_reason.filter(|r| r.is_blocked()) {
        return Err(VisionError::Blocked(reason.to_string()));
    }

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .filter(|text| !text.trim().is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(VisionError::EmptyResponse(
            "No text content found in Gemini API response".to_string(),
        ));
    }
    Ok(text.to_string())
}

/// Best available message for a failed HTTP call.
fn api_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => format!("{status}: {}", envelope.error.message),
        Err(_) => format!("HTTP {status}"),
    }
}

/// Blocking client for one Gemini model.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for `model` at `base_url`.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, VisionError> {
        let client = Client::builder()
            .user_agent(format!("rprompt/{}", crate::VERSION))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    /// Model this client talks to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full `generateContent` URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl VisionModel for GeminiClient {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn describe(&self, image: &ImageInput, instruction: &str) -> Result<String, VisionError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: instruction },
                    RequestPart::Inline {
                        inline_data: InlineData {
                            mime_type: &image.mime_type,
                            data: &image.data,
                        },
                    },
                ],
            }],
        };

        let endpoint = self.endpoint();
        log::debug!("POST {endpoint} ({} image)", image.mime_type);

        let response = self
            .client
            .post(&endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            log::debug!("Gemini returned {status}: {text}");
            return Err(VisionError::RequestFailed(api_error_message(status, &text)));
        }

        let parsed: GenerateContentResponse = response.json()?;
        extract_description(parsed)
    }
}
