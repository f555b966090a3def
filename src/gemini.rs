/// External API adapter for the hosted generative-image model
///
/// Builds one `generateContent` request per prompt: every selected
/// character reference goes in as an inline base64 image part, in
/// slot order, ahead of a synthesized text instruction that names
/// the characters so the model keeps them consistent. The first
/// inline-image part of the first candidate is the result.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::GenericImageView;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Image-capable model this app targets
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// A selected character as the adapter sees it: the display name for
/// the text instruction plus the attached image to inline.
#[derive(Debug, Clone)]
pub struct AttachedReference {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Everything one generation call needs
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Selected slots that carry an attached image, in slot order
    pub characters: Vec<AttachedReference>,
    /// Already resolved against the supported set (see AspectRatio::resolve)
    pub aspect_ratio: String,
    pub api_key: String,
}

/// The decoded result of a successful call
#[derive(Debug, Clone)]
pub struct GeneratedPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Structured API error, already flattened to a display string
    #[error("{0}")]
    Api(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response JSON: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("No image data found in response")]
    NoImage,

    #[error("Image payload could not be decoded: {0}")]
    Payload(String),
}

fn endpoint() -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        GEMINI_API_BASE.trim_end_matches('/'),
        IMAGE_MODEL
    )
}

/// The text instruction sent after the image parts.
///
/// Character names are spelled out so the model can match each
/// reference to its mentions in the prompt.
fn compose_prompt(prompt: &str, characters: &[AttachedReference]) -> String {
    if characters.is_empty() {
        return format!("Generate an image: {}. High quality, consistent style.", prompt);
    }

    let names: Vec<&str> = characters
        .iter()
        .map(|character| character.name.as_str())
        .collect();
    format!(
        "Using the attached character references ({}), generate an image: {}. High quality, consistent style.",
        names.join(", "),
        prompt
    )
}

/// Build the request body: image parts first, text last
fn build_request_body(request: &GenerateRequest) -> Value {
    let mut parts: Vec<Value> = request
        .characters
        .iter()
        .map(|character| {
            json!({
                "inlineData": {
                    "mimeType": character.mime_type,
                    "data": BASE64.encode(&character.bytes),
                }
            })
        })
        .collect();

    parts.push(json!({ "text": compose_prompt(&request.prompt, &request.characters) }));

    json!({
        "contents": [{
            "role": "user",
            "parts": parts,
        }],
        "generationConfig": {
            "imageConfig": {
                "aspectRatio": request.aspect_ratio,
            }
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default, rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(default, rename = "mimeType")]
    mime_type: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

/// Pull the first inline-image part out of a success response
fn parse_response(body: &str) -> Result<(String, Vec<u8>), GenerateError> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .unwrap_or_default();

    for part in parts {
        let Some(inline) = part.inline_data else {
            continue;
        };
        let Some(data) = inline.data else {
            continue;
        };

        let bytes = BASE64
            .decode(data.as_bytes())
            .map_err(|err| GenerateError::Payload(format!("bad base64 image data: {}", err)))?;
        let mime_type = inline.mime_type.unwrap_or_else(|| "image/png".to_string());
        return Ok((mime_type, bytes));
    }

    Err(GenerateError::NoImage)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Flatten a structured API error into one display string.
/// Code and status are appended when present for diagnostic value.
fn extract_error_message(http_status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error);

    let Some(detail) = detail else {
        return format!("Request failed with HTTP {}", http_status);
    };

    let mut message = detail
        .message
        .unwrap_or_else(|| format!("Request failed with HTTP {}", http_status));
    if let Some(code) = detail.code {
        message.push_str(&format!(" (Code: {})", code));
    }
    if let Some(status) = detail.status {
        message.push_str(&format!(" [{}]", status));
    }
    message
}

/// Run one generation call to completion.
///
/// The returned payload is validated by decoding it once; dimensions
/// come from that decode. Failures never affect sibling calls.
pub async fn generate_image(
    client: reqwest::Client,
    request: GenerateRequest,
) -> Result<GeneratedPayload, GenerateError> {
    let body = build_request_body(&request);

    let response = client
        .post(endpoint())
        .header("x-goog-api-key", request.api_key.as_str())
        .json(&body)
        .send()
        .await?;

    let http_status = response.status();
    let text = response.text().await?;

    if !http_status.is_success() {
        return Err(GenerateError::Api(extract_error_message(http_status, &text)));
    }

    let (mime_type, bytes) = parse_response(&text)?;

    let decoded = image::load_from_memory(&bytes)
        .map_err(|err| GenerateError::Payload(err.to_string()))?;
    let (width, height) = decoded.dimensions();

    Ok(GeneratedPayload {
        width,
        height,
        bytes,
        mime_type,
    })
}
