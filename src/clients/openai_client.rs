use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::models::image::ImageInput;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

fn build_request(prompt: &str, image: &ImageInput, settings: &ModelSettings) -> OpenAIRequest {
    OpenAIRequest {
        model: settings.model.clone(),
        messages: vec![OpenAIMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    text: prompt.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                    },
                },
            ],
        }],
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    }
}

pub async fn transcribe_image(
    client: &reqwest::Client,
    prompt: &str,
    image: &ImageInput,
    settings: &ModelSettings,
    api_key: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let request = build_request(prompt, image, settings);
    debug!(
        "Sending {} byte {} image to {}",
        image.bytes.len(),
        image.mime_type,
        settings.model
    );

    let response = client
        .post(CHAT_COMPLETIONS_URL)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        error!("OpenAI returned {}: {}", status, text);
        return Err(format!("Request failed with status {}", status).into());
    }

    extract_content(&text)
}

fn extract_content(body: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let parsed: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse JSON: {}\nRaw body: {}", e, body))?;

    match parsed.choices.into_iter().next().and_then(|choice| choice.message.content) {
        Some(content) => Ok(content),
        None => {
            error!("No content in OpenAI response. Raw body: {}", body);
            Err("No response from OpenAI".to_string().into())
        }
    }
}
