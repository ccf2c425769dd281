use crate::clients::openai_client::{self, ModelSettings};
use crate::models::image::ImageInput;
use serenity::async_trait;

#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn transcribe(
        &self,
        prompt: &str,
        image: &ImageInput,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct OpenAIService {
    api_key: String,
    settings: ModelSettings,
    http: reqwest::Client,
}

impl OpenAIService {
    pub fn new(api_key: String, settings: ModelSettings) -> Self {
        Self {
            api_key,
            settings,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VisionClient for OpenAIService {
    async fn transcribe(
        &self,
        prompt: &str,
        image: &ImageInput,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        openai_client::transcribe_image(&self.http, prompt, image, &self.settings, &self.api_key)
            .await
    }
}
