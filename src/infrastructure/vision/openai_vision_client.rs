use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{VisionClient, VisionClientError};

pub const OCR_PROMPT: &str = "Extract all text from this image and return it as Markdown. \
Preserve the original layout, headings and table structure. \
Ignore watermarks and stamps. Output only the extracted content.";

/// OpenAI-compatible chat-completions client used for image OCR.
pub struct OpenAiVisionClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiVisionClient {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Self, VisionClientError> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VisionClientError::RequestFailed(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            max_tokens,
            temperature,
        })
    }

    fn request_body(&self, image: &[u8], mime_type: &str) -> serde_json::Value {
        let b64 = general_purpose::STANDARD.encode(image);
        let data_uri = format!("data:{mime_type};base64,{b64}");

        serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": OCR_PROMPT
                        },
                        {
                            "type": "image_url",
                            "image_url": { "url": data_uri }
                        }
                    ]
                }
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "stream": false
        })
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl VisionClient for OpenAiVisionClient {
    #[tracing::instrument(skip(self, image), fields(model = %self.model, bytes = image.len()))]
    async fn extract_markdown(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, VisionClientError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(image, mime_type))
            .send()
            .await
            .map_err(|e| VisionClientError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(VisionClientError::Status { status, body });
        }

        let raw_bytes = response
            .bytes()
            .await
            .map_err(|e| VisionClientError::RequestFailed(e.to_string()))?;

        let completion: ChatCompletion = serde_json::from_slice(&raw_bytes).map_err(|e| {
            tracing::error!(
                raw_response = %String::from_utf8_lossy(&raw_bytes),
                "Failed to parse vision response"
            );
            VisionClientError::InvalidResponse(e.to_string())
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        tracing::debug!(chars = content.len(), "Vision extraction complete");
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
