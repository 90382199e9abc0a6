use async_trait::async_trait;

/// Remote model that reads text out of an image.
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn extract_markdown(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String, VisionClientError>;

    fn model(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum VisionClientError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("api returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
