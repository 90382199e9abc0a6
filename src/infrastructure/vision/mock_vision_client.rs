use async_trait::async_trait;

use crate::application::ports::{VisionClient, VisionClientError};

/// Returns a canned response, or a request failure when constructed with
/// [`MockVisionClient::failing`].
pub struct MockVisionClient {
    response: Result<String, String>,
}

impl MockVisionClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
        }
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn extract_markdown(
        &self,
        _image: &[u8],
        _mime_type: &str,
    ) -> Result<String, VisionClientError> {
        self.response
            .clone()
            .map_err(VisionClientError::RequestFailed)
    }

    fn model(&self) -> &str {
        "mock-vision"
    }
}
