mod mock_vision_client;
mod openai_vision_client;

pub use mock_vision_client::MockVisionClient;
pub use openai_vision_client::{OCR_PROMPT, OpenAiVisionClient};
