use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub declared_content_type: Option<String>,
    pub data: Bytes,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            declared_content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.declared_content_type = Some(content_type.into());
        self
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}
