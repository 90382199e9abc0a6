use std::collections::BTreeMap;

use serde_json::Value;

pub type Metadata = BTreeMap<String, Value>;

/// Outcome of one processor invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorResult {
    pub success: bool,
    pub content: String,
    pub metadata: Metadata,
    pub error: Option<String>,
}

impl ProcessorResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            metadata: Metadata::new(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            metadata: Metadata::new(),
            error: Some(error.into()),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
