use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{DocumentProcessor, ProcessorError};
use crate::domain::{ProcessorResult, WorkingFile};

#[derive(Debug, Clone)]
pub enum MockBehavior {
    Succeed(String),
    Fail(String),
    Delay(Duration),
    Panic,
}

/// Scripted processor for pipeline and handler tests.
pub struct MockDocumentProcessor {
    behavior: MockBehavior,
    invocations: AtomicUsize,
    last_path: Mutex<Option<PathBuf>>,
}

impl MockDocumentProcessor {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            invocations: AtomicUsize::new(0),
            last_path: Mutex::new(None),
        }
    }

    pub fn succeeding(content: &str) -> Self {
        Self::new(MockBehavior::Succeed(content.to_string()))
    }

    pub fn failing(reason: &str) -> Self {
        Self::new(MockBehavior::Fail(reason.to_string()))
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl DocumentProcessor for MockDocumentProcessor {
    async fn process(&self, file: &WorkingFile) -> Result<ProcessorResult, ProcessorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_path.lock() {
            *last = Some(file.path.clone());
        }

        match &self.behavior {
            MockBehavior::Succeed(content) => {
                Ok(ProcessorResult::success(content.clone()).with_metadata("mock", true))
            }
            MockBehavior::Fail(reason) => Err(ProcessorError::ExtractionFailed(reason.clone())),
            MockBehavior::Delay(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(ProcessorResult::success("delayed"))
            }
            MockBehavior::Panic => panic!("mock processor panicked"),
        }
    }
}
