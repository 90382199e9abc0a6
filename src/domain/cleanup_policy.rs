use serde::Deserialize;

/// What happens to working files once a request has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    #[default]
    Always,
    RetainOnError,
}

impl CleanupPolicy {
    pub fn retains(&self, succeeded: bool) -> bool {
        matches!(self, Self::RetainOnError) && !succeeded
    }
}
