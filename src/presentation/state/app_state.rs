use std::sync::Arc;

use crate::application::services::DispatchPipeline;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DispatchPipeline>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(pipeline: Arc<DispatchPipeline>, settings: Settings) -> Self {
        Self {
            pipeline,
            settings: Arc::new(settings),
        }
    }
}
