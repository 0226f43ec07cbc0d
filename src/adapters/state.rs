use std::sync::Arc;

use crate::{
    adapters::error::StatusMapping, application::pipeline::TransformPipeline,
    domain::config::upload::UploadConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<UploadConfig>,
    pub pipeline: TransformPipeline,
}

impl AppState {
    pub fn new(config: UploadConfig, pipeline: TransformPipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
        }
    }

    pub fn status_mapping(&self) -> StatusMapping {
        StatusMapping::from_strict(self.config.strict_status_codes)
    }
}
