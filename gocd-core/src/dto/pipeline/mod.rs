//! Pipeline DTOs

use serde::{Deserialize, Serialize};

use crate::domain::pipeline::Pipeline;

/// Request to create a new pipeline inside a pipeline group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub group: String,
    pub pipeline: Pipeline,
}

impl PipelineRequest {
    pub fn new(group: impl Into<String>, pipeline: Pipeline) -> Self {
        Self {
            group: group.into(),
            pipeline,
        }
    }
}
