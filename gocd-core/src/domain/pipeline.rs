//! Pipeline domain types

use serde::{Deserialize, Serialize};

use super::material::Material;
use super::stage::{Stage, StageContainer};
use crate::serde_helpers::{is_false, null_as_default};

/// Pipeline configuration
///
/// Sent when creating a pipeline and returned by the server in its canonical
/// form (which may carry a `version` assigned by the server).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label_template: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub enable_pipeline_locking: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub materials: Vec<Material>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl Pipeline {
    /// Create an empty pipeline called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl StageContainer for Pipeline {
    fn stages(&self) -> &[Stage] {
        &self.stages
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_stages(&mut self, stages: Vec<Stage>) {
        self.stages = stages;
    }

    fn add_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }
}

/// Pipeline template: a named stage set that pipelines can reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTemplate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl StageContainer for PipelineTemplate {
    fn stages(&self) -> &[Stage] {
        &self.stages
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_stages(&mut self, stages: Vec<Stage>) {
        self.stages = stages;
    }

    fn add_stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{find_stage, stage_names};

    #[test]
    fn test_add_stage_appends() {
        let mut pipeline = Pipeline::new("build-pipeline");
        pipeline.add_stage(Stage::new("build"));
        pipeline.add_stage(Stage::new("test"));
        pipeline.add_stage(Stage::new("deploy"));

        assert_eq!(stage_names(&pipeline), vec!["build", "test", "deploy"]);
    }

    #[test]
    fn test_set_stages_replaces() {
        let mut pipeline = Pipeline::new("build-pipeline");
        pipeline.add_stage(Stage::new("build"));
        pipeline.add_stage(Stage::new("test"));

        pipeline.set_stages(vec![Stage::new("package")]);
        assert_eq!(stage_names(&pipeline), vec!["package"]);

        pipeline.set_stages(Vec::new());
        assert!(pipeline.stages().is_empty());
    }

    #[test]
    fn test_containers_share_helpers() {
        fn first_stage<C: StageContainer>(container: &C) -> Option<&str> {
            container.stages().first().map(|s| s.name.as_str())
        }

        let mut template = PipelineTemplate {
            name: "java-service".to_string(),
            ..Default::default()
        };
        template.add_stage(Stage::new("compile"));

        let mut pipeline = Pipeline::new("billing");
        pipeline.set_stages(template.stages().to_vec());

        assert_eq!(first_stage(&template), Some("compile"));
        assert_eq!(first_stage(&pipeline), Some("compile"));
        assert_eq!(StageContainer::name(&template), "java-service");
        assert!(find_stage(&pipeline, "compile").is_some());
        assert!(find_stage(&pipeline, "deploy").is_none());
    }

    #[test]
    fn test_zero_fields_are_omitted() {
        let pipeline = Pipeline::new("build-pipeline");
        let json = serde_json::to_value(&pipeline).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "name": "build-pipeline", "stages": [] })
        );

        let decoded: Pipeline = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, pipeline);
    }

    #[test]
    fn test_full_pipeline_round_trip() {
        let mut pipeline = Pipeline {
            label_template: "${COUNT}".to_string(),
            enable_pipeline_locking: true,
            materials: vec![Material::git("https://example.com/app.git", "main")],
            ..Pipeline::new("app")
        };
        pipeline.add_stage(Stage::new("build"));

        let encoded = serde_json::to_string(&pipeline).unwrap();
        let decoded: Pipeline = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, pipeline);
    }

    #[test]
    fn test_null_stages_decode_empty() {
        let pipeline: Pipeline =
            serde_json::from_str(r#"{"name": "app", "stages": null, "version": "3"}"#).unwrap();
        assert!(pipeline.stages.is_empty());
        assert_eq!(pipeline.version, "3");
    }
}
