//! Stage domain types
//!
//! A stage appears both in pipeline definitions (approval, jobs, cleanup flags)
//! and in run results (id, counter, result). Both shapes share one type; the
//! fields that do not apply to a payload stay at their zero value and are left
//! out when encoding.

use serde::{Deserialize, Serialize};

use crate::serde_helpers::{is_false, is_zero, null_as_default};

/// A stage of a pipeline or template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub counter: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub result: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub approval_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub approved_by: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub scheduled: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub fetch_materials: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub clean_working_directory: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub never_cleanup_artifacts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<StageApproval>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub jobs: Vec<StageJob>,
}

impl Stage {
    /// Create a stage definition with only a name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Approval gate in front of a stage ("success" or "manual")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageApproval {
    #[serde(rename = "type", default)]
    pub approval_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<ApprovalAuthorization>,
}

/// Users and roles allowed to approve a manual stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalAuthorization {
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub users: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub roles: Vec<String>,
}

/// Environment variable scoped to a stage or job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub encrypted_value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub secure: bool,
}

/// A job inside a stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageJob {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub result: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub scheduled_date: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timeout: String,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub resources: Vec<String>,
}

// =============================================================================
// Stage Containers
// =============================================================================

/// Anything that owns an ordered sequence of stages
///
/// The sequence can only be appended to or replaced wholesale. To reorder or
/// drop stages, build a new sequence and hand it to [`set_stages`].
///
/// [`set_stages`]: StageContainer::set_stages
pub trait StageContainer {
    /// Stages in execution order
    fn stages(&self) -> &[Stage];

    /// Name of the container
    fn name(&self) -> &str;

    /// Replace every stage with `stages`
    fn set_stages(&mut self, stages: Vec<Stage>);

    /// Append `stage` after the existing stages
    fn add_stage(&mut self, stage: Stage);
}

/// Names of the stages in `container`, in order
pub fn stage_names<C: StageContainer + ?Sized>(container: &C) -> Vec<&str> {
    container.stages().iter().map(|s| s.name.as_str()).collect()
}

/// First stage in `container` called `name`
pub fn find_stage<'a, C: StageContainer + ?Sized>(
    container: &'a C,
    name: &str,
) -> Option<&'a Stage> {
    container.stages().iter().find(|s| s.name == name)
}
