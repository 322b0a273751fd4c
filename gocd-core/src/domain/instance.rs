//! Pipeline run types
//!
//! A [`PipelineInstance`] is one execution of a pipeline, identified by its
//! natural order (the run counter, strictly increasing per pipeline). History
//! pages keep instances in the order the server returned them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::Stage;
use crate::serde_helpers::null_as_default;

/// One page of pipeline runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineHistory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pipelines: Vec<PipelineInstance>,
}

impl PipelineHistory {
    /// Natural order of every run on this page, in page order
    pub fn natural_orders(&self) -> Vec<i64> {
        self.pipelines.iter().map(|p| p.natural_order).collect()
    }

    /// Whether the page holds no runs
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

/// A single pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineInstance {
    #[serde(default)]
    pub build_cause: BuildCause,
    #[serde(default)]
    pub can_run: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub natural_order: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stages: Vec<Stage>,
}

/// Why a run was started
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCause {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub approver: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub material_revisions: Vec<MaterialRevision>,
    #[serde(default)]
    pub trigger_forced: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trigger_message: String,
}

/// Version of a material pulled for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialRevision {
    #[serde(default, deserialize_with = "null_as_default")]
    pub modifications: Vec<Modification>,
    #[serde(default)]
    pub material: RevisionMaterial,
    #[serde(default)]
    pub changed: bool,
}

/// Material descriptor attached to a revision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionMaterial {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fingerprint: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub material_type: String,
    #[serde(default)]
    pub id: i64,
}

/// One commit (or upstream run) included in a material revision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_address: String,
    #[serde(default)]
    pub id: i64,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub modified_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revision: String,
}

impl Modification {
    /// Modification time, if the server reported one
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        if self.modified_time == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.modified_time)
    }
}
