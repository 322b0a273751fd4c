//! Material domain types

use serde::{Deserialize, Serialize};

use crate::serde_helpers::{is_false, null_as_default};

/// A dependency source feeding a pipeline (git repository, upstream pipeline, ...)
///
/// The fingerprint is assigned by the server once the material is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "type", default)]
    pub material_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fingerprint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub attributes: MaterialAttributes,
}

impl Material {
    /// Create a git material tracking `branch` of `url`
    pub fn git(url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            material_type: "git".to_string(),
            attributes: MaterialAttributes {
                url: url.into(),
                branch: branch.into(),
                auto_update: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Type specific settings of a material
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<MaterialFilter>,
    #[serde(default)]
    pub invert_filter: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_update: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub submodule_folder: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub shallow_clone: bool,
}

/// Globs of changed paths that should not trigger the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialFilter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ignore: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_material_encoding() {
        let material = Material::git("https://github.com/gocd/gocd", "master");
        let json = serde_json::to_value(&material).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "git",
                "attributes": {
                    "url": "https://github.com/gocd/gocd",
                    "invert_filter": false,
                    "auto_update": true,
                    "branch": "master"
                }
            })
        );
    }

    #[test]
    fn test_filter_decodes() {
        let material: Material = serde_json::from_str(
            r#"{
                "type": "git",
                "fingerprint": "abc123",
                "attributes": {
                    "url": "https://example.com/repo.git",
                    "filter": {"ignore": ["docs/**", "*.md"]},
                    "invert_filter": true
                }
            }"#,
        )
        .unwrap();

        assert_eq!(material.fingerprint, "abc123");
        let filter = material.attributes.filter.unwrap();
        assert_eq!(filter.ignore, vec!["docs/**", "*.md"]);
        assert!(material.attributes.invert_filter);
        assert!(material.attributes.branch.is_empty());
    }
}
