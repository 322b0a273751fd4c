//! Pipeline status

use serde::{Deserialize, Serialize};

/// Current operability of a pipeline as reported by the server
///
/// The flags are independent: a pipeline can be paused and locked at the same
/// time, and `schedulable` already accounts for both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatus {
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub schedulable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_decodes() {
        let status: PipelineStatus =
            serde_json::from_str(r#"{"locked": true, "paused": true, "schedulable": false}"#)
                .unwrap();
        assert!(status.locked);
        assert!(status.paused);
        assert!(!status.schedulable);
    }

    #[test]
    fn test_missing_flags_are_false() {
        let status: PipelineStatus = serde_json::from_str(r#"{"paused": true}"#).unwrap();
        assert_eq!(
            status,
            PipelineStatus {
                locked: false,
                paused: true,
                schedulable: false,
            }
        );
    }
}
