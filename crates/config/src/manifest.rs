//! Pool manifests and replayable scenarios
//!
//! A manifest declares the pool's total capacity and every process's
//! maximum claim and initial holdings. A scenario adds an ordered list of
//! operations to replay against a pool built from that manifest.

use banker_errors::{ConfigError, Error};
use banker_types::{ProcessClaim, ProcessId, ResourceVector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Initial pool layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolManifest {
    pub total: ResourceVector,
    #[serde(default, rename = "process")]
    pub processes: Vec<ProcessClaim>,
}

impl PoolManifest {
    /// The textbook five-process, three-kind example.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            total: [10, 5, 7].into(),
            processes: vec![
                ProcessClaim::new([7, 5, 3], [0, 1, 0]),
                ProcessClaim::new([3, 2, 2], [2, 0, 0]),
                ProcessClaim::new([9, 0, 2], [3, 0, 2]),
                ProcessClaim::new([2, 2, 2], [2, 1, 1]),
                ProcessClaim::new([4, 3, 3], [0, 0, 2]),
            ],
        }
    }

    /// Load a manifest from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        read_toml(path).await
    }
}

/// One replayable operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Request {
        process: ProcessId,
        vector: ResourceVector,
    },
    Release {
        process: ProcessId,
        vector: ResourceVector,
    },
    Grow {
        vector: ResourceVector,
    },
}

impl Step {
    /// Short label used in logs and run reports
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Request { process, vector } => format!("{process} requests {vector}"),
            Self::Release { process, vector } => format!("{process} releases {vector}"),
            Self::Grow { vector } => format!("grow by {vector}"),
        }
    }
}

/// A manifest plus the operations to run against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(flatten)]
    pub manifest: PoolManifest,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// The textbook manifest with four requests that end in a grant, a
    /// shortage, an unsafe denial and another grant.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            manifest: PoolManifest::classic(),
            steps: vec![
                Step::Request {
                    process: ProcessId(0),
                    vector: [0, 2, 0].into(),
                },
                Step::Request {
                    process: ProcessId(4),
                    vector: [0, 3, 0].into(),
                },
                Step::Request {
                    process: ProcessId(1),
                    vector: [1, 0, 2].into(),
                },
                Step::Request {
                    process: ProcessId(3),
                    vector: [0, 1, 0].into(),
                },
            ],
        }
    }

    /// Load a scenario from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        read_toml(path).await
    }
}

async fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let contents = fs::read_to_string(path)
        .await
        .map_err(|e| crate::read_error(path, &e))?;

    toml::from_str(&contents)
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let scenario: Scenario = toml::from_str(
            r#"
total = [4, 2]

[[process]]
max = [2, 1]
allocated = [1, 0]

[[process]]
max = [3, 2]

[[step]]
action = "request"
process = 1
vector = [1, 1]

[[step]]
action = "grow"
vector = [1, 0]
"#,
        )
        .unwrap();

        assert_eq!(scenario.manifest.total, ResourceVector::from([4, 2]));
        assert_eq!(scenario.manifest.processes.len(), 2);
        assert_eq!(scenario.manifest.processes[1].allocated.kinds(), 0);
        assert_eq!(
            scenario.steps[0],
            Step::Request {
                process: ProcessId(1),
                vector: [1, 1].into(),
            }
        );
        assert_eq!(scenario.steps[1].describe(), "grow by [1, 0]");
    }

    #[test]
    fn test_classic_manifest_shape() {
        let manifest = PoolManifest::classic();
        assert_eq!(manifest.total.kinds(), 3);
        assert_eq!(manifest.processes.len(), 5);
        assert_eq!(Scenario::classic().steps.len(), 4);
    }
}
