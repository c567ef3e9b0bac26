use std::process::Stdio;

use tokio::process::Command;

use super::{ImageInspector, InspectorError};
use crate::container_specs::Config;
use crate::image_reference::ImageReference;

pub const DEFAULT_SKOPEO_BINARY: &str = "skopeo";
pub const DEFAULT_OVERRIDE_OS: &str = "linux";

/// Runs `skopeo --override-os <os> inspect --config <reference>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkopeoInspector {
    pub binary: String,
    pub override_os: String,
}

impl Default for SkopeoInspector {
    fn default() -> Self {
        Self {
            binary: DEFAULT_SKOPEO_BINARY.to_string(),
            override_os: DEFAULT_OVERRIDE_OS.to_string(),
        }
    }
}

impl SkopeoInspector {
    pub fn new(binary: impl Into<String>, override_os: impl Into<String>) -> SkopeoInspector {
        SkopeoInspector {
            binary: binary.into(),
            override_os: override_os.into(),
        }
    }

    fn args<'a>(&'a self, reference: &'a ImageReference) -> [&'a str; 5] {
        [
            "--override-os",
            self.override_os.as_str(),
            "inspect",
            "--config",
            reference.as_str(),
        ]
    }
}

#[async_trait::async_trait]
impl ImageInspector for SkopeoInspector {
    fn name(&self) -> &str {
        "skopeo"
    }

    async fn inspect_config(&self, reference: &ImageReference) -> Result<Config, InspectorError> {
        tracing::debug!(
            "Running {} {}",
            self.binary,
            self.args(reference).join(" ")
        );

        let output = Command::new(&self.binary)
            .args(self.args(reference))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| InspectorError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InspectorError::Failed {
                reference: reference.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let invalid = |reason: String| InspectorError::InvalidConfig {
            reference: reference.to_string(),
            reason,
        };

        let stdout = std::str::from_utf8(&output.stdout).map_err(|e| invalid(e.to_string()))?;
        let config = Config::parse_str(stdout.trim()).map_err(|e| invalid(e.to_string()))?;
        config.layers().map_err(|e| invalid(e.to_string()))?;

        tracing::debug!(
            "Inspected {}: {} layers",
            reference,
            config.layers().map(|l| l.len()).unwrap_or_default()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let inspector = SkopeoInspector::default();
        let reference = ImageReference::new("alpine:3.18");
        assert_eq!(
            inspector.args(&reference),
            [
                "--override-os",
                "linux",
                "inspect",
                "--config",
                "docker://docker.io/library/alpine:3.18"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_spawn_error() {
        let inspector = SkopeoInspector::new("/nonexistent/path/to/skopeo", "linux");
        let err = inspector
            .inspect_config(&ImageReference::new("alpine"))
            .await
            .expect_err("Binary does not exist");
        assert!(matches!(err, InspectorError::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
