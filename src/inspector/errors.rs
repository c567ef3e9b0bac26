use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("Unable to launch image inspector {binary:?}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Inspecting {reference} failed with exit status {code:?}:\n{stderr}")]
    Failed {
        reference: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Inspector returned an unusable config for {reference}: {reason}")]
    InvalidConfig { reference: String, reason: String },

    #[error("No image config registered for {0}")]
    UnknownReference(String),
}

impl InspectorError {
    /// Status this process should exit with after the failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            InspectorError::Failed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Text for the CI error annotation.
    pub fn diagnostic(&self) -> String {
        match self {
            InspectorError::Failed { stderr, .. } => stderr.trim_end().to_string(),
            other => other.to_string(),
        }
    }
}
