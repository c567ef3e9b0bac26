use std::collections::HashMap;

use super::{ImageInspector, InspectorError};
use crate::container_specs::Config;
use crate::image_reference::ImageReference;

/// Serves configs from memory, keyed by normalized reference.
#[derive(Debug, Default, Clone)]
pub struct StaticInspector {
    configs: HashMap<ImageReference, Config>,
}

impl StaticInspector {
    pub fn new() -> StaticInspector {
        Default::default()
    }

    pub fn with_layers<I, S>(mut self, reference: impl AsRef<str>, layers: I) -> StaticInspector
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(reference, Config::with_layers(layers));
        self
    }

    pub fn insert(&mut self, reference: impl AsRef<str>, config: Config) {
        self.configs.insert(ImageReference::new(reference), config);
    }
}

#[async_trait::async_trait]
impl ImageInspector for StaticInspector {
    fn name(&self) -> &str {
        "static"
    }

    async fn inspect_config(&self, reference: &ImageReference) -> Result<Config, InspectorError> {
        self.configs
            .get(reference)
            .cloned()
            .ok_or_else(|| InspectorError::UnknownReference(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_uses_normalized_reference() {
        let inspector = StaticInspector::new().with_layers("alpine:3.18", ["sha256:bbb"]);

        let cfg = inspector
            .inspect_config(&ImageReference::new("docker.io/library/alpine:3.18"))
            .await
            .expect("docker.io/library/alpine:3.18 normalizes to the same reference");
        assert_eq!(cfg.layers().unwrap(), &["sha256:bbb".to_string()]);

        let err = inspector
            .inspect_config(&ImageReference::new("alpine:3.19"))
            .await
            .unwrap_err();
        assert!(matches!(err, InspectorError::UnknownReference(_)));
    }
}
