use tokio::sync::OnceCell;

use crate::container_specs::Config;
use crate::image_reference::ImageReference;
use crate::inspector::{ImageInspector, InspectorError};

/// An image whose config is fetched on first use and then kept.
pub struct Container<'a, I: ?Sized> {
    image: ImageReference,
    inspector: &'a I,
    config: OnceCell<Config>,
}

impl<'a, I> Container<'a, I>
where
    I: ImageInspector + ?Sized,
{
    pub fn new(image: impl AsRef<str>, inspector: &'a I) -> Container<'a, I> {
        Container {
            image: ImageReference::new(image),
            inspector,
            config: OnceCell::new(),
        }
    }

    pub fn image(&self) -> &ImageReference {
        &self.image
    }

    pub async fn config(&self) -> Result<&Config, InspectorError> {
        self.config
            .get_or_try_init(|| async {
                tracing::debug!(
                    "Fetching config for {} via {}",
                    self.image,
                    self.inspector.name()
                );
                self.inspector.inspect_config(&self.image).await
            })
            .await
    }

    pub async fn layers(&self) -> Result<&[String], InspectorError> {
        let config = self.config().await?;
        config
            .layers()
            .map_err(|e| InspectorError::InvalidConfig {
                reference: self.image.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::inspector::StaticInspector;

    struct CountingInspector {
        inner: StaticInspector,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ImageInspector for CountingInspector {
        fn name(&self) -> &str {
            "counting"
        }

        async fn inspect_config(
            &self,
            reference: &ImageReference,
        ) -> Result<Config, InspectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.inspect_config(reference).await
        }
    }

    #[tokio::test]
    async fn test_config_is_fetched_once() {
        let inspector = CountingInspector {
            inner: StaticInspector::new().with_layers("alpine", ["sha256:a", "sha256:b"]),
            calls: AtomicUsize::new(0),
        };
        let container = Container::new("alpine", &inspector);
        assert_eq!(
            container.image().as_str(),
            "docker://docker.io/library/alpine"
        );

        assert_eq!(container.layers().await.unwrap().len(), 2);
        assert_eq!(container.layers().await.unwrap()[0], "sha256:a");
        container.config().await.unwrap();
        assert_eq!(inspector.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_reported() {
        let inspector = StaticInspector::new();
        let container = Container::new("alpine", &inspector);
        assert!(matches!(
            container.layers().await,
            Err(InspectorError::UnknownReference(_))
        ));
    }

    #[tokio::test]
    async fn test_config_without_layers_is_invalid() {
        let mut inspector = StaticInspector::new();
        inspector.insert("alpine", Config::default());
        let container = Container::new("alpine", &inspector);
        assert!(matches!(
            container.layers().await,
            Err(InspectorError::InvalidConfig { .. })
        ));
    }
}
