mod errors;
pub mod skopeo;
pub mod static_inspector;

pub use errors::InspectorError;
pub use skopeo::SkopeoInspector;
pub use static_inspector::StaticInspector;

use crate::container_specs::Config;
use crate::image_reference::ImageReference;

/// Source of image configs for normalized references.
#[async_trait::async_trait]
pub trait ImageInspector: Send + Sync {
    fn name(&self) -> &str;

    async fn inspect_config(&self, reference: &ImageReference) -> Result<Config, InspectorError>;
}
