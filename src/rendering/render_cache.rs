use crate::io::common::error::AssetError;
use crate::rendering::image::ImageId;

/// What the download queue needs from the render cache to hot swap freshly downloaded images.
pub trait RenderCache {
    /// Whether the image is still alive, i.e. there is something to refresh.
    fn contains(&self, id: ImageId) -> bool;

    /// Evicts the cached texture of `id` and synchronously rebuilds it from the local file.
    fn reload(&self, id: ImageId) -> Result<(), AssetError>;

    /// Coarse invalidation of everything derived from cached textures.
    fn free_memory(&self);
}
