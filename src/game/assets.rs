use crate::io::common::error::AssetError;
use crate::io::download::backend::TransferBackend;
use crate::io::download::error::ReloadError;
use crate::io::download::queue::DownloadQueue;
use crate::io::download::request::ReloadTarget;
use crate::io::fs::loader::FsLoader;
use crate::rendering::image::Image;
use crate::rendering::image_cache::ImageCache;
use crate::rendering::resolver::{NodeGenerator, Resolver};
use crate::rendering::texture::Texture;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

pub struct ImageGenerator;

impl NodeGenerator<Image> for ImageGenerator {
    fn generate(&self, name: &str) -> Arc<Image> {
        Image::new(name)
    }
}

/// Owns everything that is involved in getting an image on screen: the loader for the asset root,
/// the render cache and the queue of downloads for images that weren't there (yet).
pub struct AssetSystem {
    cache: ImageCache<FsLoader>,
    images: Resolver<ImageGenerator, Image>,
    downloads: DownloadQueue,
}

impl AssetSystem {
    pub fn new(asset_root: impl Into<PathBuf>, backend: TransferBackend, derived_capacity: usize) -> Self {
        let asset_root = asset_root.into();
        let loader = Arc::new(FsLoader::new(asset_root.clone()));
        info!(
            "Loading assets from {} (downloads {})",
            loader.asset_root().display(),
            if backend.is_enabled() { "enabled" } else { "disabled" }
        );

        Self {
            cache: ImageCache::new(loader, derived_capacity),
            images: Resolver::new(ImageGenerator),
            downloads: DownloadQueue::new(backend, asset_root),
        }
    }

    /// The image for `relative_path`, the same instance for as long as someone holds on to it.
    pub fn image(&self, relative_path: &str) -> Arc<Image> {
        let image = self.images.resolve(relative_path);
        self.cache.register(&image);
        image
    }

    /// The texture to render for `image`. When the file isn't available locally and downloads
    /// are possible, the download is started and a placeholder is returned in the meantime; the
    /// actual texture replaces it in a later [`Self::tick`].
    pub fn load_image(&mut self, image: &Arc<Image>) -> Result<Arc<Texture>, AssetError> {
        match self.cache.get(image) {
            Err(AssetError::DownloadNeeded { relative_path }) if self.downloads.is_enabled() => {
                debug!("{} is missing, downloading it", relative_path);
                self.downloads
                    .enqueue(relative_path, ReloadTarget::Image(image.id()));
                Ok(self.cache.insert_placeholder(image))
            }
            result => result,
        }
    }

    /// Once per frame. Errors are fatal and should be handed to the top level error handler.
    pub fn tick(&mut self) -> Result<(), ReloadError> {
        let result = self.downloads.process_once(&self.cache);
        if self.downloads.is_empty() {
            self.cache.prune();
            self.images.prune();
        }
        result
    }

    pub fn pending_downloads(&self) -> usize {
        self.downloads.len()
    }

    pub fn cache(&self) -> &ImageCache<FsLoader> {
        &self.cache
    }
}
