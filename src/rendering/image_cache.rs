use crate::io::common::error::AssetError;
use crate::io::common::loader::RawAssetLoader;
use crate::rendering::derived_cache::DerivedCache;
use crate::rendering::image::{Image, ImageId};
use crate::rendering::render_cache::RenderCache;
use crate::rendering::texture::Texture;
use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use log::{debug, trace};
use std::sync::{Arc, Weak};

struct CacheEntry {
    image: Weak<Image>,
    texture: ArcSwapOption<Texture>,
}

/// Maps images to their decoded textures. The entries double as the lookup table from [`ImageId`]
/// to the (weakly held) [`Image`], so ids can be handed out without keeping images alive.
pub struct ImageCache<L: RawAssetLoader> {
    loader: Arc<L>,
    entries: DashMap<ImageId, CacheEntry>,
    derived: DerivedCache,
}

impl<L: RawAssetLoader> ImageCache<L> {
    pub fn new(loader: Arc<L>, derived_capacity: usize) -> Self {
        Self {
            loader,
            entries: DashMap::with_capacity(100),
            derived: DerivedCache::new(derived_capacity),
        }
    }

    pub fn register(&self, image: &Arc<Image>) {
        self.entries.entry(image.id()).or_insert_with(|| CacheEntry {
            image: Arc::downgrade(image),
            texture: ArcSwapOption::empty(),
        });
    }

    pub fn image(&self, id: ImageId) -> Option<Arc<Image>> {
        self.entries.get(&id).and_then(|entry| entry.image.upgrade())
    }

    /// Returns the texture of `image`, loading it on the first access.
    pub fn get(&self, image: &Arc<Image>) -> Result<Arc<Texture>, AssetError> {
        self.register(image);

        {
            let entry = self.entries.get(&image.id()).ok_or(AssetError::UnknownImage(image.id()))?;
            if let Some(texture) = entry.texture.load_full() {
                return Ok(texture);
            }
        }

        let entry = self
            .entries
            .get_mut(&image.id())
            .ok_or(AssetError::UnknownImage(image.id()))?;

        // maybe we have been raced
        if let Some(texture) = entry.texture.load_full() {
            return Ok(texture);
        }

        let texture = self.load_texture(image)?;
        entry.texture.store(Some(texture.clone()));
        Ok(texture)
    }

    /// A scaled version of the texture of `image`, which is kept until the next [`Self::free_memory`].
    pub fn get_scaled(&self, image: &Arc<Image>, width: u32, height: u32) -> Result<Arc<Texture>, AssetError> {
        self.derived
            .get_or_derive((image.id(), width, height), || {
                self.get(image).map(|texture| texture.scaled(width, height))
            })
    }

    /// Stores the placeholder as the texture of `image`, so that rendering continues while the
    /// actual file is downloaded.
    pub fn insert_placeholder(&self, image: &Arc<Image>) -> Arc<Texture> {
        self.register(image);

        let placeholder = Arc::new(Texture::placeholder());
        if let Some(entry) = self.entries.get(&image.id()) {
            entry.texture.store(Some(placeholder.clone()));
        }
        placeholder
    }

    /// Forgets about images that have been dropped in the meantime.
    pub fn prune(&self) {
        self.entries
            .retain(|_, entry| entry.image.strong_count() > 0);
    }

    pub fn derived(&self) -> &DerivedCache {
        &self.derived
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn load_texture(&self, image: &Image) -> Result<Arc<Texture>, AssetError> {
        let buf = self.loader.load_raw_owned(image.relative_path())?;
        let texture = Texture::decode(image.relative_path(), &buf)?;
        trace!(
            "Decoded {} ({}x{})",
            image.relative_path(),
            texture.width,
            texture.height
        );
        Ok(Arc::new(texture))
    }
}

impl<L: RawAssetLoader> RenderCache for ImageCache<L> {
    fn contains(&self, id: ImageId) -> bool {
        self.image(id).is_some()
    }

    fn reload(&self, id: ImageId) -> Result<(), AssetError> {
        // Holding the entry exclusively while rebuilding, so rendering can't observe (or race) the
        // evicted state.
        let entry = self.entries.get_mut(&id).ok_or(AssetError::UnknownImage(id))?;
        let image = entry.image.upgrade().ok_or(AssetError::UnknownImage(id))?;

        entry.texture.store(None);
        let texture = self.load_texture(&image)?;
        entry.texture.store(Some(texture));
        debug!("Reloaded {} ({})", image.relative_path(), id);
        Ok(())
    }

    fn free_memory(&self) {
        self.derived.free_memory();
    }
}
