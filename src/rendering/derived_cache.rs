use crate::rendering::image::ImageId;
use crate::rendering::texture::Texture;
use quick_cache::sync::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

type DerivedKey = (ImageId, u32, u32);

/// Renderings derived from cached textures, i.e. scaled versions. There is no dependency tracking
/// between a texture and what has been derived from it, so when any texture changes, the whole
/// cache has to go.
pub struct DerivedCache {
    inner: Cache<DerivedKey, Arc<Texture>>,
    purges: AtomicUsize,
}

impl DerivedCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Cache::new(capacity.max(1)),
            purges: AtomicUsize::new(0),
        }
    }

    pub fn get_or_derive<E>(
        &self,
        key: DerivedKey,
        derive: impl FnOnce() -> Result<Texture, E>,
    ) -> Result<Arc<Texture>, E> {
        if let Some(texture) = self.inner.get(&key) {
            return Ok(texture);
        }

        let texture = Arc::new(derive()?);
        self.inner.insert(key, texture.clone());
        Ok(texture)
    }

    /// Drops every derived rendering.
    pub fn free_memory(&self) {
        self.inner.clear();
        self.purges.fetch_add(1, Ordering::Relaxed);
    }

    /// How often [`Self::free_memory`] has been called.
    pub fn purge_count(&self) -> usize {
        self.purges.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
