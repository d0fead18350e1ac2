use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of an [`Image`]. Everything that needs to refer to an image without keeping
/// it alive (reload requests, derived renderings) uses this instead of the `Arc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        Self(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for ImageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A displayable that is backed by a file. The game holds on to these, so reloading must never
/// replace the instance, only what the render cache stores for its id.
#[derive(Debug)]
pub struct Image {
    id: ImageId,
    relative_path: String,
}

impl Image {
    pub fn new(relative_path: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: ImageId::next(),
            relative_path: relative_path.into(),
        })
    }

    #[inline]
    pub fn id(&self) -> ImageId {
        self.id
    }

    #[inline]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }
}
