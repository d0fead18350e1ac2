use dashmap::DashMap;
use std::sync::{Arc, Weak};

/// Deduplicates nodes by name: as long as anyone holds on to the node resolved for a name,
/// resolving that name again yields the very same `Arc`.
pub struct Resolver<G: NodeGenerator<T>, T> {
    ref_cache: DashMap<String, Weak<T>>,
    generator: G,
}

pub trait NodeGenerator<T> {
    fn generate(&self, name: &str) -> Arc<T>;
}

impl<F: Fn(&str) -> Arc<T>, T> NodeGenerator<T> for F {
    fn generate(&self, name: &str) -> Arc<T> {
        self(name)
    }
}

impl<G: NodeGenerator<T>, T> Resolver<G, T> {
    pub fn new(generator: G) -> Self {
        Self {
            ref_cache: DashMap::with_capacity(100),
            generator,
        }
    }

    pub fn resolve(&self, name: &str) -> Arc<T> {
        // Easy path: The cache contains a live weak reference
        if let Some(weak) = self.ref_cache.get(name)
            && let Some(arc) = weak.upgrade()
        {
            return arc;
        }

        // The entry guard locks the shard while generating, so a racing resolve for the same name
        // can't generate a second node.
        let mut entry = self.ref_cache.entry(name.to_string()).or_default();
        match entry.upgrade() {
            Some(arc) => arc, // maybe we have been raced
            None => {
                let arc = self.generator.generate(name);
                *entry = Arc::downgrade(&arc);
                arc
            }
        }
    }

    /// Forgets about names whose nodes have all been dropped.
    pub fn prune(&self) {
        self.ref_cache
            .retain(|_, weak| weak.strong_count() > 0);
    }

    pub fn len(&self) -> usize {
        self.ref_cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ref_cache.is_empty()
    }
}
