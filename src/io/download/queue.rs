use crate::io::download::backend::TransferBackend;
use crate::io::download::error::ReloadError;
use crate::io::download::request::{ReloadRequest, ReloadTarget};
use crate::io::fs::normalize_relative_path;
use crate::rendering::image::ImageId;
use crate::rendering::render_cache::RenderCache;
use itertools::Itertools;
use log::{debug, trace, warn};
use std::path::{Path, PathBuf};

/// Downloads that have been requested because an asset was missing locally, together with what
/// to refresh once they are done. Owned by the asset system and polled once per frame, see
/// [`DownloadQueue::process_once`].
pub struct DownloadQueue {
    requests: Vec<ReloadRequest>,
    backend: TransferBackend,
    asset_root: PathBuf,
}

enum Processed {
    Reloaded,
    Skipped,
}

impl DownloadQueue {
    pub fn new(backend: TransferBackend, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            requests: Vec::new(),
            backend,
            asset_root: asset_root.into(),
        }
    }

    /// Whether missing assets can be downloaded at all. When this is false, enqueued requests fail
    /// on the next [`Self::process_once`].
    pub fn is_enabled(&self) -> bool {
        self.backend.is_enabled()
    }

    pub fn enqueue(&mut self, relative_path: impl Into<String>, target: ReloadTarget) {
        let request = ReloadRequest::new(relative_path, target, &self.backend);
        trace!("Enqueued download of {}", request.relative_path());
        self.requests.push(request);
    }

    pub fn push(&mut self, request: ReloadRequest) {
        self.requests.push(request);
    }

    /// Handles every download that has completed by now, in the order they have been enqueued.
    /// Downloads that are still running stay queued.
    ///
    /// A completed download whose file is missing (the download failed) is fatal: it is removed
    /// from the queue and the error is returned. Requests that would have been processed after it
    /// stay queued for the next call.
    pub fn process_once(&mut self, cache: &impl RenderCache) -> Result<(), ReloadError> {
        if self.requests.is_empty() {
            return Ok(());
        }

        // Decide up front, downloads finishing while we're processing wait for the next frame.
        let snapshot = std::mem::take(&mut self.requests)
            .into_iter()
            .map(|request| (request.is_complete(), request))
            .collect_vec();

        // A file is shared by every request for its path, e.g. when an image got dropped and was
        // requested again while its first download was still running.
        let requests_per_path = snapshot
            .iter()
            .map(|(_, request)| normalize_relative_path(request.relative_path()))
            .counts();

        let mut remaining = Vec::with_capacity(snapshot.len());
        let mut reloaded = 0;
        let mut result = Ok(());

        for (is_complete, request) in snapshot {
            if !is_complete || result.is_err() {
                remaining.push(request);
                continue;
            }

            let is_shared = requests_per_path
                .get(&normalize_relative_path(request.relative_path()))
                .is_some_and(|count| *count > 1);

            match self.process_request(&request, is_shared, cache) {
                Ok(Processed::Reloaded) => reloaded += 1,
                Ok(Processed::Skipped) => {}
                Err(err) => result = Err(err), // request is dropped here
            }
        }

        self.requests = remaining;

        if reloaded > 0 {
            // Scaled or otherwise derived versions of what we just reloaded are stale, but there is
            // no telling which they are.
            debug!("Reloaded {} downloaded image(s)", reloaded);
            cache.free_memory();
        }

        result
    }

    fn process_request(
        &self,
        request: &ReloadRequest,
        is_shared: bool,
        cache: &impl RenderCache,
    ) -> Result<Processed, ReloadError> {
        let id = match request.target() {
            ReloadTarget::Image(id) => *id,
            ReloadTarget::Sound(name) => {
                debug!(
                    "Downloaded {}, but reloading sounds ({}) is not supported",
                    request.relative_path(),
                    name
                );
                return Ok(Processed::Skipped);
            }
        };

        let full_path = self.full_path(request.relative_path());
        if !cache.contains(id) {
            debug!(
                "Downloaded {}, but image {} is gone in the meantime",
                request.relative_path(),
                id
            );
            if !is_shared && full_path.exists() {
                Self::remove_download(&full_path);
            }
            return Ok(Processed::Skipped);
        }

        if !full_path.exists() {
            let status_text = request.status_text();
            return Err(ReloadError::DownloadFailed {
                status_text: if status_text.is_empty() {
                    "network error".to_string()
                } else {
                    status_text
                },
                relative_path: request.relative_path().to_string(),
                full_path,
            });
        }

        self.reload(request, id, cache)?;
        Self::remove_download(&full_path);
        Ok(Processed::Reloaded)
    }

    fn reload(&self, request: &ReloadRequest, id: ImageId, cache: &impl RenderCache) -> Result<(), ReloadError> {
        trace!("Reloading {} ({})", request.relative_path(), id);
        cache
            .reload(id)
            .map_err(|source| ReloadError::Reconstruct {
                relative_path: request.relative_path().to_string(),
                source,
            })
    }

    /// The decoded data lives in the cache now, the file has served its purpose.
    fn remove_download(full_path: &Path) {
        if let Err(err) = std::fs::remove_file(full_path) {
            warn!("Failed to remove {}: {}", full_path.display(), err);
        }
    }

    pub fn full_path(&self, relative_path: &str) -> PathBuf {
        self.asset_root.join(normalize_relative_path(relative_path))
    }

    pub fn pending_paths(&self) -> Vec<&str> {
        self.requests
            .iter()
            .map(ReloadRequest::relative_path)
            .collect_vec()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
