use crate::io::download::backend::TransferBackend;
use crate::io::download::transfer::Transfer;
use crate::rendering::image::ImageId;
use std::fmt::{Debug, Formatter};

/// What a finished download should refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadTarget {
    Image(ImageId),
    /// Sounds can be downloaded, but nothing is reloaded for them yet: the audio side has no
    /// notion of swapping the data of a playing sound.
    Sound(String),
}

pub struct ReloadRequest {
    relative_path: String,
    target: ReloadTarget,
    transfer: Box<dyn Transfer>,
}

impl ReloadRequest {
    /// Starts the download right away.
    pub fn new(relative_path: impl Into<String>, target: ReloadTarget, backend: &TransferBackend) -> Self {
        let relative_path = relative_path.into();
        let transfer = backend.start(&relative_path);
        Self::with_transfer(relative_path, target, transfer)
    }

    /// For transfers that have been started elsewhere.
    pub fn with_transfer(relative_path: impl Into<String>, target: ReloadTarget, transfer: Box<dyn Transfer>) -> Self {
        Self {
            relative_path: relative_path.into(),
            target,
            transfer,
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.transfer.is_done()
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn target(&self) -> &ReloadTarget {
        &self.target
    }

    pub fn status_text(&self) -> String {
        self.transfer.status_text()
    }
}

impl Debug for ReloadRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadRequest")
            .field("relative_path", &self.relative_path)
            .field("target", &self.target)
            .field("ready_state", &self.transfer.ready_state())
            .finish()
    }
}
