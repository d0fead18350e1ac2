//! Fetching assets that are missing locally and hot swapping them into the render cache.
//!
//! Loaders report a missing file as [`crate::io::common::error::AssetError::DownloadNeeded`].
//! The asset system then enqueues a [`request::ReloadRequest`] that starts the [`transfer::Transfer`]
//! right away and remembers which image to refresh. Once per frame, [`queue::DownloadQueue`] is
//! polled and rebuilds the cache entries of everything that has arrived by then.
pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod disabled;
pub mod error;
pub mod queue;
pub mod request;
#[cfg(not(target_arch = "wasm32"))]
pub mod threaded;
pub mod transfer;
