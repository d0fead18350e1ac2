use crate::io::common::error::AssetError;
use std::path::PathBuf;

pub trait RawAssetLoader {
    /// Reads the whole asset into memory. A file that is absent locally yields
    /// [`AssetError::DownloadNeeded`], so that the caller can fetch it on demand.
    fn load_raw_owned(&self, path: &str) -> Result<Vec<u8>, AssetError>;

    /// The local file a transfer for `path` writes to and that loading reads from.
    fn full_path(&self, path: &str) -> PathBuf;
}
