use crate::io::common::error::AssetError;
use crate::io::common::loader::RawAssetLoader;
use crate::io::fs::normalize_relative_path;
use log::trace;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Loads assets from a directory on the local filesystem (the "game dir"). In web deployments,
/// this directory only contains what has been bundled or downloaded so far.
pub struct FsLoader {
    asset_root: PathBuf,
}

impl FsLoader {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }
}

impl RawAssetLoader for FsLoader {
    fn load_raw_owned(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full_path = self.full_path(path);
        match std::fs::read(&full_path) {
            Ok(buf) => {
                trace!("Loaded {} ({} bytes)", path, buf.len());
                Ok(buf)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(AssetError::DownloadNeeded {
                relative_path: path.to_string(),
            }),
            Err(source) => Err(AssetError::Io {
                path: full_path,
                source,
            }),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.asset_root.join(normalize_relative_path(path))
    }
}
