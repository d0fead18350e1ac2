pub mod loader;

use itertools::Itertools;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Turns a logical asset path into something that can be joined onto a directory or a URL:
/// forward slashes only, never absolute and never above the root. `..` is resolved against the
/// preceding components and dropped once there is nothing left to go up from.
pub fn normalize_relative_path(path: &str) -> String {
    let mut components: Vec<&str> = Vec::new();
    for component in path.split(['/', '\\']) {
        match component {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            component => components.push(component),
        }
    }
    components.iter().join("/")
}

/// Writes `bytes` to `full_path` through a sibling file that is renamed into place, so that
/// `full_path` either has the complete contents or doesn't exist when this fails.
pub fn write_complete(full_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let partial_path = partial_path(full_path);
    let result = std::fs::write(&partial_path, bytes).and_then(|_| std::fs::rename(&partial_path, full_path));
    if result.is_err() {
        let _ = std::fs::remove_file(&partial_path);
    }
    result
}

fn partial_path(full_path: &Path) -> PathBuf {
    let mut path = OsString::from(full_path.as_os_str());
    path.push(".part");
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use crate::io::fs::{normalize_relative_path, write_complete};

    #[test]
    pub fn normalizes_separators_and_leading_slashes() {
        assert_eq!(normalize_relative_path("images\\bg.png"), "images/bg.png");
        assert_eq!(normalize_relative_path("/gui/main_menu.png"), "gui/main_menu.png");
        assert_eq!(normalize_relative_path("images/bg.png"), "images/bg.png");
        assert_eq!(normalize_relative_path("images//./bg.png"), "images/bg.png");
    }

    #[test]
    pub fn never_leaves_the_root() {
        assert_eq!(normalize_relative_path("../secret.png"), "secret.png");
        assert_eq!(normalize_relative_path("images/../../../etc/passwd"), "etc/passwd");
        assert_eq!(normalize_relative_path("images/old/../bg.png"), "images/bg.png");
        assert_eq!(normalize_relative_path("..\\..\\bg.png"), "bg.png");
        assert_eq!(normalize_relative_path(".."), "");
    }

    #[test]
    pub fn writes_into_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let full_path = dir.path().join("images/bg.png");

        write_complete(&full_path, b"first").unwrap();
        write_complete(&full_path, b"second").unwrap();

        assert_eq!(std::fs::read(&full_path).unwrap(), b"second");
        assert_eq!(std::fs::read_dir(dir.path().join("images")).unwrap().count(), 1);
    }

    #[test]
    pub fn failed_writes_leave_no_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should go, so it can't be put into place.
        let full_path = dir.path().join("images/bg.png");
        std::fs::create_dir_all(&full_path).unwrap();

        assert!(write_complete(&full_path, b"downloaded").is_err());

        assert!(!full_path.is_file());
        let names = std::fs::read_dir(dir.path().join("images"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["bg.png"]);
    }
}
