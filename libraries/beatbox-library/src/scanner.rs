//! Directory walking for audio files

use crate::{LibraryError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Supported audio file extensions
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "wav", "aac", "m4a", "opus"];

/// Finds audio files below a directory
#[derive(Debug, Clone, Default)]
pub struct FileScanner {
    /// Whether to follow symbolic links
    follow_links: bool,
}

impl FileScanner {
    /// Create a new file scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Recursively collect audio files under `root`
    ///
    /// Unreadable entries below the root are skipped with a warning; only a
    /// failure on `root` itself is an error.
    ///
    /// # Errors
    /// - `DirectoryNotFound` if `root` does not exist
    /// - `NotADirectory` if `root` is a file
    /// - `PermissionDenied` if `root` cannot be listed
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(LibraryError::DirectoryNotFound(root.display().to_string()));
        }
        if !root.is_dir() {
            return Err(LibraryError::NotADirectory(root.display().to_string()));
        }

        let mut audio_files = Vec::new();

        for entry in WalkDir::new(root).follow_links(self.follow_links) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(LibraryError::from_walk(root, &e)),
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            if is_audio_file(entry.path()) {
                audio_files.push(entry.into_path());
            }
        }

        debug!(
            "Found {} audio files under {}",
            audio_files.len(),
            root.display()
        );
        Ok(audio_files)
    }
}

/// Check if a file is a supported audio file
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn recognises_audio_extensions() {
        assert!(is_audio_file(Path::new("take-five.mp3")));
        assert!(is_audio_file(Path::new("TAKE-FIVE.MP3")));
        assert!(is_audio_file(Path::new("a.flac")));
        assert!(is_audio_file(Path::new("a.opus")));
        assert!(is_audio_file(Path::new("a.m4a")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("mp3")));
    }

    #[test]
    fn scans_recursively() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        fs::write(base.join("one.mp3"), b"fake mp3").unwrap();
        fs::write(base.join("notes.txt"), b"not audio").unwrap();
        let nested = base.join("album").join("disc 1");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("two.flac"), b"fake flac").unwrap();

        let files = FileScanner::new().scan_directory(base).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("one.mp3")));
        assert!(files.iter().any(|p| p.ends_with("two.flac")));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = FileScanner::new()
            .scan_directory(&temp.path().join("gone"))
            .unwrap_err();
        assert!(matches!(err, LibraryError::DirectoryNotFound(_)));
    }

    #[test]
    fn file_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("song.mp3");
        fs::write(&file, b"fake").unwrap();

        let err = FileScanner::new().scan_directory(&file).unwrap_err();
        assert!(matches!(err, LibraryError::NotADirectory(_)));
    }

    /// Lock `dir`; `None` when the process can read it anyway (root)
    #[cfg(unix)]
    fn lock(dir: &Path) -> Option<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(dir).is_ok() {
            unlock(dir);
            return None;
        }
        Some(())
    }

    #[cfg(unix)]
    fn unlock(dir: &Path) {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_root_is_permission_denied() {
        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("one.mp3"), b"fake").unwrap();
        if lock(&locked).is_none() {
            return;
        }

        let result = FileScanner::new().scan_directory(&locked);
        unlock(&locked);

        let err = result.unwrap_err();
        assert!(matches!(err, LibraryError::PermissionDenied(_)), "got {err:?}");
        assert!(matches!(
            beatbox_core::BeatboxError::from(err),
            beatbox_core::BeatboxError::PermissionDenied(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("one.mp3"), b"fake").unwrap();
        let locked = temp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("two.mp3"), b"fake").unwrap();
        if lock(&locked).is_none() {
            return;
        }

        let result = FileScanner::new().scan_directory(temp.path());
        unlock(&locked);

        let files = result.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("one.mp3"));
    }
}
