//! Create, delete, copy, move and chmod primitives.
//!
//! Every operation takes already-resolved paths. io errors are classified
//! where they happen, so callers only ever see [`ExplorerError`] values.

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::{DirBuilderExt, MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use metadata::{parse_mode, EntryKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ExplorerError, Result};

/// Mode for new directories (subject to the process umask).
pub const DIRECTORY_MODE: u32 = 0o755;

/// Mode for new files (subject to the process umask).
pub const FILE_MODE: u32 = 0o644;

/// Default copy buffer size (4KB).
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 4096;

/// What `create_file` does when the target already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExistingFilePolicy {
    /// Open the file for writing and leave its content alone.
    #[default]
    Keep,
    /// Open the file for writing and truncate it to zero length.
    Truncate,
    /// Refuse with `AlreadyExists`.
    Fail,
}

/// Filesystem mutation primitives.
#[derive(Debug, Clone)]
pub struct FileOperations {
    /// Buffer size for sequential copies.
    copy_buffer_size: usize,
    /// Behavior of `create_file` on an existing target.
    existing_file: ExistingFilePolicy,
    /// Write copies to a temp file and rename into place.
    atomic_copy: bool,
}

impl Default for FileOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl FileOperations {
    /// Create operations with default settings.
    pub fn new() -> Self {
        Self {
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
            existing_file: ExistingFilePolicy::default(),
            atomic_copy: false,
        }
    }

    /// Set the copy buffer size. Zero is treated as one byte.
    pub fn with_copy_buffer_size(mut self, size: usize) -> Self {
        self.copy_buffer_size = size.max(1);
        self
    }

    /// Set the existing-file policy for `create_file`.
    pub fn with_existing_file_policy(mut self, policy: ExistingFilePolicy) -> Self {
        self.existing_file = policy;
        self
    }

    /// Enable or disable temp-file-and-rename copies.
    pub fn with_atomic_copy(mut self, atomic: bool) -> Self {
        self.atomic_copy = atomic;
        self
    }

    /// Create a directory with mode 0755.
    pub fn create_directory(&self, path: &Path) -> Result<()> {
        DirBuilder::new()
            .mode(DIRECTORY_MODE)
            .create(path)
            .map_err(|e| ExplorerError::from_io(e, path))?;

        info!("Created directory {:?}", path);
        Ok(())
    }

    /// Create an empty file with mode 0644.
    ///
    /// An existing file is handled according to the configured
    /// [`ExistingFilePolicy`].
    pub fn create_file(&self, path: &Path) -> Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).mode(FILE_MODE);

        match self.existing_file {
            ExistingFilePolicy::Keep => options.create(true),
            ExistingFilePolicy::Truncate => options.create(true).truncate(true),
            ExistingFilePolicy::Fail => options.create_new(true),
        };

        // the handle is closed when dropped at the end of this statement
        options
            .open(path)
            .map_err(|e| ExplorerError::from_io(e, path))?;

        info!("Created file {:?} ({:?})", path, self.existing_file);
        Ok(())
    }

    /// Delete a file, symlink or empty directory.
    ///
    /// Returns the kind of entry that was removed. Symlinks are removed
    /// themselves, never their targets.
    pub fn delete_item(&self, path: &Path) -> Result<EntryKind> {
        let metadata = fs::symlink_metadata(path).map_err(|e| ExplorerError::from_io(e, path))?;

        if metadata.is_dir() {
            fs::remove_dir(path).map_err(|e| ExplorerError::from_io(e, path))?;
            info!("Deleted directory {:?}", path);
            Ok(EntryKind::Directory)
        } else {
            fs::remove_file(path).map_err(|e| ExplorerError::from_io(e, path))?;
            info!("Deleted file {:?}", path);
            Ok(EntryKind::File)
        }
    }

    /// Copy a regular file byte for byte and apply the source's permission
    /// bits to the destination.
    ///
    /// Without atomic copies, a failure part way through leaves the
    /// destination with partial content. Returns the number of bytes
    /// copied.
    pub fn copy_file(&self, src: &Path, dest: &Path) -> Result<u64> {
        let src_metadata = match fs::metadata(src) {
            Ok(m) if m.is_file() => m,
            _ => return Err(ExplorerError::NotAFile(src.to_path_buf())),
        };

        if let Ok(dest_metadata) = fs::metadata(dest) {
            if dest_metadata.dev() == src_metadata.dev()
                && dest_metadata.ino() == src_metadata.ino()
            {
                return Err(ExplorerError::SameFile(dest.to_path_buf()));
            }
        }

        let target = if self.atomic_copy {
            temp_path_for(dest)
        } else {
            dest.to_path_buf()
        };

        let result = self
            .copy_contents(src, &target)
            .and_then(|bytes| {
                fs::set_permissions(&target, src_metadata.permissions())
                    .map_err(|e| ExplorerError::from_io(e, &target))?;
                Ok(bytes)
            })
            .and_then(|bytes| {
                if self.atomic_copy {
                    fs::rename(&target, dest).map_err(|e| ExplorerError::from_io(e, dest))?;
                }
                Ok(bytes)
            });

        match result {
            Ok(bytes) => {
                info!("Copied {:?} -> {:?} ({} bytes)", src, dest, bytes);
                Ok(bytes)
            }
            Err(e) => {
                if self.atomic_copy {
                    if let Err(cleanup) = fs::remove_file(&target) {
                        debug!("Failed to remove temp file {:?}: {}", target, cleanup);
                    }
                } else {
                    warn!("Copy to {:?} failed; destination may be incomplete", dest);
                }
                Err(e)
            }
        }
    }

    /// Rename `src` to `dest` in a single step.
    ///
    /// There is no copy-and-delete fallback for moves across devices.
    pub fn move_item(&self, src: &Path, dest: &Path) -> Result<()> {
        fs::rename(src, dest).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::CrossesDevices => {
                ExplorerError::CrossDeviceOrNotFound {
                    from: src.to_path_buf(),
                    to: dest.to_path_buf(),
                }
            }
            io::ErrorKind::PermissionDenied => ExplorerError::PermissionDenied(src.to_path_buf()),
            _ => ExplorerError::Io {
                path: src.to_path_buf(),
                source: e,
            },
        })?;

        info!("Moved {:?} -> {:?}", src, dest);
        Ok(())
    }

    /// Set the rwx bits of `path` from three octal digits.
    ///
    /// The digits are validated before the filesystem is touched. Returns
    /// the mode that was applied.
    pub fn change_permissions(&self, path: &Path, digits: &str) -> Result<u32> {
        let mode = parse_mode(digits)?;

        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| ExplorerError::from_io(e, path))?;

        info!("Changed permissions of {:?} to {:03o}", path, mode);
        Ok(mode)
    }

    fn copy_contents(&self, src: &Path, dest: &Path) -> Result<u64> {
        let mut reader = File::open(src).map_err(|e| ExplorerError::from_io(e, src))?;
        let mut writer = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(FILE_MODE)
            .open(dest)
            .map_err(|e| ExplorerError::from_io(e, dest))?;

        let mut buffer = vec![0u8; self.copy_buffer_size];
        let mut total = 0u64;

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ExplorerError::Io {
                        path: src.to_path_buf(),
                        source: e,
                    })
                }
            };

            writer
                .write_all(&buffer[..read])
                .map_err(|e| ExplorerError::Io {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
            total += read as u64;
        }

        Ok(total)
    }
}

/// Hidden sibling of `dest` used as the staging file for atomic copies.
fn temp_path_for(dest: &Path) -> PathBuf {
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "copy".to_string());
    let temp_name = format!(".{}.fexplorer-{}.tmp", file_name, std::process::id());

    match dest.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_create_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("newdir");

        FileOperations::new().create_directory(&path).unwrap();

        assert!(path.is_dir());
    }

    #[test]
    fn test_create_directory_already_exists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("newdir");
        fs::create_dir(&path).unwrap();

        let result = FileOperations::new().create_directory(&path);
        assert!(matches!(result, Err(ExplorerError::AlreadyExists(_))));
    }

    #[test]
    fn test_create_directory_missing_parent() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileOperations::new().create_directory(&temp_dir.path().join("a/b"));
        assert!(matches!(result, Err(ExplorerError::NotFound(_))));
    }

    #[test]
    fn test_create_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("new.txt");

        FileOperations::new().create_file(&path).unwrap();

        assert!(path.is_file());
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_create_file_keep_policy_preserves_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("existing.txt");
        fs::write(&path, "keep me").unwrap();

        FileOperations::new().create_file(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_create_file_truncate_policy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("existing.txt");
        fs::write(&path, "old content").unwrap();

        FileOperations::new()
            .with_existing_file_policy(ExistingFilePolicy::Truncate)
            .create_file(&path)
            .unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_create_file_fail_policy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("existing.txt");
        fs::write(&path, "x").unwrap();

        let result = FileOperations::new()
            .with_existing_file_policy(ExistingFilePolicy::Fail)
            .create_file(&path);

        assert!(matches!(result, Err(ExplorerError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn test_delete_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.txt");
        fs::write(&path, "bye").unwrap();

        let kind = FileOperations::new().delete_item(&path).unwrap();

        assert_eq!(kind, EntryKind::File);
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty");
        fs::create_dir(&path).unwrap();

        let kind = FileOperations::new().delete_item(&path).unwrap();

        assert_eq!(kind, EntryKind::Directory);
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_non_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("full");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner.txt"), "x").unwrap();

        let result = FileOperations::new().delete_item(&path);

        assert!(matches!(result, Err(ExplorerError::DirectoryNotEmpty(_))));
        assert!(path.join("inner.txt").exists());
    }

    #[test]
    fn test_delete_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileOperations::new().delete_item(&temp_dir.path().join("nope"));
        assert!(matches!(result, Err(ExplorerError::NotFound(_))));
    }

    #[test]
    fn test_delete_symlink_keeps_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = temp_dir.path().join("link");
        symlink(&target, &link).unwrap();

        FileOperations::new().delete_item(&link).unwrap();

        assert!(fs::symlink_metadata(&link).is_err());
        assert!(target.is_dir());
    }

    #[test]
    fn test_copy_file_content_and_mode() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src.sh");
        let dest = temp_dir.path().join("dest.sh");
        let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&src, &content).unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();

        let bytes = FileOperations::new().copy_file(&src, &dest).unwrap();

        assert_eq!(bytes, content.len() as u64);
        assert_eq!(fs::read(&dest).unwrap(), content);
        assert_eq!(mode_of(&dest), 0o750);
        assert_eq!(fs::read(&src).unwrap(), content);
    }

    #[test]
    fn test_copy_file_small_buffer() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("a.txt");
        let dest = temp_dir.path().join("b.txt");
        fs::write(&src, "spans several reads").unwrap();

        FileOperations::new()
            .with_copy_buffer_size(3)
            .copy_file(&src, &dest)
            .unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "spans several reads");
    }

    #[test]
    fn test_copy_file_overwrites_destination() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("a.txt");
        let dest = temp_dir.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dest, "much longer old content").unwrap();

        FileOperations::new().copy_file(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_copy_file_atomic() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("a.txt");
        let dest = temp_dir.path().join("b.txt");
        fs::write(&src, "atomic").unwrap();

        FileOperations::new()
            .with_atomic_copy(true)
            .copy_file(&src, &dest)
            .unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "atomic");
        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_copy_directory_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("dir");
        fs::create_dir(&src).unwrap();

        let result = FileOperations::new().copy_file(&src, &temp_dir.path().join("copy"));
        assert!(matches!(result, Err(ExplorerError::NotAFile(_))));
    }

    #[test]
    fn test_copy_missing_is_not_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileOperations::new()
            .copy_file(&temp_dir.path().join("nope"), &temp_dir.path().join("copy"));
        assert!(matches!(result, Err(ExplorerError::NotAFile(_))));
    }

    #[test]
    fn test_copy_onto_itself() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("same.txt");
        fs::write(&src, "precious").unwrap();

        let result = FileOperations::new().copy_file(&src, &src);

        assert!(matches!(result, Err(ExplorerError::SameFile(_))));
        assert_eq!(fs::read_to_string(&src).unwrap(), "precious");
    }

    #[test]
    fn test_move_item() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("a.txt");
        let dest = temp_dir.path().join("b.txt");
        fs::write(&src, "moving").unwrap();

        FileOperations::new().move_item(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "moving");
    }

    #[test]
    fn test_move_directory() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("dir");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("inner.txt"), "x").unwrap();

        FileOperations::new()
            .move_item(&src, &temp_dir.path().join("renamed"))
            .unwrap();

        assert!(temp_dir.path().join("renamed/inner.txt").exists());
    }

    #[test]
    fn test_move_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileOperations::new()
            .move_item(&temp_dir.path().join("nope"), &temp_dir.path().join("b"));
        assert!(matches!(
            result,
            Err(ExplorerError::CrossDeviceOrNotFound { .. })
        ));
    }

    #[test]
    fn test_change_permissions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("script.sh");
        fs::write(&path, "#!/bin/sh").unwrap();

        let mode = FileOperations::new().change_permissions(&path, "755").unwrap();

        assert_eq!(mode, 0o755);
        assert_eq!(mode_of(&path), 0o755);
    }

    #[test]
    fn test_change_permissions_invalid_format_leaves_file_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file.txt");
        fs::write(&path, "x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        for bad in ["75", "7555", "789", "rwx", ""] {
            let result = FileOperations::new().change_permissions(&path, bad);
            assert!(matches!(result, Err(ExplorerError::InvalidFormat(_))), "{bad}");
        }
        assert_eq!(mode_of(&path), 0o600);
    }

    #[test]
    fn test_change_permissions_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result =
            FileOperations::new().change_permissions(&temp_dir.path().join("nope"), "644");
        assert!(matches!(result, Err(ExplorerError::NotFound(_))));
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/data/report.pdf"));
        assert_eq!(temp.parent(), Some(Path::new("/data")));
        let name = temp.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".report.pdf.fexplorer-"));
        assert!(name.ends_with(".tmp"));
    }
}
