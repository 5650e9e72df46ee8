//! Error types for explorer operations.
//!
//! Every failing filesystem call is classified at the call site into one
//! [`ExplorerError`] variant carrying the path it was attempted on.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use metadata::ModeParseError;
use thiserror::Error;

/// Explorer error type covering all failure modes of the public operations.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The path does not exist.
    #[error("not found: {0}")]
    NotFound(PathBuf),

    /// The path already exists.
    #[error("already exists: {0}")]
    AlreadyExists(PathBuf),

    /// The operating system refused access.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path is missing or is not a regular file.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// The path is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The directory still has entries.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(PathBuf),

    /// A permission argument was not three octal digits.
    #[error("invalid permission format: {0}")]
    InvalidFormat(#[from] ModeParseError),

    /// Rename failed because the source is missing or the target is on
    /// another device.
    #[error("cannot move {} -> {}: source missing or on another device", .from.display(), .to.display())]
    CrossDeviceOrNotFound { from: PathBuf, to: PathBuf },

    /// A name argument was empty.
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// Copy source and destination are the same file.
    #[error("source and destination are the same file: {0}")]
    SameFile(PathBuf),

    /// Any other read/write failure.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Tag identifying the kind of an [`ExplorerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    NotAFile,
    NotADirectory,
    DirectoryNotEmpty,
    InvalidFormat,
    CrossDeviceOrNotFound,
    InvalidName,
    SameFile,
    IoError,
}

impl ErrorKind {
    /// Stable label used when rendering errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::PermissionDenied => "PermissionDenied",
            Self::NotAFile => "NotAFile",
            Self::NotADirectory => "NotADirectory",
            Self::DirectoryNotEmpty => "DirectoryNotEmpty",
            Self::InvalidFormat => "InvalidFormat",
            Self::CrossDeviceOrNotFound => "CrossDeviceOrNotFound",
            Self::InvalidName => "InvalidName",
            Self::SameFile => "SameFile",
            Self::IoError => "IoError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExplorerError {
    /// The kind tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::NotAFile(_) => ErrorKind::NotAFile,
            Self::NotADirectory(_) => ErrorKind::NotADirectory,
            Self::DirectoryNotEmpty(_) => ErrorKind::DirectoryNotEmpty,
            Self::InvalidFormat(_) => ErrorKind::InvalidFormat,
            Self::CrossDeviceOrNotFound { .. } => ErrorKind::CrossDeviceOrNotFound,
            Self::InvalidName(_) => ErrorKind::InvalidName,
            Self::SameFile(_) => ErrorKind::SameFile,
            Self::Io { .. } => ErrorKind::IoError,
        }
    }

    /// Classify an io error raised while operating on `path`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            io::ErrorKind::NotADirectory => Self::NotADirectory(path),
            io::ErrorKind::DirectoryNotEmpty => Self::DirectoryNotEmpty(path),
            _ => Self::Io { path, source: err },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_classification() {
        let path = Path::new("/tmp/x");

        let err = ExplorerError::from_io(io::Error::from(io::ErrorKind::NotFound), path);
        assert!(matches!(err, ExplorerError::NotFound(_)));

        let err = ExplorerError::from_io(io::Error::from(io::ErrorKind::AlreadyExists), path);
        assert!(matches!(err, ExplorerError::AlreadyExists(_)));

        let err = ExplorerError::from_io(io::Error::from(io::ErrorKind::PermissionDenied), path);
        assert!(matches!(err, ExplorerError::PermissionDenied(_)));

        let err = ExplorerError::from_io(io::Error::from(io::ErrorKind::DirectoryNotEmpty), path);
        assert!(matches!(err, ExplorerError::DirectoryNotEmpty(_)));

        let err = ExplorerError::from_io(io::Error::from(io::ErrorKind::UnexpectedEof), path);
        assert_eq!(err.kind(), ErrorKind::IoError);
    }

    #[test]
    fn test_from_io_keeps_path() {
        let err = ExplorerError::from_io(
            io::Error::from(io::ErrorKind::NotFound),
            Path::new("/data/missing.txt"),
        );
        assert_eq!(err.to_string(), "not found: /data/missing.txt");
    }

    #[test]
    fn test_invalid_format_from_mode_error() {
        let err: ExplorerError = ModeParseError::InvalidDigit('9').into();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert_eq!(
            err.to_string(),
            "invalid permission format: invalid octal digit '9' (use 0-7)"
        );
    }

    #[test]
    fn test_cross_device_display() {
        let err = ExplorerError::CrossDeviceOrNotFound {
            from: PathBuf::from("/a"),
            to: PathBuf::from("/b"),
        };
        assert_eq!(
            err.to_string(),
            "cannot move /a -> /b: source missing or on another device"
        );
        assert_eq!(err.kind().to_string(), "CrossDeviceOrNotFound");
    }
}
