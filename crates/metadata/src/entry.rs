//! Directory entry model.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{self, TimeFormat};

/// Type of a directory entry, as reported by `stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Other (device, socket, fifo).
    Other,
}

impl EntryKind {
    /// Human-readable label used by the info view.
    pub fn label(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Directory => "Directory",
            Self::Other => "Other",
        }
    }
}

/// A numeric owner or group id with its resolved name, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Numeric uid or gid.
    pub id: u32,
    /// Name from the user/group database.
    pub name: Option<String>,
}

impl Principal {
    pub fn new(id: u32, name: Option<String>) -> Self {
        Self { id, name }
    }

    /// The resolved name, or the numeric id when the database has no entry.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// A directory entry with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Full path the entry was read from.
    pub path: PathBuf,
    /// Entry type.
    pub kind: EntryKind,
    /// Size in bytes (only meaningful for files).
    pub size: u64,
    /// Raw `st_mode`, including the file type bits.
    pub mode: u32,
    /// Owning user.
    pub owner: Principal,
    /// Owning group.
    pub group: Principal,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Last access time.
    pub accessed: DateTime<Utc>,
    /// Last status change time.
    pub changed: DateTime<Utc>,
}

impl DirectoryEntry {
    /// Whether this entry is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// Permission string such as `drwxr-xr-x`.
    pub fn permissions(&self) -> String {
        format::permission_string(self.mode)
    }

    /// Permission bits as three octal digits, e.g. `755`.
    pub fn octal_permissions(&self) -> String {
        format::octal_mode(self.mode)
    }

    /// Size column for listings: `<DIR>` for directories, otherwise a
    /// human-readable size.
    pub fn size_column(&self) -> String {
        if self.is_dir() {
            "<DIR>".to_string()
        } else {
            format::format_size(self.size)
        }
    }

    /// Modification time as shown in detailed listings.
    pub fn modified_short(&self) -> String {
        format::format_time(&self.modified, TimeFormat::Minutes)
    }
}

/// Names of the direct children of a directory, bucketed by type.
///
/// Both buckets are sorted lexicographically by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleListing {
    /// Sub-directory names.
    pub directories: Vec<String>,
    /// Names of everything that is not a directory.
    pub files: Vec<String>,
}

impl SimpleListing {
    /// Bucket entries by type and sort each bucket.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a DirectoryEntry>,
    {
        let mut listing = Self::default();
        for entry in entries {
            if entry.is_dir() {
                listing.directories.push(entry.name.clone());
            } else {
                listing.files.push(entry.name.clone());
            }
        }
        listing.directories.sort();
        listing.files.sort();
        listing
    }

    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, kind: EntryKind, mode: u32, size: u64) -> DirectoryEntry {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        DirectoryEntry {
            name: name.to_string(),
            path: PathBuf::from("/test").join(name),
            kind,
            size,
            mode,
            owner: Principal::new(1000, Some("alice".to_string())),
            group: Principal::new(1000, None),
            modified: ts,
            accessed: ts,
            changed: ts,
        }
    }

    #[test]
    fn test_simple_listing_buckets_and_sorts() {
        let entries = vec![
            entry("zebra.txt", EntryKind::File, 0o100644, 1),
            entry("beta", EntryKind::Directory, 0o040755, 0),
            entry("apple.txt", EntryKind::File, 0o100644, 1),
            entry("alpha", EntryKind::Directory, 0o040755, 0),
        ];

        let listing = SimpleListing::from_entries(&entries);

        assert_eq!(listing.directories, vec!["alpha", "beta"]);
        assert_eq!(listing.files, vec!["apple.txt", "zebra.txt"]);
        assert_eq!(listing.len(), 4);
    }

    #[test]
    fn test_simple_listing_sort_is_bytewise() {
        let entries = vec![
            entry("b", EntryKind::File, 0o100644, 0),
            entry("B", EntryKind::File, 0o100644, 0),
            entry("a", EntryKind::File, 0o100644, 0),
        ];

        let listing = SimpleListing::from_entries(&entries);
        assert_eq!(listing.files, vec!["B", "a", "b"]);
    }

    #[test]
    fn test_size_column() {
        assert_eq!(entry("d", EntryKind::Directory, 0o040755, 4096).size_column(), "<DIR>");
        assert_eq!(entry("f", EntryKind::File, 0o100644, 2048).size_column(), "2.00 KB");
    }

    #[test]
    fn test_principal_display_name() {
        assert_eq!(Principal::new(0, Some("root".to_string())).display_name(), "root");
        assert_eq!(Principal::new(4242, None).display_name(), "4242");
    }

    #[test]
    fn test_entry_permissions() {
        let e = entry("run.sh", EntryKind::File, 0o100755, 10);
        assert_eq!(e.permissions(), "-rwxr-xr-x");
        assert_eq!(e.octal_permissions(), "755");
    }

    #[test]
    fn test_entry_serializes_kind_lowercase() {
        let e = entry("docs", EntryKind::Directory, 0o040755, 0);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "directory");
        assert_eq!(json["owner"]["name"], "alice");
        assert!(json["group"]["name"].is_null());
    }
}
