//! Directory listing and recursive substring search.
//!
//! Listings stat every child (following symlinks, like `stat(2)`) and
//! resolve owner/group names through the system user database. Search
//! walks the tree depth-first without following symlinks.

use std::collections::HashMap;
use std::fs::{self, Metadata};
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use metadata::{DirectoryEntry, EntryKind, Principal};
use nix::unistd::{Gid, Group, Uid, User};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ExplorerError, Result};

/// A child that was present in the directory but could not be stat'ed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// Entry name.
    pub name: String,
    /// Why its metadata could not be read.
    pub reason: String,
}

/// Direct children of a directory, in filesystem order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Listing {
    /// Children whose metadata was read.
    pub entries: Vec<DirectoryEntry>,
    /// Children whose metadata could not be read.
    pub skipped: Vec<SkippedEntry>,
}

/// Per-call cache of uid/gid to name lookups.
#[derive(Default)]
struct PrincipalCache {
    users: HashMap<u32, Option<String>>,
    groups: HashMap<u32, Option<String>>,
}

impl PrincipalCache {
    fn owner(&mut self, uid: u32) -> Principal {
        let name = self
            .users
            .entry(uid)
            .or_insert_with(|| {
                User::from_uid(Uid::from_raw(uid))
                    .ok()
                    .flatten()
                    .map(|u| u.name)
            })
            .clone();
        Principal::new(uid, name)
    }

    fn group(&mut self, gid: u32) -> Principal {
        let name = self
            .groups
            .entry(gid)
            .or_insert_with(|| {
                Group::from_gid(Gid::from_raw(gid))
                    .ok()
                    .flatten()
                    .map(|g| g.name)
            })
            .clone();
        Principal::new(gid, name)
    }
}

/// Directory scanner for listings and search.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    /// Whether listings include names starting with '.'.
    show_hidden: bool,
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryScanner {
    /// Create a scanner that lists hidden entries.
    pub fn new() -> Self {
        Self { show_hidden: true }
    }

    /// Set whether listings include hidden entries.
    ///
    /// Search is not affected: it always visits hidden entries.
    pub fn show_hidden(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }

    /// List the direct children of `path`.
    ///
    /// `.` and `..` are never part of the result. Children that cannot be
    /// stat'ed end up in [`Listing::skipped`] instead of `entries`.
    pub fn list_immediate(&self, path: &Path) -> Result<Listing> {
        let read_dir = fs::read_dir(path).map_err(|e| ExplorerError::from_io(e, path))?;

        let mut cache = PrincipalCache::default();
        let mut listing = Listing::default();

        for entry_result in read_dir {
            let entry = match entry_result {
                Ok(e) => e,
                Err(e) => {
                    warn!("Failed to read entry in {:?}: {}", path, e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }

            let entry_path = entry.path();
            match fs::metadata(&entry_path) {
                Ok(metadata) => {
                    listing
                        .entries
                        .push(build_entry(name, entry_path, &metadata, &mut cache));
                }
                Err(e) => {
                    warn!("Skipping {:?}: cannot stat: {}", entry_path, e);
                    listing.skipped.push(SkippedEntry {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            "Listed {:?}: {} entries, {} skipped",
            path,
            listing.entries.len(),
            listing.skipped.len()
        );

        Ok(listing)
    }

    /// Metadata for a single path.
    pub fn stat_entry(&self, path: &Path) -> Result<DirectoryEntry> {
        let metadata = fs::metadata(path).map_err(|e| ExplorerError::from_io(e, path))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "/".to_string());

        Ok(build_entry(
            name,
            path.to_path_buf(),
            &metadata,
            &mut PrincipalCache::default(),
        ))
    }

    /// Recursively collect every path under `root` whose name contains
    /// `pattern`.
    ///
    /// Matching is a case-sensitive substring test on the entry name.
    /// Results are in depth-first pre-order: a matching child is recorded
    /// before the traversal descends into it. Directories that cannot be
    /// opened are skipped.
    pub fn search_recursive(&self, root: &Path, pattern: &str) -> Vec<PathBuf> {
        let mut results = Vec::new();
        search_into(root, pattern, &mut results);
        results
    }
}

fn search_into(dir: &Path, pattern: &str, results: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Pruning {:?} from search: {}", dir, e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if entry.file_name().to_string_lossy().contains(pattern) {
            results.push(path.clone());
        }

        // file_type() uses the d_type hint and falls back to lstat, so
        // symlinked directories are never descended into.
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            search_into(&path, pattern, results);
        }
    }
}

fn build_entry(
    name: String,
    path: PathBuf,
    metadata: &Metadata,
    cache: &mut PrincipalCache,
) -> DirectoryEntry {
    let kind = if metadata.is_dir() {
        EntryKind::Directory
    } else if metadata.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };

    DirectoryEntry {
        name,
        path,
        kind,
        size: metadata.len(),
        mode: metadata.mode(),
        owner: cache.owner(metadata.uid()),
        group: cache.group(metadata.gid()),
        modified: timestamp(metadata.mtime(), metadata.mtime_nsec()),
        accessed: timestamp(metadata.atime(), metadata.atime_nsec()),
        changed: timestamp(metadata.ctime(), metadata.ctime_nsec()),
    }
}

fn timestamp(secs: i64, nsecs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, nsecs.clamp(0, 999_999_999) as u32).unwrap_or_default()
}
