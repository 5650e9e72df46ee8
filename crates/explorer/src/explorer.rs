//! The explorer: a current-directory cursor plus the full command set.
//!
//! [`Explorer`] resolves every name argument against its cursor, delegates
//! to the [`files`](crate::files) layer and returns data or an
//! [`ExplorerError`]. It never prints and never changes the process
//! working directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use metadata::{DirectoryEntry, EntryKind, SimpleListing};
use tracing::debug;

use crate::error::{ExplorerError, Result};
use crate::files::resolver::{self, tidy};
use crate::files::{
    DirectoryScanner, ExistingFilePolicy, FileOperations, Listing, DEFAULT_COPY_BUFFER_SIZE,
};

/// Tunables for the scanner and file operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerOptions {
    /// Include dot-files in listings.
    pub show_hidden: bool,
    /// Buffer size for file copies.
    pub copy_buffer_size: usize,
    /// Copy through a temp file and rename.
    pub atomic_copy: bool,
    /// `create_file` behavior on existing targets.
    pub existing_file: ExistingFilePolicy,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            show_hidden: true,
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
            atomic_copy: false,
            existing_file: ExistingFilePolicy::default(),
        }
    }
}

/// Which mutating command produced a [`Confirmation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateDirectory,
    CreateFile,
    DeleteDirectory,
    DeleteFile,
    Copy,
    Move,
    ChangePermissions,
}

/// Success payload of a mutating command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// The command that succeeded.
    pub action: Action,
    /// Human-readable confirmation, e.g. `Directory created: docs`.
    pub message: String,
}

impl Confirmation {
    fn new(action: Action, message: String) -> Self {
        Self { action, message }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Console file explorer state.
#[derive(Debug, Clone)]
pub struct Explorer {
    /// Current directory. Always absolute.
    cursor: PathBuf,
    scanner: DirectoryScanner,
    operations: FileOperations,
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Explorer {
    /// Start at the process working directory, or `/` if it is unavailable.
    pub fn new() -> Self {
        let cursor = std::env::current_dir()
            .map(|p| tidy(&p))
            .unwrap_or_else(|_| PathBuf::from("/"));

        Self::with_cursor(cursor)
    }

    /// Start at an explicit directory.
    ///
    /// Relative paths are taken relative to the process working directory.
    /// Fails if the directory cannot be entered.
    pub fn at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut explorer = Self::new();
        let start = path.as_ref().to_string_lossy().to_string();
        explorer.change_directory(&start)?;
        Ok(explorer)
    }

    fn with_cursor(cursor: PathBuf) -> Self {
        Self {
            cursor,
            scanner: DirectoryScanner::new(),
            operations: FileOperations::new(),
        }
    }

    /// Apply scanner and file operation settings.
    pub fn with_options(mut self, options: &ExplorerOptions) -> Self {
        self.scanner = DirectoryScanner::new().show_hidden(options.show_hidden);
        self.operations = FileOperations::new()
            .with_copy_buffer_size(options.copy_buffer_size)
            .with_atomic_copy(options.atomic_copy)
            .with_existing_file_policy(options.existing_file);
        self
    }

    /// The cursor.
    pub fn current_path(&self) -> &Path {
        &self.cursor
    }

    /// Resolve a user-supplied name against the cursor.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let path = resolver::resolve_name(&self.cursor, name)?;
        debug!("Resolved {:?} -> {:?}", name, path);
        Ok(path)
    }

    /// Names in the current directory, directories and files each sorted.
    pub fn list_simple(&self) -> Result<SimpleListing> {
        let listing = self.scanner.list_immediate(&self.cursor)?;
        Ok(SimpleListing::from_entries(&listing.entries))
    }

    /// Full metadata for the current directory, in filesystem order.
    pub fn list_detailed(&self) -> Result<Listing> {
        self.scanner.list_immediate(&self.cursor)
    }

    /// Move the cursor.
    ///
    /// The target must be a directory that can be read; otherwise the
    /// cursor is left unchanged.
    pub fn change_directory(&mut self, name: &str) -> Result<&Path> {
        let target = self.resolve(name)?;

        let metadata = fs::metadata(&target).map_err(|e| ExplorerError::from_io(e, &target))?;
        if !metadata.is_dir() {
            return Err(ExplorerError::NotADirectory(target));
        }
        fs::read_dir(&target).map_err(|e| ExplorerError::from_io(e, &target))?;

        debug!("Cursor {:?} -> {:?}", self.cursor, target);
        self.cursor = target;
        Ok(&self.cursor)
    }

    pub fn create_directory(&self, name: &str) -> Result<Confirmation> {
        let path = self.resolve(name)?;
        self.operations.create_directory(&path)?;
        Ok(Confirmation::new(
            Action::CreateDirectory,
            format!("Directory created: {}", name),
        ))
    }

    pub fn create_file(&self, name: &str) -> Result<Confirmation> {
        let path = self.resolve(name)?;
        self.operations.create_file(&path)?;
        Ok(Confirmation::new(
            Action::CreateFile,
            format!("File created: {}", name),
        ))
    }

    /// Delete a file or an empty directory.
    pub fn delete_item(&self, name: &str) -> Result<Confirmation> {
        let path = self.resolve(name)?;
        let confirmation = match self.operations.delete_item(&path)? {
            EntryKind::Directory => {
                Confirmation::new(Action::DeleteDirectory, format!("Directory deleted: {}", name))
            }
            _ => Confirmation::new(Action::DeleteFile, format!("File deleted: {}", name)),
        };
        Ok(confirmation)
    }

    pub fn copy_file(&self, src: &str, dest: &str) -> Result<Confirmation> {
        let src_path = self.resolve(src)?;
        let dest_path = self.resolve(dest)?;
        self.operations.copy_file(&src_path, &dest_path)?;
        Ok(Confirmation::new(
            Action::Copy,
            format!("File copied: {} -> {}", src, dest),
        ))
    }

    pub fn move_item(&self, src: &str, dest: &str) -> Result<Confirmation> {
        let src_path = self.resolve(src)?;
        let dest_path = self.resolve(dest)?;
        self.operations.move_item(&src_path, &dest_path)?;
        Ok(Confirmation::new(
            Action::Move,
            format!("Moved/Renamed: {} -> {}", src, dest),
        ))
    }

    /// Recursive substring search below the cursor.
    pub fn search_files(&self, pattern: &str) -> Vec<PathBuf> {
        self.scanner.search_recursive(&self.cursor, pattern)
    }

    /// Set permissions from three octal digits, e.g. `"755"`.
    pub fn change_permissions(&self, name: &str, digits: &str) -> Result<Confirmation> {
        let path = self.resolve(name)?;
        self.operations.change_permissions(&path, digits)?;
        Ok(Confirmation::new(
            Action::ChangePermissions,
            format!("Permissions changed: {} -> {}", name, digits),
        ))
    }

    /// Metadata for a single entry.
    pub fn view_info(&self, name: &str) -> Result<DirectoryEntry> {
        let path = self.resolve(name)?;
        self.scanner.stat_entry(&path)
    }
}
