//! Filesystem layer of the explorer.
//!
//! This module provides the building blocks the [`Explorer`](crate::Explorer)
//! composes:
//! - Name resolution against the cursor
//! - Directory listing and recursive substring search
//! - Create/delete/copy/move/chmod primitives

pub mod operations;
pub mod resolver;
pub mod scanner;

pub use operations::{ExistingFilePolicy, FileOperations, DEFAULT_COPY_BUFFER_SIZE};
pub use resolver::{resolve, resolve_name};
pub use scanner::{DirectoryScanner, Listing, SkippedEntry};
