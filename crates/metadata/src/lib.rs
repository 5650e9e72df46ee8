//! # fexplorer Metadata Library
//!
//! This crate holds the data model shared by the explorer core and its
//! presentation layer, together with the pure functions that turn raw
//! filesystem metadata into human-readable text.
//!
//! ## Overview
//!
//! - **Entry Model**: [`DirectoryEntry`] and its owner/group [`Principal`]s
//! - **Formatting**: permission strings, size strings and timestamps
//! - **Modes**: parsing of three-digit octal permission arguments
//!
//! Nothing in this crate touches the filesystem. Entries are built by the
//! `explorer` crate from `stat` results and handed back here for display.
//!
//! ## Example Usage
//!
//! ```rust
//! use metadata::format::{format_size, permission_string};
//! use metadata::mode::parse_mode;
//!
//! assert_eq!(permission_string(0o040755), "drwxr-xr-x");
//! assert_eq!(format_size(1536), "1.50 KB");
//!
//! let mode = parse_mode("644").unwrap();
//! assert_eq!(mode, 0o644);
//! ```
//!
//! ## Modules
//!
//! - [`entry`]: Directory entry model
//! - [`format`]: Metadata formatting
//! - [`mode`]: Octal mode parsing

pub mod entry;
pub mod format;
pub mod mode;

pub use entry::{DirectoryEntry, EntryKind, Principal, SimpleListing};
pub use format::{format_size, format_time, octal_mode, permission_string, TimeFormat};
pub use mode::{parse_mode, ModeParseError, PERMISSION_MASK};
