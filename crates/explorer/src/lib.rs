//! # fexplorer
//!
//! A console file explorer for Unix-like systems.
//!
//! ## Overview
//!
//! The [`Explorer`] keeps a current-directory cursor and offers a fixed set
//! of commands over it:
//!
//! - **Navigation**: list (simple or detailed), change directory, show path
//! - **File operations**: create, delete, copy, move/rename
//! - **Search & information**: recursive substring search, single-entry metadata
//! - **Permissions**: chmod from three octal digits
//!
//! Every name argument is resolved against the cursor, so the process
//! working directory is never changed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use explorer::Explorer;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut explorer = Explorer::at("/tmp")?;
//!     explorer.create_directory("scratch")?;
//!     explorer.change_directory("scratch")?;
//!
//!     let listing = explorer.list_simple()?;
//!     println!("{} entries", listing.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and defaults
//! - [`error`]: Error kinds returned by every operation
//! - [`explorer`]: The cursor and command set
//! - [`files`]: Name resolution, listing, search and file primitives
//! - [`ui`]: Interactive menu and text rendering

pub mod config;
pub mod error;
pub mod explorer;
pub mod files;
pub mod ui;

// Re-export metadata for convenience
pub use metadata;

pub use config::Config;
pub use error::{ErrorKind, ExplorerError, Result};
pub use explorer::{Action, Confirmation, Explorer, ExplorerOptions};
pub use files::{ExistingFilePolicy, Listing, SkippedEntry};
pub use ui::{Menu, Palette};
