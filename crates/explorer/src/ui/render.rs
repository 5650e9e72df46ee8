//! Text rendering of explorer results.
//!
//! All functions write to any [`Write`] so the menu and the one-shot CLI
//! commands share them, and tests can render into a `Vec<u8>`.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::style::{Color, Stylize};
use metadata::format::{format_size, format_time, TimeFormat};
use metadata::{DirectoryEntry, SimpleListing};

use crate::error::ExplorerError;
use crate::explorer::Confirmation;
use crate::files::Listing;

/// Width of the rules around listings.
const LISTING_WIDTH: usize = 80;

/// Width of the rules around the info view.
const INFO_WIDTH: usize = 60;

/// Optional terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A palette that never emits escape codes.
    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, text: impl Display, color: Color, bold: bool) -> String {
        let text = text.to_string();
        if !self.enabled {
            return text;
        }
        let styled = text.with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }

    pub fn heading(&self, text: impl Display) -> String {
        self.paint(text, Color::Cyan, true)
    }

    pub fn banner(&self, text: impl Display) -> String {
        self.paint(text, Color::Magenta, true)
    }

    pub fn success(&self, text: impl Display) -> String {
        self.paint(text, Color::Green, false)
    }

    pub fn failure(&self, text: impl Display) -> String {
        self.paint(text, Color::Red, false)
    }

    pub fn notice(&self, text: impl Display) -> String {
        self.paint(text, Color::Yellow, false)
    }

    pub fn directory(&self, text: impl Display) -> String {
        self.paint(text, Color::Blue, false)
    }

    /// Color an entry name by type: directories blue, user-executable files
    /// green, everything else unstyled.
    pub fn entry_name(&self, entry: &DirectoryEntry) -> String {
        if entry.is_dir() {
            self.directory(&entry.name)
        } else if entry.mode & 0o100 != 0 {
            self.success(&entry.name)
        } else {
            entry.name.clone()
        }
    }
}

fn listing_header<W: Write>(out: &mut W, palette: &Palette, cwd: &Path) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        palette.heading(format!("Current Directory: {}", cwd.display()))
    )?;
    writeln!(out, "{}", "=".repeat(LISTING_WIDTH))
}

fn skipped_note<W: Write>(out: &mut W, palette: &Palette, skipped: usize) -> io::Result<()> {
    if skipped > 0 {
        writeln!(
            out,
            "{}",
            palette.notice(format!("({} entries skipped: metadata unreadable)", skipped))
        )?;
    }
    Ok(())
}

/// Directories first, then files, each sorted by name.
pub fn render_simple<W: Write>(
    out: &mut W,
    palette: &Palette,
    cwd: &Path,
    listing: &SimpleListing,
) -> io::Result<()> {
    listing_header(out, palette, cwd)?;

    for dir in &listing.directories {
        writeln!(out, "{}", palette.directory(format!("[DIR]  {}", dir)))?;
    }
    for file in &listing.files {
        writeln!(out, "       {}", file)?;
    }

    writeln!(out, "{}", "=".repeat(LISTING_WIDTH))
}

/// One row per entry in filesystem order with full metadata columns.
pub fn render_detailed<W: Write>(
    out: &mut W,
    palette: &Palette,
    cwd: &Path,
    listing: &Listing,
) -> io::Result<()> {
    listing_header(out, palette, cwd)?;

    writeln!(
        out,
        "{:<12}{:<10}{:<10}{:<12}{:<20}Name",
        "Permissions", "Owner", "Group", "Size", "Modified"
    )?;
    writeln!(out, "{}", "-".repeat(LISTING_WIDTH))?;

    for entry in &listing.entries {
        writeln!(
            out,
            "{:<12}{:<10}{:<10}{:<12}{:<20}{}",
            entry.permissions(),
            entry.owner.display_name(),
            entry.group.display_name(),
            entry.size_column(),
            entry.modified_short(),
            palette.entry_name(entry)
        )?;
    }

    skipped_note(out, palette, listing.skipped.len())?;
    writeln!(out, "{}", "=".repeat(LISTING_WIDTH))
}

/// Full metadata of a single entry.
pub fn render_info<W: Write>(
    out: &mut W,
    palette: &Palette,
    name: &str,
    entry: &DirectoryEntry,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", palette.heading(format!("File Information: {}", name)))?;
    writeln!(out, "{}", "=".repeat(INFO_WIDTH))?;
    writeln!(out, "Type:        {}", entry.kind.label())?;
    writeln!(
        out,
        "Size:        {} ({} bytes)",
        format_size(entry.size),
        entry.size
    )?;
    writeln!(
        out,
        "Permissions: {} ({})",
        entry.permissions(),
        entry.octal_permissions()
    )?;
    writeln!(out, "Owner:       {}", entry.owner.display_name())?;
    writeln!(out, "Group:       {}", entry.group.display_name())?;
    writeln!(
        out,
        "Modified:    {}",
        format_time(&entry.modified, TimeFormat::Seconds)
    )?;
    writeln!(
        out,
        "Accessed:    {}",
        format_time(&entry.accessed, TimeFormat::Seconds)
    )?;
    writeln!(
        out,
        "Changed:     {}",
        format_time(&entry.changed, TimeFormat::Seconds)
    )?;
    writeln!(out, "{}", "=".repeat(INFO_WIDTH))
}

/// Search summary followed by one path per line.
pub fn render_search<W: Write>(
    out: &mut W,
    palette: &Palette,
    cwd: &Path,
    pattern: &str,
    results: &[PathBuf],
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        palette.notice(format!(
            "\nSearching for '{}' in {}...",
            pattern,
            cwd.display()
        ))
    )?;

    if results.is_empty() {
        return writeln!(out, "No files found matching pattern.");
    }

    writeln!(
        out,
        "{}",
        palette.success(format!("Found {} result(s):", results.len()))
    )?;
    for path in results {
        writeln!(out, "  {}", path.display())?;
    }
    Ok(())
}

pub fn render_confirmation<W: Write>(
    out: &mut W,
    palette: &Palette,
    confirmation: &Confirmation,
) -> io::Result<()> {
    writeln!(out, "{}", palette.success(confirmation))
}

/// `Error: <Kind>: <detail>`.
pub fn render_error<W: Write>(
    out: &mut W,
    palette: &Palette,
    error: &ExplorerError,
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        palette.failure(format!("Error: {}: {}", error.kind(), error))
    )
}
