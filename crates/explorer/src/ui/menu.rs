//! Numbered interactive menu driving an [`Explorer`].
//!
//! The menu reads one line per prompt from any [`BufRead`] and writes to
//! any [`Write`], so a script of answers can drive it in tests. End of
//! input ends the session like choosing `0`.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::debug;

use super::render::{self, Palette};
use crate::error::ExplorerError;
use crate::explorer::{Confirmation, Explorer};

/// Menu entries, numbered as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    ListSimple,
    ListDetailed,
    ChangeDirectory,
    ShowCurrentPath,
    CreateDirectory,
    CreateFile,
    Delete,
    Copy,
    Move,
    Search,
    ViewInfo,
    ChangePermissions,
}

impl MenuChoice {
    /// Parse the number typed at the choice prompt.
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim().parse::<u32>().ok()? {
            0 => Self::Exit,
            1 => Self::ListSimple,
            2 => Self::ListDetailed,
            3 => Self::ChangeDirectory,
            4 => Self::ShowCurrentPath,
            5 => Self::CreateDirectory,
            6 => Self::CreateFile,
            7 => Self::Delete,
            8 => Self::Copy,
            9 => Self::Move,
            10 => Self::Search,
            11 => Self::ViewInfo,
            12 => Self::ChangePermissions,
            _ => return None,
        };
        Some(choice)
    }
}

/// Interactive session over an explorer.
pub struct Menu<R, W> {
    explorer: Explorer,
    input: R,
    output: W,
    palette: Palette,
    /// Wait for Enter after each command.
    pause: bool,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(explorer: Explorer, input: R, output: W, palette: Palette) -> Self {
        Self {
            explorer,
            input,
            output,
            palette,
            pause: false,
        }
    }

    /// Set whether to wait for Enter after each command.
    pub fn pause_after_command(mut self, pause: bool) -> Self {
        self.pause = pause;
        self
    }

    /// Consume the menu, returning the explorer and the output sink.
    pub fn into_parts(self) -> (Explorer, W) {
        (self.explorer, self.output)
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        self.print_welcome()?;

        loop {
            self.print_menu()?;
            let label = self.palette.notice("Enter choice: ");
            let Some(line) = self.prompt(&label)? else {
                break;
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(
                    self.output,
                    "{}",
                    self.palette.failure("Invalid choice. Please try again.")
                )?;
                continue;
            };

            debug!("Menu choice: {:?}", choice);
            if choice == MenuChoice::Exit || !self.dispatch(choice)? {
                break;
            }

            if self.pause {
                write!(self.output, "\nPress Enter to continue...")?;
                self.output.flush()?;
                if self.read_line()?.is_none() {
                    break;
                }
            }
        }

        writeln!(
            self.output,
            "{}",
            self.palette.success("Thank you for using File Explorer!")
        )?;
        self.output.flush()
    }

    /// Run one command. Returns `false` when input ended mid-command.
    fn dispatch(&mut self, choice: MenuChoice) -> io::Result<bool> {
        match choice {
            MenuChoice::Exit => return Ok(false),
            MenuChoice::ListSimple => match self.explorer.list_simple() {
                Ok(listing) => render::render_simple(
                    &mut self.output,
                    &self.palette,
                    self.explorer.current_path(),
                    &listing,
                )?,
                Err(e) => self.report(&e)?,
            },
            MenuChoice::ListDetailed => match self.explorer.list_detailed() {
                Ok(listing) => render::render_detailed(
                    &mut self.output,
                    &self.palette,
                    self.explorer.current_path(),
                    &listing,
                )?,
                Err(e) => self.report(&e)?,
            },
            MenuChoice::ChangeDirectory => {
                let Some(name) = self.prompt("Enter directory path (or .. for parent): ")? else {
                    return Ok(false);
                };
                match self.explorer.change_directory(&name).map(Path::to_path_buf) {
                    Ok(path) => {
                        let message = format!("Changed to: {}", path.display());
                        writeln!(self.output, "{}", self.palette.success(message))?;
                    }
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::ShowCurrentPath => {
                let message = format!(
                    "Current path: {}",
                    self.explorer.current_path().display()
                );
                writeln!(self.output, "{}", self.palette.success(message))?;
            }
            MenuChoice::CreateDirectory => {
                let Some(name) = self.prompt("Enter directory name: ")? else {
                    return Ok(false);
                };
                let result = self.explorer.create_directory(&name);
                self.confirm(result)?;
            }
            MenuChoice::CreateFile => {
                let Some(name) = self.prompt("Enter file name: ")? else {
                    return Ok(false);
                };
                let result = self.explorer.create_file(&name);
                self.confirm(result)?;
            }
            MenuChoice::Delete => {
                let Some(name) = self.prompt("Enter file/directory name: ")? else {
                    return Ok(false);
                };
                let result = self.explorer.delete_item(&name);
                self.confirm(result)?;
            }
            MenuChoice::Copy => {
                let Some((src, dest)) =
                    self.prompt_pair("Enter source file name: ", "Enter destination file name: ")?
                else {
                    return Ok(false);
                };
                let result = self.explorer.copy_file(&src, &dest);
                self.confirm(result)?;
            }
            MenuChoice::Move => {
                let Some((src, dest)) =
                    self.prompt_pair("Enter source name: ", "Enter destination name: ")?
                else {
                    return Ok(false);
                };
                let result = self.explorer.move_item(&src, &dest);
                self.confirm(result)?;
            }
            MenuChoice::Search => {
                let Some(pattern) = self.prompt("Enter search pattern: ")? else {
                    return Ok(false);
                };
                let results = self.explorer.search_files(&pattern);
                render::render_search(
                    &mut self.output,
                    &self.palette,
                    self.explorer.current_path(),
                    &pattern,
                    &results,
                )?;
            }
            MenuChoice::ViewInfo => {
                let Some(name) = self.prompt("Enter file/directory name: ")? else {
                    return Ok(false);
                };
                match self.explorer.view_info(&name) {
                    Ok(entry) => render::render_info(&mut self.output, &self.palette, &name, &entry)?,
                    Err(e) => self.report(&e)?,
                }
            }
            MenuChoice::ChangePermissions => {
                let Some((name, digits)) = self.prompt_pair(
                    "Enter file/directory name: ",
                    "Enter permissions (e.g., 755): ",
                )?
                else {
                    return Ok(false);
                };
                let result = self.explorer.change_permissions(&name, digits.trim());
                self.confirm(result)?;
            }
        }

        Ok(true)
    }

    fn confirm(&mut self, result: Result<Confirmation, ExplorerError>) -> io::Result<()> {
        match result {
            Ok(confirmation) => {
                render::render_confirmation(&mut self.output, &self.palette, &confirmation)
            }
            Err(e) => self.report(&e),
        }
    }

    fn report(&mut self, error: &ExplorerError) -> io::Result<()> {
        debug!("Command failed: {}", error);
        render::render_error(&mut self.output, &self.palette, error)
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt_pair(&mut self, first: &str, second: &str) -> io::Result<Option<(String, String)>> {
        let Some(a) = self.prompt(first)? else {
            return Ok(None);
        };
        let Some(b) = self.prompt(second)? else {
            return Ok(None);
        };
        Ok(Some((a, b)))
    }

    /// Next input line without its line terminator, `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn print_welcome(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "{}",
            self.palette.banner("Welcome to Linux File Explorer")
        )
    }

    fn print_menu(&mut self) -> io::Result<()> {
        let p = self.palette;
        let out = &mut self.output;

        writeln!(out)?;
        writeln!(out, "{}", p.banner("LINUX FILE EXPLORER MENU"))?;
        writeln!(out, "{}", p.heading("Navigation & Listing:"))?;
        writeln!(out, "  1.  List files (simple)")?;
        writeln!(out, "  2.  List files (detailed)")?;
        writeln!(out, "  3.  Change directory")?;
        writeln!(out, "  4.  Show current path")?;
        writeln!(out, "{}", p.heading("File/Directory Operations:"))?;
        writeln!(out, "  5.  Create directory")?;
        writeln!(out, "  6.  Create file")?;
        writeln!(out, "  7.  Delete file/directory")?;
        writeln!(out, "  8.  Copy file")?;
        writeln!(out, "  9.  Move/Rename file")?;
        writeln!(out, "{}", p.heading("Search & Information:"))?;
        writeln!(out, "  10. Search files")?;
        writeln!(out, "  11. View file information")?;
        writeln!(out, "{}", p.heading("Permissions:"))?;
        writeln!(out, "  12. Change permissions")?;
        writeln!(out, "{}", p.heading("Other:"))?;
        writeln!(out, "  0.  Exit")?;
        writeln!(out, "{}", "-".repeat(40))
    }
}
