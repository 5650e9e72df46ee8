//! fexplorer
//!
//! Console file explorer with an interactive menu and one-shot commands.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use explorer::config::Config;
use explorer::ui::{render, Menu, Palette};
use explorer::{Explorer, ExplorerError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// fexplorer - browse and manage files from the console.
#[derive(Parser, Debug)]
#[command(name = "fexplorer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable terminal colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory to start in (overrides the configuration)
    #[arg(short = 'd', long, global = true, value_name = "DIR")]
    pub start_dir: Option<PathBuf>,

    /// Subcommand to execute (defaults to the interactive menu)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the numbered interactive menu
    Interactive,

    /// List the start directory
    Ls {
        /// Show permissions, owner, group, size and modification time
        #[arg(long, short)]
        long: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Search below the start directory for names containing PATTERN
    Search {
        /// Case-sensitive substring to look for
        pattern: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show metadata of a single file or directory
    Info {
        /// Name relative to the start directory, or an absolute path
        name: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default()?
    };

    // Apply environment variable overrides, then command-line ones
    let env_overrides = config.apply_env_overrides();
    if let Some(dir) = &cli.start_dir {
        config.explorer.start_dir = Some(dir.clone());
    }

    // Validate configuration
    config.validate()?;

    // Held until exit so buffered log lines are flushed
    let _log_guard = init_logging(&config, cli.verbose)?;
    for name in &env_overrides {
        tracing::info!("Configuration overridden from environment: {}", name);
    }

    let color = !cli.no_color && config.display.color && io::stdout().is_terminal();
    let palette = Palette::new(color);

    let explorer = match &config.explorer.start_dir {
        Some(dir) => Explorer::at(dir)
            .with_context(|| format!("Cannot start in {}", dir.display()))?,
        None => Explorer::new(),
    }
    .with_options(&config.explorer_options());

    tracing::debug!("Starting in {:?}", explorer.current_path());

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let stdin = io::stdin();
            let pause = stdin.is_terminal();
            let mut menu = Menu::new(explorer, stdin.lock(), io::stdout().lock(), palette)
                .pause_after_command(pause);
            menu.run()?;
        }
        Commands::Ls { long, json } => {
            let mut out = io::stdout().lock();
            let cwd = explorer.current_path();
            if long {
                let listing = explorer.list_detailed().map_err(command_error)?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
                } else {
                    render::render_detailed(&mut out, &palette, cwd, &listing)?;
                }
            } else {
                let listing = explorer.list_simple().map_err(command_error)?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
                } else {
                    render::render_simple(&mut out, &palette, cwd, &listing)?;
                }
            }
        }
        Commands::Search { pattern, json } => {
            let results = explorer.search_files(&pattern);
            let mut out = io::stdout().lock();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                render::render_search(
                    &mut out,
                    &palette,
                    explorer.current_path(),
                    &pattern,
                    &results,
                )?;
            }
        }
        Commands::Info { name, json } => {
            let entry = explorer.view_info(&name).map_err(command_error)?;
            let mut out = io::stdout().lock();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&entry)?)?;
            } else {
                render::render_info(&mut out, &palette, &name, &entry)?;
            }
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// Install the tracing subscriber.
///
/// `--verbose` forces `debug`; otherwise the configured level applies.
/// With `log_file` set, output goes to that file through a background
/// writer whose guard must outlive all logging.
fn init_logging(config: &Config, verbose: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.explorer.log_level.to_lowercase()
    };
    let filter = EnvFilter::try_new(&level)
        .with_context(|| format!("Invalid log level: {}", level))?;

    let Some(log_file) = &config.explorer.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = log_file
        .file_name()
        .with_context(|| format!("log_file has no file name: {}", log_file.display()))?;
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

/// Wrap a failed one-shot command as `<Kind>: <detail>`.
///
/// Returned from `main` rather than exiting in place, so the log guard is
/// dropped and buffered log lines reach the file.
fn command_error(error: ExplorerError) -> anyhow::Error {
    anyhow::anyhow!("{}: {}", error.kind(), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_defaults_to_menu() {
        let cli = Cli::try_parse_from(["fexplorer"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.no_color);
    }

    #[test]
    fn test_interactive_command() {
        let cli = Cli::try_parse_from(["fexplorer", "interactive"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Interactive));
    }

    #[test]
    fn test_ls_flags() {
        let cli = Cli::try_parse_from(["fexplorer", "ls"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Ls {
                long: false,
                json: false
            })
        );

        let cli = Cli::try_parse_from(["fexplorer", "ls", "-l", "--json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Ls {
                long: true,
                json: true
            })
        );
    }

    #[test]
    fn test_search_requires_pattern() {
        let result = Cli::try_parse_from(["fexplorer", "search"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["fexplorer", "search", "qux", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Search { pattern, json }) => {
                assert_eq!(pattern, "qux");
                assert!(json);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_info_requires_name() {
        let result = Cli::try_parse_from(["fexplorer", "info"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["fexplorer", "info", "notes.txt"]).unwrap();
        match cli.command {
            Some(Commands::Info { name, json }) => {
                assert_eq!(name, "notes.txt");
                assert!(!json);
            }
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_global_flags_after_command() {
        let cli = Cli::try_parse_from([
            "fexplorer",
            "ls",
            "--verbose",
            "--no-color",
            "--config",
            "./fx.toml",
            "--start-dir",
            "/tmp",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("./fx.toml")));
        assert_eq!(cli.start_dir, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["fexplorer", "-v", "-c", "a.toml", "-d", "/srv", "config"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        assert_eq!(cli.start_dir, Some(PathBuf::from("/srv")));
        assert_eq!(cli.command, Some(Commands::Config));
    }

    #[test]
    fn test_command_error_names_kind() {
        let err = command_error(ExplorerError::NotFound(PathBuf::from("/work/nope")));
        assert_eq!(err.to_string(), "NotFound: not found: /work/nope");
    }

    #[test]
    fn test_invalid_command_fails() {
        let result = Cli::try_parse_from(["fexplorer", "invalid"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_available() {
        let result = Cli::try_parse_from(["fexplorer", "--help"]);
        // --help causes an early exit, which is treated as an error by try_parse
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
