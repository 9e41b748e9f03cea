//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: List the translatable strings of the YAML resource files
//! - `localize`: Write localized copies of the resource files
//! - `init`: Initialize yamlloc configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Localize(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source locale (overrides config file)
    #[arg(long)]
    pub source_locale: Option<String>,

    /// Resource root directory (overrides config file)
    #[arg(long)]
    pub resource_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Files or directories to scan, relative to the resource root (default: all)
    pub paths: Vec<PathBuf>,

    /// Print one JSON object per unit instead of a listing
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct LocalizeCommand {
    /// JSON file with a list of `{key, target, targetLocale}` entries
    #[arg(long)]
    pub translations: PathBuf,

    /// Target locales (default: `locales` from the config file)
    /// Can be specified multiple times: --locale de-DE --locale fr-FR
    #[arg(long = "locale")]
    pub locales: Vec<String>,

    /// Output directory (overrides config file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Actually write files (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List translatable strings found in YAML resource files
    Extract(ExtractCommand),
    /// Write localized copies of YAML resource files from a translation list
    Localize(LocalizeCommand),
    /// Initialize a new .yamllocrc.json configuration file
    Init,
}
