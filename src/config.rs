//! Configuration management for the G-code inspector.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional TOML settings file (user config directory or `--config`)
//! - Precedence: command line > settings file > built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::scan::{DEFAULT_BATCH_SIZE, ParseOptions};

/// Which representation(s) to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    /// Toolpath segments and command records
    #[default]
    All,
    /// Toolpath segments only
    Toolpath,
    /// Command records only
    Commands,
}

/// Command-line arguments for the G-code inspector
#[derive(Debug, Parser)]
#[command(name = "gcode-inspect")]
#[command(about = "Interpret a G-code program into toolpath segments and command records")]
#[command(version)]
pub struct Args {
    /// G-code file to interpret
    pub input: PathBuf,

    /// Collapse adjacent same-axis movements into groups
    #[arg(long)]
    pub grouped: bool,

    /// Which view to print
    #[arg(long, value_enum, default_value_t = View::All)]
    pub view: View,

    /// Lines processed per scan batch
    #[arg(long, help = "Lines processed per scan batch (default 2000)")]
    pub batch_size: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Settings file to use instead of the default location
    #[arg(long, help = "Path to a TOML settings file")]
    pub config: Option<PathBuf>,

    /// Log level for the inspector
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Settings file contents; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub grouped: Option<bool>,
    pub batch_size: Option<usize>,
    pub pretty: Option<bool>,
}

impl FileConfig {
    /// Read and parse a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub view: View,
    pub grouped: bool,
    pub batch_size: usize,
    pub pretty: bool,
    pub log_level: String,
    /// Settings file that was applied, if any
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let (file, config_file) = match &args.config {
            // An explicit settings file must exist
            Some(path) => (FileConfig::load(path)?, Some(path.clone())),
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => (FileConfig::load(&path)?, Some(path)),
                None => (FileConfig::default(), None),
            },
        };

        Self::merge(args, file, config_file)
    }

    fn merge(args: Args, file: FileConfig, config_file: Option<PathBuf>) -> Result<Self> {
        let batch_size = args
            .batch_size
            .or(file.batch_size)
            .unwrap_or(DEFAULT_BATCH_SIZE);
        anyhow::ensure!(batch_size > 0, "batch size must be at least 1");

        Ok(Config {
            input: args.input,
            view: args.view,
            grouped: args.grouped || file.grouped.unwrap_or(false),
            batch_size,
            pretty: args.pretty || file.pretty.unwrap_or(false),
            log_level: args.log_level,
            config_file,
        })
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            grouped: self.grouped,
        }
    }
}

/// `<config_dir>/gcode-inspect/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gcode-inspect").join("config.toml"))
}
