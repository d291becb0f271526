//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};

use pipeline_tree::defaults::SETTINGS_ENV;
use pipeline_tree::settings::{Settings, SettingsOverrides};

use crate::commands;

/// Pipeline Tree - Resolve monorepo pipeline configuration from changed files
#[derive(Parser, Debug)]
#[command(name = "pipeline-tree")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Force debug logging
    #[arg(
        long,
        global = true,
        env = "PLUGIN_DEBUG",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        default_value = "false"
    )]
    debug: bool,

    #[command(flatten)]
    settings: SettingsArgs,
}

/// Resolver settings shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// YAML settings file; flags below override its values
    #[arg(long, global = true, value_name = "FILE", env = SETTINGS_ENV)]
    pub settings: Option<PathBuf>,

    /// Merge every matching configuration instead of only the first
    #[arg(
        long,
        global = true,
        env = "PLUGIN_CONCAT",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub concat: Option<bool>,

    /// Scan the tree when a build has no changed files
    #[arg(
        long,
        global = true,
        env = "PLUGIN_FALLBACK",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub fallback: Option<bool>,

    /// Deepest directory level the tree scan lists (root is 0)
    #[arg(long, global = true, value_name = "N", env = "PLUGIN_MAXDEPTH")]
    pub max_depth: Option<usize>,

    /// Wall-clock limit of one resolution
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout_seconds: Option<u64>,

    /// SCM calls one resolution may make
    #[arg(long, global = true, value_name = "N")]
    pub max_scm_calls: Option<usize>,
}

impl SettingsArgs {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            concat: self.concat,
            fallback: self.fallback,
            max_depth: self.max_depth,
            timeout_seconds: self.timeout_seconds,
            max_scm_calls: self.max_scm_calls,
        }
    }

    /// Defaults, then the settings file, then flags and their environment.
    pub fn load(&self) -> Result<Settings> {
        Ok(Settings::load(self.settings.as_deref(), &self.overrides())?)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the pipeline document of a build event against a local clone
    Resolve(commands::resolve::ResolveArgs),

    /// Print the files a build event changed
    Changes(commands::changes::ChangesArgs),

    /// Scan a working tree for pipeline configuration files
    Scan(commands::scan::ScanArgs),

    /// Check pipeline configuration files
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Resolve(args) => commands::resolve::execute(args, self.settings.load()?),
            Commands::Changes(args) => commands::changes::execute(args, self.settings.load()?),
            Commands::Scan(args) => commands::scan::execute(args, self.settings.load()?),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }

    /// `RUST_LOG` wins over `--log-level`; `--debug` wins over both.
    fn init_logging(&self) {
        let mut builder = if self.debug {
            let mut builder = env_logger::Builder::new();
            builder.parse_filters("debug");
            builder
        } else {
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(self.log_level.as_str()),
            )
        };
        // A logger may already be installed when embedded in tests.
        let _ = builder.format_timestamp_millis().try_init();
    }
}
