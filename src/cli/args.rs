//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder};
use crate::consts::DEFAULT_TICK_MS;

use super::commands::Commands;

/// Environment variable overriding the data directory
pub(crate) const DATA_DIR_ENV: &str = "STUDYTIMER_HOME";

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum SortOrder {
    /// Oldest first (default)
    #[default]
    Asc,
    /// Newest first
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "studytimer")]
#[command(about = "Study timer that logs sessions to CSV with automatic backups", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Directory holding sessions.csv and backups/
    #[arg(short = 'd', long, global = true, value_name = "DIR")]
    pub(crate) data_dir: Option<PathBuf>,

    /// Timezone used for session date and shift (e.g., "UTC", "America/Sao_Paulo")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Sort order for the session log
    #[arg(short, long, global = true, value_enum, default_value = "asc")]
    pub(crate) order: SortOrder,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug output (show file operations)
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Timer refresh interval in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub(crate) tick_ms: Option<u64>,

    /// `data_dir` from the config file, ranked below the environment
    #[arg(skip)]
    pub(crate) config_data_dir: Option<PathBuf>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        // For enum values, apply config only if CLI is at default
        if let Some(order) = config.order
            && self.order == SortOrder::Asc
            && matches!(order, ConfigSortOrder::Desc)
        {
            self.order = SortOrder::Desc;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
                ConfigColorMode::Auto => ColorMode::Auto,
            };
        }

        // Options: only apply if CLI didn't set them
        self.config_data_dir = config.data_dir.clone();
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.tick_ms.is_none() {
            self.tick_ms = config.tick_ms;
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.unwrap_or(DEFAULT_TICK_MS).max(1))
    }

    /// Resolve the data directory.
    ///
    /// Priority: `--data-dir`, `STUDYTIMER_HOME`, config `data_dir`, the
    /// platform data dir, `~/.studytimer`, and finally the working directory.
    pub(crate) fn resolve_data_dir(&self) -> PathBuf {
        self.resolve_data_dir_with(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_data_dir_with(&self, env_dir: Option<PathBuf>) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(dir) = env_dir.filter(|d| !d.as_os_str().is_empty()) {
            return dir;
        }
        if let Some(dir) = &self.config_data_dir {
            return dir.clone();
        }
        if let Some(dir) = dirs::data_dir() {
            return dir.join("studytimer");
        }
        if let Some(home) = dirs::home_dir() {
            return home.join(".studytimer");
        }
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["studytimer"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn defaults_without_config() {
        let cli = parse(&[]).with_config(&Config::default());
        assert!(cli.command.is_none());
        assert_eq!(cli.order, SortOrder::Asc);
        assert_eq!(cli.tick(), Duration::from_millis(DEFAULT_TICK_MS));
        assert!(!cli.debug);
    }

    #[test]
    fn config_fills_unset_values() {
        let config = Config {
            data_dir: Some(PathBuf::from("/cfg")),
            timezone: Some("UTC".to_string()),
            tick_ms: Some(250),
            order: Some(ConfigSortOrder::Desc),
            color: Some(ConfigColorMode::Never),
            no_color: false,
            debug: true,
        };
        let cli = parse(&["log"]).with_config(&config);
        assert_eq!(cli.resolve_data_dir_with(None), PathBuf::from("/cfg"));
        assert_eq!(cli.timezone.as_deref(), Some("UTC"));
        assert_eq!(cli.tick(), Duration::from_millis(250));
        assert_eq!(cli.order, SortOrder::Desc);
        assert_eq!(cli.color, ColorMode::Never);
        assert!(!cli.use_color());
        assert!(cli.debug);
    }

    #[test]
    fn cli_values_win_over_config() {
        let config = Config {
            data_dir: Some(PathBuf::from("/cfg")),
            timezone: Some("UTC".to_string()),
            tick_ms: Some(250),
            ..Config::default()
        };
        let cli = parse(&["--data-dir", "/cli", "--timezone", "Europe/Lisbon", "--tick-ms", "100"])
            .with_config(&config);
        assert_eq!(cli.resolve_data_dir_with(None), PathBuf::from("/cli"));
        assert_eq!(cli.timezone.as_deref(), Some("Europe/Lisbon"));
        assert_eq!(cli.tick(), Duration::from_millis(100));
    }

    #[test]
    fn zero_tick_is_clamped() {
        let cli = parse(&["--tick-ms", "0"]);
        assert_eq!(cli.tick(), Duration::from_millis(1));
    }

    #[test]
    fn data_dir_flag_beats_env() {
        let cli = parse(&["--data-dir", "/cli"]);
        assert_eq!(
            cli.resolve_data_dir_with(Some(PathBuf::from("/env"))),
            PathBuf::from("/cli")
        );
    }

    #[test]
    fn env_data_dir_used_when_flag_missing() {
        let cli = parse(&[]);
        assert_eq!(
            cli.resolve_data_dir_with(Some(PathBuf::from("/env"))),
            PathBuf::from("/env")
        );
    }

    #[test]
    fn env_data_dir_beats_config() {
        let config = Config {
            data_dir: Some(PathBuf::from("/cfg")),
            ..Config::default()
        };
        let cli = parse(&[]).with_config(&config);
        assert_eq!(
            cli.resolve_data_dir_with(Some(PathBuf::from("/env"))),
            PathBuf::from("/env")
        );
    }

    #[test]
    fn empty_env_falls_through() {
        let cli = parse(&[]);
        assert_ne!(cli.resolve_data_dir_with(Some(PathBuf::new())), PathBuf::new());
    }

    #[test]
    fn subcommand_flags_parse() {
        let cli = parse(&["log", "--since", "2026-10-01", "-j"]);
        match cli.command {
            Some(Commands::Log(args)) => {
                assert_eq!(args.since.as_deref(), Some("2026-10-01"));
                assert!(args.json);
            }
            _ => panic!("expected log command"),
        }
    }

    #[test]
    fn global_flag_after_subcommand() {
        let cli = parse(&["restore", "--data-dir", "/x"]);
        assert!(matches!(cli.command, Some(Commands::Restore)));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/x")));
    }
}
