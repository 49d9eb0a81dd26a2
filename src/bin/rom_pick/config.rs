//! Configuration for `RomPick`.
//!
//! Handles reading configuration from CLI arguments and the user config file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Deserialize;

use rom_picker::matching::{DEFAULT_MAX_TITLES, DEFAULT_PRIMARY_THRESHOLD, DEFAULT_SECONDARY_THRESHOLD, Thresholds};

use crate::Args;

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
pub struct RomPickConfig {
    #[serde(default)]
    destination_dir: Option<PathBuf>,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    extra_stop_words: Vec<String>,
    #[serde(default)]
    game_list: Option<PathBuf>,
    #[serde(default = "default_true")]
    log: bool,
    #[serde(default)]
    max_titles: Option<usize>,
    #[serde(default)]
    primary_threshold: Option<f64>,
    #[serde(default)]
    secondary_threshold: Option<f64>,
    #[serde(default)]
    source_dir: Option<PathBuf>,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    rompick: RomPickConfig,
}

/// When to run the secondary pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanMode {
    /// Ask on stdin.
    Ask,
    Always,
    Never,
}

/// Final config created from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) destination: PathBuf,
    pub(crate) dryrun: bool,
    pub(crate) extra_stop_words: Vec<String>,
    pub(crate) game_list: PathBuf,
    pub(crate) log: bool,
    pub(crate) max_titles: usize,
    pub(crate) rescan: RescanMode,
    pub(crate) source: PathBuf,
    pub(crate) thresholds: Thresholds,
    pub(crate) verbose: bool,
}

const fn default_true() -> bool {
    true
}

impl RomPickConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub(crate) fn get_user_config() -> Result<Self> {
        let Some(path) = rom_picker::config_path() else {
            return Ok(Self::default_config());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default_config()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.rompick)
            .context("Failed to parse rompick config TOML")
    }

    /// Defaults used when there is no config file, matching an empty `[rompick]` section.
    fn default_config() -> Self {
        Self {
            log: true,
            ..Self::default()
        }
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed,
    /// a required path is missing, or the thresholds are invalid.
    pub fn from_args(args: Args) -> Result<Self> {
        let user_config = RomPickConfig::get_user_config()?;
        Self::from_args_and_user_config(args, user_config)
    }

    fn from_args_and_user_config(args: Args, user_config: RomPickConfig) -> Result<Self> {
        let game_list = args
            .game_list
            .or(user_config.game_list)
            .context("No game list given. Pass it as an argument or set `game_list` in the config file")?;

        let source = args
            .source
            .or(user_config.source_dir)
            .context("No source directory given. Use --source or set `source_dir` in the config file")?;

        let destination = args
            .dest
            .or(user_config.destination_dir)
            .context("No destination directory given. Use --dest or set `destination_dir` in the config file")?;

        if is_same_directory(&source, &destination) {
            anyhow::bail!(
                "Destination must differ from the source directory: {}",
                destination.display()
            );
        }

        let primary = args
            .threshold
            .or(user_config.primary_threshold)
            .unwrap_or(DEFAULT_PRIMARY_THRESHOLD);

        let secondary = args
            .secondary
            .or(user_config.secondary_threshold)
            .unwrap_or(DEFAULT_SECONDARY_THRESHOLD);

        let thresholds = Thresholds::new(primary, secondary)?;

        let extra_stop_words = user_config
            .extra_stop_words
            .into_iter()
            .chain(args.stop_words)
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .unique()
            .collect();

        let rescan = if args.no_rescan {
            RescanMode::Never
        } else if args.yes {
            RescanMode::Always
        } else {
            RescanMode::Ask
        };

        Ok(Self {
            destination: dunce::simplified(&destination).to_path_buf(),
            dryrun: args.print || user_config.dryrun,
            extra_stop_words,
            game_list,
            log: !args.no_log && user_config.log,
            max_titles: user_config.max_titles.unwrap_or(DEFAULT_MAX_TITLES),
            rescan,
            source,
            thresholds,
            verbose: args.verbose || user_config.verbose,
        })
    }
}

/// Compare directories by their resolved paths when both exist.
fn is_same_directory(source: &Path, destination: &Path) -> bool {
    if dunce::simplified(source) == dunce::simplified(destination) {
        return true;
    }
    match (dunce::canonicalize(source), dunce::canonicalize(destination)) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}


#[cfg(test)]
mod config_from_args_tests {
    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("test").chain(args.iter().copied())).expect("should parse")
    }

    fn required_args() -> Vec<&'static str> {
        vec!["wanted.txt", "-s", "/roms", "-d", "/picked"]
    }

    #[test]
    fn uses_defaults() {
        let config = Config::from_args_and_user_config(parse(&required_args()), RomPickConfig::default_config())
            .expect("should create config");
        assert_eq!(config.game_list, PathBuf::from("wanted.txt"));
        assert_eq!(config.source, PathBuf::from("/roms"));
        assert_eq!(config.destination, PathBuf::from("/picked"));
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.max_titles, DEFAULT_MAX_TITLES);
        assert_eq!(config.rescan, RescanMode::Ask);
        assert!(config.log);
        assert!(!config.dryrun);
    }

    #[test]
    fn missing_game_list_is_an_error() {
        let result = Config::from_args_and_user_config(parse(&["-s", "/roms", "-d", "/picked"]), RomPickConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn missing_destination_is_an_error() {
        let result = Config::from_args_and_user_config(parse(&["wanted.txt", "-s", "/roms"]), RomPickConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn paths_from_user_config() {
        let user_config = RomPickConfig {
            game_list: Some(PathBuf::from("/config/list.txt")),
            source_dir: Some(PathBuf::from("/config/roms")),
            destination_dir: Some(PathBuf::from("/config/out")),
            ..RomPickConfig::default()
        };
        let config = Config::from_args_and_user_config(parse(&[]), user_config).expect("should create config");
        assert_eq!(config.game_list, PathBuf::from("/config/list.txt"));
        assert_eq!(config.source, PathBuf::from("/config/roms"));
        assert_eq!(config.destination, PathBuf::from("/config/out"));
    }

    #[test]
    fn cli_overrides_user_config() {
        let user_config = RomPickConfig {
            source_dir: Some(PathBuf::from("/config/roms")),
            primary_threshold: Some(0.9),
            secondary_threshold: Some(0.5),
            ..RomPickConfig::default()
        };
        let mut args = required_args();
        args.extend(["-t", "0.75"]);
        let config = Config::from_args_and_user_config(parse(&args), user_config).expect("should create config");
        assert_eq!(config.source, PathBuf::from("/roms"));
        rom_picker::assert_f64_eq(config.thresholds.primary(), 0.75);
        rom_picker::assert_f64_eq(config.thresholds.secondary(), 0.5);
    }

    #[test]
    fn rejects_destination_equal_to_source() {
        let result = Config::from_args_and_user_config(
            parse(&["wanted.txt", "-s", "/roms", "-d", "/roms"]),
            RomPickConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_destination_resolving_to_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("roms");
        std::fs::create_dir(&source).unwrap();
        let source_str = source.to_str().unwrap().to_string();
        let destination_str = source.join(".").to_str().unwrap().to_string();

        let result = Config::from_args_and_user_config(
            parse(&["wanted.txt", "-s", source_str.as_str(), "-d", destination_str.as_str()]),
            RomPickConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_secondary_not_below_primary() {
        let mut args = required_args();
        args.extend(["-t", "0.6", "-u", "0.7"]);
        let result = Config::from_args_and_user_config(parse(&args), RomPickConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let mut args = required_args();
        args.extend(["-t", "1.5"]);
        let result = Config::from_args_and_user_config(parse(&args), RomPickConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn combines_stop_words() {
        let user_config = RomPickConfig {
            extra_stop_words: vec!["Edition".to_string(), "disney's".to_string()],
            ..RomPickConfig::default()
        };
        let mut args = required_args();
        args.extend(["-w", "edition", "-w", "deluxe"]);
        let config = Config::from_args_and_user_config(parse(&args), user_config).expect("should create config");
        assert_eq!(config.extra_stop_words, vec!["edition", "disney's", "deluxe"]);
    }

    #[test]
    fn rescan_modes() {
        let mut args = required_args();
        args.push("-y");
        let config = Config::from_args_and_user_config(parse(&args), RomPickConfig::default()).expect("should create config");
        assert_eq!(config.rescan, RescanMode::Always);

        let mut args = required_args();
        args.push("-n");
        let config = Config::from_args_and_user_config(parse(&args), RomPickConfig::default()).expect("should create config");
        assert_eq!(config.rescan, RescanMode::Never);
    }

    #[test]
    fn flags_enable_options() {
        let mut args = required_args();
        args.extend(["-p", "-q", "-v"]);
        let config = Config::from_args_and_user_config(parse(&args), RomPickConfig::default_config())
            .expect("should create config");
        assert!(config.dryrun);
        assert!(!config.log);
        assert!(config.verbose);
    }
}
