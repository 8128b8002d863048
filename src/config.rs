// ⚙️ Runtime configuration for the movie-catalog binary
//
// Precedence (lowest to highest): built-in default, MOVIE_CATALOG_PATH, --file.

use crate::error::{CatalogError, Result};
use std::path::PathBuf;

/// Where the movie list is saved when no override is given
pub const DEFAULT_CATALOG_PATH: &str = "./data/movieList.json";

/// Environment variable overriding the save file location
pub const CATALOG_PATH_ENV: &str = "MOVIE_CATALOG_PATH";

pub const USAGE: &str = "\
Usage: movie-catalog [--file <PATH>] [--load | --no-load]

Options:
  --file <PATH>   movie list JSON file (default ./data/movieList.json,
                  or $MOVIE_CATALOG_PATH)
  --load          load the saved list on start without asking
  --no-load       start with an empty list without asking
  -h, --help      print this help";

/// Whether to load the saved movie list at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Prompt the user (only if the save file exists)
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub load_on_start: LoadPolicy,
    pub show_help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            load_on_start: LoadPolicy::Ask,
            show_help: false,
        }
    }
}

impl Config {
    /// Build from the process environment and command line
    pub fn from_env() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_parts(&args, std::env::var(CATALOG_PATH_ENV).ok())
    }

    /// Build from explicit arguments (program name excluded) and env value
    pub fn from_parts(args: &[String], env_path: Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
            config.catalog_path = PathBuf::from(path);
        }

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--file" | "-f" => {
                    let path = iter.next().ok_or_else(|| {
                        CatalogError::InvalidArgument(format!("{} requires a path", arg))
                    })?;
                    config.catalog_path = PathBuf::from(path);
                }
                "--load" => config.load_on_start = LoadPolicy::Always,
                "--no-load" => config.load_on_start = LoadPolicy::Never,
                "--help" | "-h" => config.show_help = true,
                other => {
                    return Err(CatalogError::InvalidArgument(format!(
                        "unknown argument '{}'",
                        other
                    )))
                }
            }
        }

        Ok(config)
    }
}
