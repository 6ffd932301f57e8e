//! Configuration Loading
//!
//! Layered configuration for the compound cache: compiled-in defaults,
//! overridden by a `gibbs.toml` file in the working directory, overridden by
//! `GIBBS_`-prefixed environment variables (`__` separates nesting, so
//! `GIBBS_CACHE__DIR` sets `cache.dir`).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub mod error;

pub use crate::error::{Error, ErrorKind, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "gibbs.toml";
/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "GIBBS_";

/// Top-level application configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub cache: CacheSection,
    pub registry: RegistrySection,
}

/// Where the local compound store lives.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CacheSection {
    /// Directory holding the store file. Created on bootstrap if absent.
    pub dir: PathBuf,
    /// File name of the SQLite store inside [`CacheSection::dir`].
    pub store_file: String,
}

/// Which data package seeds the cache, and where downloads are staged.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RegistrySection {
    /// Package specifier in `namespace/name` form.
    pub default_package: String,
    /// Staging directory for installed package revisions. When unset, a
    /// per-user data directory is used.
    pub install_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheSection {
                dir: PathBuf::from("./cache"),
                store_file: "compounds.sqlite".to_owned(),
            },
            registry: RegistrySection {
                default_package: "equilibrator/cache".to_owned(),
                install_dir: None,
            },
        }
    }
}

impl Config {
    /// The figment backing [`Config::load`], exposed for callers that want to
    /// merge additional providers before extraction.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads configuration from defaults, file, and environment.
    pub fn load() -> Result<Self> {
        let config: Config = Self::figment().extract().map_err(ErrorKind::Invalid)?;
        tracing::debug!(
            cache_dir = %config.cache.dir.display(),
            package = %config.registry.default_package,
            "configuration loaded",
        );
        Ok(config)
    }

    /// Full path of the SQLite store file.
    pub fn sqlite_path(&self) -> PathBuf {
        self.cache.dir.join(&self.cache.store_file)
    }

    /// Directory where package revisions are installed. Falls back to the
    /// platform data directory when not configured.
    pub fn install_dir(&self) -> PathBuf {
        match &self.registry.install_dir {
            Some(dir) => dir.clone(),
            None => default_install_dir(),
        }
    }
}

fn default_install_dir() -> PathBuf {
    match ProjectDirs::from("", "", "gibbs") {
        Some(dirs) => dirs.data_dir().join("packages"),
        // No home directory (containers, bare daemons): stage next to the cwd.
        None => Path::new(".gibbs").join("packages"),
    }
}
