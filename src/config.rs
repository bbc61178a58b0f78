//! Runtime settings resolved from flags, environment and defaults.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

pub const HOME_ENV: &str = "COVEY_HOME";
pub const BACKEND_ENV: &str = "COVEY_BACKEND";
pub const LOG_ENV: &str = "COVEY_LOG";
pub const DEFAULT_DIR_NAME: &str = ".covey";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Backend {
    #[default]
    File,
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::File => "file",
            Backend::Sqlite => "sqlite",
        }
    }
}

impl FromStr for Backend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Backend::File),
            "sqlite" | "db" => Ok(Backend::Sqlite),
            other => Err(AppError::Config(format!(
                "unknown backend `{other}`; expected file|sqlite"
            ))),
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(overrides: Overrides) -> Result<Self, AppError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Flag first, then `env`, then the built-in default.
    pub fn resolve_with<E>(overrides: Overrides, env: E) -> Result<Self, AppError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let data_dir = match overrides.data_dir {
            Some(dir) => dir,
            None => match lookup(HOME_ENV) {
                Some(dir) => PathBuf::from(dir),
                None => lookup("HOME")
                    .map(|home| PathBuf::from(home).join(DEFAULT_DIR_NAME))
                    .ok_or_else(|| {
                        AppError::Config(format!(
                            "unable to resolve data directory; pass --data-dir or set {HOME_ENV}"
                        ))
                    })?,
            },
        };
        if data_dir.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(AppError::Config("data directory is empty".to_string()));
        }

        let backend = match overrides.backend {
            Some(backend) => backend,
            None => lookup(BACKEND_ENV)
                .map(|value| value.parse())
                .transpose()?
                .unwrap_or_default(),
        };

        let log_level = overrides
            .log_level
            .or_else(|| lookup(LOG_ENV))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            data_dir,
            backend,
            log_level,
            log_dir: overrides.log_dir,
        })
    }
}
