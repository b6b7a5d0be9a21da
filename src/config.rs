//! Runtime configuration from environment variables.

use std::path::PathBuf;

pub const DATASET_PATH_ENV: &str = "SEHATAI_DATASET_PATH";
pub const REPORT_DIR_ENV: &str = "SEHATAI_REPORT_DIR";
pub const LOG_MODE_ENV: &str = "SEHATAI_LOG_MODE";
pub const LOG_FILE_ENV: &str = "SEHATAI_LOG_FILE";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    /// Parse a mode name; unknown values fall back to `Auto`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether to log to a file given whether stdout is interactive.
    ///
    /// Logging to the terminal would corrupt the TUI's alternate screen.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub report_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/patients.json"),
            report_dir: PathBuf::from("reports"),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("sehatai.log"),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            dataset_path: non_empty(DATASET_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_path),
            report_dir: non_empty(REPORT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.report_dir),
            log_mode: non_empty(LOG_MODE_ENV)
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: non_empty(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (DATASET_PATH_ENV, "/srv/patients.json"),
            (REPORT_DIR_ENV, "/tmp/out"),
            (LOG_MODE_ENV, "STDOUT"),
            (LOG_FILE_ENV, ""),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.dataset_path, PathBuf::from("/srv/patients.json"));
        assert_eq!(config.report_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("sehatai.log"));
    }

    #[test]
    fn test_log_mode() {
        assert_eq!(LogMode::parse("file"), LogMode::File);
        assert_eq!(LogMode::parse("whatever"), LogMode::Auto);
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
