use crate::model::DEFAULT_DAY_CAPACITY;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub max_notes_per_day: usize,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Explicit,
    User,
}

#[derive(Debug, Clone)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub scope: ConfigScope,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            max_notes_per_day: DEFAULT_DAY_CAPACITY,
            log_level: "info".into(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Log file to write to: the configured one, else `calnotes.log` in the
    /// user data directory.
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("calnotes.log")))
    }

    fn validate(&self) -> Result<()> {
        if self.max_notes_per_day == 0 {
            bail!("max_notes_per_day must be at least 1");
        }
        Ok(())
    }
}

pub fn locate_config(explicit: Option<PathBuf>) -> Option<ConfigLocation> {
    if let Some(path) = explicit {
        return Some(ConfigLocation {
            path,
            scope: ConfigScope::Explicit,
        });
    }
    project_dirs().map(|dirs| ConfigLocation {
        path: dirs.config_dir().join("config.yml"),
        scope: ConfigScope::User,
    })
}

/// Reads the config file. A missing user config means defaults; a missing
/// explicit one is an error.
pub fn load_config(location: Option<&ConfigLocation>) -> Result<AppConfig> {
    let config = match location {
        Some(location) if location.path.exists() => {
            let data = fs::read_to_string(&location.path)
                .with_context(|| format!("reading {:?}", location.path))?;
            if data.trim().is_empty() {
                AppConfig::default()
            } else {
                serde_yaml::from_str(&data)
                    .with_context(|| format!("parsing config file {:?}", location.path))?
            }
        }
        Some(location) if location.scope == ConfigScope::Explicit => {
            bail!("config file not found: {}", location.path.display())
        }
        _ => AppConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "calnotes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn at(path: &Path, scope: ConfigScope) -> ConfigLocation {
        ConfigLocation {
            path: path.to_path_buf(),
            scope,
        }
    }

    #[test]
    fn missing_user_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let location = at(&dir.path().join("config.yml"), ConfigScope::User);
        assert_eq!(load_config(Some(&location)).unwrap(), AppConfig::default());
        assert_eq!(load_config(None).unwrap().max_notes_per_day, 3);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let location = at(&dir.path().join("nope.yml"), ConfigScope::Explicit);
        let err = load_config(Some(&location)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "max_notes_per_day: 5\nlog_file: /tmp/cal.log\n").unwrap();

        let config = load_config(Some(&at(&path, ConfigScope::Explicit))).unwrap();

        assert_eq!(
            config,
            AppConfig {
                max_notes_per_day: 5,
                log_level: "info".into(),
                log_file: Some(PathBuf::from("/tmp/cal.log")),
            }
        );
        assert_eq!(
            config.effective_log_path(),
            Some(PathBuf::from("/tmp/cal.log"))
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "max_notes_per_day: 0\n").unwrap();
        assert!(load_config(Some(&at(&path, ConfigScope::User))).is_err());
    }

    #[test]
    fn malformed_yaml_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "max_notes_per_day: [oops\n").unwrap();
        let err = load_config(Some(&at(&path, ConfigScope::User))).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }

    #[test]
    fn explicit_path_wins_over_user_dir() {
        let location = locate_config(Some(PathBuf::from("/etc/calnotes.yml"))).unwrap();
        assert_eq!(location.scope, ConfigScope::Explicit);
        assert_eq!(location.path, PathBuf::from("/etc/calnotes.yml"));
    }
}
