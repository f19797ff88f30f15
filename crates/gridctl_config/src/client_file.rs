use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Client configuration loaded from a `key = value` properties file.
///
/// Recognized keys: `registry.locator`, `registry.username`,
/// `registry.password`. Anything else is rejected so that typos surface
/// before the registry is contacted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    pub locator: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ClientConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config = ClientConfig::default();

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
            })?;
            let key = key.trim();
            let value = value.trim().to_string();

            match key {
                "registry.locator" => config.locator = Some(value),
                "registry.username" => config.username = Some(value),
                "registry.password" => config.password = Some(value),
                _ => {
                    return Err(ConfigError::UnknownKey {
                        key: key.to_string(),
                        path: path.to_path_buf(),
                        line: idx + 1,
                    });
                }
            }
        }

        Ok(config)
    }
}
