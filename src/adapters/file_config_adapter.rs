//! INI file configuration adapter.

use crate::domain::error::RiskAllocError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RiskAllocError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| RiskAllocError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, RiskAllocError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| RiskAllocError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    fn typed<T>(
        &self,
        section: &str,
        key: &str,
        default: T,
        expected: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T, RiskAllocError> {
        match self.config.get(section, key) {
            None => Ok(default),
            Some(raw) => parse(&raw).ok_or_else(|| {
                RiskAllocError::config_invalid(
                    section,
                    key,
                    format!("expected {expected}, got \"{raw}\""),
                )
            }),
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> Result<i64, RiskAllocError> {
        self.typed(section, key, default, "an integer", |v| v.trim().parse().ok())
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, RiskAllocError> {
        self.typed(section, key, default, "a number", |v| v.trim().parse().ok())
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> Result<bool, RiskAllocError> {
        self.typed(section, key, default, "a boolean", Self::parse_bool)
    }
}
