use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming the TOML configuration file.
pub const CONFIG_ENV: &str = "TAILORSCAN_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Largest accepted request body, multipart framing included.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0:5000".to_string(), max_upload_bytes: 16 * 1024 * 1024 }
    }
}

/// Which recognizer serves requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Tesseract,
    /// Finds no text on any image. For smoke-testing a deployment that has
    /// no language data installed.
    Mock,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acceleration {
    #[default]
    Cpu,
    Gpu,
}

/// Engine initialization parameters, read once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub backend: Backend,
    /// Tesseract language codes, combined as `eng+hin`.
    pub languages: Vec<String>,
    /// Directory holding `tessdata`; the system default when unset.
    pub data_path: Option<String>,
    pub acceleration: Acceleration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Tesseract,
            languages: vec!["eng".to_string()],
            data_path: None,
            acceleration: Acceleration::Cpu,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: LogFormat::Pretty, filter: "info".to_string() }
    }
}

impl Config {
    pub fn from_toml(toml_content: &str) -> Result<Self> {
        toml::from_str(toml_content).context("Failed to parse configuration TOML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Load the file named by `TAILORSCAN_CONFIG`, or fall back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_service_contract() {
        let c = Config::default();
        assert_eq!(c.server.bind, "0.0.0.0:5000");
        assert_eq!(c.engine.backend, Backend::Tesseract);
        assert_eq!(c.engine.languages, vec!["eng"]);
        assert_eq!(c.engine.acceleration, Acceleration::Cpu);
        assert_eq!(c.logging.format, LogFormat::Pretty);
        assert_eq!(c.logging.filter, "info");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = Config::from_toml(
            r#"
            [engine]
            languages = ["eng", "hin"]
            acceleration = "gpu"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(c.engine.languages, vec!["eng", "hin"]);
        assert_eq!(c.engine.acceleration, Acceleration::Gpu);
        assert_eq!(c.logging.format, LogFormat::Json);
        assert_eq!(c.logging.filter, "info");
        assert_eq!(c.server.bind, "0.0.0.0:5000");
    }

    #[test]
    fn empty_toml_is_default() {
        let c = Config::from_toml("").unwrap();
        assert_eq!(c.server.max_upload_bytes, 16 * 1024 * 1024);
        assert!(c.engine.data_path.is_none());
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        assert!(Config::from_toml("[engine]\nacceleration = \"tpu\"").is_err());
        assert!(Config::from_toml("[engine]\nbackend = \"paddle\"").is_err());
    }

    #[test]
    fn backend_is_selectable() {
        let c = Config::from_toml("[engine]\nbackend = \"tesseract\"").unwrap();
        assert_eq!(c.engine.backend, Backend::Tesseract);
        let c = Config::from_toml("[engine]\nbackend = \"mock\"").unwrap();
        assert_eq!(c.engine.backend, Backend::Mock);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"127.0.0.1:8080\"\nmax_upload_bytes = 1024").unwrap();
        let c = Config::load(file.path()).unwrap();
        assert_eq!(c.server.bind, "127.0.0.1:8080");
        assert_eq!(c.server.max_upload_bytes, 1024);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
