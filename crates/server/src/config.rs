//! TOML configuration for the web form.
//!
//! Every section and key is optional; a missing config file at the default
//! location means built-in defaults. Example:
//!
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0:8501"
//!
//! [ocr]
//! upscale = 2.0
//! contrast = 2.0
//!
//! [models]
//! hydration_model = "models/hydration_model.json"
//!
//! [log]
//! format = "json"
//! ```

use hydrosense_ocr::PreprocessOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "HYDROSENSE_CONFIG";
pub const BIND_ADDR_ENV: &str = "HYDROSENSE_BIND_ADDR";
pub const DEFAULT_CONFIG_PATH: &str = "hydrosense.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub models: ModelPaths,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Largest accepted request body; screenshots are the bulk of it.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub upscale: f32,
    pub contrast: f32,
    pub max_dimension: u32,
    /// Tesseract language code.
    pub language: String,
    /// Directory holding `*.traineddata`; `None` uses Tesseract's default.
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        let p = PreprocessOptions::default();
        Self {
            upscale: p.upscale,
            contrast: p.contrast,
            max_dimension: p.max_dimension,
            language: "eng".to_string(),
            tessdata_dir: None,
        }
    }
}

impl OcrConfig {
    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            upscale: self.upscale,
            contrast: self.contrast,
            max_dimension: self.max_dimension,
        }
    }
}

/// Locations of the externally trained classifier artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    pub hydration_model: PathBuf,
    pub hydration_labels: PathBuf,
    pub season_model: PathBuf,
    pub season_labels: PathBuf,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            hydration_model: "models/hydration_model.json".into(),
            hydration_labels: "models/hydration_labels.json".into(),
            season_model: "models/season_model.json".into(),
            season_labels: "models/season_labels.json".into(),
        }
    }
}

impl ModelPaths {
    /// Resolve relative artifact paths against `base`.
    pub fn relative_to(&self, base: &Path) -> ModelPaths {
        let join = |p: &PathBuf| if p.is_absolute() { p.clone() } else { base.join(p) };
        ModelPaths {
            hydration_model: join(&self.hydration_model),
            hydration_labels: join(&self.hydration_labels),
            season_model: join(&self.season_model),
            season_labels: join(&self.season_labels),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// Bunyan-style JSON lines.
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; relative model paths are taken relative to the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(dir) = path.parent() {
            config.models = config.models.relative_to(dir);
        }
        Ok(config)
    }

    /// Resolve configuration from an optional explicit path and bind-address
    /// override. An explicit path must exist; the default path may be absent.
    pub fn resolve(
        explicit_path: Option<PathBuf>,
        bind_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match explicit_path {
            Some(path) => Self::load(&path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load(path)?
                } else {
                    AppConfig::default()
                }
            }
        };
        if let Some(addr) = bind_override {
            config.server.bind_addr = addr;
        }
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var(BIND_ADDR_ENV).ok(),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("server.max_upload_bytes must be positive".into()));
        }
        if self.ocr.upscale.is_nan() || self.ocr.upscale <= 0.0 {
            return Err(ConfigError::Invalid("ocr.upscale must be positive".into()));
        }
        if self.ocr.contrast.is_nan() || self.ocr.contrast < 0.0 {
            return Err(ConfigError::Invalid("ocr.contrast must not be negative".into()));
        }
        if self.ocr.max_dimension == 0 {
            return Err(ConfigError::Invalid("ocr.max_dimension must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.bind_addr, "127.0.0.1:8501");
        assert_eq!(config.ocr.preprocess_options(), PreprocessOptions::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            bind_addr = "0.0.0.0:9000"

            [ocr]
            contrast = 1.5
            tessdata_dir = "/usr/share/tessdata"

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.ocr.contrast, 1.5);
        assert_eq!(config.ocr.upscale, 2.0);
        assert_eq!(config.ocr.tessdata_dir, Some(PathBuf::from("/usr/share/tessdata")));
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn rejects_nonsense_values() {
        assert!(matches!(
            AppConfig::from_toml("[ocr]\nupscale = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[server]\nmax_upload_bytes = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[log]\nformat = \"xml\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_resolves_models_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydrosense.toml");
        std::fs::write(
            &path,
            "[models]\nseason_model = \"/abs/season.json\"\n",
        )
        .unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.models.season_model, PathBuf::from("/abs/season.json"));
        assert_eq!(
            config.models.hydration_model,
            dir.path().join("models/hydration_model.json")
        );
    }

    #[test]
    fn explicit_missing_path_is_an_error_and_override_applies() {
        let err = AppConfig::resolve(Some("/nonexistent/hydrosense.toml".into()), None);
        assert!(matches!(err, Err(ConfigError::Io { .. })));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.toml");
        std::fs::write(&path, "").unwrap();
        let config = AppConfig::resolve(Some(path), Some("0.0.0.0:1234".into())).unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:1234");
    }
}
