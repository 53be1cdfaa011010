use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme + host (+ port). Empty means root-relative URLs behind a proxy.
    pub host: String,
    pub base_path: String,
    pub paths: ApiPaths,
}

/// Named path segments of the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPaths {
    pub public: String,
    pub admin: String,
    pub auth: String,
    pub persona: String,
    pub persone: String,
    pub corsi: String,
    pub corso: String,
    pub dipartimenti: String,
    pub dipartimento: String,
    pub all: String,
    pub staff: String,
    pub direttivo: String,
    pub direttivi: String,
    pub organi: String,
    pub rappresentante: String,
    pub photo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage key of the persisted session; also the file stem on disk.
    pub storage_key: String,
    /// Overrides the default config directory when set.
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_photo_mb: u64,
}

impl UploadConfig {
    pub fn max_photo_bytes(&self) -> u64 {
        self.max_photo_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            public: "public".to_string(),
            admin: "admin".to_string(),
            auth: "auth".to_string(),
            persona: "persona".to_string(),
            persone: "persone".to_string(),
            corsi: "corsi".to_string(),
            corso: "corso".to_string(),
            dipartimenti: "dipartimenti".to_string(),
            dipartimento: "dipartimento".to_string(),
            all: "all".to_string(),
            staff: "staff".to_string(),
            direttivo: "direttivo".to_string(),
            direttivi: "direttivi".to_string(),
            organi: "organi".to_string(),
            rappresentante: "rappresentante".to_string(),
            photo: "foto".to_string(),
        }
    }
}

const DEFAULT_BASE_PATH: &str = "impronta/studentesca/official/api";
const DEFAULT_STORAGE_KEY: &str = "impronta_user";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("API_HOST") {
            self.api.host = v.trim().to_string();
        }
        if let Ok(v) = env::var("API_BASE_PATH") {
            self.api.base_path = v.trim().to_string();
        }
        if let Ok(v) = env::var("API_PHOTO_PATH") {
            self.api.paths.photo = v.trim().to_string();
        }
        if let Ok(v) = env::var("SESSION_STORAGE_KEY") {
            if !v.trim().is_empty() {
                self.session.storage_key = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("BACKOFFICE_CONFIG_DIR") {
            self.session.config_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("UPLOAD_MAX_PHOTO_MB") {
            // 0 and anything past u64 bytes keep the preset
            self.upload.max_photo_mb = v
                .parse()
                .ok()
                .filter(|mb: &u64| *mb > 0 && mb.checked_mul(1024 * 1024).is_some())
                .unwrap_or(self.upload.max_photo_mb);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                host: "http://localhost:8080".to_string(),
                base_path: DEFAULT_BASE_PATH.to_string(),
                paths: ApiPaths::default(),
            },
            session: SessionConfig {
                storage_key: DEFAULT_STORAGE_KEY.to_string(),
                config_dir: None,
            },
            upload: UploadConfig { max_photo_mb: 10 },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                // must come from API_HOST
                host: String::new(),
                base_path: DEFAULT_BASE_PATH.to_string(),
                paths: ApiPaths::default(),
            },
            session: SessionConfig {
                storage_key: DEFAULT_STORAGE_KEY.to_string(),
                config_dir: None,
            },
            upload: UploadConfig { max_photo_mb: 10 },
        }
    }

    /// Same configuration pointed at another API host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.api.host = host.into();
        self
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.host, "http://localhost:8080");
        assert_eq!(config.api.base_path, "impronta/studentesca/official/api");
        assert_eq!(config.session.storage_key, "impronta_user");
        assert_eq!(config.upload.max_photo_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_huge_photo_limit_saturates() {
        let upload = UploadConfig { max_photo_mb: u64::MAX / 1024 };
        assert_eq!(upload.max_photo_bytes(), u64::MAX);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.api.host.is_empty());
        assert_eq!(config.api.paths.photo, "foto");
    }

    #[test]
    fn test_with_host_keeps_paths() {
        let config = AppConfig::development().with_host("http://127.0.0.1:9999");
        assert_eq!(config.api.host, "http://127.0.0.1:9999");
        assert_eq!(config.api.paths.dipartimenti, "dipartimenti");
    }
}
