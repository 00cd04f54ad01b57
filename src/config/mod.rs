use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Secret used outside production when `JWT_SECRET` is not set.
const DEVELOPMENT_JWT_SECRET: &str = "rental-kpi-development-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Booking spreadsheet replaced by uploads
    pub dataset_path: PathBuf,
    /// Persisted KPI settings document
    pub settings_path: PathBuf,
    pub database_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_minutes: i64,
    pub bcrypt_cost: u32,
    /// Empty means any origin is allowed
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,
    #[serde(skip_serializing)]
    pub admin_password: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in production")]
    MissingJwtSecret,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(port) = env::var("RENTAL_KPI_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.server.port = port;
        }

        // Storage overrides
        if let Ok(v) = env::var("DATASET_PATH") {
            self.storage.dataset_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SETTINGS_PATH") {
            self.storage.settings_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.storage.database_url = v;
        }

        if let Ok(v) = env::var("API_MAX_UPLOAD_BYTES") {
            self.api.max_upload_bytes = v.parse().unwrap_or(self.api.max_upload_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_MINUTES") {
            self.security.jwt_expiry_minutes = v.parse().unwrap_or(self.security.jwt_expiry_minutes);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Bootstrap admin
        self.bootstrap.admin_email = env::var("ADMIN_EMAIL").ok().filter(|s| !s.trim().is_empty());
        self.bootstrap.admin_password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        self
    }

    /// Fill in the development JWT secret where allowed; production must configure one.
    pub fn resolve_secrets(mut self) -> Result<Self, ConfigError> {
        if self.security.jwt_secret.is_empty() {
            if self.environment == Environment::Production {
                return Err(ConfigError::MissingJwtSecret);
            }
            tracing::warn!("JWT_SECRET not set, using the development secret");
            self.security.jwt_secret = DEVELOPMENT_JWT_SECRET.to_string();
        }
        Ok(self)
    }

    fn default_storage() -> StorageConfig {
        StorageConfig {
            dataset_path: PathBuf::from("2025_staysBD.xlsx"),
            settings_path: PathBuf::from("config.json"),
            database_url: "sqlite://rental_kpi.db?mode=rwc".to_string(),
        }
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8000 },
            storage: Self::default_storage(),
            api: ApiConfig {
                max_upload_bytes: 50 * 1024 * 1024, // 50MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_minutes: 30,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                cors_origins: Vec::new(),
            },
            bootstrap: BootstrapConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8000 },
            storage: Self::default_storage(),
            api: ApiConfig {
                max_upload_bytes: 25 * 1024 * 1024, // 25MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_minutes: 60,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            bootstrap: BootstrapConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8000 },
            storage: Self::default_storage(),
            api: ApiConfig {
                max_upload_bytes: 25 * 1024 * 1024, // 25MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_minutes: 30,
                bcrypt_cost: 12,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            bootstrap: BootstrapConfig::default(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
