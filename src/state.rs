use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::auth::{hash_password, ROLE_ADMIN};
use crate::config::AppConfig;
use crate::database::{DatabaseManager, UserRepository};
use crate::dataset::DatasetStore;
use crate::settings::SettingsStore;

/// Shared application state, injected into handlers as an `Extension`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
    pub datasets: Arc<DatasetStore>,
    pub settings: Arc<SettingsStore>,
    /// Serializes dataset uploads and settings writes
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Connect the user database, create its schema and wire up the file stores.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let pool = DatabaseManager::connect(&config.storage.database_url).await?;
        UserRepository::new(pool.clone()).ensure_schema().await?;

        Ok(Self {
            datasets: Arc::new(DatasetStore::new(&config.storage.dataset_path)),
            settings: Arc::new(SettingsStore::new(&config.storage.settings_path)),
            config: Arc::new(config),
            pool,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Create the configured admin account if no account has that email yet.
    pub async fn bootstrap_admin(&self) -> anyhow::Result<()> {
        let users = self.users();
        let bootstrap = &self.config.bootstrap;
        let (Some(email), Some(password)) = (&bootstrap.admin_email, &bootstrap.admin_password) else {
            if users.count_admins().await? == 0 {
                warn!("No admin account exists and ADMIN_EMAIL/ADMIN_PASSWORD are not set");
            }
            return Ok(());
        };

        if users.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        let hashed = hash_password(password.clone(), self.config.security.bcrypt_cost).await?;
        users.create(email, &hashed, ROLE_ADMIN).await?;
        info!("Created bootstrap admin account {}", email);
        Ok(())
    }
}
