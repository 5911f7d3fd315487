//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{CrmRecordRepository, DomainError, ResetTokenRepository, UserRepository};
use crate::infrastructure::config::Config;
use crate::infrastructure::{
    SeaOrmCrmRecordRepository, SeaOrmResetTokenRepository, SeaOrmUserRepository,
};
use crate::intelligence::{CompletionProvider, IntelligenceService, OpenAiProvider};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub config: Arc<Config>,
    /// User accounts
    pub user_repo: Arc<dyn UserRepository>,
    /// Saved generation outputs
    pub crm_repo: Arc<dyn CrmRecordRepository>,
    /// Password reset tokens
    pub reset_token_repo: Arc<dyn ResetTokenRepository>,
    pub intelligence: IntelligenceService,
}

impl AppState {
    /// Create a new AppState backed by the OpenAI provider from `config`
    pub fn new(db: DatabaseConnection, config: Config) -> Result<Self, DomainError> {
        let provider = OpenAiProvider::new(&config.openai)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(Self::with_provider(db, config, Arc::new(provider)))
    }

    /// Same as `new` with a caller-supplied completion provider
    pub fn with_provider(
        db: DatabaseConnection,
        config: Config,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let crm_repo = Arc::new(SeaOrmCrmRecordRepository::new(db.clone()));
        let reset_token_repo = Arc::new(SeaOrmResetTokenRepository::new(db.clone()));

        Self {
            db,
            config: Arc::new(config),
            user_repo,
            crm_repo,
            reset_token_repo,
            intelligence: IntelligenceService::new(provider),
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

