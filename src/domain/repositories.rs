//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::Serialize;

use super::DomainError;

/// Account data as seen by the API (never carries the password hash)
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// Account plus the stored credential, for login checks only
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account: Account,
    pub password_hash: String,
}

/// Input for creating an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an account by (normalized) email
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountCredentials>, DomainError>;

    /// Create a new account. Fails with `Conflict` if the email is taken.
    async fn create(&self, account: NewAccount) -> Result<Account, DomainError>;

    /// Replace the password hash of the account with this email
    async fn update_password(&self, email: &str, password_hash: String)
    -> Result<(), DomainError>;
}

/// A saved raw/processed pair
#[derive(Debug, Clone, Serialize)]
pub struct CrmRecord {
    pub id: i32,
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub raw: String,
    pub processed: String,
    pub r#type: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Input for saving a record
#[derive(Debug, Clone)]
pub struct NewCrmRecord {
    pub user_id: i32,
    pub raw: String,
    pub processed: String,
    pub record_type: String,
}

/// Repository trait for CRM records
#[async_trait]
pub trait CrmRecordRepository: Send + Sync {
    /// Insert one record
    async fn create(&self, record: NewCrmRecord) -> Result<CrmRecord, DomainError>;

    /// All records owned by a user, newest first
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<CrmRecord>, DomainError>;
}

/// Stored password reset token
#[derive(Debug, Clone)]
pub struct ResetToken {
    pub identifier: String,
    pub token: String,
    pub expires: chrono::DateTime<chrono::Utc>,
}

impl ResetToken {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.expires < now
    }
}

/// Repository trait for password reset tokens
#[async_trait]
pub trait ResetTokenRepository: Send + Sync {
    async fn create(&self, token: ResetToken) -> Result<(), DomainError>;

    async fn find(&self, token: &str) -> Result<Option<ResetToken>, DomainError>;

    async fn delete(&self, token: &str) -> Result<(), DomainError>;
}
