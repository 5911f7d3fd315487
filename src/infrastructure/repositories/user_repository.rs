//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};

use crate::domain::{Account, AccountCredentials, DomainError, NewAccount, UserRepository};
use crate::models::user::{self, ActiveModel, Entity as UserEntity};

/// SeaORM-based implementation of UserRepository
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_account(model: &user::Model) -> Account {
    Account {
        id: model.id,
        name: model.name.clone(),
        email: model.email.clone(),
        created_at: model.created_at.clone(),
    }
}

/// A concurrent signup can slip past the lookup in `create`; the UNIQUE
/// index on `users.email` still rejects it and that is a conflict too.
fn insert_error(err: DbErr, email: &str) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict(format!("email {} already registered", email))
        }
        _ => err.into(),
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountCredentials>, DomainError> {
        let found = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(found.map(|u| AccountCredentials {
            account: to_account(&u),
            password_hash: u.password_hash,
        }))
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DomainError> {
        let existing = UserEntity::find()
            .filter(user::Column::Email.eq(&account.email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!(
                "email {} already registered",
                account.email
            )));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let email = account.email;
        let model = ActiveModel {
            name: Set(account.name),
            email: Set(email.clone()),
            password_hash: Set(account.password_hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| insert_error(e, &email))?;
        Ok(to_account(&result))
    }

    async fn update_password(
        &self,
        email: &str,
        password_hash: String,
    ) -> Result<(), DomainError> {
        let found = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = found.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.db).await?;

        Ok(())
    }
}
