//! SeaORM implementation of ResetTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::{DomainError, ResetToken, ResetTokenRepository};
use crate::models::verification_token::{self, ActiveModel, Entity as TokenEntity};

pub struct SeaOrmResetTokenRepository {
    db: DatabaseConnection,
}

impl SeaOrmResetTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResetTokenRepository for SeaOrmResetTokenRepository {
    async fn create(&self, token: ResetToken) -> Result<(), DomainError> {
        let model = ActiveModel {
            identifier: Set(token.identifier),
            token: Set(token.token),
            expires: Set(token.expires.to_rfc3339()),
            ..Default::default()
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<ResetToken>, DomainError> {
        let Some(found) = TokenEntity::find()
            .filter(verification_token::Column::Token.eq(token))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let expires = DateTime::parse_from_rfc3339(&found.expires)
            .map_err(|e| DomainError::Internal(format!("bad token expiry: {}", e)))?
            .with_timezone(&Utc);

        Ok(Some(ResetToken {
            identifier: found.identifier,
            token: found.token,
            expires,
        }))
    }

    async fn delete(&self, token: &str) -> Result<(), DomainError> {
        TokenEntity::delete_many()
            .filter(verification_token::Column::Token.eq(token))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
