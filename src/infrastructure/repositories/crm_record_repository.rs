//! SeaORM implementation of CrmRecordRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{CrmRecord, CrmRecordRepository, DomainError, NewCrmRecord};
use crate::models::crm_record::{self, ActiveModel, Entity as CrmRecordEntity};

/// SeaORM-based implementation of CrmRecordRepository
pub struct SeaOrmCrmRecordRepository {
    db: DatabaseConnection,
}

impl SeaOrmCrmRecordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<crm_record::Model> for CrmRecord {
    fn from(m: crm_record::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            raw: m.raw,
            processed: m.processed,
            r#type: m.r#type,
            created_at: m.created_at,
        }
    }
}

#[async_trait]
impl CrmRecordRepository for SeaOrmCrmRecordRepository {
    async fn create(&self, record: NewCrmRecord) -> Result<CrmRecord, DomainError> {
        if record.processed.is_empty() {
            return Err(DomainError::Validation("processed output is empty".into()));
        }

        let model = ActiveModel {
            user_id: Set(record.user_id),
            raw: Set(record.raw),
            processed: Set(record.processed),
            r#type: Set(record.record_type),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await?;
        Ok(result.into())
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<CrmRecord>, DomainError> {
        let records = CrmRecordEntity::find()
            .filter(crm_record::Column::UserId.eq(user_id))
            .order_by_desc(crm_record::Column::Id)
            .all(&self.db)
            .await?;

        Ok(records.into_iter().map(CrmRecord::from).collect())
    }
}
