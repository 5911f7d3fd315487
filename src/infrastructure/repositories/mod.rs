//! Repository implementations using SeaORM

pub mod crm_record_repository;
pub mod reset_token_repository;
pub mod user_repository;

pub use crm_record_repository::SeaOrmCrmRecordRepository;
pub use reset_token_repository::SeaOrmResetTokenRepository;
pub use user_repository::SeaOrmUserRepository;
