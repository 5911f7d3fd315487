pub mod crm_record;
pub mod user;
pub mod verification_token;
