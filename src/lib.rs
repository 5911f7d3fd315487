pub mod api;
pub mod api_docs;
pub mod domain;
pub mod infrastructure;
pub mod intelligence;
pub mod models;

pub use infrastructure::auth;
pub use infrastructure::config;
pub use infrastructure::db;
pub use infrastructure::server;
