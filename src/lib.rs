pub use sqlx::Error as DbError;
pub use sqlx::SqlitePool as Pool;

pub mod articles;
pub mod configuration;
pub mod database;
pub mod errors;
pub mod model;
pub mod observability;
pub mod rate_limiting;
pub mod routes;
pub mod services;
pub mod startup;
