pub mod billing;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;

pub use billing::{BillingEngine, MemoryStore, PgAgencyStore};
pub use error::{AppError, AppResult};
