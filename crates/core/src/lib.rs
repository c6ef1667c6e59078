//! Shared foundation for the Cinelog services
//!
//! Everything the service crates have in common lives here: the error
//! type and `Result` alias, environment-driven configuration, the
//! Postgres pool wrapper, domain models, input validation helpers, and
//! the pagination envelope.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod pagination;
pub mod validation;

pub use config::{load_dotenv, DatabaseConfig, ServiceConfig};
pub use database::DatabasePool;
pub use error::{CinelogError, Result};
pub use pagination::{Page, Paginated, Pagination, PaginationParams};
