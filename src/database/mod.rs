pub mod connector;
pub mod model;
pub mod repository;
pub mod unit_of_work;

use thiserror::Error;

pub use connector::Connector;
pub use model::{Item, ItemDraft};
pub use repository::{ItemRepository, PgItemRepository};
pub use unit_of_work::{PgUnitOfWork, UnitOfWork};

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid filter value: {0}")]
    InvalidFilter(String),

    #[error("Invalid pagination value: {0}")]
    InvalidPagination(i64),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
