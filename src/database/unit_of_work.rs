use async_trait::async_trait;
use sqlx::Connection;
use tracing::debug;

use crate::database::connector::Connector;
use crate::database::repository::{ItemRepository, PgItemRepository};
use crate::database::DatabaseError;

/// Scoped acquisition of one database session and the repository bound to it.
///
/// `begin` opens the session; `end` must run on every exit path and closes
/// the session exactly once. Close failures are propagated, not swallowed.
/// A scope is not reentrant: one open session per `begin`.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Repo: ItemRepository;

    async fn begin(&self) -> Result<Self::Repo, DatabaseError>;
    async fn end(&self, repo: Self::Repo) -> Result<(), DatabaseError>;
}

/// Unit of work backed by a dedicated PostgreSQL session per scope.
#[derive(Debug, Clone)]
pub struct PgUnitOfWork {
    connector: Connector,
    table: String,
}

impl PgUnitOfWork {
    pub fn new(connector: Connector, table: impl Into<String>) -> Self {
        Self {
            connector,
            table: table.into(),
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    type Repo = PgItemRepository;

    async fn begin(&self) -> Result<PgItemRepository, DatabaseError> {
        // If the connect fails there is no session left behind to clean up.
        let session = self.connector.connect().await?;
        Ok(PgItemRepository::new(session, self.table.clone()))
    }

    async fn end(&self, repo: PgItemRepository) -> Result<(), DatabaseError> {
        debug!("Exiting scope. Closing connection to database.");
        repo.into_session().close().await?;
        Ok(())
    }
}
