use async_trait::async_trait;
use serde::Deserialize;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::error;

use crate::database::model::{Item, ItemDraft};
use crate::database::DatabaseError;

/// Fields the item listing can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Title,
    Description,
    Completed,
}

/// Pagination and filtering parameters for `get_items`.
///
/// Title and description filters match by substring containment; the
/// completed filter matches by boolean equality. A filter applies only
/// when both field and value are present.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub filter_field: Option<FilterField>,
    #[serde(default)]
    pub filter_value: Option<String>,
}

fn default_limit() -> i64 {
    20
}

impl ListQuery {
    /// Reject negative pagination values before they reach storage;
    /// callers see them as a client error, not a storage failure.
    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.limit < 0 {
            return Err(DatabaseError::InvalidPagination(self.limit));
        }
        if self.offset < 0 {
            return Err(DatabaseError::InvalidPagination(self.offset));
        }
        Ok(())
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            filter_field: None,
            filter_value: None,
        }
    }
}

/// CRUD operations against the items table.
///
/// One concrete implementation talks to PostgreSQL; tests substitute an
/// in-memory implementation of the same trait.
#[async_trait]
pub trait ItemRepository: Send {
    async fn get_item(&mut self, id: i32) -> Result<Item, DatabaseError>;
    async fn get_items(&mut self, query: &ListQuery) -> Result<Vec<Item>, DatabaseError>;
    async fn insert_item(&mut self, draft: &ItemDraft) -> Result<bool, DatabaseError>;
    async fn update_item(&mut self, id: i32, draft: &ItemDraft) -> Result<bool, DatabaseError>;
    async fn delete_item(&mut self, id: i32) -> Result<bool, DatabaseError>;
}

/// Repository bound to one open PostgreSQL session.
pub struct PgItemRepository {
    session: PgConnection,
    table: String,
}

impl PgItemRepository {
    pub fn new(session: PgConnection, table: impl Into<String>) -> Self {
        Self {
            session,
            table: table.into(),
        }
    }

    /// Hand the session back so the unit of work can close it.
    pub(crate) fn into_session(self) -> PgConnection {
        self.session
    }

    fn table_ident(&self) -> String {
        quote_identifier(&self.table)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Parse the filter value for the completed field as a boolean.
fn parse_completed(value: &str) -> Result<bool, DatabaseError> {
    value
        .parse::<bool>()
        .map_err(|_| DatabaseError::InvalidFilter(value.to_string()))
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn get_item(&mut self, id: i32) -> Result<Item, DatabaseError> {
        let sql = format!(
            "SELECT id, title, description, completed FROM {} WHERE id = $1",
            self.table_ident()
        );
        let row = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&mut self.session)
            .await
            .map_err(|err| {
                error!("Caught error during getting Item(Id {}): {}", id, err);
                err
            })?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Item {} not found", id)))
    }

    async fn get_items(&mut self, query: &ListQuery) -> Result<Vec<Item>, DatabaseError> {
        query.validate()?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT id, title, description, completed FROM {}",
            self.table_ident()
        ));

        if let (Some(field), Some(value)) = (query.filter_field, query.filter_value.as_deref()) {
            match field {
                FilterField::Title => {
                    builder.push(" WHERE title LIKE ");
                    builder.push_bind(format!("%{}%", value));
                }
                FilterField::Description => {
                    builder.push(" WHERE description LIKE ");
                    builder.push_bind(format!("%{}%", value));
                }
                FilterField::Completed => {
                    builder.push(" WHERE completed = ");
                    builder.push_bind(parse_completed(value)?);
                }
            }
        }

        builder.push(" OFFSET ");
        builder.push_bind(query.offset);
        builder.push(" LIMIT ");
        builder.push_bind(query.limit);

        builder
            .build_query_as::<Item>()
            .fetch_all(&mut self.session)
            .await
            .map_err(|err| {
                error!("Caught error during getting Items: {}", err);
                err.into()
            })
    }

    async fn insert_item(&mut self, draft: &ItemDraft) -> Result<bool, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (title, description, completed) VALUES ($1, $2, $3)",
            self.table_ident()
        );
        sqlx::query(&sql)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.completed)
            .execute(&mut self.session)
            .await
            .map_err(|err| {
                error!("Caught error during Item upload: {}", err);
                err
            })?;
        Ok(true)
    }

    async fn update_item(&mut self, id: i32, draft: &ItemDraft) -> Result<bool, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET title = $1, description = $2, completed = $3 WHERE id = $4",
            self.table_ident()
        );
        let result = sqlx::query(&sql)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.completed)
            .bind(id)
            .execute(&mut self.session)
            .await
            .map_err(|err| {
                error!("Caught error during Item(Id: {}) update: {}", id, err);
                err
            })?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Item {} not found", id)));
        }
        Ok(true)
    }

    async fn delete_item(&mut self, id: i32) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table_ident());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&mut self.session)
            .await
            .map_err(|err| {
                error!("Caught error during Item(Id: {}) deletion: {}", id, err);
                err
            })?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Item {} not found", id)));
        }
        Ok(true)
    }
}
