use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in the items table. `id` is assigned by the database on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Request body for inserts and updates. Carries no id; `completed`
/// defaults to false when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}
