use crate::database::model::{Item, ItemDraft};
use crate::database::repository::{ItemRepository, ListQuery};
use crate::database::unit_of_work::UnitOfWork;
use crate::database::DatabaseError;

/// Pass-through orchestration: each operation opens a unit-of-work scope,
/// delegates to the repository, and closes the scope on both the success
/// and the failure path before surfacing the result.
#[derive(Clone)]
pub struct ItemService<U: UnitOfWork> {
    uow: U,
}

impl<U: UnitOfWork> ItemService<U> {
    pub fn new(uow: U) -> Self {
        Self { uow }
    }

    pub async fn get_item(&self, id: i32) -> Result<Item, DatabaseError> {
        let mut repo = self.uow.begin().await?;
        let result = repo.get_item(id).await;
        self.uow.end(repo).await?;
        result
    }

    pub async fn get_items(&self, query: &ListQuery) -> Result<Vec<Item>, DatabaseError> {
        let mut repo = self.uow.begin().await?;
        let result = repo.get_items(query).await;
        self.uow.end(repo).await?;
        result
    }

    pub async fn insert_item(&self, draft: &ItemDraft) -> Result<bool, DatabaseError> {
        let mut repo = self.uow.begin().await?;
        let result = repo.insert_item(draft).await;
        self.uow.end(repo).await?;
        result
    }

    pub async fn update_item(&self, id: i32, draft: &ItemDraft) -> Result<bool, DatabaseError> {
        let mut repo = self.uow.begin().await?;
        let result = repo.update_item(id, draft).await;
        self.uow.end(repo).await?;
        result
    }

    pub async fn delete_item(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut repo = self.uow.begin().await?;
        let result = repo.delete_item(id).await;
        self.uow.end(repo).await?;
        result
    }

    /// Connectivity probe for the health endpoint: opens and closes a scope.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let repo = self.uow.begin().await?;
        self.uow.end(repo).await
    }
}
