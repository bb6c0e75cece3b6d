#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use todo_items_api::auth::TokenHandler;
use todo_items_api::config::JwtConfig;
use todo_items_api::database::model::{Item, ItemDraft};
use todo_items_api::database::repository::{FilterField, ItemRepository, ListQuery};
use todo_items_api::database::unit_of_work::UnitOfWork;
use todo_items_api::database::DatabaseError;
use todo_items_api::handlers::{self, AppState};
use todo_items_api::services::ItemService;

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-memory stand-in for the PostgreSQL-backed unit of work. Implements
/// the same traits the real one does, so the router under test is wired
/// exactly like production.
#[derive(Clone, Default)]
pub struct InMemoryUnitOfWork {
    items: Arc<Mutex<Vec<Item>>>,
}

impl InMemoryUnitOfWork {
    pub fn seeded(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
        }
    }

    pub fn snapshot(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }
}

pub struct InMemoryRepository {
    items: Arc<Mutex<Vec<Item>>>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    type Repo = InMemoryRepository;

    async fn begin(&self) -> Result<InMemoryRepository, DatabaseError> {
        Ok(InMemoryRepository {
            items: Arc::clone(&self.items),
        })
    }

    async fn end(&self, _repo: InMemoryRepository) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for InMemoryRepository {
    async fn get_item(&mut self, id: i32) -> Result<Item, DatabaseError> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("Item {} not found", id)))
    }

    async fn get_items(&mut self, query: &ListQuery) -> Result<Vec<Item>, DatabaseError> {
        query.validate()?;
        let items = self.items.lock().unwrap();
        let mut matched: Vec<Item> = match (query.filter_field, query.filter_value.as_deref()) {
            (Some(FilterField::Title), Some(value)) => items
                .iter()
                .filter(|item| item.title.contains(value))
                .cloned()
                .collect(),
            (Some(FilterField::Description), Some(value)) => items
                .iter()
                .filter(|item| item.description.contains(value))
                .cloned()
                .collect(),
            (Some(FilterField::Completed), Some(value)) => {
                let flag: bool = value
                    .parse()
                    .map_err(|_| DatabaseError::InvalidFilter(value.to_string()))?;
                items
                    .iter()
                    .filter(|item| item.completed == flag)
                    .cloned()
                    .collect()
            }
            _ => items.clone(),
        };
        matched = matched
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();
        Ok(matched)
    }

    async fn insert_item(&mut self, draft: &ItemDraft) -> Result<bool, DatabaseError> {
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        items.push(Item {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            completed: draft.completed,
        });
        Ok(true)
    }

    async fn update_item(&mut self, id: i32, draft: &ItemDraft) -> Result<bool, DatabaseError> {
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.title = draft.title.clone();
                item.description = draft.description.clone();
                item.completed = draft.completed;
                Ok(true)
            }
            None => Err(DatabaseError::NotFound(format!("Item {} not found", id))),
        }
    }

    async fn delete_item(&mut self, id: i32) -> Result<bool, DatabaseError> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(DatabaseError::NotFound(format!("Item {} not found", id)));
        }
        Ok(true)
    }
}

pub fn token_handler() -> TokenHandler {
    TokenHandler::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
        algorithm: "HS256".to_string(),
        expiration_secs: 600,
    })
    .unwrap()
}

/// Router wired with the in-memory unit of work and a real token handler.
pub fn test_app(uow: InMemoryUnitOfWork) -> Router {
    handlers::router(AppState {
        service: ItemService::new(uow),
        tokens: token_handler(),
    })
}

pub fn sample_items() -> Vec<Item> {
    vec![
        Item {
            id: 1,
            title: "test title".to_string(),
            description: "test description".to_string(),
            completed: false,
        },
        Item {
            id: 2,
            title: "dummy title".to_string(),
            description: "dummy description".to_string(),
            completed: true,
        },
    ]
}

pub fn valid_token() -> String {
    token_handler().create_token().unwrap().access_token
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
