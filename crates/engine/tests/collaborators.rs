use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{Json, Router, extract::Path, http::StatusCode, response::IntoResponse, routing::get};
use sea_orm::DbErr;
use serde_json::json;
use uuid::Uuid;

use engine::{
    Budget, BudgetFields, BudgetPatch, BudgetStore, BudgetWindow, Category, CategoryFields,
    CategoryPatch, Engine, EngineError, HttpIdentity, IdentityLookup, NewBudget, ResultEngine,
    UserProfile,
};

struct DownIdentity;

#[async_trait]
impl IdentityLookup for DownIdentity {
    async fn resolve_user(&self, _user_id: &str) -> ResultEngine<Option<UserProfile>> {
        Err(EngineError::Identity("user service down".to_string()))
    }
}

struct EveryoneExists;

#[async_trait]
impl IdentityLookup for EveryoneExists {
    async fn resolve_user(&self, user_id: &str) -> ResultEngine<Option<UserProfile>> {
        Ok(Some(UserProfile {
            id: user_id.to_string(),
            name: None,
        }))
    }
}

/// Fails every call and counts how often it was reached.
#[derive(Default)]
struct DownStore {
    calls: AtomicUsize,
}

impl DownStore {
    fn fail<T>(&self) -> ResultEngine<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::Database(DbErr::Custom("store down".to_string())))
    }
}

#[async_trait]
impl BudgetStore for DownStore {
    async fn insert(&self, _budget: &NewBudget) -> ResultEngine<Uuid> {
        self.fail()
    }

    async fn find_one(&self, _owner_id: &str, _budget_id: Uuid) -> ResultEngine<Option<Budget>> {
        self.fail()
    }

    async fn find_all_by_owner(&self, _owner_id: &str) -> ResultEngine<Vec<Budget>> {
        self.fail()
    }

    async fn delete(&self, _owner_id: &str, _budget_id: Uuid) -> ResultEngine<u64> {
        self.fail()
    }

    async fn push_category(
        &self,
        _owner_id: &str,
        _budget_id: Uuid,
        _category: &Category,
    ) -> ResultEngine<bool> {
        self.fail()
    }

    async fn pull_category(
        &self,
        _owner_id: &str,
        _budget_id: Uuid,
        _category_id: Uuid,
    ) -> ResultEngine<bool> {
        self.fail()
    }

    async fn update_budget_fields(
        &self,
        _owner_id: &str,
        _budget_id: Uuid,
        _fields: &BudgetFields,
    ) -> ResultEngine<bool> {
        self.fail()
    }

    async fn update_category_fields(
        &self,
        _owner_id: &str,
        _budget_id: Uuid,
        _category_id: Uuid,
        _fields: &CategoryFields,
    ) -> ResultEngine<bool> {
        self.fail()
    }
}

fn rename() -> BudgetPatch {
    BudgetPatch {
        name: Some("Renamed".to_string()),
        ..Default::default()
    }
}

fn relimit() -> CategoryPatch {
    CategoryPatch {
        limit_minor: Some(10),
        ..Default::default()
    }
}

/// Runs every operation and returns the errors in a fixed order.
async fn every_error(engine: &Engine) -> Vec<EngineError> {
    let id = Uuid::new_v4();
    let category = Uuid::new_v4();
    vec![
        engine
            .create_budget("u1", "Food", 1, BudgetWindow::period("month"))
            .await
            .unwrap_err(),
        engine.budget("u1", id).await.unwrap_err(),
        engine.budgets("u1").await.unwrap_err(),
        engine.update_budget("u1", id, rename()).await.unwrap_err(),
        engine.delete_budget("u1", id).await.unwrap_err(),
        engine.add_category("u1", id, "Groceries", 1).await.unwrap_err(),
        engine
            .update_category("u1", id, category, relimit())
            .await
            .unwrap_err(),
        engine.delete_category("u1", id, category).await.unwrap_err(),
    ]
}

#[tokio::test]
async fn identity_failure_stops_every_operation() {
    let store = Arc::new(DownStore::default());
    let engine = Engine::builder()
        .identity(Arc::new(DownIdentity))
        .store(store.clone())
        .build()
        .unwrap();

    let down = EngineError::Identity("user service down".to_string());
    for err in every_error(&engine).await {
        assert_eq!(err, down);
    }
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn store_failure_is_returned_unchanged() {
    let store = Arc::new(DownStore::default());
    let engine = Engine::builder()
        .identity(Arc::new(EveryoneExists))
        .store(store.clone())
        .build()
        .unwrap();

    let down = EngineError::Database(DbErr::Custom("store down".to_string()));
    let errors = every_error(&engine).await;
    assert_eq!(errors.len(), 8);
    for err in errors {
        assert_eq!(err, down);
    }
    // One failing call per operation: nothing is retried.
    assert_eq!(store.calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn empty_patches_never_reach_collaborators() {
    let store = Arc::new(DownStore::default());
    let engine = Engine::builder()
        .identity(Arc::new(DownIdentity))
        .store(store.clone())
        .build()
        .unwrap();

    let err = engine
        .update_budget("u1", Uuid::new_v4(), BudgetPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    let err = engine
        .update_category("u1", Uuid::new_v4(), Uuid::new_v4(), CategoryPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

async fn user_service() -> String {
    async fn user(Path(id): Path<String>) -> impl IntoResponse {
        match id.as_str() {
            "u1" => (StatusCode::OK, Json(json!({ "id": "u1", "name": "One" }))).into_response(),
            "nameless" => (StatusCode::OK, Json(json!({ "id": "nameless" }))).into_response(),
            "garbled" => (StatusCode::OK, "not json").into_response(),
            "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/api/users/{id}", get(user));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

#[tokio::test]
async fn http_identity_maps_responses() {
    let base = user_service().await;
    let identity = HttpIdentity::new(reqwest::Client::new(), &base).unwrap();

    assert_eq!(
        identity.resolve_user("u1").await.unwrap(),
        Some(UserProfile {
            id: "u1".to_string(),
            name: Some("One".to_string()),
        })
    );
    assert_eq!(
        identity.resolve_user("nameless").await.unwrap(),
        Some(UserProfile {
            id: "nameless".to_string(),
            name: None,
        })
    );
    assert_eq!(identity.resolve_user("ghost").await.unwrap(), None);
    assert!(matches!(
        identity.resolve_user("broken").await,
        Err(EngineError::Identity(_))
    ));
    assert!(matches!(
        identity.resolve_user("garbled").await,
        Err(EngineError::Identity(_))
    ));
}

#[tokio::test]
async fn engine_over_http_identity() {
    let base = user_service().await;
    let engine = Engine::builder()
        .identity(Arc::new(
            HttpIdentity::new(reqwest::Client::new(), &base).unwrap(),
        ))
        .store(Arc::new(DownStore::default()))
        .build()
        .unwrap();

    assert_eq!(
        engine.budgets("ghost").await.unwrap_err(),
        EngineError::KeyNotFound("user not exists".to_string())
    );
    assert!(matches!(
        engine.budgets("broken").await,
        Err(EngineError::Identity(_))
    ));
    // A known user gets as far as the store.
    assert!(matches!(
        engine.budgets("u1").await,
        Err(EngineError::Database(_))
    ));
}
