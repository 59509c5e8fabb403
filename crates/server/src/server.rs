use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{budgets, categories};
use engine::Engine;

static USER_ID_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static(api_types::USER_ID_HEADER);

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// `TypedHeader` for the caller identity.
///
/// Every request must contain a non-blank "user-id" entry in the header.
/// Whether the user exists is decided by the engine, not here.
#[derive(Debug)]
struct UserIdHeader(String);

impl Header for UserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(UserIdHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode user-id header"),
        }
    }
}

/// Identifier of the user issuing the request.
#[derive(Clone, Debug)]
pub(crate) struct Caller(pub(crate) String);

async fn identify(
    TypedHeader(user_id): TypedHeader<UserIdHeader>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(Caller(user_id.0));
    next.run(request).await
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{budget_id}",
            get(budgets::get)
                .patch(budgets::update)
                .delete(budgets::delete),
        )
        .route(
            "/budgets/{budget_id}/categories",
            post(categories::create),
        )
        .route(
            "/budgets/{budget_id}/categories/{category_id}",
            patch(categories::update).delete(categories::delete),
        )
        .route_layer(middleware::from_fn(identify))
        .with_state(state)
}

/// Build the HTTP application around an engine.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}
