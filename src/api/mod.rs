//! HTTP backend - a small REST surface over the marketplace service.
//!
//! Accounts authenticate with argon2-hashed passwords and receive an HMAC-signed bearer
//! token carrying `{id, role}`. Creating meals and placing orders requires a token of the
//! matching account; the other routes are open. Errors are answered as
//! `{ "error": message }` with a status derived from the error kind.

mod auth;
mod error;
mod meals;
mod orders;

use crate::{core::auth::TokenSigner, errors::Result, service::MarketplaceService};
use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    /// Marketplace operations
    pub service: Arc<MarketplaceService>,
    /// Bearer token signer
    pub signer: Arc<TokenSigner>,
}

impl AppState {
    /// Bundles a service with a signer keyed by `token_secret`.
    #[must_use]
    pub fn new(service: MarketplaceService, token_secret: &str) -> Self {
        Self {
            service: Arc::new(service),
            signer: Arc::new(TokenSigner::new(token_secret.as_bytes())),
        }
    }
}

/// Builds the router with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/meals", get(meals::list).post(meals::create))
        .route("/orders", get(orders::list).post(orders::create))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Marmita Connect API is running"
}

/// Serves the API on `addr` until the listener fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        config::seed::SeedConfig,
        core::{auth::Claims, seed::seed_initial_data},
        models::UserRole,
        service::SimulatedLatency,
        test_utils::setup_test_db,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    async fn demo_state() -> AppState {
        let db = setup_test_db().await.unwrap();
        seed_initial_data(&db, &SeedConfig::demo()).await.unwrap();
        AppState::new(
            MarketplaceService::new(db, SimulatedLatency::disabled()),
            SECRET,
        )
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn token_for(state: &AppState, id: i64, role: UserRole) -> String {
        state.signer.sign(&Claims::new(id, role)).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let state = demo_state().await;
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let state = demo_state().await;

        let (status, body) = send(
            &state,
            "POST",
            "/auth/register",
            None,
            Some(json!({"name": "Ana", "email": "ana@marmita.com", "password": "pw", "role": "client"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "client");
        assert_eq!(body["user"]["email"], "ana@marmita.com");
        assert!(body["user"].get("passwordHash").is_none());
        let claims = state.signer.verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.role, UserRole::Client);

        let (status, body) = send(
            &state,
            "POST",
            "/auth/register",
            None,
            Some(json!({"name": "Ana", "email": "ana@marmita.com", "password": "pw", "role": "client"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("ana@marmita.com"));

        let (status, body) = send(
            &state,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "chef@marmita.com", "password": "123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "cook");
        assert_eq!(body["user"]["balance"], 150.5);

        let (status, _) = send(
            &state,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "chef@marmita.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &state,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": "ghost@marmita.com", "password": "123"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_meal_requires_own_cook_token() {
        let state = demo_state().await;
        let cook = state
            .service
            .login("chef@marmita.com", Some("123"))
            .await
            .unwrap();
        let meal = json!({"cookId": cook.id, "cookName": "Maria Chef", "title": "Moqueca", "price": 42.0});

        let (status, _) = send(&state, "POST", "/meals", None, Some(meal.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let client_token = token_for(&state, 1, UserRole::Client);
        let (status, _) =
            send(&state, "POST", "/meals", Some(&client_token), Some(meal.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let cook_token = token_for(&state, cook.id, UserRole::Cook);
        let (status, body) = send(&state, "POST", "/meals", Some(&cook_token), Some(meal)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Moqueca");
        assert_eq!(body["cookName"], "Maria Chef");

        let (status, body) = send(&state, "GET", "/meals", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_place_and_list_orders() {
        let state = demo_state().await;
        let client = state
            .service
            .login("cliente@marmita.com", Some("123"))
            .await
            .unwrap();
        let meals = state.service.get_meals().await.unwrap();
        let cook_id = meals[0].cook_id;
        let token = token_for(&state, client.id, UserRole::Client);

        let bad_total = json!({
            "clientId": client.id,
            "clientName": "João Cliente",
            "cookId": cook_id,
            "cookName": "Maria Chef",
            "items": [{"mealId": meals[0].id, "quantity": 2}],
            "total": 1.0,
            "paymentMethod": "Pix"
        });
        let (status, _) = send(&state, "POST", "/orders", Some(&token), Some(bad_total)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let order = json!({
            "clientId": client.id,
            "cookId": cook_id,
            "items": [{"mealId": meals[0].id, "quantity": 2}],
            "total": meals[0].price * 2.0,
            "paymentMethod": "Pix"
        });
        let cook_token = token_for(&state, cook_id, UserRole::Cook);
        let (status, _) =
            send(&state, "POST", "/orders", Some(&cook_token), Some(order.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&state, "POST", "/orders", Some(&token), Some(order)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");
        let order_id = body["id"].as_i64().unwrap();

        let uri = format!("/orders?userId={}&role=client", client.id);
        let (status, body) = send(&state, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        let orders = body.as_array().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0]["id"].as_i64().unwrap(), order_id);
        assert_eq!(orders[0]["items"][0]["quantity"], 2);
    }
}
