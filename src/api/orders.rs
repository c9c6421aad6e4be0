use super::{AppState, auth::bearer_claims};
use crate::{
    core::status::OrderStatus,
    errors::{Error, Result},
    models::{Order, OrderLine, UserRole, items_total},
};
use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

/// Largest difference between a client-supplied and a computed total that still matches.
const TOTAL_TOLERANCE: f64 = 0.005;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OrdersQuery {
    user_id: i64,
    role: UserRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateOrderRequest {
    client_id: i64,
    cook_id: i64,
    items: Vec<OrderLine>,
    total: Option<f64>,
    payment_method: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateOrderResponse {
    id: i64,
    status: OrderStatus,
}

pub(super) async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(
        state.service.get_orders(query.user_id, query.role).await?,
    ))
}

pub(super) async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    let claims = bearer_claims(&headers, &state)?;
    if claims.role != UserRole::Client || claims.id != req.client_id {
        return Err(Error::forbidden("orders can only be placed by their own client"));
    }

    if let Some(expected) = req.total {
        let quoted = items_total(&state.service.quote_order(req.cook_id, &req.items).await?);
        if (quoted - expected).abs() > TOTAL_TOLERANCE {
            return Err(Error::validation(format!(
                "Total {expected:.2} does not match the computed {quoted:.2}"
            )));
        }
    }

    let order = state
        .service
        .create_order(req.client_id, req.cook_id, &req.items, req.payment_method)
        .await?;
    Ok(Json(CreateOrderResponse {
        id: order.id,
        status: order.status,
    }))
}
