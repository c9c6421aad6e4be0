use super::{AppState, auth::bearer_claims};
use crate::{
    entities::meal,
    errors::{Error, Result},
    models::{NewMeal, UserRole},
};
use axum::{Json, extract::State, http::HeaderMap};

pub(super) async fn list(State(state): State<AppState>) -> Result<Json<Vec<meal::Model>>> {
    Ok(Json(state.service.get_meals().await?))
}

/// The body may also carry `cookName`; the stored name always comes from the account.
pub(super) async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new_meal): Json<NewMeal>,
) -> Result<Json<meal::Model>> {
    let claims = bearer_claims(&headers, &state)?;
    if claims.role != UserRole::Cook || claims.id != new_meal.cook_id {
        return Err(Error::forbidden("meals can only be created by their own cook"));
    }
    Ok(Json(state.service.create_meal(new_meal).await?))
}
