//! The recommendation endpoint.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use catalog::{OrderId, Product};
use serde::Serialize;

/// Body of `GET /orders/recommendations/{order_id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub order_id: OrderId,
    pub recommendations: Vec<Product>,
}

/// `GET /orders/recommendations/{order_id}` — cached-or-computed suggestions
/// for one order. Requires a bearer token.
pub async fn get_order_recommendations(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<OrderId>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let recommendations = state.resolver.resolve(order_id, user.user_id).await?;
    Ok(Json(RecommendationsResponse {
        order_id,
        recommendations,
    }))
}
