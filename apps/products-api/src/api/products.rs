//! Products API routes

use axum::Router;
use domain_products::handlers;

use crate::state::AppState;

/// Create products router sharing the store held in `state`
pub fn router(state: &AppState) -> Router {
    handlers::router(state.products.clone())
}
