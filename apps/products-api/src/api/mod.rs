//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Create all API routes (mounted under `/api` by the app router)
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/products", products::router(state))
}
