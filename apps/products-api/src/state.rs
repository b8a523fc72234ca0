//! Application state management

use domain_products::{InMemoryProductRepository, ProductService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub products: ProductService<InMemoryProductRepository>,
}

impl AppState {
    /// Builds state around a fresh, empty product store
    pub fn new(config: crate::config::Config) -> Self {
        Self {
            config,
            products: ProductService::new(InMemoryProductRepository::new()),
        }
    }
}
