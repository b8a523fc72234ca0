//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::ProductResult;
use crate::models::{CreateProduct, ListProducts, PaginatedProducts, Product, UpdateProduct};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Every input is validated here even when the HTTP layer already did so;
/// a rejected call never reaches the repository.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;
        self.repository.create(input).await
    }

    /// List active products, one page at a time
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ListProducts) -> ProductResult<PaginatedProducts> {
        query.validate()?;
        self.repository.find_all(query.page, query.limit).await
    }

    /// Get an active product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository.find_one(id).await
    }

    /// Partially update an active product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input.validate()?;

        if input.is_empty() {
            tracing::debug!(product_id = %id, "Empty patch, only updated_at changes");
        }

        self.repository.update(id, input).await
    }

    /// Soft-delete a product
    ///
    /// A second call for the same id fails with `NotFound`.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository.remove(id).await
    }

    /// Number of active products
    pub async fn count_products(&self) -> ProductResult<usize> {
        self.repository.count().await
    }

    /// Readiness probe: the store answers a minimal read
    pub async fn ping(&self) -> ProductResult<()> {
        self.repository.count().await.map(|_| ())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
