use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, PaginatedProducts, PaginationMeta, Product, UpdateProduct};

/// Repository trait for Product persistence
///
/// Only active products are visible: `find_one`, `update` and `remove`
/// report `NotFound` for ids that were never issued and for soft-deleted
/// products alike.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new, active product
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// One page of active products in insertion order
    async fn find_all(&self, page: u64, limit: u32) -> ProductResult<PaginatedProducts>;

    /// Number of active products
    async fn count(&self) -> ProductResult<usize>;

    /// Get an active product by ID
    async fn find_one(&self, id: Uuid) -> ProductResult<Product>;

    /// Merge a partial update into an active product
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product>;

    /// Soft-delete an active product, returning it with `is_active == false`
    async fn remove(&self, id: Uuid) -> ProductResult<Product>;
}

/// Products in insertion order plus an id -> position index
#[derive(Debug, Default)]
struct ProductTable {
    rows: Vec<Product>,
    index: HashMap<Uuid, usize>,
}

impl ProductTable {
    fn insert(&mut self, product: Product) {
        self.index.insert(product.id, self.rows.len());
        self.rows.push(product);
    }

    fn active(&self, id: Uuid) -> Option<&Product> {
        self.index
            .get(&id)
            .and_then(|&pos| self.rows.get(pos))
            .filter(|p| p.is_active)
    }

    fn active_mut(&mut self, id: Uuid) -> Option<&mut Product> {
        let pos = *self.index.get(&id)?;
        self.rows.get_mut(pos).filter(|p| p.is_active)
    }
}

/// In-memory implementation of ProductRepository
///
/// Products are never physically removed. Every mutation holds the write
/// lock for its whole check-then-write sequence.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<ProductTable>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);

        let mut products = self.products.write().await;
        products.insert(product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn find_all(&self, page: u64, limit: u32) -> ProductResult<PaginatedProducts> {
        let products = self.products.read().await;

        let active: Vec<&Product> = products.rows.iter().filter(|p| p.is_active).collect();
        let meta = PaginationMeta::new(active.len(), page, limit);

        let data = active
            .get(meta.window())
            .unwrap_or_default()
            .iter()
            .map(|&p| p.clone())
            .collect();

        tracing::debug!(page, limit, total = meta.total, "Listed products");
        Ok(PaginatedProducts { data, meta })
    }

    async fn count(&self) -> ProductResult<usize> {
        let products = self.products.read().await;
        Ok(products.rows.iter().filter(|p| p.is_active).count())
    }

    async fn find_one(&self, id: Uuid) -> ProductResult<Product> {
        let products = self.products.read().await;
        products.active(id).cloned().ok_or(ProductError::NotFound(id))
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let product = products.active_mut(id).ok_or(ProductError::NotFound(id))?;
        product.apply_update(input);
        let updated = product.clone();

        tracing::info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    async fn remove(&self, id: Uuid) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let product = products.active_mut(id).ok_or(ProductError::NotFound(id))?;
        product.deactivate();
        let removed = product.clone();

        tracing::info!(product_id = %id, "Soft-deleted product");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn input(name: &str) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            price: 10.0,
            stock: 5,
        }
    }

    async fn seed(repo: &InMemoryProductRepository, count: usize) -> Vec<Product> {
        let mut created = Vec::with_capacity(count);
        for i in 0..count {
            created.push(repo.create(input(&format!("product-{}", i))).await.unwrap());
        }
        created
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids_and_active_state() {
        let repo = InMemoryProductRepository::new();
        let created = seed(&repo, 50).await;

        let ids: HashSet<Uuid> = created.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 50);
        for product in &created {
            assert!(product.is_active);
            assert_eq!(product.created_at, product.updated_at);
        }
    }

    #[tokio::test]
    async fn test_create_and_find_one() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("widget")).await.unwrap();

        let fetched = repo.find_one(product.id).await.unwrap();
        assert_eq!(fetched, product);
    }

    #[tokio::test]
    async fn test_find_one_unknown_id_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let id = Uuid::new_v4();
        let result = repo.find_one(id).await;
        assert!(matches!(result, Err(ProductError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_returned_products_are_copies() {
        let repo = InMemoryProductRepository::new();
        let mut product = repo.create(input("widget")).await.unwrap();
        product.name = "tampered".to_string();
        product.is_active = false;

        let fetched = repo.find_one(product.id).await.unwrap();
        assert_eq!(fetched.name, "widget");
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn test_remove_hides_product_everywhere() {
        let repo = InMemoryProductRepository::new();
        let created = seed(&repo, 12).await;
        let target = created[4].id;

        let removed = repo.remove(target).await.unwrap();
        assert!(!removed.is_active);
        assert_eq!(removed.id, target);
        assert!(removed.updated_at >= removed.created_at);

        assert!(matches!(
            repo.find_one(target).await,
            Err(ProductError::NotFound(_))
        ));

        let page = repo.find_all(1, 100).await.unwrap();
        assert_eq!(page.meta.total, 11);
        assert!(page.data.iter().all(|p| p.id != target));
    }

    #[tokio::test]
    async fn test_second_remove_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("widget")).await.unwrap();

        assert!(repo.remove(product.id).await.is_ok());
        assert!(matches!(
            repo.remove(product.id).await,
            Err(ProductError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_after_remove_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(input("widget")).await.unwrap();
        repo.remove(product.id).await.unwrap();

        let result = repo
            .update(
                product.id,
                UpdateProduct {
                    stock: Some(1),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_given_fields() {
        let repo = InMemoryProductRepository::new();
        let before = repo.create(input("widget")).await.unwrap();

        let after = repo
            .update(
                before.id,
                UpdateProduct {
                    price: Some(25.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(after.price, 25.5);
        assert_eq!(after.id, before.id);
        assert_eq!(after.name, before.name);
        assert_eq!(after.description, before.description);
        assert_eq!(after.stock, before.stock);
        assert_eq!(after.is_active, before.is_active);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);

        assert_eq!(repo.find_one(before.id).await.unwrap(), after);
    }

    #[tokio::test]
    async fn test_find_all_second_page_of_fifteen() {
        let repo = InMemoryProductRepository::new();
        let created = seed(&repo, 15).await;

        let page = repo.find_all(2, 5).await.unwrap();
        assert_eq!(
            page.meta,
            PaginationMeta {
                total: 15,
                page: 2,
                limit: 5,
                total_pages: 3
            }
        );
        let ids: Vec<Uuid> = page.data.iter().map(|p| p.id).collect();
        let expected: Vec<Uuid> = created[5..10].iter().map(|p| p.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_find_all_pages_concatenate_to_active_set() {
        let repo = InMemoryProductRepository::new();
        let created = seed(&repo, 23).await;
        for idx in [0, 7, 8, 22] {
            repo.remove(created[idx].id).await.unwrap();
        }
        let expected: Vec<Uuid> = created
            .iter()
            .enumerate()
            .filter(|(i, _)| ![0, 7, 8, 22].contains(i))
            .map(|(_, p)| p.id)
            .collect();

        for limit in [1, 3, 4, 19, 100] {
            let first = repo.find_all(1, limit).await.unwrap();
            assert_eq!(first.meta.total, expected.len());
            assert_eq!(
                first.meta.total_pages,
                expected.len().div_ceil(limit as usize)
            );

            let mut seen = Vec::new();
            for page in 1..=first.meta.total_pages as u64 {
                let result = repo.find_all(page, limit).await.unwrap();
                assert!(result.data.len() <= limit as usize);
                seen.extend(result.data.into_iter().map(|p| p.id));
            }
            assert_eq!(seen, expected, "limit {}", limit);
        }
    }

    #[tokio::test]
    async fn test_find_all_out_of_range_page_is_empty() {
        let repo = InMemoryProductRepository::new();
        seed(&repo, 3).await;

        let past_end = repo.find_all(5, 10).await.unwrap();
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.meta.total, 3);
        assert_eq!(past_end.meta.total_pages, 1);

        let page_zero = repo.find_all(0, 10).await.unwrap();
        assert!(page_zero.data.is_empty());
    }

    #[tokio::test]
    async fn test_find_all_huge_page_is_empty() {
        let repo = InMemoryProductRepository::new();
        seed(&repo, 3).await;

        let page = repo.find_all(5_000_000_000, 10).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.meta.page, 5_000_000_000);
        assert_eq!(page.meta.total, 3);
    }

    #[tokio::test]
    async fn test_count_ignores_removed_products() {
        let repo = InMemoryProductRepository::new();
        let created = seed(&repo, 4).await;
        assert_eq!(repo.count().await.unwrap(), 4);

        repo.remove(created[2].id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_find_all_empty_store() {
        let repo = InMemoryProductRepository::new();
        let page = repo.find_all(1, 10).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 0);
        assert_eq!(page.meta.total_pages, 0);
    }

    #[tokio::test]
    async fn test_concurrent_removes_succeed_exactly_once() {
        let repo = InMemoryProductRepository::new();
        let id = repo.create(input("contended")).await.unwrap().id;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.remove(id).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(p) => {
                    assert!(!p.is_active);
                    successes += 1;
                }
                Err(e) => assert!(matches!(e, ProductError::NotFound(_))),
            }
        }
        assert_eq!(successes, 1);
    }
}
