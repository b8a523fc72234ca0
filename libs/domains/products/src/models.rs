use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Largest page size a caller may request
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Product entity
///
/// Only the store mutates a `Product`; everything handed out is a clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    /// Product name
    pub name: String,
    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price, always greater than zero
    pub price: f64,
    /// Units in stock
    pub stock: u64,
    /// `false` once the product has been soft-deleted
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: f64,
    pub stock: u64,
}

/// DTO for partially updating a product
///
/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: Option<f64>,
    pub stock: Option<u64>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
    }
}

/// Pagination query for listing products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, IntoParams)]
#[serde(deny_unknown_fields)]
#[into_params(parameter_in = Query)]
pub struct ListProducts {
    /// 1-based page number; pages past the end are empty, not errors
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    #[param(minimum = 1, default = 1)]
    pub page: u64,
    /// Page size
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_PAGE_LIMIT, message = "limit must be between 1 and 100"))]
    // utoipa only accepts a numeric literal here; keep in sync with MAX_PAGE_LIMIT
    #[param(minimum = 1, maximum = 100, default = 10)]
    pub limit: u32,
}

impl Default for ListProducts {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl ListProducts {
    pub fn new(page: u64, limit: u32) -> Self {
        Self { page, limit }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u32 {
    10
}

/// One page of active products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaginatedProducts {
    pub data: Vec<Product>,
    pub meta: PaginationMeta,
}

/// Pagination metadata; `total` counts active products only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: usize,
    pub page: u64,
    pub limit: u32,
    pub total_pages: usize,
}

impl PaginationMeta {
    pub fn new(total: usize, page: u64, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as usize)
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// Index range of this page within the `total` active products.
    ///
    /// Empty when `page` is 0 or lies past the last page.
    pub fn window(&self) -> std::ops::Range<usize> {
        if self.page == 0 || self.limit == 0 {
            return 0..0;
        }
        let limit = self.limit as usize;
        let skipped_pages = usize::try_from(self.page - 1).unwrap_or(usize::MAX);
        let start = skipped_pages.saturating_mul(limit).min(self.total);
        let end = start.saturating_add(limit).min(self.total);
        start..end
    }
}

impl Product {
    /// Create a new active product from a CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the fields present in `update`, then bump `updated_at`
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        self.touch();
    }

    /// Soft-delete: flip `is_active` off and bump `updated_at`
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    // Never moves backwards, so updated_at >= created_at survives clock skew
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}
