use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{
    CreateProduct, CreateProductType, CreateStockEntry, Product, ProductSortKey, ProductType,
    StockEntry, UpdateProduct,
};
use crate::pagination::{Page, PageWindow, Sort, SortKey, paginate};

/// Result of an optimistic write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Product),
    /// No row matched both the id and the expected version
    Conflict,
}

/// Data access for products, product types and stock entries.
///
/// Updates are conditional on `UpdateProduct::version`; a stale or missing
/// row is reported as [`UpdateOutcome::Conflict`] and the caller decides
/// what that means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn create_product(&self, input: CreateProduct) -> InventoryResult<Product>;

    async fn get_product(&self, id: i32) -> InventoryResult<Option<Product>>;

    /// Write `input` only if the stored version still equals `input.version`
    async fn update_product(&self, input: UpdateProduct) -> InventoryResult<UpdateOutcome>;

    /// `false` when nothing was deleted
    async fn delete_product(&self, id: i32) -> InventoryResult<bool>;

    async fn product_exists(&self, id: i32) -> InventoryResult<bool>;

    /// Sorted page of products with the count of all products
    async fn list_products(
        &self,
        sort: Sort<ProductSortKey>,
        window: PageWindow,
    ) -> InventoryResult<Page<Product>>;

    async fn all_products(&self) -> InventoryResult<Vec<Product>>;

    async fn all_product_types(&self) -> InventoryResult<Vec<ProductType>>;

    async fn all_stock_entries(&self) -> InventoryResult<Vec<StockEntry>>;
}

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<i32, Product>,
    product_types: BTreeMap<i32, ProductType>,
    stock_entries: BTreeMap<i32, StockEntry>,
    next_product_id: i32,
    next_product_type_id: i32,
    next_stock_entry_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl Tables {
    /// Mirrors the `products.type_id` foreign key
    fn require_product_type(&self, type_id: i32) -> InventoryResult<()> {
        if self.product_types.contains_key(&type_id) {
            Ok(())
        } else {
            Err(InventoryError::Validation(format!(
                "Product type {} does not exist",
                type_id
            )))
        }
    }

    /// Mirrors the `stock_entries.product_id` foreign key
    fn require_product(&self, product_id: i32) -> InventoryResult<()> {
        if self.products.contains_key(&product_id) {
            Ok(())
        } else {
            Err(InventoryError::Validation(format!(
                "Product {} does not exist",
                product_id
            )))
        }
    }
}

/// In-memory implementation of InventoryRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryInventoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a product type; the HTTP surface only manages products
    pub async fn insert_product_type(
        &self,
        input: CreateProductType,
    ) -> InventoryResult<ProductType> {
        input.validate()?;

        let mut tables = self.tables.write().await;
        let product_type = ProductType {
            id: next_id(&mut tables.next_product_type_id),
            description: input.description,
        };
        tables
            .product_types
            .insert(product_type.id, product_type.clone());

        tracing::info!(product_type_id = product_type.id, "Created product type");
        Ok(product_type)
    }

    pub async fn insert_stock_entry(
        &self,
        input: CreateStockEntry,
    ) -> InventoryResult<StockEntry> {
        input.validate()?;

        let mut tables = self.tables.write().await;
        tables.require_product(input.product_id)?;

        let entry = StockEntry {
            id: next_id(&mut tables.next_stock_entry_id),
            product_id: input.product_id,
            quantity: input.quantity,
        };
        tables.stock_entries.insert(entry.id, entry.clone());

        tracing::info!(
            stock_entry_id = entry.id,
            product_id = entry.product_id,
            "Created stock entry"
        );
        Ok(entry)
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn create_product(&self, input: CreateProduct) -> InventoryResult<Product> {
        let mut tables = self.tables.write().await;
        tables.require_product_type(input.type_id)?;

        let id = next_id(&mut tables.next_product_id);
        let product = Product::new(id, input);
        tables.products.insert(id, product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn get_product(&self, id: i32) -> InventoryResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).cloned())
    }

    async fn update_product(&self, input: UpdateProduct) -> InventoryResult<UpdateOutcome> {
        let mut tables = self.tables.write().await;
        let id = input.id;
        let next_version = input.next_version();

        let current_version = tables.products.get(&id).map(|p| p.version);
        if current_version == Some(input.version) {
            tables.require_product_type(input.type_id)?;
        }

        match (tables.products.get_mut(&id), next_version) {
            (Some(product), Some(version)) if product.version == input.version => {
                product.apply_update(input, version);
                tracing::info!(product_id = id, version = product.version, "Updated product");
                Ok(UpdateOutcome::Updated(product.clone()))
            }
            _ => {
                tracing::warn!(
                    product_id = id,
                    expected_version = input.version,
                    current_version,
                    "Rejected stale product update"
                );
                Ok(UpdateOutcome::Conflict)
            }
        }
    }

    async fn delete_product(&self, id: i32) -> InventoryResult<bool> {
        let mut tables = self.tables.write().await;

        if tables.products.remove(&id).is_some() {
            tables.stock_entries.retain(|_, entry| entry.product_id != id);
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn product_exists(&self, id: i32) -> InventoryResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.products.contains_key(&id))
    }

    async fn list_products(
        &self,
        sort: Sort<ProductSortKey>,
        window: PageWindow,
    ) -> InventoryResult<Page<Product>> {
        tracing::debug!(
            order_by = sort.key.column(),
            direction = %sort.direction,
            "Listing products"
        );

        let products = self.all_products().await?;
        Ok(paginate(products, sort, window))
    }

    async fn all_products(&self) -> InventoryResult<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().cloned().collect())
    }

    async fn all_product_types(&self) -> InventoryResult<Vec<ProductType>> {
        let tables = self.tables.read().await;
        Ok(tables.product_types.values().cloned().collect())
    }

    async fn all_stock_entries(&self) -> InventoryResult<Vec<StockEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.stock_entries.values().cloned().collect())
    }
}
