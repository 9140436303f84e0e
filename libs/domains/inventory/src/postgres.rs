use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::entity::{product_types, products, stock_entries};
use crate::error::InventoryResult;
use crate::models::{
    CreateProduct, Product, ProductSortKey, ProductType, StockEntry, UpdateProduct, round_price,
};
use crate::pagination::{Page, PageWindow, Sort, SortDirection, SortKey};
use crate::repository::{InventoryRepository, UpdateOutcome};

pub struct PgInventoryRepository {
    db: DatabaseConnection,
}

impl PgInventoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(key: ProductSortKey) -> products::Column {
    match key {
        ProductSortKey::Id => products::Column::Id,
        ProductSortKey::Name => products::Column::Name,
        ProductSortKey::Price => products::Column::Price,
        ProductSortKey::TypeId => products::Column::TypeId,
    }
}

fn sort_order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}

#[async_trait]
impl InventoryRepository for PgInventoryRepository {
    async fn create_product(&self, input: CreateProduct) -> InventoryResult<Product> {
        let active_model: products::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn get_product(&self, id: i32) -> InventoryResult<Option<Product>> {
        let model = products::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn update_product(&self, input: UpdateProduct) -> InventoryResult<UpdateOutcome> {
        let id = input.id;
        let expected_version = input.version;
        let Some(next_version) = input.next_version() else {
            tracing::warn!(product_id = id, expected_version, "Product version exhausted");
            return Ok(UpdateOutcome::Conflict);
        };

        // UPDATE products SET ... WHERE id = $id AND version = $expected
        let result = products::Entity::update_many()
            .set(products::ActiveModel {
                id: NotSet,
                type_id: Set(input.type_id),
                name: Set(input.name),
                price: Set(round_price(input.price)),
                version: Set(next_version),
            })
            .filter(products::Column::Id.eq(id))
            .filter(products::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            tracing::warn!(product_id = id, expected_version, "Rejected stale product update");
            return Ok(UpdateOutcome::Conflict);
        }

        // deleted between the write and this read
        let Some(model) = products::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(UpdateOutcome::Conflict);
        };

        tracing::info!(product_id = id, version = model.version, "Updated product");
        Ok(UpdateOutcome::Updated(model.into()))
    }

    async fn delete_product(&self, id: i32) -> InventoryResult<bool> {
        let txn = self.db.begin().await?;

        stock_entries::Entity::delete_many()
            .filter(stock_entries::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;
        let result = products::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn product_exists(&self, id: i32) -> InventoryResult<bool> {
        let count = products::Entity::find()
            .filter(products::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
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
        let total_count = products::Entity::find().count(&self.db).await?;

        if window.skip() >= total_count {
            return Ok(Page::new(Vec::new(), total_count, window));
        }

        let order = sort_order(sort.direction);
        let models = products::Entity::find()
            .order_by(sort_column(sort.key), order.clone())
            .order_by(products::Column::Id, order)
            .offset(window.skip())
            .limit(window.take())
            .all(&self.db)
            .await?;

        let items = models.into_iter().map(Into::into).collect();
        Ok(Page::new(items, total_count, window))
    }

    async fn all_products(&self) -> InventoryResult<Vec<Product>> {
        let models = products::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn all_product_types(&self) -> InventoryResult<Vec<ProductType>> {
        let models = product_types::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn all_stock_entries(&self) -> InventoryResult<Vec<StockEntry>> {
        let models = stock_entries::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
