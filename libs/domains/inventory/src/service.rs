use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{CreateProduct, Product, ProductSortKey, StockView, UpdateProduct};
use crate::pagination::{Page, PageRequest};
use crate::repository::{InventoryRepository, UpdateOutcome};
use crate::stock_view::{StockViewSortKey, stock_page};

/// Service layer for product and stock view business logic
#[derive(Clone)]
pub struct InventoryService<R: InventoryRepository> {
    repository: Arc<R>,
}

impl<R: InventoryRepository> InventoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: CreateProduct) -> InventoryResult<Product> {
        input.validate()?;
        self.repository.create_product(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> InventoryResult<Product> {
        self.repository
            .get_product(id)
            .await?
            .ok_or(InventoryError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, request: &PageRequest) -> InventoryResult<Page<Product>> {
        self.repository
            .list_products(request.sort::<ProductSortKey>(), request.window())
            .await
    }

    /// Optimistic update.
    ///
    /// A rejected write is resolved with one existence check: a row that is
    /// gone is `NotFound`, a row that is still there changed under the caller
    /// and is `Conflict`. Nothing is retried.
    #[instrument(skip(self, input), fields(body_id = input.id, version = input.version))]
    pub async fn update_product(&self, id: i32, input: UpdateProduct) -> InventoryResult<()> {
        if input.id != id {
            return Err(InventoryError::IdentityMismatch {
                path_id: id,
                body_id: input.id,
            });
        }

        input.validate()?;

        match self.repository.update_product(input).await? {
            UpdateOutcome::Updated(_) => Ok(()),
            UpdateOutcome::Conflict => {
                if self.repository.product_exists(id).await? {
                    Err(InventoryError::Conflict(id))
                } else {
                    Err(InventoryError::NotFound(id))
                }
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> InventoryResult<()> {
        let deleted = self.repository.delete_product(id).await?;

        if !deleted {
            return Err(InventoryError::NotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn stock_view(&self, request: &PageRequest) -> InventoryResult<Page<StockView>> {
        let (products, types, entries) = tokio::try_join!(
            self.repository.all_products(),
            self.repository.all_product_types(),
            self.repository.all_stock_entries(),
        )?;

        Ok(stock_page(
            &products,
            &types,
            &entries,
            request.sort::<StockViewSortKey>(),
            request.window(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductType;
    use crate::models::StockEntry;
    use crate::repository::MockInventoryRepository;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;

    fn update(id: i32, version: i32) -> UpdateProduct {
        UpdateProduct {
            id,
            type_id: 1,
            name: "Hammer".to_string(),
            price: Decimal::new(1500, 2),
            version,
        }
    }

    fn product(id: i32, version: i32) -> Product {
        Product {
            id,
            type_id: 1,
            name: "Hammer".to_string(),
            price: Decimal::new(1500, 2),
            version,
        }
    }

    #[tokio::test]
    async fn test_mismatched_ids_never_reach_the_store() {
        // no expectations: any repository call panics
        let service = InventoryService::new(MockInventoryRepository::new());

        let err = service.update_product(5, update(7, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            InventoryError::IdentityMismatch {
                path_id: 5,
                body_id: 7
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_update_never_reaches_the_store() {
        let service = InventoryService::new(MockInventoryRepository::new());
        let mut input = update(3, 1);
        input.name.clear();

        let err = service.update_product(3, input).await.unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_successful_update_returns_unit() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_update_product()
            .times(1)
            .returning(|input| Ok(UpdateOutcome::Updated(product(input.id, input.version + 1))));
        repo.expect_product_exists().never();

        let service = InventoryService::new(repo);
        service.update_product(3, update(3, 1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_conflict_on_deleted_row_is_not_found() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_update_product()
            .times(1)
            .returning(|_| Ok(UpdateOutcome::Conflict));
        repo.expect_product_exists()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(false));

        let service = InventoryService::new(repo);
        let err = service.update_product(3, update(3, 1)).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(3)));
    }

    #[tokio::test]
    async fn test_conflict_on_existing_row_is_conflict() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_update_product()
            .times(1)
            .returning(|_| Ok(UpdateOutcome::Conflict));
        repo.expect_product_exists()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(true));

        let service = InventoryService::new(repo);
        let err = service.update_product(3, update(3, 1)).await.unwrap_err();
        assert!(matches!(err, InventoryError::Conflict(3)));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_get_product()
            .returning(|_| Err(InventoryError::Store("connection reset".into())));

        let service = InventoryService::new(repo);
        let err = service.get_product(1).await.unwrap_err();
        assert!(matches!(err, InventoryError::Store(_)));
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_get_product().with(eq(9)).returning(|_| Ok(None));

        let service = InventoryService::new(repo);
        let err = service.get_product(9).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_price_before_store() {
        let service = InventoryService::new(MockInventoryRepository::new());

        let err = service
            .create_product(CreateProduct {
                type_id: 1,
                name: "Free".to_string(),
                price: Decimal::ZERO,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_delete_product().returning(|_| Ok(false));

        let service = InventoryService::new(repo);
        let err = service.delete_product(4).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(4)));
    }

    #[tokio::test]
    async fn test_stock_view_joins_all_three_tables() {
        let mut repo = MockInventoryRepository::new();
        repo.expect_all_products()
            .returning(|| Ok(vec![product(1, 1), product(2, 1)]));
        repo.expect_all_product_types().returning(|| {
            Ok(vec![ProductType {
                id: 1,
                description: "Tools".to_string(),
            }])
        });
        repo.expect_all_stock_entries().returning(|| {
            Ok(vec![StockEntry {
                id: 1,
                product_id: 2,
                quantity: 7,
            }])
        });

        let service = InventoryService::new(repo);
        let page = service.stock_view(&PageRequest::default()).await.unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].product_id, 2);
        assert_eq!(page.items[0].quantity, 7);
    }
}
