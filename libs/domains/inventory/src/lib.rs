//! Inventory Domain
//!
//! Products, product types and stock entries, with a paged product listing
//! and a read-only stock view joining the three.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, pagination headers
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, optimistic update protocol, stock view
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and Postgres)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Records, DTOs, sort keys
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_inventory::{
//!     handlers,
//!     repository::InMemoryInventoryRepository,
//!     service::InventoryService,
//! };
//!
//! let repository = InMemoryInventoryRepository::new();
//! let service = InventoryService::new(repository);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod stock_view;

pub use error::{InventoryError, InventoryResult};
pub use models::{
    CreateProduct, CreateProductType, CreateStockEntry, Product, ProductSortKey, ProductType,
    StockEntry, StockView, UpdateProduct,
};
pub use pagination::{Page, PageRequest, PageWindow, Sort, SortDirection};
pub use postgres::PgInventoryRepository;
pub use repository::{InMemoryInventoryRepository, InventoryRepository, UpdateOutcome};
pub use service::InventoryService;
