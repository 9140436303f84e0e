//! Stock view: products joined with their type description and stock quantity.
//!
//! Two passes, kept apart:
//! 1. [`join`] drops products whose type or stock entry cannot be resolved.
//! 2. [`is_well_formed`] drops joined rows with a zero product id or an empty
//!    name or type description.
//!
//! The surviving rows feed [`paginate`], so `total_count` counts filtered rows.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Product, ProductType, StockEntry, StockView};
use crate::pagination::{Page, PageWindow, Sort, SortKey, paginate};

/// Sortable stock view columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockViewSortKey {
    ProductId,
    Name,
    Price,
    TypeDescription,
    Quantity,
}

impl SortKey for StockViewSortKey {
    type Record = StockView;

    const COLUMNS: &'static [(&'static str, Self)] = &[
        ("productoid", StockViewSortKey::ProductId),
        ("nombre", StockViewSortKey::Name),
        ("precio", StockViewSortKey::Price),
        ("tipoproducto", StockViewSortKey::TypeDescription),
        ("cantidad", StockViewSortKey::Quantity),
    ];

    const DEFAULT: Self = StockViewSortKey::ProductId;

    fn compare(self, a: &StockView, b: &StockView) -> Ordering {
        match self {
            StockViewSortKey::ProductId => a.product_id.cmp(&b.product_id),
            StockViewSortKey::Name => a.name.cmp(&b.name),
            StockViewSortKey::Price => a.price.cmp(&b.price),
            StockViewSortKey::TypeDescription => a.type_description.cmp(&b.type_description),
            StockViewSortKey::Quantity => a.quantity.cmp(&b.quantity),
        }
    }

    fn tie_breaker(a: &StockView, b: &StockView) -> Ordering {
        a.product_id
            .cmp(&b.product_id)
            .then_with(|| a.stock_entry_id.cmp(&b.stock_entry_id))
    }
}

/// Inner join on `product.type_id = type.id` and `entry.product_id = product.id`.
///
/// A product with several stock entries yields one row per entry.
pub fn join(
    products: &[Product],
    types: &[ProductType],
    stock_entries: &[StockEntry],
) -> Vec<StockView> {
    let types_by_id: HashMap<i32, &ProductType> = types.iter().map(|t| (t.id, t)).collect();

    let mut entries_by_product: HashMap<i32, Vec<&StockEntry>> = HashMap::new();
    for entry in stock_entries {
        entries_by_product
            .entry(entry.product_id)
            .or_default()
            .push(entry);
    }

    products
        .iter()
        .filter_map(|product| {
            let product_type = types_by_id.get(&product.type_id)?;
            let entries = entries_by_product.get(&product.id)?;
            Some(entries.iter().map(move |entry| StockView {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                type_description: product_type.description.clone(),
                quantity: entry.quantity,
                stock_entry_id: entry.id,
            }))
        })
        .flatten()
        .collect()
}

pub fn is_well_formed(row: &StockView) -> bool {
    row.product_id != 0 && !row.name.is_empty() && !row.type_description.is_empty()
}

/// Join, then discard malformed rows
pub fn project(
    products: &[Product],
    types: &[ProductType],
    stock_entries: &[StockEntry],
) -> Vec<StockView> {
    let joined = join(products, types, stock_entries);
    let before = joined.len();

    let rows: Vec<StockView> = joined.into_iter().filter(is_well_formed).collect();
    if rows.len() < before {
        tracing::debug!(discarded = before - rows.len(), "Dropped malformed stock view rows");
    }
    rows
}

pub fn stock_page(
    products: &[Product],
    types: &[ProductType],
    stock_entries: &[StockEntry],
    sort: Sort<StockViewSortKey>,
    window: PageWindow,
) -> Page<StockView> {
    paginate(project(products, types, stock_entries), sort, window)
}
