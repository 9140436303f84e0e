use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::pagination::SortKey;

/// Fractional digits kept on every price
pub const PRICE_SCALE: u32 = 2;

/// Largest price a `NUMERIC(18,2)` column holds: 9999999999999999.99
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xA763_FFFF, 0x0DE0_B6B3, 0, false, 2);

/// Round half away from zero to two fractional digits
pub fn round_price(price: Decimal) -> Decimal {
    price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer).map(round_price)
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || price.is_zero() {
        return Err(ValidationError::new("price_not_positive")
            .with_message("price must be greater than zero".into()));
    }
    if *price > MAX_PRICE {
        return Err(ValidationError::new("price_too_large")
            .with_message("price exceeds 9999999999999999.99".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: i32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub type_id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    /// Optimistic concurrency token, bumped on every successful update
    pub version: i32,
}

impl Product {
    pub fn new(id: i32, input: CreateProduct) -> Self {
        Self {
            id,
            type_id: input.type_id,
            name: input.name,
            price: round_price(input.price),
            version: 1,
        }
    }

    /// Copy the writable fields of `input` and store `version`
    pub fn apply_update(&mut self, input: UpdateProduct, version: i32) {
        self.type_id = input.type_id;
        self.name = input.name;
        self.price = round_price(input.price);
        self.version = version;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// Product joined with its type description and stock quantity; never stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    pub product_id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    pub type_description: String,
    pub quantity: i32,
    /// Stock entry the row came from; orders rows of the same product
    #[serde(skip)]
    pub stock_entry_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(range(min = 1))]
    pub type_id: i32,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(
        deserialize_with = "deserialize_price",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
}

/// Full replacement of a product; `version` is the one the caller last read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    /// Must equal the id in the path
    pub id: i32,

    #[validate(range(min = 1))]
    pub type_id: i32,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[serde(
        deserialize_with = "deserialize_price",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 24.5)]
    pub price: Decimal,

    pub version: i32,
}

impl UpdateProduct {
    /// Version stored by a successful write; `None` once the token is exhausted
    pub fn next_version(&self) -> Option<i32> {
        self.version.checked_add(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductType {
    #[validate(length(min = 1, max = 100))]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockEntry {
    #[validate(range(min = 1))]
    pub product_id: i32,

    #[validate(range(min = 0))]
    pub quantity: i32,
}

/// Sortable product columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortKey {
    Id,
    Name,
    Price,
    TypeId,
}

impl SortKey for ProductSortKey {
    type Record = Product;

    const COLUMNS: &'static [(&'static str, Self)] = &[
        ("id", ProductSortKey::Id),
        ("nombre", ProductSortKey::Name),
        ("precio", ProductSortKey::Price),
        ("idtipoproducto", ProductSortKey::TypeId),
    ];

    const DEFAULT: Self = ProductSortKey::Id;

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            ProductSortKey::Id => a.id.cmp(&b.id),
            ProductSortKey::Name => a.name.cmp(&b.name),
            ProductSortKey::Price => a.price.cmp(&b.price),
            ProductSortKey::TypeId => a.type_id.cmp(&b.type_id),
        }
    }

    fn tie_breaker(a: &Product, b: &Product) -> Ordering {
        a.id.cmp(&b.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create(price: &str) -> CreateProduct {
        CreateProduct {
            type_id: 1,
            name: "Widget".to_string(),
            price: dec(price),
        }
    }

    #[test]
    fn test_max_price_constant() {
        assert_eq!(MAX_PRICE, dec("9999999999999999.99"));
    }

    #[test]
    fn test_round_price_midpoint_away_from_zero() {
        assert_eq!(round_price(dec("1.005")), dec("1.01"));
        assert_eq!(round_price(dec("1.004")), dec("1.00"));
        assert_eq!(round_price(dec("2.5")), dec("2.50"));
    }

    #[test]
    fn test_price_bounds() {
        assert_eq!(MAX_PRICE, "9999999999999999.99".parse::<Decimal>().unwrap());
        assert!(create("0.01").validate().is_ok());
        assert!(create("9999999999999999.99").validate().is_ok());
        assert!(create("0").validate().is_err());
        assert!(create("-3.50").validate().is_err());
        assert!(create("10000000000000000.00").validate().is_err());
    }

    #[test]
    fn test_create_product_field_rules() {
        let mut input = create("5.00");
        input.type_id = 0;
        input.name = String::new();

        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("type_id"));
        assert!(fields.contains_key("name"));

        let mut long = create("5.00");
        long.name = "x".repeat(101);
        assert!(long.validate().is_err());
        long.name = "x".repeat(100);
        assert!(long.validate().is_ok());
    }

    #[test]
    fn test_create_product_deserializes_camel_case_and_rounds() {
        let input: CreateProduct =
            serde_json::from_str(r#"{"typeId": 2, "name": "Bolt", "price": 0.125}"#).unwrap();
        assert_eq!(input.type_id, 2);
        assert_eq!(input.price, dec("0.13"));
    }

    #[test]
    fn test_tiny_price_rounds_to_zero_and_fails() {
        let input: CreateProduct =
            serde_json::from_str(r#"{"typeId": 2, "name": "Bolt", "price": 0.004}"#).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_product_serializes_price_as_number() {
        let product = Product::new(7, create("10.50"));
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["typeId"], 1);
        assert_eq!(json["price"], 10.5);
        assert_eq!(json["version"], 1);
    }

    #[test]
    fn test_apply_update_bumps_version() {
        let mut product = Product::new(3, create("1.00"));
        let input = UpdateProduct {
            id: 3,
            type_id: 4,
            name: "Renamed".to_string(),
            price: dec("2.345"),
            version: 1,
        };
        let version = input.next_version().unwrap();
        product.apply_update(input, version);

        assert_eq!(product.type_id, 4);
        assert_eq!(product.name, "Renamed");
        assert_eq!(product.price, dec("2.35"));
        assert_eq!(product.version, 2);
    }

    #[test]
    fn test_exhausted_version_has_no_successor() {
        let mut input = UpdateProduct {
            id: 3,
            type_id: 1,
            name: "Widget".to_string(),
            price: dec("1.00"),
            version: i32::MAX,
        };
        assert_eq!(input.next_version(), None);

        input.version = 41;
        assert_eq!(input.next_version(), Some(42));
    }

    #[test]
    fn test_stock_entry_rules() {
        let entry = |product_id, quantity| CreateStockEntry {
            product_id,
            quantity,
        };
        assert!(entry(1, 0).validate().is_ok());
        assert!(entry(1, -1).validate().is_err());
        assert!(entry(0, 3).validate().is_err());

        let blank = CreateProductType {
            description: String::new(),
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_product_sort_columns() {
        assert_eq!(
            ProductSortKey::from_column(Some("PRECIO")),
            ProductSortKey::Price
        );
        assert_eq!(
            ProductSortKey::from_column(Some("IdTipoProducto")),
            ProductSortKey::TypeId
        );
        assert_eq!(
            ProductSortKey::from_column(Some("price")),
            ProductSortKey::Id
        );
    }
}
