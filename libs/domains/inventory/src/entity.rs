//! Sea-ORM entities. The schema is provisioned outside this service.

pub mod product_types {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "product_types")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub description: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::ProductType {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                description: model.description,
            }
        }
    }
}

pub mod products {
    use sea_orm::ActiveValue::{NotSet, Set};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub type_id: i32,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub name: String,
        #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
        pub price: Decimal,
        pub version: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Product {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                type_id: model.type_id,
                name: model.name,
                price: model.price,
                version: model.version,
            }
        }
    }

    impl From<crate::models::CreateProduct> for ActiveModel {
        fn from(input: crate::models::CreateProduct) -> Self {
            ActiveModel {
                id: NotSet,
                type_id: Set(input.type_id),
                name: Set(input.name),
                price: Set(crate::models::round_price(input.price)),
                version: Set(1),
            }
        }
    }
}

pub mod stock_entries {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "stock_entries")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub product_id: i32,
        pub quantity: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::StockEntry {
        fn from(model: Model) -> Self {
            Self {
                id: model.id,
                product_id: model.product_id,
                quantity: model.quantity,
            }
        }
    }
}
