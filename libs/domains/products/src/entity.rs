use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{Product, ProductFields};

/// Sea-ORM entity for the `products` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Scale of the `price` column
const PRICE_SCALE: u32 = 2;

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        let mut price = model.price;
        price.rescale(PRICE_SCALE);

        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price,
            stock: model.stock,
            image_url: model.image_url,
            category: model.category,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// New row: id comes from the sequence, both timestamps from one instant
impl From<ProductFields> for ActiveModel {
    fn from(fields: ProductFields) -> Self {
        let now = Utc::now();
        ActiveModel {
            id: NotSet,
            name: Set(fields.name),
            description: Set(fields.description),
            price: Set(fields.price),
            stock: Set(fields.stock),
            image_url: Set(fields.image_url),
            category: Set(fields.category),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

// Full overwrite of an existing row; created_at is never written
impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            stock: Set(product.stock),
            image_url: Set(product.image_url),
            category: Set(product.category),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        }
    }
}
