use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{Product, ProductFields},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch(&self, query: Select<entity::Entity>) -> ProductResult<Vec<Product>> {
        let models = query
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        self.fetch(entity::Entity::find()).await
    }

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::from))
    }

    async fn insert(&self, fields: ProductFields) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = fields.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Inserted product");
        Ok(model.into())
    }

    async fn save(&self, product: Product) -> ProductResult<Product> {
        let id = product.id;
        let active_model: entity::ActiveModel = product.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ProductError::NotFound(id),
            other => ProductError::Database(other),
        })?;

        tracing::info!(product_id = model.id, "Saved product");
        Ok(model.into())
    }

    async fn exists_by_id(&self, id: i64) -> ProductResult<bool> {
        let count = entity::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> ProductResult<()> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::info!(product_id = id, rows = result.rows_affected, "Deleted product");
        Ok(())
    }

    async fn find_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        self.fetch(entity::Entity::find().filter(entity::Column::Category.eq(category)))
            .await
    }

    async fn find_by_name_containing(&self, name: &str) -> ProductResult<Vec<Product>> {
        self.fetch(entity::Entity::find().filter(entity::Column::Name.contains(name)))
            .await
    }

    async fn find_by_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        self.fetch(entity::Entity::find().filter(entity::Column::Price.between(min, max)))
            .await
    }

    async fn find_by_category_and_price_range(
        &self,
        category: &str,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        self.fetch(
            entity::Entity::find()
                .filter(entity::Column::Category.eq(category))
                .filter(entity::Column::Price.between(min, max)),
        )
        .await
    }

    async fn find_by_stock_greater_than(&self, threshold: i32) -> ProductResult<Vec<Product>> {
        self.fetch(entity::Entity::find().filter(entity::Column::Stock.gt(threshold)))
            .await
    }
}
