//! Product Service - Business logic layer

use observability::ProductMetrics;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductInput};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Validation runs before any repository call, so an invalid body is
/// rejected even when the target id does not exist.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let products = self.repository.find_all().await?;
        info!(count = products.len(), "Listed products");
        ProductMetrics::record_query("all", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(product_name = ?input.name))]
    pub async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let fields = input.into_fields()?;
        let product = self.repository.insert(fields).await?;

        info!(product_id = product.id, "Created product");
        ProductMetrics::record_created();
        Ok(product)
    }

    /// Full overwrite: absent optional fields are cleared, absent stock becomes 0.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: ProductInput) -> ProductResult<Product> {
        let fields = input.into_fields()?;

        let mut product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;
        product.overwrite(fields);

        let product = self.repository.save(product).await?;
        info!(product_id = id, "Updated product");
        ProductMetrics::record_updated();
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ProductResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(ProductError::NotFound(id));
        }

        self.repository.delete_by_id(id).await?;
        info!(product_id = id, "Deleted product");
        ProductMetrics::record_deleted();
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn find_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        let products = self.repository.find_by_category(category).await?;
        info!(count = products.len(), "Found products by category");
        ProductMetrics::record_query("category", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        let products = self.repository.find_by_name_containing(name).await?;
        info!(count = products.len(), "Searched products by name");
        ProductMetrics::record_query("name", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn find_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        let products = self.repository.find_by_price_between(min, max).await?;
        info!(count = products.len(), "Found products by price range");
        ProductMetrics::record_query("price_range", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    pub async fn find_by_category_and_price_range(
        &self,
        category: &str,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        let products = self
            .repository
            .find_by_category_and_price_range(category, min, max)
            .await?;
        info!(count = products.len(), "Found products by category and price range");
        ProductMetrics::record_query("category_price_range", products.len());
        Ok(products)
    }

    /// Products whose stock is strictly above `min_stock`
    #[instrument(skip(self))]
    pub async fn find_in_stock(&self, min_stock: i32) -> ProductResult<Vec<Product>> {
        let products = self.repository.find_by_stock_greater_than(min_stock).await?;
        info!(count = products.len(), "Found products in stock");
        ProductMetrics::record_query("in_stock", products.len());
        Ok(products)
    }
}
