use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFields};

/// Repository trait for Product persistence
///
/// Implementations own id and timestamp assignment. Lists come back ordered
/// by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product
    async fn find_all(&self) -> ProductResult<Vec<Product>>;

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Store a new product, assigning `id`, `created_at` and `updated_at`
    async fn insert(&self, fields: ProductFields) -> ProductResult<Product>;

    /// Overwrite the product with the same id, refreshing `updated_at`
    async fn save(&self, product: Product) -> ProductResult<Product>;

    async fn exists_by_id(&self, id: i64) -> ProductResult<bool>;

    /// Remove a product; a missing id is not an error
    async fn delete_by_id(&self, id: i64) -> ProductResult<()>;

    /// Exact category match
    async fn find_by_category(&self, category: &str) -> ProductResult<Vec<Product>>;

    /// Case-sensitive substring match on the name
    async fn find_by_name_containing(&self, name: &str) -> ProductResult<Vec<Product>>;

    /// Inclusive on both bounds
    async fn find_by_price_between(&self, min: Decimal, max: Decimal)
    -> ProductResult<Vec<Product>>;

    async fn find_by_category_and_price_range(
        &self,
        category: &str,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>>;

    /// Products with stock strictly above `threshold`
    async fn find_by_stock_greater_than(&self, threshold: i32) -> ProductResult<Vec<Product>>;
}

/// Process-local repository backed by a `HashMap`, used by the handler tests.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<i64, Product>>,
    next_id: AtomicI64,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<F>(&self, predicate: F) -> Vec<Product>
    where
        F: Fn(&Product) -> bool,
    {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect();
        matching.sort_by_key(|p| p.id);
        matching
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        Ok(self.select(|_| true).await)
    }

    async fn find_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn insert(&self, fields: ProductFields) -> ProductResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            stock: fields.stock,
            image_url: fields.image_url,
            category: fields.category,
            created_at: now,
            updated_at: now,
        };

        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn save(&self, mut product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        let existing = products
            .get(&product.id)
            .ok_or(ProductError::NotFound(product.id))?;

        product.created_at = existing.created_at;
        product.updated_at = Utc::now().max(existing.updated_at);
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn exists_by_id(&self, id: i64) -> ProductResult<bool> {
        Ok(self.products.read().await.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> ProductResult<()> {
        self.products.write().await.remove(&id);
        Ok(())
    }

    async fn find_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        Ok(self
            .select(|p| p.category.as_deref() == Some(category))
            .await)
    }

    async fn find_by_name_containing(&self, name: &str) -> ProductResult<Vec<Product>> {
        Ok(self.select(|p| p.name.contains(name)).await)
    }

    async fn find_by_price_between(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        Ok(self.select(|p| p.price >= min && p.price <= max).await)
    }

    async fn find_by_category_and_price_range(
        &self,
        category: &str,
        min: Decimal,
        max: Decimal,
    ) -> ProductResult<Vec<Product>> {
        Ok(self
            .select(|p| {
                p.category.as_deref() == Some(category) && p.price >= min && p.price <= max
            })
            .await)
    }

    async fn find_by_stock_greater_than(&self, threshold: i32) -> ProductResult<Vec<Product>> {
        Ok(self.select(|p| p.stock > threshold).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fields(name: &str, price: &str, category: Option<&str>, stock: i32) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            stock,
            image_url: None,
            category: category.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids_and_equal_timestamps() {
        let repo = InMemoryProductRepository::new();

        let a = repo.insert(fields("A", "1.00", None, 0)).await.unwrap();
        let b = repo.insert(fields("B", "2.00", None, 0)).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.created_at, a.updated_at);
        assert!(repo.exists_by_id(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_preserves_created_at() {
        let repo = InMemoryProductRepository::new();
        let created = repo.insert(fields("A", "1.00", None, 0)).await.unwrap();

        let mut changed = created.clone();
        changed.name = "B".to_string();
        changed.created_at = Utc::now() + chrono::Duration::days(1);

        let saved = repo.save(changed).await.unwrap();
        assert_eq!(saved.name, "B");
        assert_eq!(saved.created_at, created.created_at);
        assert!(saved.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_save_unknown_id_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let mut product = repo.insert(fields("A", "1.00", None, 0)).await.unwrap();
        product.id = 99;

        assert!(matches!(
            repo.save(product).await,
            Err(ProductError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let repo = InMemoryProductRepository::new();
        repo.delete_by_id(5).await.unwrap();
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_derived_queries() {
        let repo = InMemoryProductRepository::new();
        repo.insert(fields("Blue Widget", "10.00", Some("tools"), 3))
            .await
            .unwrap();
        repo.insert(fields("widget mini", "25.00", Some("tools"), 0))
            .await
            .unwrap();
        repo.insert(fields("Gadget", "50.00", Some("toys"), 10))
            .await
            .unwrap();
        repo.insert(fields("Other", "50.01", None, 1)).await.unwrap();

        let tools = repo.find_by_category("tools").await.unwrap();
        assert_eq!(tools.len(), 2);
        assert!(tools[0].id < tools[1].id);

        let widgets = repo.find_by_name_containing("Widget").await.unwrap();
        assert_eq!(widgets.len(), 1, "search is case-sensitive");

        let ranged = repo
            .find_by_price_between(Decimal::from(10), Decimal::from(50))
            .await
            .unwrap();
        let names: Vec<_> = ranged.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Widget", "widget mini", "Gadget"]);

        let cheap_tools = repo
            .find_by_category_and_price_range("tools", Decimal::from(20), Decimal::from(30))
            .await
            .unwrap();
        assert_eq!(cheap_tools.len(), 1);
        assert_eq!(cheap_tools[0].name, "widget mini");

        let in_stock = repo.find_by_stock_greater_than(0).await.unwrap();
        assert_eq!(in_stock.len(), 3);
        let well_stocked = repo.find_by_stock_greater_than(3).await.unwrap();
        assert_eq!(well_stocked.len(), 1);
    }
}
