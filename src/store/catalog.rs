use crate::model::Product;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The product catalog: current stock and price per product id.
///
/// Safe for concurrent readers; point store/load is atomic per key. It does
/// NOT make a read-modify-write of `stock` atomic; that discipline belongs
/// to the fulfillment loop, which is the single writer for inventory.
#[derive(Default, Clone)]
pub struct ProductCatalog {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl ProductCatalog {
    /// Creates a new, empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a product with the given id is present.
    pub async fn exists(&self, id: &str) -> bool {
        let products = self.products.read().await;
        products.contains_key(id)
    }

    /// Returns the product with the given id, if any.
    pub async fn find(&self, id: &str) -> Option<Product> {
        let products = self.products.read().await;
        products.get(id).cloned()
    }

    /// Inserts or fully replaces a product by id.
    pub async fn upsert(&self, product: Product) {
        let mut products = self.products.write().await;
        products.insert(product.id.clone(), product);
    }

    /// Returns all products. Iteration order is unspecified.
    pub async fn all_products(&self) -> Vec<Product> {
        let products = self.products.read().await;
        products.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn widget(stock: i64) -> Product {
        Product::new("widget", "Widget", dec!(2.50), stock)
    }

    #[tokio::test]
    async fn test_upsert_and_find() {
        let catalog = ProductCatalog::new();
        catalog.upsert(widget(10)).await;

        assert!(catalog.exists("widget").await);
        let found = catalog.find("widget").await.unwrap();
        assert_eq!(found.stock, 10);

        assert!(!catalog.exists("gadget").await);
        assert!(catalog.find("gadget").await.is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_product() {
        let catalog = ProductCatalog::new();
        catalog.upsert(widget(10)).await;
        catalog.upsert(widget(4)).await;

        let found = catalog.find("widget").await.unwrap();
        assert_eq!(found.stock, 4);
        assert_eq!(catalog.all_products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_all_products() {
        let catalog = ProductCatalog::new();
        catalog.upsert(widget(10)).await;
        catalog
            .upsert(Product::new("gadget", "Gadget", dec!(9.99), 3))
            .await;

        let mut ids: Vec<String> = catalog
            .all_products()
            .await
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["gadget", "widget"]);
    }
}
