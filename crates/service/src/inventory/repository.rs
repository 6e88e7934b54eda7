use async_trait::async_trait;

use models::{Product, ProductId, Stock};

use crate::errors::ServiceError;

/// Read access to the remote inventory.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ServiceError>;
    async fn product(&self, product_id: ProductId) -> Result<Product, ServiceError>;
}

/// Simple in-memory mock inventory for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockInventory {
        stock: Mutex<HashMap<ProductId, u32>>,
        products: Mutex<HashMap<ProductId, Product>>,
        offline: AtomicBool,
        requests: AtomicUsize,
    }

    impl MockInventory {
        /// Register a catalog product with `stock` units available.
        pub fn with_product(self, id: ProductId, stock: u32) -> Self {
            let product = Product::new(id)
                .with_attribute("title", format!("Product {id}"))
                .with_attribute("price", 179.9)
                .with_attribute("image", format!("https://cdn.example/{id}.jpg"));
            self.with_catalog_record(product, stock)
        }

        /// Register a catalog record exactly as the inventory would return it.
        pub fn with_catalog_record(self, product: Product, stock: u32) -> Self {
            let id = product.id;
            self.products.lock().unwrap().insert(id, product);
            self.stock.lock().unwrap().insert(id, stock);
            self
        }

        /// Stock without catalog details, to exercise a failing product lookup.
        pub fn with_stock_only(self, id: ProductId, stock: u32) -> Self {
            self.stock.lock().unwrap().insert(id, stock);
            self
        }

        pub fn set_stock(&self, id: ProductId, amount: u32) {
            self.stock.lock().unwrap().insert(id, amount);
        }

        /// Make every call fail as if the network were down.
        pub fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        pub fn requests(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }

        fn begin(&self) -> Result<(), ServiceError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(common::CoreError::Network("connection refused".into()).into());
            }
            Ok(())
        }
    }

    #[async_trait]
    impl InventoryService for MockInventory {
        async fn stock(&self, product_id: ProductId) -> Result<Stock, ServiceError> {
            self.begin()?;
            let stock = self.stock.lock().unwrap();
            stock
                .get(&product_id)
                .map(|amount| Stock { id: product_id, amount: *amount })
                .ok_or_else(|| ServiceError::not_found(&format!("stock {product_id}")))
        }

        async fn product(&self, product_id: ProductId) -> Result<Product, ServiceError> {
            self.begin()?;
            let products = self.products.lock().unwrap();
            products
                .get(&product_id)
                .cloned()
                .ok_or_else(|| ServiceError::not_found(&format!("product {product_id}")))
        }
    }
}
