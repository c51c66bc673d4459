//! File-backed registry of selectable products.
//!
//! The product list is client configuration, not remote data: it is
//! loaded once at startup and persisted on every change. Absent or
//! corrupt storage silently falls back to the seeded default so the
//! dashboard always has at least one product to query.

use crate::errors::AppError;
use crate::models::{Product, ProductUpdate};
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Explicitly constructed product store.
///
/// All mutation goes through `add`/`update`/`remove`, each of which
/// rewrites the backing file before returning.
pub struct ProductRegistry {
    path: PathBuf,
    products: RwLock<Vec<Product>>,
}

/// The single seeded entry used when storage is empty or unreadable.
pub fn default_products() -> Vec<Product> {
    vec![Product {
        id: "shalomconsorcios".to_string(),
        name: "Shalom Consórcios".to_string(),
        active: true,
    }]
}

impl ProductRegistry {
    /// Opens the registry, loading the stored list or seeding defaults.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let products = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<Vec<Product>>(&raw) {
                Ok(list) if !list.is_empty() => list,
                Ok(_) => {
                    tracing::warn!("Product storage at {:?} is empty, seeding defaults", path);
                    default_products()
                }
                Err(e) => {
                    tracing::warn!(
                        "Product storage at {:?} is corrupt ({}), seeding defaults",
                        path,
                        e
                    );
                    default_products()
                }
            },
            Err(_) => default_products(),
        };

        tracing::info!("Product registry loaded ({} entries)", products.len());
        Self {
            path,
            products: RwLock::new(products),
        }
    }

    pub async fn list(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    /// Adds a new product. Duplicate ids are rejected.
    pub async fn add(&self, product: Product) -> Result<Product, AppError> {
        if product.id.trim().is_empty() {
            return Err(AppError::BadRequest("Product id cannot be empty".to_string()));
        }

        let mut products = self.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return Err(AppError::Conflict(format!(
                "Product '{}' already exists",
                product.id
            )));
        }
        products.push(product.clone());
        self.persist(&products).await?;
        Ok(product)
    }

    /// Applies a partial update to one product.
    pub async fn update(&self, id: &str, changes: ProductUpdate) -> Result<Product, AppError> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Product '{}' not found", id)))?;

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(active) = changes.active {
            product.active = active;
        }
        let updated = product.clone();
        self.persist(&products).await?;
        Ok(updated)
    }

    /// Removes one product from the registry.
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(AppError::NotFound(format!("Product '{}' not found", id)));
        }
        self.persist(&products).await
    }

    async fn persist(&self, products: &[Product]) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(products)
            .map_err(|e| AppError::InternalError(format!("Failed to encode products: {}", e)))?;
        tokio::fs::write(&self.path, raw).await.map_err(|e| {
            AppError::InternalError(format!("Failed to persist products to {:?}: {}", self.path, e))
        })
    }
}
