use rust_decimal::Decimal;
use std::{collections::HashMap, fs, path::Path};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::product::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Duplicate product id in catalog: {0}")]
    DuplicateId(String),

    #[error("Negative unit price for product: {0}")]
    InvalidPrice(String),

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves a scanned or typed product code into a catalog entry.
pub trait CatalogLookup {
    fn lookup(&self, identifier: &str) -> Result<Product, CatalogError>;
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for &T {
    fn lookup(&self, identifier: &str) -> Result<Product, CatalogError> {
        (**self).lookup(identifier)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl InMemoryCatalog {
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if product.unit_price.is_sign_negative() && !product.unit_price.is_zero() {
                return Err(CatalogError::InvalidPrice(product.id.clone()));
            }
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products, index })
    }

    /// Loads a JSON array of products.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&contents)?;
        let catalog = Self::from_products(products)?;
        info!(
            "Loaded {} products from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn with_samples() -> Self {
        let samples = vec![
            Product::new("P001", "Coffee 500g", "Grocery", Decimal::from(450), 40),
            Product::new("P002", "Tea 250g", "Grocery", Decimal::from(220), 60),
            Product::new("P003", "Wireless Mouse", "Electronics", Decimal::from(1299), 8),
            Product::new("P004", "USB Cable", "Electronics", Decimal::from(299), 25),
        ];
        let index = samples
            .iter()
            .enumerate()
            .map(|(position, product)| (product.id.clone(), position))
            .collect();
        Self {
            products: samples,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive match on product name or id. An empty term matches
    /// everything.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let needle = term.trim().to_lowercase();
        let matches: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.id.to_lowercase().contains(&needle)
            })
            .collect();
        debug!("Catalog search '{}' matched {} products", term, matches.len());
        matches
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn lookup(&self, identifier: &str) -> Result<Product, CatalogError> {
        let code = identifier.trim();
        self.index
            .get(code)
            .map(|&position| self.products[position].clone())
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))
    }
}
