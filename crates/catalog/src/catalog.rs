use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use storefront_core::Sku;

use crate::product::{Product, RawProductRecord};

const BUNDLED_CATALOG: &str = include_str!("../data/products.json");

/// Why a raw record could not become a product.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("malformed price: {0:?}")]
    MalformedPrice(String),

    #[error("duplicate sku: {0}")]
    DuplicateSku(Sku),

    #[error("sku must not be blank")]
    EmptySku,

    #[error("catalog data is not valid JSON: {0}")]
    Json(String),
}

/// A raw record excluded from the catalog, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// Position of the record in the source data.
    pub position: usize,
    pub sku: String,
    pub reason: CatalogError,
}

impl Serialize for CatalogError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a lenient load: the usable catalog plus everything that was dropped.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub rejected: Vec<RejectedRecord>,
}

/// In-memory product catalog, in source order, unique by sku.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<Sku, usize>,
}

impl Catalog {
    /// Build the catalog, excluding (and reporting) records that cannot be priced
    /// or that reuse a sku already taken by an earlier record.
    pub fn load(records: impl IntoIterator<Item = RawProductRecord>) -> CatalogLoad {
        let mut catalog = Catalog::default();
        let mut rejected = Vec::new();

        for (position, raw) in records.into_iter().enumerate() {
            let sku = raw.sku.clone();
            match catalog.insert(raw) {
                Ok(()) => {}
                Err(reason) => {
                    tracing::warn!(position, sku = %sku, %reason, "catalog record rejected");
                    rejected.push(RejectedRecord {
                        position,
                        sku,
                        reason,
                    });
                }
            }
        }

        tracing::info!(
            products = catalog.len(),
            rejected = rejected.len(),
            "catalog loaded"
        );

        CatalogLoad { catalog, rejected }
    }

    /// Strict variant of [`Catalog::load`]: the first bad record fails the load.
    pub fn try_load(records: impl IntoIterator<Item = RawProductRecord>) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();
        for raw in records {
            catalog.insert(raw)?;
        }
        Ok(catalog)
    }

    /// Parse catalog JSON (an array of raw records) and load it leniently.
    pub fn from_json(json: &str) -> Result<CatalogLoad, CatalogError> {
        let records: Vec<RawProductRecord> =
            serde_json::from_str(json).map_err(|e| CatalogError::Json(e.to_string()))?;
        Ok(Self::load(records))
    }

    /// The catalog shipped with the storefront.
    pub fn bundled() -> Result<CatalogLoad, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    fn insert(&mut self, raw: RawProductRecord) -> Result<(), CatalogError> {
        let product = Product::from_raw(raw)?;
        if self.index.contains_key(product.sku()) {
            return Err(CatalogError::DuplicateSku(product.sku().clone()));
        }
        self.index.insert(product.sku().clone(), self.products.len());
        self.products.push(product);
        Ok(())
    }

    pub fn get(&self, sku: &Sku) -> Option<&Product> {
        self.index.get(sku).map(|&i| &self.products[i])
    }

    pub fn contains(&self, sku: &Sku) -> bool {
        self.index.contains_key(sku)
    }

    /// All products in source order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct sections, in first-seen order.
    pub fn sections(&self) -> Vec<&str> {
        distinct(self.products.iter().map(Product::section))
    }

    /// Distinct terms tags, in first-seen order.
    pub fn terms(&self) -> Vec<&str> {
        distinct(self.products.iter().map(Product::terms))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::new();
    for value in values {
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
