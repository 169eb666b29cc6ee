use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use typeshare::typeshare;

pub const DEFAULT_MIN_STOCK_LEVEL: u32 = 10;

fn default_min_stock_level() -> u32 {
    DEFAULT_MIN_STOCK_LEVEL
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status_str = match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        };
        write!(f, "{status_str}")
    }
}

/// A catalog entry as returned by a [`crate::CatalogLookup`].
#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub stock_level: u32,
    #[serde(default = "default_min_stock_level")]
    pub min_stock_level: u32,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        unit_price: Decimal,
        stock_level: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            unit_price,
            stock_level,
            min_stock_level: DEFAULT_MIN_STOCK_LEVEL,
        }
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.stock_level == 0 {
            StockStatus::OutOfStock
        } else if self.stock_level <= self.min_stock_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}
