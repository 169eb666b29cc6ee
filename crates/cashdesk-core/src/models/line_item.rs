use rust_decimal::Decimal;
use serde::Serialize;

use super::product::Product;

/// One product's quantity within the active bill.
///
/// Name, category and price are copied from the catalog when the line is
/// created; later catalog changes do not reach an existing line.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub(crate) fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            unit_price: product.unit_price,
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
