use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use typeshare::typeshare;
use uuid::Uuid;

use super::{line_item::LineItem, totals::CartTotals};
use crate::utils::payment::PaymentMethod;

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReceiptLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl From<&LineItem> for ReceiptLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// Record of a settled bill, handed to whatever keeps the sales ledger.
#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Receipt {
    pub id: Uuid,
    pub invoice_number: String,
    pub payment_method: PaymentMethod,
    pub lines: Vec<ReceiptLine>,
    pub discount_percentage: u8,
    pub totals: CartTotals,
    pub tendered: Decimal,
    pub change_due: Decimal,
}
