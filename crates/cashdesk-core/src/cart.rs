use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use typeshare::typeshare;

use crate::{
    TAX_RATE,
    catalog::CatalogError,
    models::{
        line_item::LineItem,
        product::{Product, StockStatus},
        totals::CartTotals,
    },
};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Item not in bill: {0}")]
    ItemNotFound(String),

    #[error("Discount must be between 0 and 100, got {0}")]
    InvalidDiscount(i64),

    #[error("Tendered amount cannot be negative: {0}")]
    InvalidAmount(Decimal),

    #[error("No items in bill")]
    EmptyCart,

    #[error("Catalog lookup failed: {0}")]
    Lookup(#[source] CatalogError),
}

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CartState {
    Empty,
    Populated,
    Settled,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum PaymentOutcome {
    ChangeDue(Decimal),
    Shortfall(Decimal),
}

impl PaymentOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentOutcome::ChangeDue(_))
    }

    pub fn change_due(&self) -> Option<Decimal> {
        match self {
            PaymentOutcome::ChangeDue(change) => Some(*change),
            PaymentOutcome::Shortfall(_) => None,
        }
    }

    pub fn shortfall(&self) -> Option<Decimal> {
        match self {
            PaymentOutcome::Shortfall(short) => Some(*short),
            PaymentOutcome::ChangeDue(_) => None,
        }
    }
}

/// The active bill of one terminal.
///
/// Totals are never stored: every read rescans the lines, so they cannot
/// drift from the items they are computed from. Failed operations leave the
/// cart exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
    discount_percentage: u8,
    settled: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn discount_percentage(&self) -> u8 {
        self.discount_percentage
    }

    pub fn tax_rate(&self) -> Decimal {
        TAX_RATE
    }

    pub fn state(&self) -> CartState {
        if self.items.is_empty() {
            CartState::Empty
        } else if self.settled {
            CartState::Settled
        } else {
            CartState::Populated
        }
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.items, self.discount_percentage)
    }

    /// Adds one unit of a looked-up product. Re-adding an id already in the
    /// bill bumps its quantity instead of creating a second row.
    pub fn add_item(
        &mut self,
        lookup: Result<Product, CatalogError>,
    ) -> Result<&LineItem, CartError> {
        let product = match lookup {
            Ok(product) => product,
            Err(CatalogError::NotFound(identifier)) => {
                return Err(CartError::ProductNotFound(identifier));
            }
            Err(other) => return Err(CartError::Lookup(other)),
        };

        match product.stock_status() {
            StockStatus::InStock => {}
            status => warn!(
                "Adding {} ({}) with stock status {status}: {} left",
                product.id, product.name, product.stock_level
            ),
        }

        let position = match self.position(&product.id) {
            Some(position) => {
                let item = &mut self.items[position];
                item.quantity = item.quantity.saturating_add(1);
                position
            }
            None => {
                self.items.push(LineItem::from_product(&product));
                self.items.len() - 1
            }
        };
        self.settled = false;

        let item = &self.items[position];
        debug!("Line {} now at quantity {}", item.product_id, item.quantity);
        Ok(item)
    }

    /// Shifts a line's quantity by `delta`, never below 1. Removing a line is
    /// a separate operation.
    pub fn adjust_quantity(&mut self, product_id: &str, delta: i64) -> Result<&LineItem, CartError> {
        let position = self
            .position(product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;

        let item = &mut self.items[position];
        let adjusted = i64::from(item.quantity)
            .saturating_add(delta)
            .clamp(1, i64::from(u32::MAX));
        item.quantity = adjusted as u32;
        self.settled = false;

        let item = &self.items[position];
        debug!(
            "Adjusted {} by {delta}, quantity now {}",
            item.product_id, item.quantity
        );
        Ok(item)
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<LineItem, CartError> {
        let position = self
            .position(product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.to_string()))?;

        let removed = self.items.remove(position);
        self.settled = false;
        debug!("Removed line {}", removed.product_id);
        Ok(removed)
    }

    /// Replaces the discount; discounts never stack.
    pub fn apply_discount(&mut self, percentage: i64) -> Result<(), CartError> {
        let percentage = u8::try_from(percentage)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(CartError::InvalidDiscount(percentage))?;

        self.discount_percentage = percentage;
        self.settled = false;
        debug!("Discount set to {percentage}%");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.discount_percentage = 0;
        self.settled = false;
    }

    /// Compares the tendered amount with the grand total. The cart is kept
    /// either way; clearing after a successful payment is up to the caller.
    pub fn reconcile_payment(&mut self, tendered: Decimal) -> Result<PaymentOutcome, CartError> {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart);
        }
        if tendered.is_sign_negative() && !tendered.is_zero() {
            return Err(CartError::InvalidAmount(tendered));
        }

        let grand_total = self.totals().grand_total;
        let outcome = if tendered >= grand_total {
            self.settled = true;
            PaymentOutcome::ChangeDue(tendered - grand_total)
        } else {
            PaymentOutcome::Shortfall(grand_total - tendered)
        };

        info!("Reconciled {tendered} against {grand_total}: {outcome:?}");
        Ok(outcome)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: &str, price: Decimal) -> Product {
        Product::new(id, format!("Product {id}"), "General", price, 100)
    }

    fn cart_with(lines: &[(&str, Decimal, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, price, quantity) in lines {
            for _ in 0..*quantity {
                cart.add_item(Ok(product(id, *price))).unwrap();
            }
        }
        cart
    }

    #[test]
    fn re_adding_increments_instead_of_duplicating() {
        let cart = cart_with(&[("P001", dec!(899.99), 2)]);
        assert_eq!(cart.items().len(), 1);
        let line = cart.item("P001").unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.line_total(), dec!(1799.98));
    }

    #[test]
    fn keeps_first_add_order() {
        let mut cart = cart_with(&[("B", dec!(1), 1), ("A", dec!(2), 1)]);
        cart.add_item(Ok(product("B", dec!(1)))).unwrap();
        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn line_keeps_price_from_add_time() {
        let mut cart = cart_with(&[("P001", dec!(450), 1)]);
        cart.add_item(Ok(product("P001", dec!(500)))).unwrap();
        let line = cart.item("P001").unwrap();
        assert_eq!(line.unit_price, dec!(450));
        assert_eq!(line.line_total(), dec!(900));
    }

    #[test]
    fn unknown_product_leaves_cart_untouched() {
        let mut cart = Cart::new();
        let err = cart
            .add_item(Err(CatalogError::NotFound("P999".into())))
            .unwrap_err();
        assert!(matches!(err, CartError::ProductNotFound(ref id) if id == "P999"));
        assert_eq!(cart.state(), CartState::Empty);
        assert_eq!(cart.totals().subtotal, Decimal::ZERO);
    }

    #[test]
    fn out_of_stock_is_informational() {
        let mut cart = Cart::new();
        let sold_out = Product::new("P009", "Sold Out", "General", dec!(10), 0);
        assert_eq!(cart.add_item(Ok(sold_out)).unwrap().quantity, 1);
    }

    #[test]
    fn quantity_never_drops_below_one() {
        let mut cart = cart_with(&[("P001", dec!(10), 3)]);
        assert_eq!(cart.adjust_quantity("P001", -1).unwrap().quantity, 2);
        assert_eq!(cart.adjust_quantity("P001", -50).unwrap().quantity, 1);
        assert_eq!(cart.adjust_quantity("P001", i64::MIN).unwrap().quantity, 1);
        assert_eq!(cart.adjust_quantity("P001", 4).unwrap().quantity, 5);
        assert_eq!(cart.adjust_quantity("P001", i64::MAX).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn adjusting_or_removing_missing_item_fails() {
        let mut cart = cart_with(&[("P001", dec!(10), 1)]);
        assert!(matches!(
            cart.adjust_quantity("P002", 1),
            Err(CartError::ItemNotFound(_))
        ));
        assert!(matches!(cart.remove_item("P002"), Err(CartError::ItemNotFound(_))));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn remove_drops_whole_line() {
        let mut cart = cart_with(&[("P001", dec!(10), 5), ("P002", dec!(3), 1)]);
        let removed = cart.remove_item("P001").unwrap();
        assert_eq!(removed.quantity, 5);
        assert_eq!(cart.totals().subtotal, dec!(3));
    }

    #[test]
    fn invalid_discount_keeps_previous_value() {
        let mut cart = cart_with(&[("P001", dec!(100), 1)]);
        cart.apply_discount(15).unwrap();
        for bad in [-1, 101, 256, i64::MIN, i64::MAX] {
            assert!(matches!(
                cart.apply_discount(bad),
                Err(CartError::InvalidDiscount(p)) if p == bad
            ));
            assert_eq!(cart.discount_percentage(), 15);
        }
        cart.apply_discount(0).unwrap();
        cart.apply_discount(100).unwrap();
        assert_eq!(cart.discount_percentage(), 100);
    }

    #[test]
    fn discount_overwrites() {
        let mut cart = cart_with(&[("P001", dec!(100), 1)]);
        cart.apply_discount(10).unwrap();
        cart.apply_discount(5).unwrap();
        assert_eq!(cart.totals().discount_amount, dec!(5));
    }

    #[test]
    fn worked_example_with_discount() {
        let mut cart = cart_with(&[("P001", dec!(899.99), 2)]);
        cart.apply_discount(10).unwrap();
        let totals = cart.totals();
        assert_eq!(totals.subtotal, dec!(1799.98));
        assert_eq!(totals.discount_amount, dec!(179.998));
        assert_eq!(totals.tax_amount, dec!(323.9964));
        assert_eq!(totals.grand_total, dec!(1943.9784));
    }

    #[test]
    fn empty_cart_cannot_be_paid() {
        let mut cart = Cart::new();
        assert!(matches!(cart.reconcile_payment(dec!(100)), Err(CartError::EmptyCart)));
        assert!(matches!(cart.reconcile_payment(dec!(-1)), Err(CartError::EmptyCart)));
    }

    #[test]
    fn negative_tender_is_rejected() {
        let mut cart = cart_with(&[("P001", dec!(10), 1)]);
        assert!(matches!(
            cart.reconcile_payment(dec!(-0.01)),
            Err(CartError::InvalidAmount(_))
        ));
        assert_eq!(cart.state(), CartState::Populated);
    }

    #[test]
    fn shortfall_keeps_cart_populated() {
        let mut cart = cart_with(&[("P003", dec!(1000), 1)]);
        let totals = cart.totals();
        assert_eq!(totals.tax_amount, dec!(180));
        assert_eq!(totals.grand_total, dec!(1180));

        let outcome = cart.reconcile_payment(dec!(1000)).unwrap();
        assert_eq!(outcome, PaymentOutcome::Shortfall(dec!(180)));
        assert_eq!(cart.state(), CartState::Populated);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn exact_tender_leaves_no_change_residue() {
        let mut cart = cart_with(&[("P001", dec!(899.99), 2)]);
        cart.apply_discount(10).unwrap();
        let grand_total = cart.totals().grand_total;
        let outcome = cart.reconcile_payment(grand_total).unwrap();
        assert_eq!(outcome.change_due(), Some(Decimal::ZERO));
        assert_eq!(cart.state(), CartState::Settled);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn mutation_after_settling_reopens_bill() {
        let mut cart = cart_with(&[("P001", dec!(10), 1)]);
        cart.reconcile_payment(dec!(20)).unwrap();
        assert_eq!(cart.state(), CartState::Settled);
        cart.adjust_quantity("P001", 1).unwrap();
        assert_eq!(cart.state(), CartState::Populated);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut cart = cart_with(&[("P001", dec!(10), 2)]);
        cart.apply_discount(20).unwrap();
        cart.clear();
        let once = (cart.items().to_vec(), cart.discount_percentage(), cart.state());
        cart.clear();
        assert_eq!(
            (cart.items().to_vec(), cart.discount_percentage(), cart.state()),
            once
        );
        assert_eq!(cart.state(), CartState::Empty);
        assert_eq!(cart.totals(), CartTotals::default());
    }
}
