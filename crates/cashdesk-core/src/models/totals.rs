use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use super::line_item::LineItem;
use crate::{TAX_RATE, utils::money::round_money};

#[typeshare]
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
}

impl CartTotals {
    /// Scans every line. Tax and discount are both taken on the subtotal, so
    /// the discount does not reduce the tax base.
    pub fn compute(items: &[LineItem], discount_percentage: u8) -> Self {
        let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
        let tax_amount = subtotal * TAX_RATE;
        let discount_amount =
            subtotal * Decimal::from(discount_percentage) / Decimal::ONE_HUNDRED;
        let grand_total = subtotal + tax_amount - discount_amount;

        Self {
            subtotal,
            tax_amount,
            discount_amount,
            grand_total,
        }
    }

    /// Copy rounded to 2 decimal places for display.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_money(self.subtotal),
            tax_amount: round_money(self.tax_amount),
            discount_amount: round_money(self.discount_amount),
            grand_total: round_money(self.grand_total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::Product;
    use rust_decimal_macros::dec;

    fn line(id: &str, price: Decimal, quantity: u32) -> LineItem {
        let mut item = LineItem::from_product(&Product::new(id, id, "", price, 50));
        item.quantity = quantity;
        item
    }

    #[test]
    fn empty_bill_is_all_zero() {
        assert_eq!(CartTotals::compute(&[], 25), CartTotals::default());
    }

    #[test]
    fn discount_does_not_reduce_tax_base() {
        let totals = CartTotals::compute(&[line("P003", dec!(1000), 1)], 50);
        assert_eq!(totals.tax_amount, dec!(180));
        assert_eq!(totals.discount_amount, dec!(500));
        assert_eq!(totals.grand_total, dec!(680));
    }

    #[test]
    fn rounding_only_applies_to_the_copy() {
        let totals = CartTotals::compute(&[line("P001", dec!(899.99), 2)], 10);
        let rounded = totals.rounded();
        assert_eq!(totals.grand_total, dec!(1943.9784));
        assert_eq!(rounded.grand_total, dec!(1943.98));
        assert_eq!(rounded.discount_amount, dec!(180.00));
    }
}
