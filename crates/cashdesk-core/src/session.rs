use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cart::{Cart, CartError, PaymentOutcome},
    catalog::CatalogLookup,
    models::{
        line_item::LineItem,
        receipt::{Receipt, ReceiptLine},
        totals::CartTotals,
    },
    render::{CartSnapshot, Notice, NoticeLevel, RenderSink},
    utils::{
        money::round_money,
        payment::{PaymentMethod, PaymentMethodError},
    },
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    PaymentMethod(#[from] PaymentMethodError),
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub invoice_prefix: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            invoice_prefix: "INV".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Settled(Receipt),
    Shortfall(Decimal),
}

/// One cashier terminal: a single cart plus the collaborators it talks to.
pub struct BillingSession<C, S> {
    catalog: C,
    sink: S,
    settings: SessionSettings,
    cart: Cart,
    payment_method: PaymentMethod,
    next_invoice: u32,
}

impl<C: CatalogLookup, S: RenderSink> BillingSession<C, S> {
    pub fn new(catalog: C, sink: S, settings: SessionSettings) -> Self {
        Self {
            catalog,
            sink,
            settings,
            cart: Cart::new(),
            payment_method: PaymentMethod::default(),
            next_invoice: 1,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(&self.cart)
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    pub fn scan(&mut self, code: &str) -> Result<LineItem, SessionError> {
        let lookup = self.catalog.lookup(code);
        let item = match self.cart.add_item(lookup) {
            Ok(item) => item.clone(),
            Err(e) => return Err(self.rejected(e)),
        };
        self.render();
        self.notify(NoticeLevel::Success, "Product added");
        Ok(item)
    }

    pub fn adjust(&mut self, product_id: &str, delta: i64) -> Result<LineItem, SessionError> {
        let item = match self.cart.adjust_quantity(product_id, delta) {
            Ok(item) => item.clone(),
            Err(e) => return Err(self.rejected(e)),
        };
        self.render();
        self.notify(
            NoticeLevel::Info,
            format!("Quantity updated: {} x{}", item.name, item.quantity),
        );
        Ok(item)
    }

    pub fn remove(&mut self, product_id: &str) -> Result<LineItem, SessionError> {
        let removed = match self.cart.remove_item(product_id) {
            Ok(removed) => removed,
            Err(e) => return Err(self.rejected(e)),
        };
        self.render();
        self.notify(NoticeLevel::Info, format!("Removed {}", removed.name));
        Ok(removed)
    }

    pub fn discount(&mut self, percentage: i64) -> Result<CartTotals, SessionError> {
        if let Err(e) = self.cart.apply_discount(percentage) {
            return Err(self.rejected(e));
        }
        self.render();
        self.notify(NoticeLevel::Info, format!("Discount of {percentage}% applied"));
        Ok(self.cart.totals())
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.render();
        self.notify(NoticeLevel::Info, "Bill cleared");
    }

    pub fn select_payment_method(&mut self, method: &str) -> Result<PaymentMethod, SessionError> {
        let method = match method.parse::<PaymentMethod>() {
            Ok(method) => method,
            Err(e) => {
                self.notify(NoticeLevel::Error, e.to_string());
                return Err(e.into());
            }
        };
        self.payment_method = method;
        info!("Payment method set to {method}");
        Ok(method)
    }

    /// Works out change or shortfall for a tender without closing the bill.
    pub fn quote(&mut self, tendered: Decimal) -> Result<PaymentOutcome, SessionError> {
        let outcome = match self.cart.reconcile_payment(tendered) {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.rejected(e)),
        };
        match outcome {
            PaymentOutcome::ChangeDue(change) => self.notify(
                NoticeLevel::Info,
                format!("Change: {}", round_money(change)),
            ),
            PaymentOutcome::Shortfall(short) => self.notify(
                NoticeLevel::Warning,
                format!("Amount received is short by {}", round_money(short)),
            ),
        }
        Ok(outcome)
    }

    /// Takes payment. A sufficient tender issues a receipt and clears the
    /// bill; a short one leaves everything in place.
    pub fn checkout(&mut self, tendered: Decimal) -> Result<CheckoutOutcome, SessionError> {
        let outcome = match self.cart.reconcile_payment(tendered) {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.rejected(e)),
        };

        let change_due = match outcome {
            PaymentOutcome::ChangeDue(change) => change,
            PaymentOutcome::Shortfall(short) => {
                self.notify(
                    NoticeLevel::Warning,
                    format!("Amount received is short by {}", round_money(short)),
                );
                return Ok(CheckoutOutcome::Shortfall(short));
            }
        };

        let receipt = self.issue_receipt(tendered, change_due);
        info!(
            "Issued {} for {} via {}",
            receipt.invoice_number, receipt.totals.grand_total, receipt.payment_method
        );
        self.notify(NoticeLevel::Success, "Payment successful");
        self.clear();
        Ok(CheckoutOutcome::Settled(receipt))
    }

    fn issue_receipt(&mut self, tendered: Decimal, change_due: Decimal) -> Receipt {
        let invoice_number = format!("{}-{:04}", self.settings.invoice_prefix, self.next_invoice);
        self.next_invoice = self.next_invoice.saturating_add(1);

        Receipt {
            id: Uuid::new_v4(),
            invoice_number,
            payment_method: self.payment_method,
            lines: self.cart.items().iter().map(ReceiptLine::from).collect(),
            discount_percentage: self.cart.discount_percentage(),
            totals: self.cart.totals(),
            tendered,
            change_due,
        }
    }

    fn rejected(&mut self, err: CartError) -> SessionError {
        warn!("Rejected: {err}");
        self.notify(NoticeLevel::Error, err.to_string());
        err.into()
    }

    fn render(&mut self) {
        let snapshot = CartSnapshot::from(&self.cart);
        self.sink.render(&snapshot);
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.sink.notify(&Notice::new(level, message));
    }
}
