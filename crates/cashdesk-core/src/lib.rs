use rust_decimal::Decimal;

pub mod cart;
pub mod catalog;
pub mod models;
pub mod render;
pub mod session;
pub mod utils;

/// Goods and services tax charged on the bill subtotal (18%).
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

pub use cart::{Cart, CartError, CartState, PaymentOutcome};
pub use catalog::{CatalogError, CatalogLookup, InMemoryCatalog};
pub use models::{
    line_item::LineItem,
    product::{Product, StockStatus},
    receipt::{Receipt, ReceiptLine},
    totals::CartTotals,
};
pub use render::{CartSnapshot, Notice, NoticeLevel, RecordingSink, RenderSink, TracingSink};
pub use session::{BillingSession, CheckoutOutcome, SessionError, SessionSettings};
pub use utils::payment::{PaymentMethod, PaymentMethodError};
