use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    cart::{Cart, CartState},
    models::{line_item::LineItem, totals::CartTotals},
};

/// Owned copy of the bill handed to the presentation layer.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
    pub discount_percentage: u8,
    pub state: CartState,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            totals: cart.totals(),
            discount_percentage: cart.discount_percentage(),
            state: cart.state(),
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Receives the bill after every change, plus short operator notices.
pub trait RenderSink {
    fn render(&mut self, snapshot: &CartSnapshot);

    fn notify(&mut self, notice: &Notice);
}

#[derive(Debug, Default)]
pub struct TracingSink;

impl RenderSink for TracingSink {
    fn render(&mut self, snapshot: &CartSnapshot) {
        debug!(
            "Bill has {} lines, grand total {}",
            snapshot.items.len(),
            snapshot.totals.grand_total
        );
    }

    fn notify(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => info!("{}", notice.message),
            NoticeLevel::Warning => warn!("{}", notice.message),
            NoticeLevel::Error => error!("{}", notice.message),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub snapshots: Vec<CartSnapshot>,
    pub notices: Vec<Notice>,
}

impl RecordingSink {
    pub fn last_snapshot(&self) -> Option<&CartSnapshot> {
        self.snapshots.last()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl RenderSink for RecordingSink {
    fn render(&mut self, snapshot: &CartSnapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
