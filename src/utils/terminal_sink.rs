use cashdesk_core::{
    CartSnapshot, Notice, NoticeLevel, Product, Receipt, RenderSink, utils::money::format_money,
};
use std::io::{self, Stdout, Write};
use tracing::error;

/// Prints the bill as a plain-text table. Amounts are rounded here and
/// nowhere else.
pub struct TerminalSink<W: Write = Stdout> {
    out: W,
    currency_symbol: String,
}

impl TerminalSink<Stdout> {
    pub fn stdout(currency_symbol: impl Into<String>) -> Self {
        Self::new(io::stdout(), currency_symbol)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, currency_symbol: impl Into<String>) -> Self {
        Self {
            out,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn out_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn money(&self, amount: rust_decimal::Decimal) -> String {
        format_money(&self.currency_symbol, amount)
    }

    pub fn print_snapshot(&mut self, snapshot: &CartSnapshot) -> io::Result<()> {
        if snapshot.items.is_empty() {
            writeln!(self.out, "  (bill is empty)")?;
        }
        for item in &snapshot.items {
            let price = self.money(item.unit_price);
            let total = self.money(item.line_total());
            writeln!(
                self.out,
                "  {:<8} {:<24} {:>12} x{:<4} {:>12}",
                item.product_id, item.name, price, item.quantity, total
            )?;
        }

        let totals = &snapshot.totals;
        let rows = [
            ("Subtotal".to_string(), totals.subtotal),
            ("GST (18%)".to_string(), totals.tax_amount),
            (
                format!("Discount ({}%)", snapshot.discount_percentage),
                totals.discount_amount,
            ),
            ("Total".to_string(), totals.grand_total),
        ];
        for (label, amount) in rows {
            let amount = self.money(amount);
            writeln!(self.out, "  {label:>50} {amount:>14}")?;
        }
        self.out.flush()
    }

    pub fn print_receipt(&mut self, receipt: &Receipt) -> io::Result<()> {
        writeln!(
            self.out,
            "Receipt {} ({}) paid by {}",
            receipt.invoice_number, receipt.id, receipt.payment_method
        )?;
        for line in &receipt.lines {
            let total = self.money(line.line_total);
            writeln!(
                self.out,
                "  {:<24} x{:<4} {:>12}",
                line.name, line.quantity, total
            )?;
        }
        let total = self.money(receipt.totals.grand_total);
        let tendered = self.money(receipt.tendered);
        let change = self.money(receipt.change_due);
        writeln!(self.out, "  Total {total}  Received {tendered}  Change {change}")?;
        self.out.flush()
    }

    pub fn print_products(&mut self, products: &[&Product]) -> io::Result<()> {
        if products.is_empty() {
            writeln!(self.out, "  no matching products")?;
        }
        for product in products {
            let price = self.money(product.unit_price);
            writeln!(
                self.out,
                "  {:<8} {:<24} {:<14} {:>12} {:>6} {}",
                product.id,
                product.name,
                product.category,
                price,
                product.stock_level,
                product.stock_status()
            )?;
        }
        self.out.flush()
    }

    pub fn print_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn render(&mut self, snapshot: &CartSnapshot) {
        if let Err(e) = self.print_snapshot(snapshot) {
            error!("Failed to print bill: {e}");
        }
    }

    fn notify(&mut self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        if let Err(e) = writeln!(self.out, "[{tag}] {}", notice.message) {
            error!("Failed to print notice: {e}");
        }
    }
}
