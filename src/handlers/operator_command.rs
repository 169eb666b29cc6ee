use cashdesk_core::{
    BillingSession, CheckoutOutcome, InMemoryCatalog, PaymentOutcome, SessionError,
    utils::money::format_money,
};
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    events::operator_command::{HELP, OperatorCommand},
    utils::terminal_sink::TerminalSink,
};

pub type Terminal<W> = BillingSession<InMemoryCatalog, TerminalSink<W>>;

#[derive(Debug, Error)]
pub enum OperatorCommandHandleError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to write to terminal: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to encode receipt: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn handle_operator_command<W: Write>(
    terminal: &mut Terminal<W>,
    command: OperatorCommand,
    currency_symbol: &str,
) -> Result<Flow, OperatorCommandHandleError> {
    debug!("Handling {command:?}");

    match command {
        OperatorCommand::Scan(code) => {
            terminal.scan(&code)?;
        }
        OperatorCommand::Quantity { product_id, delta } => {
            terminal.adjust(&product_id, delta)?;
        }
        OperatorCommand::Remove(product_id) => {
            terminal.remove(&product_id)?;
        }
        OperatorCommand::Discount(percentage) => {
            terminal.discount(percentage)?;
        }
        OperatorCommand::Method(method) => {
            let method = terminal.select_payment_method(&method)?;
            terminal
                .sink_mut()
                .print_line(&format!("Payment method: {method}"))?;
        }
        OperatorCommand::Tender(amount) => {
            let line = match terminal.quote(amount)? {
                PaymentOutcome::ChangeDue(change) => {
                    format!("Change: {}", format_money(currency_symbol, change))
                }
                PaymentOutcome::Shortfall(short) => {
                    format!("Short by: {}", format_money(currency_symbol, short))
                }
            };
            terminal.sink_mut().print_line(&line)?;
        }
        OperatorCommand::Pay(amount) => match terminal.checkout(amount)? {
            CheckoutOutcome::Settled(receipt) => {
                debug!("Receipt payload: {}", serde_json::to_string(&receipt)?);
                info!("Sale {} recorded", receipt.invoice_number);
                terminal.sink_mut().print_receipt(&receipt)?;
            }
            CheckoutOutcome::Shortfall(short) => {
                let line = format!("Short by: {}", format_money(currency_symbol, short));
                terminal.sink_mut().print_line(&line)?;
            }
        },
        OperatorCommand::Clear => terminal.clear(),
        OperatorCommand::Totals => {
            let snapshot = terminal.snapshot();
            terminal.sink_mut().print_snapshot(&snapshot)?;
        }
        OperatorCommand::Find(term) => {
            let products: Vec<_> = terminal.catalog().search(&term).into_iter().cloned().collect();
            let refs: Vec<_> = products.iter().collect();
            terminal.sink_mut().print_products(&refs)?;
        }
        OperatorCommand::Help => terminal.sink_mut().print_line(HELP)?,
        OperatorCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}
