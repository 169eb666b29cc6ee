use cashdesk_core::utils::money::{MoneyError, parse_money};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum OperatorCommandError {
    #[error("Unknown command: {0} (type `help` for the list)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error(transparent)]
    Amount(#[from] MoneyError),
}

/// One line typed at the till.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorCommand {
    Scan(String),
    Quantity { product_id: String, delta: i64 },
    Remove(String),
    Discount(i64),
    Method(String),
    Tender(Decimal),
    Pay(Decimal),
    Clear,
    Totals,
    Find(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
scan <code>            add one unit of a product
qty <id> <+n|-n>       change a line's quantity (never below 1)
remove <id>            drop a line
discount <percent>     set the bill discount (0-100)
method <cash|card|upi> choose the payment method
tender <amount>        show change or shortfall without closing the bill
pay <amount>           take payment, print the receipt and start a new bill
clear                  empty the bill
totals                 show the current bill
find <term>            search the catalog
quit                   close the terminal";

fn parse_int(value: &str) -> Result<i64, OperatorCommandError> {
    let value = value.trim_end_matches('%');
    value
        .strip_prefix('+')
        .unwrap_or(value)
        .parse::<i64>()
        .map_err(|_| OperatorCommandError::InvalidNumber(value.to_string()))
}

impl FromStr for OperatorCommand {
    type Err = OperatorCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let Some(keyword) = parts.next() else {
            return Err(OperatorCommandError::Usage("type `help` for the list of commands"));
        };
        let args: Vec<&str> = parts.collect();

        match (keyword.to_lowercase().as_str(), args.as_slice()) {
            ("scan" | "add", [code]) => Ok(OperatorCommand::Scan(code.to_string())),
            ("scan" | "add", _) => Err(OperatorCommandError::Usage("scan <code>")),
            ("qty", [product_id, delta]) => Ok(OperatorCommand::Quantity {
                product_id: product_id.to_string(),
                delta: parse_int(delta)?,
            }),
            ("qty", _) => Err(OperatorCommandError::Usage("qty <id> <+n|-n>")),
            ("remove" | "rm", [product_id]) => Ok(OperatorCommand::Remove(product_id.to_string())),
            ("remove" | "rm", _) => Err(OperatorCommandError::Usage("remove <id>")),
            ("discount", [percent]) => Ok(OperatorCommand::Discount(parse_int(percent)?)),
            ("discount", []) => Ok(OperatorCommand::Discount(0)),
            ("discount", _) => Err(OperatorCommandError::Usage("discount <percent>")),
            ("method", [method]) => Ok(OperatorCommand::Method(method.to_string())),
            ("method", _) => Err(OperatorCommandError::Usage("method <cash|card|upi>")),
            ("tender", [amount]) => Ok(OperatorCommand::Tender(parse_money(amount)?)),
            ("tender", _) => Err(OperatorCommandError::Usage("tender <amount>")),
            ("pay", [amount]) => Ok(OperatorCommand::Pay(parse_money(amount)?)),
            ("pay", _) => Err(OperatorCommandError::Usage("pay <amount>")),
            ("clear", []) => Ok(OperatorCommand::Clear),
            ("totals" | "bill", []) => Ok(OperatorCommand::Totals),
            ("find", terms) => Ok(OperatorCommand::Find(terms.join(" "))),
            ("help" | "?", _) => Ok(OperatorCommand::Help),
            ("quit" | "exit", []) => Ok(OperatorCommand::Quit),
            (other, _) => Err(OperatorCommandError::Unknown(other.to_string())),
        }
    }
}
