//! Renders parts of a summary as bounded, human-readable text blocks.
//!
//! Every report is built as an ordered list of lines and then cut down with
//! the same top-N rule in [format_lines].

use std::collections::HashMap;

use numfmt::{Formatter, Precision};

use crate::Error;

/// Text used in place of a report that has nothing to show.
pub const NOT_AVAILABLE: &str = "Not Available";

/// Maximum lines in the income-by-category report.
pub const INCOME_LINE_LIMIT: usize = 5;
/// Maximum lines in the expense-by-category report.
pub const EXPENSE_LINE_LIMIT: usize = 8;
/// Maximum lines in the budget report.
pub const BUDGET_LINE_LIMIT: usize = 8;
/// Maximum lines in the budget-vs-actual report.
pub const BUDGET_VS_ACTUAL_LINE_LIMIT: usize = 8;
/// Maximum lines in the overspend report.
pub const OVERSPEND_LINE_LIMIT: usize = 5;
/// Maximum lines in the trend report.
pub const TREND_LINE_LIMIT: usize = 6;

/// Formats amounts as currency with thousands separators and two decimal places.
pub struct CurrencyFormat {
    symbol: String,
    positive: Formatter,
    negative: Formatter,
}

impl CurrencyFormat {
    /// Create a currency format that prefixes amounts with `symbol`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCurrencySymbol] if `symbol` cannot be used as a
    /// number prefix, e.g. because it is too long.
    pub fn new(symbol: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidCurrencySymbol(symbol.to_owned());

        let positive = Formatter::currency(symbol)
            .map_err(|_| invalid())?
            .precision(Precision::Decimals(2));
        let negative = Formatter::currency(&format!("-{symbol}"))
            .map_err(|_| invalid())?
            .precision(Precision::Decimals(2));

        Ok(Self {
            symbol: symbol.to_owned(),
            positive,
            negative,
        })
    }

    /// The currency symbol placed before each amount.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Format `amount` rounded to the nearest cent, e.g. `1234.5` as "₹1,234.50".
    pub fn format(&self, amount: f64) -> String {
        let amount = round_to_cents(amount);

        if amount.is_finite() && amount.abs() >= SCIENTIFIC_NOTATION_CUTOFF {
            return self.format_large(amount);
        }

        let (prefix, formatted) = if amount < 0.0 {
            (
                format!("-{}", self.symbol),
                self.negative.fmt_string(amount.abs()),
            )
        } else if amount > 0.0 {
            (self.symbol.clone(), self.positive.fmt_string(amount))
        } else {
            // Zero is hardcoded as "0", so we must specify the formatted string for zero
            return format!("{}0.00", self.symbol);
        };

        match formatted.strip_prefix(prefix.as_str()) {
            Some(number) => format!("{prefix}{}", pad_decimals(number)),
            None => pad_decimals(&formatted),
        }
    }

    fn format_large(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let digits = format!("{:.2}", amount.abs());
        let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        format!("{sign}{}{}.{cents}", self.symbol, group_thousands(whole))
    }
}

/// numfmt writes amounts of this size or larger in scientific notation.
const SCIENTIFIC_NOTATION_CUTOFF: f64 = 1_000_000_000_000.0;

/// Rounds half away from zero. Anything that rounds to less than a cent
/// becomes zero, which keeps numfmt out of scientific notation for tiny amounts.
fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3" and
/// "100.00" as "100", so we add them back.
fn pad_decimals(number: &str) -> String {
    match number.rfind('.') {
        None => format!("{number}.00"),
        Some(point) => {
            let decimals = number.len() - point - 1;
            format!("{number}{}", "0".repeat(2usize.saturating_sub(decimals)))
        }
    }
}

/// Renders `amounts` as one "<category>: <amount>" line per entry, largest first.
///
/// Ties are broken by category name so the output is deterministic. At most
/// `top_n` lines are kept. An empty mapping gives an empty string.
pub fn format_ranked(
    amounts: &HashMap<String, f64>,
    top_n: usize,
    currency: &CurrencyFormat,
) -> String {
    let mut entries: Vec<(&String, &f64)> = amounts.iter().collect();
    entries.sort_by(|(a_name, a_amount), (b_name, b_amount)| {
        b_amount.total_cmp(a_amount).then_with(|| a_name.cmp(b_name))
    });

    let lines: Vec<String> = entries
        .into_iter()
        .map(|(name, amount)| format!("{name}: {}", currency.format(*amount)))
        .collect();

    format_lines(&lines, top_n)
}

/// Keeps the first `top_n` non-blank lines, trimmed, joined with newlines.
///
/// Lines beyond `top_n` are dropped without any marker.
pub fn format_lines<S: AsRef<str>>(lines: &[S], top_n: usize) -> String {
    lines
        .iter()
        .map(|line| line.as_ref().trim())
        .filter(|line| !line.is_empty())
        .take(top_n)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutes [NOT_AVAILABLE] for an empty report.
pub fn or_not_available(text: String) -> String {
    if text.is_empty() {
        NOT_AVAILABLE.to_owned()
    } else {
        text
    }
}
