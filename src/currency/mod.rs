//! Currency codes, the exchange-rate table, and amount formatting.
//!
//! Every rate expresses how many units of a currency one unit of the base
//! currency (EUR) buys. Conversions always pass through the base currency.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::TrackerError;
use crate::ledger::TransactionKind;

/// Reference currency every rate is expressed against.
pub const BASE_CURRENCY: Currency = Currency::Eur;

const STANDARD_INR_RATE: f64 = 90.5;
const CURRENCY_COUNT: usize = 2;

static STANDARD_RATES: RateTable = RateTable {
    rates: [1.0, STANDARD_INR_RATE],
};

/// Supported currencies. Codes outside this set are rejected when parsed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Currency {
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "INR")]
    Inr,
}

impl Currency {
    pub const ALL: [Currency; CURRENCY_COUNT] = [Currency::Eur, Currency::Inr];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Inr => "INR",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Inr => "₹",
        }
    }

    /// Parses an ISO code. Matching is case-sensitive.
    pub fn parse(code: &str) -> Result<Self, TrackerError> {
        match code {
            "EUR" => Ok(Currency::Eur),
            "INR" => Ok(Currency::Inr),
            other => Err(TrackerError::InvalidCurrency(other.to_string())),
        }
    }

    fn index(self) -> usize {
        match self {
            Currency::Eur => 0,
            Currency::Inr => 1,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        BASE_CURRENCY
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::parse(s)
    }
}

/// Validated exchange-rate table holding one positive rate per currency.
///
/// Construction checks every currency has a finite rate above zero and that the
/// base currency is pinned at `1.0`, so lookups afterwards cannot fail.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: [f64; CURRENCY_COUNT],
}

impl RateTable {
    /// The built-in table: 1 EUR = 90.5 INR.
    pub fn standard() -> &'static RateTable {
        &STANDARD_RATES
    }

    pub fn new<I>(entries: I) -> Result<Self, TrackerError>
    where
        I: IntoIterator<Item = (Currency, f64)>,
    {
        let mut rates: [Option<f64>; CURRENCY_COUNT] = [None; CURRENCY_COUNT];
        for (currency, rate) in entries {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(TrackerError::InvalidRate {
                    currency: currency.code().to_string(),
                    rate,
                });
            }
            rates[currency.index()] = Some(rate);
        }

        let mut validated = [0.0; CURRENCY_COUNT];
        for currency in Currency::ALL {
            let rate = rates[currency.index()].ok_or_else(|| {
                TrackerError::InvalidCurrency(format!("no rate configured for {}", currency))
            })?;
            validated[currency.index()] = rate;
        }

        let base = validated[BASE_CURRENCY.index()];
        if (base - 1.0).abs() > f64::EPSILON {
            return Err(TrackerError::InvalidRate {
                currency: BASE_CURRENCY.code().to_string(),
                rate: base,
            });
        }
        Ok(Self { rates: validated })
    }

    /// Builds a table from raw `(code, rate)` pairs, rejecting unknown codes.
    pub fn from_codes<'a, I>(entries: I) -> Result<Self, TrackerError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let parsed = entries
            .into_iter()
            .map(|(code, rate)| Currency::parse(code).map(|currency| (currency, rate)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates[currency.index()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        Currency::ALL
            .into_iter()
            .map(move |currency| (currency, self.rate(currency)))
    }

    /// Converts `amount` from one currency into another through the base currency.
    ///
    /// Same-currency conversions return the amount untouched.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        let in_base = amount / self.rate(from);
        in_base * self.rate(to)
    }

    pub fn quote(&self, amount: f64, from: Currency, to: Currency) -> Conversion {
        Conversion {
            amount,
            from,
            to,
            converted: self.convert(amount, from, to),
            unit_rate: self.convert(1.0, from, to),
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Converts with the built-in rate table.
pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
    RateTable::standard().convert(amount, from, to)
}

/// A priced conversion, as shown by the converter panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
    pub converted: f64,
    pub unit_rate: f64,
}

impl Conversion {
    /// Same input amount, opposite direction.
    pub fn swapped(&self, rates: &RateTable) -> Self {
        rates.quote(self.amount, self.to, self.from)
    }

    pub fn disclosure(&self) -> String {
        format!(
            "1 {} = {}",
            self.from.code(),
            format_currency_value(self.unit_rate, self.to)
        )
    }
}

/// Renders `|amount|` with two decimals, thousands grouping, and the currency symbol.
///
/// The sign is never encoded; see [`format_signed`].
pub fn format_currency_value(amount: f64, currency: Currency) -> String {
    format!("{}{}", currency.symbol(), format_number(amount.abs(), 2))
}

/// Prefixes `+` for income and `-` for expense in front of the formatted amount.
pub fn format_signed(kind: TransactionKind, amount: f64, currency: Currency) -> String {
    let sign = match kind {
        TransactionKind::Income => '+',
        TransactionKind::Expense => '-',
    };
    format!("{}{}", sign, format_currency_value(amount, currency))
}

fn format_number(value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, round_half_up(value, precision));
    match body.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", group_digits(int_part, ','), frac_part),
        None => group_digits(&body, ','),
    }
}

/// Rounds to `precision` decimals, ties away from zero (`0.125` -> `0.13`).
pub(crate) fn round_half_up(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
