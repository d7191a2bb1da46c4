use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported display currencies. Amounts are always stored internally in
/// whole Indian rupees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    Inr,
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Inr => write!(f, "INR"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

/// Placeholder rate: 1 INR ≈ 0.012 USD.
const INR_TO_USD: f64 = 0.012;

/// Format an amount (stored in INR) for display in the given currency.
pub fn format_amount(amount_inr: u64, currency: Currency) -> String {
    match currency {
        Currency::Inr => format!("₹{amount_inr}"),
        Currency::Usd => {
            let usd = amount_inr as f64 * INR_TO_USD;
            format!("${usd:.2}*")
        }
    }
}

impl Currency {
    pub fn all() -> &'static [Currency] {
        &[Currency::Inr, Currency::Usd]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Currency::Inr => "Rupees",
            Currency::Usd => "US Dollars",
        }
    }
}
