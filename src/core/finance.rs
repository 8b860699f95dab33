//! Project profitability calculation.
//!
//! Commission is charged by the payment platform on the combined deal and tip
//! amount; doer cost and manual deductions are then subtracted. The result is a
//! signed amount: a negative profit margin is a valid outcome, not an error.
//! Nothing in this module fails. Absent or malformed amounts count as zero, and
//! arithmetic saturates at the bounds of [`Decimal`] instead of overflowing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Payment channel a client pays through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentPlatform {
    /// 20% commission
    Fiverr,
    /// 10% commission
    Upwork,
    /// No commission
    PayPal,
    /// No commission
    Other,
}

impl PaymentPlatform {
    /// All platforms in display order.
    pub const ALL: [Self; 4] = [Self::Fiverr, Self::Upwork, Self::PayPal, Self::Other];

    /// Matches a stored platform label exactly, returning `None` for anything else.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }

    /// The label stored on project records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fiverr => "Fiverr",
            Self::Upwork => "Upwork",
            Self::PayPal => "PayPal",
            Self::Other => "Other",
        }
    }

    /// Fraction of gross revenue kept by the platform.
    #[must_use]
    pub fn commission_rate(self) -> Decimal {
        match self {
            Self::Fiverr => Decimal::new(20, 2),
            Self::Upwork => Decimal::new(10, 2),
            Self::PayPal | Self::Other => Decimal::ZERO,
        }
    }
}

impl fmt::Display for PaymentPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Commission rate for a stored platform label. Unrecognized labels pay no commission.
#[must_use]
pub fn commission_rate(platform: &str) -> Decimal {
    PaymentPlatform::from_label(platform).map_or(Decimal::ZERO, PaymentPlatform::commission_rate)
}

/// Monetary inputs of a project. Every amount is optional and counts as zero when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfitInput {
    /// Agreed price with the client
    pub client_deal_amount: Option<Decimal>,
    /// Voluntary extra payment from the client
    pub tip_amount: Option<Decimal>,
    /// Amount paid to the doer
    pub doer_cost_amount: Option<Decimal>,
    /// Manual adjustment such as a refund or chargeback
    pub deduction_amount: Option<Decimal>,
    /// Platform label, e.g. "Fiverr"
    pub payment_platform: String,
}

impl ProfitInput {
    /// Builds an input from raw form strings, coercing anything unparseable to zero.
    #[must_use]
    pub fn from_form(
        client_deal_amount: &str,
        tip_amount: &str,
        doer_cost_amount: &str,
        deduction_amount: &str,
        payment_platform: &str,
    ) -> Self {
        Self {
            client_deal_amount: Some(coerce_amount(client_deal_amount)),
            tip_amount: Some(coerce_amount(tip_amount)),
            doer_cost_amount: Some(coerce_amount(doer_cost_amount)),
            deduction_amount: Some(coerce_amount(deduction_amount)),
            payment_platform: payment_platform.to_string(),
        }
    }
}

/// Intermediate values of the profit calculation, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfitBreakdown {
    /// Deal plus tip
    pub gross: Decimal,
    /// Platform share of `gross`
    pub commission: Decimal,
    /// Amount paid to the doer
    pub doer_cost: Decimal,
    /// Manual deductions
    pub deduction: Decimal,
    /// What remains after commission, doer cost and deductions
    pub profit: Decimal,
}

/// Computes every step of the profit calculation.
#[must_use]
pub fn compute_breakdown(input: &ProfitInput) -> ProfitBreakdown {
    let gross = input
        .client_deal_amount
        .unwrap_or_default()
        .saturating_add(input.tip_amount.unwrap_or_default());
    // Tips are not commission-exempt.
    let commission = gross.saturating_mul(commission_rate(&input.payment_platform));
    let doer_cost = input.doer_cost_amount.unwrap_or_default();
    let deduction = input.deduction_amount.unwrap_or_default();

    ProfitBreakdown {
        gross,
        commission,
        doer_cost,
        deduction,
        profit: gross
            .saturating_sub(commission)
            .saturating_sub(doer_cost)
            .saturating_sub(deduction),
    }
}

/// Profit retained on a project after commission, doer cost and deductions.
#[must_use]
pub fn compute_profit_margin(input: &ProfitInput) -> Decimal {
    compute_breakdown(input).profit
}

/// Parses the longest numeric prefix of `raw` (after leading whitespace).
///
/// Accepts an optional sign, digits, an optional fractional part and an
/// optional exponent, so `"85.5 USD"` yields `85.5`, `"1e3"` yields `1000` and
/// `"abc"` yields `None`. Values outside the range of [`Decimal`] are `None`.
#[must_use]
pub fn parse_decimal_prefix(raw: &str) -> Option<Decimal> {
    let mut chars = raw.trim_start().chars().peekable();
    let mut number = String::new();

    match chars.peek() {
        Some('-') => {
            number.push('-');
            chars.next();
        }
        Some('+') => {
            chars.next();
        }
        _ => {}
    }

    let int_digits = take_digits(&mut chars);
    let frac_digits = if chars.next_if_eq(&'.').is_some() {
        take_digits(&mut chars)
    } else {
        String::new()
    };

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    if int_digits.is_empty() {
        number.push('0');
    } else {
        number.push_str(&int_digits);
    }
    if !frac_digits.is_empty() {
        number.push('.');
        number.push_str(&frac_digits);
    }

    let parsed = match take_exponent(chars) {
        Some(exponent) => Decimal::from_scientific(&format!("{number}e{exponent}")).ok(),
        None => number.parse().ok(),
    };
    if parsed.is_none() {
        warn!(value = raw, "Amount is outside the supported range");
    }
    parsed
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        digits.push(c);
    }
    digits
}

/// `e`/`E`, an optional sign and at least one digit; anything less is not an exponent.
fn take_exponent(mut chars: std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    chars.next_if(|c| matches!(c, 'e' | 'E'))?;
    let mut exponent = String::new();
    if chars.next_if(|c| matches!(c, '+' | '-')) == Some('-') {
        exponent.push('-');
    }
    let digits = take_digits(&mut chars);
    if digits.is_empty() {
        return None;
    }
    exponent.push_str(&digits);
    Some(exponent)
}

/// Lenient amount coercion: unparseable or empty input is zero.
#[must_use]
pub fn coerce_amount(raw: &str) -> Decimal {
    parse_decimal_prefix(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(deal: Decimal, tip: Decimal, cost: Decimal, platform: &str) -> ProfitInput {
        ProfitInput {
            client_deal_amount: Some(deal),
            tip_amount: Some(tip),
            doer_cost_amount: Some(cost),
            deduction_amount: Some(Decimal::ZERO),
            payment_platform: platform.to_string(),
        }
    }

    #[test]
    fn test_fiverr_commission_applies_to_deal_and_tip() {
        let result = compute_profit_margin(&input(dec!(100), dec!(50), dec!(20), "Fiverr"));
        assert_eq!(result, dec!(100));
    }

    #[test]
    fn test_upwork_commission() {
        let result = compute_profit_margin(&input(dec!(100), dec!(50), dec!(20), "Upwork"));
        assert_eq!(result, dec!(115));
    }

    #[test]
    fn test_zero_commission_platforms() {
        for platform in ["PayPal", "Other"] {
            let result = compute_profit_margin(&input(dec!(100), dec!(50), dec!(20), platform));
            assert_eq!(result, dec!(130), "platform {platform}");
        }
    }

    #[test]
    fn test_unknown_platform_fails_open() {
        let result = compute_profit_margin(&input(dec!(100), dec!(0), dec!(0), "Venmo"));
        assert_eq!(result, dec!(100));
        assert_eq!(commission_rate("fiverr"), Decimal::ZERO);
    }

    #[test]
    fn test_negative_profit_is_not_clamped() {
        let result = compute_profit_margin(&ProfitInput {
            client_deal_amount: Some(dec!(10)),
            doer_cost_amount: Some(dec!(50)),
            payment_platform: "Other".to_string(),
            ..Default::default()
        });
        assert_eq!(result, dec!(-40));
    }

    #[test]
    fn test_missing_amounts_default_to_zero() {
        let result = compute_profit_margin(&ProfitInput {
            payment_platform: "Fiverr".to_string(),
            ..Default::default()
        });
        assert_eq!(result, Decimal::ZERO);
    }

    #[test]
    fn test_deduction_is_subtracted() {
        let mut project = input(dec!(200), dec!(0), dec!(50), "Upwork");
        project.deduction_amount = Some(dec!(30));
        let breakdown = compute_breakdown(&project);
        assert_eq!(breakdown.gross, dec!(200));
        assert_eq!(breakdown.commission, dec!(20));
        assert_eq!(breakdown.profit, dec!(100));
    }

    #[test]
    fn test_decimal_amounts_do_not_drift() {
        let project = input(dec!(0.1), dec!(0.2), dec!(0), "PayPal");
        assert_eq!(compute_profit_margin(&project), dec!(0.3));
    }

    #[test]
    fn test_from_form_coerces_malformed_strings() {
        let project = ProfitInput::from_form("100", "abc", "", "5.5", "Upwork");
        assert_eq!(project.tip_amount, Some(Decimal::ZERO));
        assert_eq!(project.doer_cost_amount, Some(Decimal::ZERO));
        assert_eq!(compute_profit_margin(&project), dec!(84.5));
    }

    #[test]
    fn test_parse_decimal_prefix() {
        assert_eq!(parse_decimal_prefix("85.5"), Some(dec!(85.5)));
        assert_eq!(parse_decimal_prefix("  42 USD"), Some(dec!(42)));
        assert_eq!(parse_decimal_prefix("-3.25x"), Some(dec!(-3.25)));
        assert_eq!(parse_decimal_prefix(".5"), Some(dec!(0.5)));
        assert_eq!(parse_decimal_prefix("7."), Some(dec!(7)));
        assert_eq!(parse_decimal_prefix("+12"), Some(dec!(12)));
        assert_eq!(parse_decimal_prefix(""), None);
        assert_eq!(parse_decimal_prefix("-"), None);
        assert_eq!(parse_decimal_prefix("."), None);
        assert_eq!(parse_decimal_prefix("abc"), None);
    }

    #[test]
    fn test_parse_decimal_prefix_exponents() {
        assert_eq!(parse_decimal_prefix("1e5"), Some(dec!(100000)));
        assert_eq!(parse_decimal_prefix("2.5E-1"), Some(dec!(0.25)));
        assert_eq!(parse_decimal_prefix("1e+2 USD"), Some(dec!(100)));
        assert_eq!(parse_decimal_prefix("3e"), Some(dec!(3)));
        assert_eq!(parse_decimal_prefix("4e-x"), Some(dec!(4)));
        assert_eq!(parse_decimal_prefix("1e40"), None);
    }

    #[test]
    fn test_parse_decimal_prefix_out_of_range() {
        assert_eq!(parse_decimal_prefix("900000000000000000000000000000"), None);
        assert_eq!(coerce_amount("900000000000000000000000000000"), Decimal::ZERO);
        assert!(parse_decimal_prefix("70000000000000000000000000000").is_some());
    }

    #[test]
    fn test_huge_amounts_saturate_instead_of_overflowing() {
        let result = compute_breakdown(&ProfitInput {
            client_deal_amount: Some(Decimal::MAX),
            tip_amount: Some(Decimal::ONE),
            payment_platform: "PayPal".to_string(),
            ..Default::default()
        });
        assert_eq!(result.gross, Decimal::MAX);
        assert_eq!(result.profit, Decimal::MAX);

        let owed = compute_profit_margin(&ProfitInput {
            doer_cost_amount: Some(Decimal::MAX),
            deduction_amount: Some(Decimal::MAX),
            payment_platform: "Other".to_string(),
            ..Default::default()
        });
        assert_eq!(owed, Decimal::MIN);

        let big = "70000000000000000000000000000";
        let from_form = compute_breakdown(&ProfitInput::from_form(big, big, "0", "0", "Fiverr"));
        assert_eq!(from_form.gross, Decimal::MAX);
        assert!(from_form.profit > Decimal::ZERO);
    }

    #[test]
    fn test_platform_labels_round_trip() {
        for platform in PaymentPlatform::ALL {
            assert_eq!(PaymentPlatform::from_label(platform.label()), Some(platform));
        }
    }
}
