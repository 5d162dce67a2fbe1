//! Option Contract Value Object

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::ContractError;

/// Standard equity option multiplier.
pub const DEFAULT_MULTIPLIER: u32 = 100;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionRight {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionRight {
    /// Single-letter code used in the canonical symbol.
    #[must_use]
    pub const fn code(&self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Parse an expiration date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns [`ContractError::InvalidExpiration`] for anything else.
pub fn parse_expiration(value: &str) -> Result<NaiveDate, ContractError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ContractError::InvalidExpiration {
            value: value.to_string(),
        }
    })
}

/// Option contract specification.
///
/// Pure value type: there are no mutators, and the canonical symbol is
/// derived from the fields on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionContract {
    underlying: String,
    strike: Decimal,
    expiration: NaiveDate,
    right: OptionRight,
    multiplier: u32,
}

impl OptionContract {
    /// Create a new option contract.
    ///
    /// # Errors
    ///
    /// Fails if the underlying is empty, the strike is not positive or the
    /// multiplier is zero.
    pub fn new(
        underlying: impl Into<String>,
        strike: Decimal,
        expiration: NaiveDate,
        right: OptionRight,
        multiplier: u32,
    ) -> Result<Self, ContractError> {
        let underlying = underlying.into().trim().to_uppercase();
        if underlying.is_empty() {
            return Err(ContractError::EmptyUnderlying);
        }
        if strike <= Decimal::ZERO {
            return Err(ContractError::NonPositiveStrike { strike });
        }
        if multiplier == 0 {
            return Err(ContractError::ZeroMultiplier);
        }

        Ok(Self {
            underlying,
            strike,
            expiration,
            right,
            multiplier,
        })
    }

    /// Create a call with the standard multiplier.
    ///
    /// # Errors
    ///
    /// See [`OptionContract::new`].
    pub fn call(
        underlying: impl Into<String>,
        strike: Decimal,
        expiration: NaiveDate,
    ) -> Result<Self, ContractError> {
        Self::new(
            underlying,
            strike,
            expiration,
            OptionRight::Call,
            DEFAULT_MULTIPLIER,
        )
    }

    /// Get the underlying symbol.
    #[must_use]
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Get the strike price.
    #[must_use]
    pub const fn strike(&self) -> Decimal {
        self.strike
    }

    /// Get the expiration date.
    #[must_use]
    pub const fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Get the option right.
    #[must_use]
    pub const fn right(&self) -> OptionRight {
        self.right
    }

    /// Get the contract multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Canonical instrument symbol: `UNDERLYING + YYMMDD + C|P + strike×1000`
    /// zero-padded to eight digits (e.g. `SPY240216C00400000`).
    #[must_use]
    pub fn symbol(&self) -> String {
        let strike_thousandths = (self.strike * Decimal::from(1000))
            .trunc()
            .to_u64()
            .unwrap_or_default();
        format!(
            "{}{}{}{:08}",
            self.underlying,
            self.expiration.format("%y%m%d"),
            self.right.code(),
            strike_thousandths
        )
    }

    /// Check if the option has expired as of the given date.
    #[must_use]
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.expiration < as_of
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn feb16() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()
    }

    #[test]
    fn option_right_display_and_code() {
        assert_eq!(OptionRight::Call.to_string(), "CALL");
        assert_eq!(OptionRight::Put.to_string(), "PUT");
        assert_eq!(OptionRight::Put.code(), 'P');
    }

    #[test]
    fn option_right_serde_by_name() {
        let json = serde_json::to_string(&OptionRight::Call).unwrap();
        assert_eq!(json, "\"CALL\"");
        let parsed: OptionRight = serde_json::from_str("\"PUT\"").unwrap();
        assert_eq!(parsed, OptionRight::Put);
    }

    #[test]
    fn canonical_symbol_for_call() {
        let contract = OptionContract::call("SPY", dec!(400), feb16()).unwrap();
        assert_eq!(contract.symbol(), "SPY240216C00400000");
    }

    #[test]
    fn canonical_symbol_keeps_fractional_strike() {
        let contract =
            OptionContract::new("aapl", dec!(182.5), feb16(), OptionRight::Put, 100).unwrap();
        assert_eq!(contract.underlying(), "AAPL");
        assert_eq!(contract.symbol(), "AAPL240216P00182500");
    }

    #[test]
    fn symbol_is_deterministic() {
        let a = OptionContract::call("SPY", dec!(420), feb16()).unwrap();
        let b = OptionContract::call("SPY", dec!(420), feb16()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.symbol(), b.symbol());
    }

    #[test]
    fn rejects_non_positive_strike() {
        let err = OptionContract::call("SPY", dec!(0), feb16()).unwrap_err();
        assert_eq!(err, ContractError::NonPositiveStrike { strike: dec!(0) });

        assert!(OptionContract::call("SPY", dec!(-5), feb16()).is_err());
    }

    #[test]
    fn rejects_empty_underlying() {
        let err = OptionContract::call("  ", dec!(400), feb16()).unwrap_err();
        assert_eq!(err, ContractError::EmptyUnderlying);
    }

    #[test]
    fn rejects_zero_multiplier() {
        let err =
            OptionContract::new("SPY", dec!(400), feb16(), OptionRight::Call, 0).unwrap_err();
        assert_eq!(err, ContractError::ZeroMultiplier);
    }

    #[test]
    fn parse_expiration_accepts_iso_dates() {
        assert_eq!(parse_expiration("2024-02-16").unwrap(), feb16());
        assert_eq!(parse_expiration(" 2024-02-16 ").unwrap(), feb16());
    }

    #[test]
    fn parse_expiration_rejects_garbage() {
        assert!(parse_expiration("16/02/2024").is_err());
        assert!(parse_expiration("2024-02-30").is_err());
        assert!(parse_expiration("").is_err());
    }

    #[test]
    fn is_expired() {
        let contract = OptionContract::call("SPY", dec!(400), feb16()).unwrap();
        assert!(!contract.is_expired(NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()));
        assert!(contract.is_expired(NaiveDate::from_ymd_opt(2024, 2, 17).unwrap()));
    }
}
