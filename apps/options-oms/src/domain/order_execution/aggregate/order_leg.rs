//! Order leg for multi-leg orders.

use rust_decimal::Decimal;

use crate::domain::contract::OptionContract;
use crate::domain::order_execution::errors::OrderError;
use crate::domain::order_execution::value_objects::{OrderSide, OrderType};

/// Instrument traded by a single leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegInstrument {
    /// Plain equity leg.
    Stock {
        /// Ticker symbol.
        symbol: String,
    },
    /// Listed option leg.
    Option(OptionContract),
}

impl LegInstrument {
    /// Canonical symbol for the instrument.
    #[must_use]
    pub fn symbol(&self) -> String {
        match self {
            Self::Stock { symbol } => symbol.clone(),
            Self::Option(contract) => contract.symbol(),
        }
    }

    /// Get the option contract, if this is an option leg.
    #[must_use]
    pub const fn contract(&self) -> Option<&OptionContract> {
        match self {
            Self::Stock { .. } => None,
            Self::Option(contract) => Some(contract),
        }
    }
}

/// One leg of a multi-leg order.
///
/// `quantity` is the leg ratio per unit of the parent order, so a vertical
/// spread carries `1` on both legs and the order quantity scales them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLeg {
    instrument: LegInstrument,
    symbol: String,
    side: OrderSide,
    quantity: u32,
    order_type: OrderType,
    limit_price: Option<Decimal>,
}

impl OrderLeg {
    /// Create a new leg.
    ///
    /// # Errors
    ///
    /// Returns error if quantity is zero, a stock symbol is blank, or a limit
    /// price is given that is not positive.
    pub fn new(
        instrument: LegInstrument,
        side: OrderSide,
        quantity: u32,
        order_type: OrderType,
        limit_price: Option<Decimal>,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::invalid(
                "leg.quantity",
                "Leg quantity must be positive",
            ));
        }
        if let Some(price) = limit_price
            && price <= Decimal::ZERO
        {
            return Err(OrderError::invalid(
                "leg.limit_price",
                format!("Limit price must be positive, got {price}"),
            ));
        }

        let symbol = instrument.symbol();
        if symbol.trim().is_empty() {
            return Err(OrderError::invalid("leg.symbol", "Symbol cannot be empty"));
        }

        Ok(Self {
            instrument,
            symbol,
            side,
            quantity,
            order_type,
            limit_price,
        })
    }

    /// Create an option leg priced at the order level.
    ///
    /// # Errors
    ///
    /// See [`OrderLeg::new`].
    pub fn option(
        contract: OptionContract,
        side: OrderSide,
        quantity: u32,
    ) -> Result<Self, OrderError> {
        Self::new(
            LegInstrument::Option(contract),
            side,
            quantity,
            OrderType::Limit,
            None,
        )
    }

    /// Get the instrument.
    #[must_use]
    pub const fn instrument(&self) -> &LegInstrument {
        &self.instrument
    }

    /// Get the option contract, if any.
    #[must_use]
    pub const fn contract(&self) -> Option<&OptionContract> {
        self.instrument.contract()
    }

    /// Get the symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Get the leg ratio.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Get the leg order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Get the leg limit price.
    #[must_use]
    pub const fn limit_price(&self) -> Option<Decimal> {
        self.limit_price
    }
}
