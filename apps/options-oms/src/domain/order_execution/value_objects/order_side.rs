//! Leg side (open/close, buy/sell).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a single option leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Open a long position.
    BuyToOpen,
    /// Open a short position.
    SellToOpen,
    /// Close a short position.
    BuyToClose,
    /// Close a long position.
    SellToClose,
}

impl OrderSide {
    /// Returns true for buy sides.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        matches!(self, Self::BuyToOpen | Self::BuyToClose)
    }

    /// Returns true if the leg opens a position.
    #[must_use]
    pub const fn is_opening(&self) -> bool {
        matches!(self, Self::BuyToOpen | Self::SellToOpen)
    }

    /// Side that unwinds this one.
    #[must_use]
    pub const fn closing(&self) -> Self {
        match self {
            Self::BuyToOpen | Self::BuyToClose => Self::SellToClose,
            Self::SellToOpen | Self::SellToClose => Self::BuyToClose,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuyToOpen => write!(f, "BUY_TO_OPEN"),
            Self::SellToOpen => write!(f, "SELL_TO_OPEN"),
            Self::BuyToClose => write!(f, "BUY_TO_CLOSE"),
            Self::SellToClose => write!(f, "SELL_TO_CLOSE"),
        }
    }
}
