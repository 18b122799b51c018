//! Tick value objects: quotes and trades.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Symbol;

// =============================================================================
// Aggressor Side
// =============================================================================

/// Side of the aggressing order for a trade tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggressorSide {
    /// The buyer crossed the spread.
    #[serde(rename = "BUYER")]
    Buyer,
    /// The seller crossed the spread.
    #[serde(rename = "SELLER")]
    Seller,
    /// No aggressor reported by the venue.
    #[serde(rename = "NONE")]
    NoAggressor,
}

impl AggressorSide {
    /// Canonical text token, as used by the delimited text encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Seller => "SELLER",
            Self::NoAggressor => "NONE",
        }
    }

    /// Parse a canonical text token back into a side.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "BUYER" => Some(Self::Buyer),
            "SELLER" => Some(Self::Seller),
            "NONE" => Some(Self::NoAggressor),
            _ => None,
        }
    }
}

// =============================================================================
// Ticks
// =============================================================================

/// A top-of-book quote for a symbol at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTick {
    /// Instrument identifier.
    pub symbol: Symbol,
    /// Best bid price.
    pub bid: Decimal,
    /// Best ask price.
    pub ask: Decimal,
    /// Size available at the best bid.
    pub bid_size: Decimal,
    /// Size available at the best ask.
    pub ask_size: Decimal,
    /// Event time, Unix epoch nanoseconds.
    pub ts_event: i64,
}

/// A single trade print for a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeTick {
    /// Instrument identifier.
    pub symbol: Symbol,
    /// Traded price.
    pub price: Decimal,
    /// Traded size.
    pub size: Decimal,
    /// Aggressing side, if reported.
    pub aggressor: AggressorSide,
    /// Event time, Unix epoch nanoseconds.
    pub ts_event: i64,
}

/// A single market-data event: either a quote or a trade.
///
/// Ticks are immutable and already validated by upstream components;
/// the codec layer only transcribes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Top-of-book quote.
    Quote(QuoteTick),
    /// Trade print.
    Trade(TradeTick),
}

impl Tick {
    /// The symbol this tick belongs to.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        match self {
            Self::Quote(quote) => &quote.symbol,
            Self::Trade(trade) => &trade.symbol,
        }
    }

    /// Event time, Unix epoch nanoseconds.
    #[must_use]
    pub const fn ts_event(&self) -> i64 {
        match self {
            Self::Quote(quote) => quote.ts_event,
            Self::Trade(trade) => trade.ts_event,
        }
    }

    /// Event time as a UTC datetime (nanosecond precision).
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.ts_event())
    }
}
