//! Market Data Value Objects
//!
//! Canonical internal representation of market data: identifiers,
//! quote/trade ticks, OHLCV bars and their type descriptors, and
//! instrument metadata.
//!
//! # Design
//!
//! All types here are immutable values: the codec layer clones what it
//! needs and never mutates or retains caller-owned objects. Prices,
//! sizes, and volumes are fixed-point [`rust_decimal::Decimal`] so that
//! encoding round-trips preserve the exact decimal text (scale
//! included), which floating point cannot guarantee.
//!
//! Timestamps are Unix epoch nanoseconds (`i64`), the resolution used
//! consistently across every encode/decode path.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod bar;
pub mod instrument;
pub mod tick;

pub use bar::{Bar, BarAggregation, BarSpecification, BarType, BarTypeParseError, PriceType};
pub use instrument::{Instrument, OptionKind};
pub use tick::{AggressorSide, QuoteTick, Tick, TradeTick};

// =============================================================================
// Symbol
// =============================================================================

/// An opaque, venue-qualified instrument identifier (e.g. `"BTC/USD"`).
///
/// Symbols act as decoding context for the text codecs: tick and bar
/// lines do not embed their symbol, so the caller supplies it per
/// stream, channel, or file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// String form of the symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}
