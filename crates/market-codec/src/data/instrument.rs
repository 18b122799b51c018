//! Instrument metadata: a tagged union over instrument kinds.
//!
//! The schema of an instrument record varies by kind (a future carries
//! an expiry and multiplier, a spot pair does not), so the union's tag
//! maps directly onto the document codec's type discriminator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Symbol;

// =============================================================================
// Kind-specific records
// =============================================================================

/// A spot instrument (immediate settlement, e.g. a currency pair).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotInstrument {
    /// Instrument identifier.
    pub symbol: Symbol,
    /// Base currency code.
    pub base_currency: String,
    /// Quote currency code.
    pub quote_currency: String,
    /// Decimal places in price values.
    pub price_precision: u32,
    /// Decimal places in size values.
    pub size_precision: u32,
}

/// A futures contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureInstrument {
    /// Instrument identifier.
    pub symbol: Symbol,
    /// Underlying asset identifier.
    pub underlying: String,
    /// Contract expiry, Unix epoch nanoseconds.
    pub expiry_ns: i64,
    /// Contract size multiplier.
    #[serde(with = "rust_decimal::serde::str")]
    pub multiplier: Decimal,
    /// Decimal places in price values.
    pub price_precision: u32,
    /// Decimal places in size values.
    pub size_precision: u32,
}

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    /// Right to buy the underlying.
    #[serde(rename = "CALL")]
    Call,
    /// Right to sell the underlying.
    #[serde(rename = "PUT")]
    Put,
}

impl OptionKind {
    /// Canonical text token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }

    /// Parse a canonical text token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "CALL" => Some(Self::Call),
            "PUT" => Some(Self::Put),
            _ => None,
        }
    }
}

/// An options contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInstrument {
    /// Instrument identifier.
    pub symbol: Symbol,
    /// Underlying asset identifier.
    pub underlying: String,
    /// Contract expiry, Unix epoch nanoseconds.
    pub expiry_ns: i64,
    /// Strike price.
    #[serde(with = "rust_decimal::serde::str")]
    pub strike: Decimal,
    /// Call or put.
    pub option_kind: OptionKind,
    /// Contract size multiplier.
    #[serde(with = "rust_decimal::serde::str")]
    pub multiplier: Decimal,
    /// Decimal places in price values.
    pub price_precision: u32,
    /// Decimal places in size values.
    pub size_precision: u32,
}

// =============================================================================
// Instrument union
// =============================================================================

/// Tradable-instrument metadata, polymorphic by kind.
///
/// The serde tag (`kind`) uses the same discriminator values as the
/// instrument document codec, so a batch row and a standalone document
/// identify a record identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Instrument {
    /// Spot instrument.
    #[serde(rename = "SpotInstrument")]
    Spot(SpotInstrument),
    /// Futures contract.
    #[serde(rename = "FutureInstrument")]
    Future(FutureInstrument),
    /// Options contract.
    #[serde(rename = "OptionInstrument")]
    Option(OptionInstrument),
}

impl Instrument {
    /// The instrument's identifier.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        match self {
            Self::Spot(spot) => &spot.symbol,
            Self::Future(future) => &future.symbol,
            Self::Option(option) => &option.symbol,
        }
    }

    /// The kind discriminator used on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Spot(_) => "SpotInstrument",
            Self::Future(_) => "FutureInstrument",
            Self::Option(_) => "OptionInstrument",
        }
    }
}
