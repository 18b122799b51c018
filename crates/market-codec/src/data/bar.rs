//! Bar value objects: OHLCV aggregates and their type descriptors.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Symbol;

// =============================================================================
// Bar Specification
// =============================================================================

/// Aggregation method producing a bar from ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarAggregation {
    /// Fixed tick count per bar.
    Tick,
    /// One-second wall-clock windows.
    Second,
    /// One-minute wall-clock windows.
    Minute,
    /// One-hour wall-clock windows.
    Hour,
    /// One-day wall-clock windows.
    Day,
}

impl BarAggregation {
    /// Canonical text token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tick => "TICK",
            Self::Second => "SECOND",
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
        }
    }

    /// Parse a canonical text token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "TICK" => Some(Self::Tick),
            "SECOND" => Some(Self::Second),
            "MINUTE" => Some(Self::Minute),
            "HOUR" => Some(Self::Hour),
            "DAY" => Some(Self::Day),
            _ => None,
        }
    }
}

/// Price basis a bar aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceType {
    /// Bid prices.
    Bid,
    /// Ask prices.
    Ask,
    /// Bid/ask midpoint.
    Mid,
    /// Last traded prices.
    Last,
}

impl PriceType {
    /// Canonical text token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bid => "BID",
            Self::Ask => "ASK",
            Self::Mid => "MID",
            Self::Last => "LAST",
        }
    }

    /// Parse a canonical text token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "BID" => Some(Self::Bid),
            "ASK" => Some(Self::Ask),
            "MID" => Some(Self::Mid),
            "LAST" => Some(Self::Last),
            _ => None,
        }
    }
}

/// Aggregation rule for a bar: step, method, and price basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarSpecification {
    /// Number of aggregation units per bar (e.g. 5 for 5-minute bars).
    pub step: u32,
    /// Aggregation method.
    pub aggregation: BarAggregation,
    /// Price basis.
    pub price_type: PriceType,
}

// =============================================================================
// Bar Type
// =============================================================================

/// Identifies a symbol plus the aggregation rule producing its bars.
///
/// Acts as decoding context for bars: a batch of bar lines decoded
/// together shares exactly one `BarType`, supplied by the caller.
///
/// # Canonical String Form
///
/// `{symbol}-{step}-{AGGREGATION}-{PRICE_TYPE}`, e.g.
/// `BTC/USD-1-MINUTE-LAST`. The form is parsed from the right so that
/// symbols may themselves contain `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarType {
    /// Instrument identifier.
    pub symbol: Symbol,
    /// Aggregation rule.
    pub spec: BarSpecification,
}

impl fmt::Display for BarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.symbol,
            self.spec.step,
            self.spec.aggregation.as_str(),
            self.spec.price_type.as_str()
        )
    }
}

/// Failure to parse a [`BarType`] from its canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bar type: `{0}`")]
pub struct BarTypeParseError(pub String);

impl FromStr for BarType {
    type Err = BarTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || BarTypeParseError(s.to_string());

        // Rightmost three segments are step/aggregation/price; the
        // remainder is the symbol, which may contain the delimiter.
        let mut parts = s.rsplitn(4, '-');
        let price_type = parts.next().and_then(PriceType::parse).ok_or_else(err)?;
        let aggregation = parts
            .next()
            .and_then(BarAggregation::parse)
            .ok_or_else(err)?;
        let step: u32 = parts
            .next()
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(err)?;
        let symbol = parts.next().filter(|raw| !raw.is_empty()).ok_or_else(err)?;

        Ok(Self {
            symbol: Symbol::new(symbol),
            spec: BarSpecification {
                step,
                aggregation,
                price_type,
            },
        })
    }
}

impl Serialize for BarType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BarType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Bar
// =============================================================================

/// An OHLCV aggregate over one step of a [`BarType`]'s window.
///
/// The high >= open,close >= low relationship is assumed to hold from
/// upstream validation; this layer does not enforce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    /// Type descriptor this bar was aggregated under.
    pub bar_type: BarType,
    /// Open price.
    pub open: Decimal,
    /// High price.
    pub high: Decimal,
    /// Low price.
    pub low: Decimal,
    /// Close price.
    pub close: Decimal,
    /// Traded volume.
    pub volume: Decimal,
    /// Window close time, Unix epoch nanoseconds.
    pub ts_event: i64,
}

impl Bar {
    /// Window close time as a UTC datetime (nanosecond precision).
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.ts_event)
    }
}
