//! Text codec for individual ticks.

use crate::data::{QuoteTick, Symbol, Tick, TradeTick};

use super::{TextCodecError, parse_aggressor, parse_decimal, parse_ts, strip_newline};

/// Delimited text codec for [`Tick`] values.
///
/// Lines omit the symbol; see the [module docs](super) for the format
/// contract and the external-context rule.
#[derive(Debug, Default, Clone)]
pub struct TickCodec;

impl TickCodec {
    /// Create a new tick codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encode a tick as one delimited text line (no trailing newline).
    ///
    /// The rendering is canonical: encoding the same tick always
    /// produces the identical line.
    #[must_use]
    pub fn encode(&self, tick: &Tick) -> String {
        match tick {
            Tick::Trade(trade) => format!(
                "{},{},{},{}",
                trade.price,
                trade.size,
                trade.aggressor.as_str(),
                trade.ts_event
            ),
            Tick::Quote(quote) => format!(
                "{},{},{},{},{}",
                quote.bid, quote.ask, quote.bid_size, quote.ask_size, quote.ts_event
            ),
        }
    }

    /// Decode one text line into a tick, attaching the caller-supplied
    /// symbol.
    ///
    /// The field count selects the record kind: 4 fields decode as a
    /// trade, 5 as a quote.
    ///
    /// # Errors
    ///
    /// Returns [`TextCodecError::WrongFieldCount`] for any other field
    /// count and [`TextCodecError::MalformedRecord`] when a field fails
    /// to parse.
    pub fn decode(&self, symbol: &Symbol, line: &str) -> Result<Tick, TextCodecError> {
        let fields: Vec<&str> = strip_newline(line).split(',').collect();

        match fields.as_slice() {
            [price, size, aggressor, ts] => Ok(Tick::Trade(TradeTick {
                symbol: symbol.clone(),
                price: parse_decimal("price", price)?,
                size: parse_decimal("size", size)?,
                aggressor: parse_aggressor("aggressor", aggressor)?,
                ts_event: parse_ts("ts", ts)?,
            })),
            [bid, ask, bid_size, ask_size, ts] => Ok(Tick::Quote(QuoteTick {
                symbol: symbol.clone(),
                bid: parse_decimal("bid", bid)?,
                ask: parse_decimal("ask", ask)?,
                bid_size: parse_decimal("bid_size", bid_size)?,
                ask_size: parse_decimal("ask_size", ask_size)?,
                ts_event: parse_ts("ts", ts)?,
            })),
            other => Err(TextCodecError::WrongFieldCount {
                expected: "4 (trade) or 5 (quote)",
                actual: other.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use test_case::test_case;

    use crate::data::AggressorSide;

    use super::*;

    fn symbol() -> Symbol {
        Symbol::new("BTC/USD")
    }

    fn trade() -> Tick {
        Tick::Trade(TradeTick {
            symbol: symbol(),
            price: Decimal::new(5_000_012, 2), // 50000.12
            size: Decimal::new(1, 2),          // 0.01
            aggressor: AggressorSide::Buyer,
            ts_event: 1_700_000_000_000_000_000,
        })
    }

    fn quote() -> Tick {
        Tick::Quote(QuoteTick {
            symbol: symbol(),
            bid: Decimal::new(5_000_000, 2),
            ask: Decimal::new(5_000_050, 2),
            bid_size: Decimal::new(150, 2),
            ask_size: Decimal::new(75, 2),
            ts_event: 1_700_000_000_000_000_001,
        })
    }

    #[test]
    fn encode_trade_line_is_canonical() {
        let codec = TickCodec::new();
        let line = codec.encode(&trade());
        assert_eq!(line, "50000.12,0.01,BUYER,1700000000000000000");
        // Same tick always renders identically.
        assert_eq!(codec.encode(&trade()), line);
    }

    #[test]
    fn encode_quote_line_is_canonical() {
        let codec = TickCodec::new();
        assert_eq!(
            codec.encode(&quote()),
            "50000.00,50000.50,1.50,0.75,1700000000000000001"
        );
    }

    #[test]
    fn trade_round_trip_preserves_decimal_text() {
        let codec = TickCodec::new();
        let decoded = codec.decode(&symbol(), &codec.encode(&trade())).unwrap();
        assert_eq!(decoded, trade());
    }

    #[test]
    fn quote_round_trip() {
        let codec = TickCodec::new();
        let decoded = codec.decode(&symbol(), &codec.encode(&quote())).unwrap();
        assert_eq!(decoded, quote());
    }

    #[test]
    fn trailing_zeros_survive_round_trip() {
        let codec = TickCodec::new();
        let tick = Tick::Trade(TradeTick {
            symbol: symbol(),
            price: Decimal::new(1_100, 3), // 1.100
            size: Decimal::new(10, 1),     // 1.0
            aggressor: AggressorSide::Seller,
            ts_event: 1,
        });

        let line = codec.encode(&tick);
        assert_eq!(line, "1.100,1.0,SELLER,1");
        assert_eq!(codec.decode(&symbol(), &line).unwrap(), tick);
    }

    #[test]
    fn decode_accepts_trailing_newline() {
        let codec = TickCodec::new();
        let line = format!("{}\n", codec.encode(&trade()));
        assert_eq!(codec.decode(&symbol(), &line).unwrap(), trade());
    }

    #[test_case("50000.12,0.01,BUYER" ; "three fields")]
    #[test_case("1,2,3,4,5,6" ; "six fields")]
    #[test_case("" ; "empty line")]
    fn decode_rejects_wrong_field_count(line: &str) {
        let codec = TickCodec::new();
        assert!(matches!(
            codec.decode(&symbol(), line),
            Err(TextCodecError::WrongFieldCount { .. })
        ));
    }

    #[test_case("abc,0.01,BUYER,1", "price" ; "bad price")]
    #[test_case("50000.12,x,BUYER,1", "size" ; "bad size")]
    #[test_case("50000.12,0.01,MAKER,1", "aggressor" ; "bad aggressor")]
    #[test_case("50000.12,0.01,BUYER,later", "ts" ; "bad timestamp")]
    #[test_case("1,2,3,4,notime", "ts" ; "bad quote timestamp")]
    fn decode_reports_offending_field(line: &str, expected_field: &str) {
        let codec = TickCodec::new();
        match codec.decode(&symbol(), line) {
            Err(TextCodecError::MalformedRecord { field, .. }) => {
                assert_eq!(field, expected_field);
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn decode_attaches_supplied_symbol() {
        let codec = TickCodec::new();
        let other = Symbol::new("ETH/USD");
        let decoded = codec.decode(&other, &codec.encode(&trade())).unwrap();
        assert_eq!(decoded.symbol(), &other);
    }
}
