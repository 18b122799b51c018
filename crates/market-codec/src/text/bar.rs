//! Text codec for bars, including batch decode.

use crate::data::{Bar, BarType};

use super::{TextCodecError, parse_decimal, parse_ts, strip_newline};

/// Delimited text codec for [`Bar`] values.
///
/// Lines omit the bar type; see the [module docs](super) for the
/// format contract and the external-context rule.
#[derive(Debug, Default, Clone)]
pub struct BarCodec;

impl BarCodec {
    /// Create a new bar codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encode a bar as one delimited text line (no trailing newline).
    #[must_use]
    pub fn encode(&self, bar: &Bar) -> String {
        format!(
            "{},{},{},{},{},{}",
            bar.open, bar.high, bar.low, bar.close, bar.volume, bar.ts_event
        )
    }

    /// Decode one text line into a bar, attaching the caller-supplied
    /// bar type.
    ///
    /// # Errors
    ///
    /// Returns [`TextCodecError::WrongFieldCount`] or
    /// [`TextCodecError::MalformedRecord`] when the line does not match
    /// the format contract.
    pub fn decode(&self, bar_type: &BarType, line: &str) -> Result<Bar, TextCodecError> {
        let fields: Vec<&str> = strip_newline(line).split(',').collect();

        let [open, high, low, close, volume, ts] = fields.as_slice() else {
            return Err(TextCodecError::WrongFieldCount {
                expected: "6",
                actual: fields.len(),
            });
        };

        Ok(Bar {
            bar_type: bar_type.clone(),
            open: parse_decimal("open", open)?,
            high: parse_decimal("high", high)?,
            low: parse_decimal("low", low)?,
            close: parse_decimal("close", close)?,
            volume: parse_decimal("volume", volume)?,
            ts_event: parse_ts("ts", ts)?,
        })
    }

    /// Decode a sequence of lines sharing one bar type, preserving
    /// input order.
    ///
    /// Decoding is all-or-nothing: the first malformed line aborts the
    /// whole batch and no partial result is returned. The caller is
    /// free to fall back to per-line decoding to skip bad records.
    ///
    /// # Errors
    ///
    /// Returns [`TextCodecError::BatchLine`] wrapping the per-line
    /// failure together with the zero-based index of the line.
    pub fn decode_batch<'a, I>(
        &self,
        bar_type: &BarType,
        lines: I,
    ) -> Result<Vec<Bar>, TextCodecError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut bars = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            match self.decode(bar_type, line) {
                Ok(bar) => bars.push(bar),
                Err(source) => {
                    tracing::warn!(index, error = %source, "bar batch decode aborted");
                    return Err(TextCodecError::BatchLine {
                        index,
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::data::{BarAggregation, BarSpecification, PriceType, Symbol};

    use super::*;

    fn bar_type() -> BarType {
        BarType {
            symbol: Symbol::new("BTC/USD"),
            spec: BarSpecification {
                step: 1,
                aggregation: BarAggregation::Minute,
                price_type: PriceType::Last,
            },
        }
    }

    fn bar(close_cents: i64, ts_event: i64) -> Bar {
        Bar {
            bar_type: bar_type(),
            open: Decimal::new(5_000_000, 2),
            high: Decimal::new(5_010_000, 2),
            low: Decimal::new(4_990_000, 2),
            close: Decimal::new(close_cents, 2),
            volume: Decimal::new(12_345, 3),
            ts_event,
        }
    }

    #[test]
    fn encode_line_is_canonical() {
        let codec = BarCodec::new();
        assert_eq!(
            codec.encode(&bar(5_005_000, 60_000_000_000)),
            "50000.00,50100.00,49900.00,50050.00,12.345,60000000000"
        );
    }

    #[test]
    fn decode_attaches_supplied_bar_type() {
        let codec = BarCodec::new();
        let original = bar(5_005_000, 60_000_000_000);
        let decoded = codec.decode(&bar_type(), &codec.encode(&original)).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.bar_type, bar_type());
    }

    #[test]
    fn decode_rejects_wrong_field_count() {
        let codec = BarCodec::new();
        assert!(matches!(
            codec.decode(&bar_type(), "1,2,3,4,5"),
            Err(TextCodecError::WrongFieldCount { actual: 5, .. })
        ));
    }

    #[test]
    fn decode_batch_preserves_order() {
        let codec = BarCodec::new();
        let bars = [bar(1, 10), bar(2, 20), bar(3, 30)];
        let lines: Vec<String> = bars.iter().map(|b| codec.encode(b)).collect();

        let decoded = codec
            .decode_batch(&bar_type(), lines.iter().map(String::as_str))
            .unwrap();

        assert_eq!(decoded, bars);
    }

    #[test]
    fn decode_batch_reports_failing_index_all_or_nothing() {
        let codec = BarCodec::new();
        let good = codec.encode(&bar(1, 10));
        let lines = vec![good.as_str(), "not,a,bar", good.as_str()];

        match codec.decode_batch(&bar_type(), lines) {
            Err(TextCodecError::BatchLine { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(
                    *source,
                    TextCodecError::WrongFieldCount { actual: 3, .. }
                ));
            }
            other => panic!("expected BatchLine, got {other:?}"),
        }
    }

    #[test]
    fn decode_batch_of_empty_input_is_empty() {
        let codec = BarCodec::new();
        let decoded = codec.decode_batch(&bar_type(), std::iter::empty()).unwrap();
        assert!(decoded.is_empty());
    }
}
