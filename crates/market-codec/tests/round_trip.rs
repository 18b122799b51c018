//! End-to-end round-trip tests across the text codecs, document
//! codecs, and batch mapper.

use market_codec::{
    AggressorSide, Bar, BarAggregation, BarCodec, BarSpecification, BarType, Batch, Data,
    DataCodec, PriceType, Symbol, Tick, TickCodec, TradeTick, map_bars, map_ticks,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn btc_usd_minute_last() -> BarType {
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
        bar_type: btc_usd_minute_last(),
        open: Decimal::new(5_000_000, 2),
        high: Decimal::new(5_010_000, 2),
        low: Decimal::new(4_990_000, 2),
        close: Decimal::new(close_cents, 2),
        volume: Decimal::new(12_345, 3),
        ts_event,
    }
}

#[test]
fn tick_text_round_trip_end_to_end() {
    // Encode a BTC/USD trade at 50000.12 x 0.01; decoding the line with
    // the same symbol reproduces the identical tick.
    let symbol = Symbol::new("BTC/USD");
    let tick = Tick::Trade(TradeTick {
        symbol: symbol.clone(),
        price: "50000.12".parse().unwrap(),
        size: "0.01".parse().unwrap(),
        aggressor: AggressorSide::NoAggressor,
        ts_event: 1_700_000_000_000_000_000,
    });

    let codec = TickCodec::new();
    let line = codec.encode(&tick);
    let decoded = codec.decode(&symbol, &line).unwrap();

    assert_eq!(decoded, tick);
}

#[test]
fn bar_batch_end_to_end() {
    // Three bars sharing BTC/USD-1-MINUTE-LAST: text-encode each,
    // batch-decode them back, then map them into a batch structure.
    let bar_type = btc_usd_minute_last();
    let bars = [bar(5_001_000, 60), bar(5_002_000, 120), bar(5_003_000, 180)];

    let codec = BarCodec::new();
    let lines: Vec<String> = bars.iter().map(|b| codec.encode(b)).collect();
    let decoded = codec
        .decode_batch(&bar_type, lines.iter().map(String::as_str))
        .unwrap();
    assert_eq!(decoded, bars);

    let batch = map_bars(&decoded, &bar_type).unwrap();
    assert_eq!(batch.metadata.bar_type.to_string(), "BTC/USD-1-MINUTE-LAST");
    assert_eq!(batch.metadata.count, 3);
    assert_eq!(batch.data.len(), 3);
}

#[test]
fn mapped_batch_survives_msgpack() {
    let symbol = Symbol::new("BTC/USD");
    let ticks: Vec<Tick> = (0..3)
        .map(|i| {
            Tick::Trade(TradeTick {
                symbol: symbol.clone(),
                price: Decimal::new(5_000_000 + i, 2),
                size: Decimal::new(1, 2),
                aggressor: AggressorSide::Seller,
                ts_event: i,
            })
        })
        .collect();

    let batch = Batch::from(map_ticks(&ticks).unwrap());
    let bytes = batch.to_msgpack().unwrap();
    let back = Batch::from_msgpack(&bytes).unwrap();

    let Batch::Tick(tick_batch) = back else {
        panic!("expected a tick batch");
    };
    assert_eq!(tick_batch.into_ticks(), ticks);
}

#[test]
fn document_codec_agrees_with_text_codec() {
    // The same bar through both encodings yields the same value.
    let original = bar(5_005_000, 1_700_000_060_000_000_000);

    let text = BarCodec::new();
    let from_text = text
        .decode(&btc_usd_minute_last(), &text.encode(&original))
        .unwrap();

    let document = DataCodec::new();
    let bytes = document.encode(&Data::Bar(original.clone())).unwrap();
    let Data::Bar(from_document) = document.decode(&bytes).unwrap() else {
        panic!("expected a bar document");
    };

    assert_eq!(from_text, original);
    assert_eq!(from_document, original);
}

// =============================================================================
// Properties
// =============================================================================

prop_compose! {
    fn arb_decimal()(mantissa in 0i64..10_000_000_000, scale in 0u32..=9) -> Decimal {
        Decimal::new(mantissa, scale)
    }
}

fn arb_aggressor() -> impl Strategy<Value = AggressorSide> {
    prop_oneof![
        Just(AggressorSide::Buyer),
        Just(AggressorSide::Seller),
        Just(AggressorSide::NoAggressor),
    ]
}

proptest! {
    #[test]
    fn trade_text_round_trip_is_lossless(
        price in arb_decimal(),
        size in arb_decimal(),
        aggressor in arb_aggressor(),
        ts_event in proptest::num::i64::ANY,
    ) {
        let symbol = Symbol::new("BTC/USD");
        let tick = Tick::Trade(TradeTick {
            symbol: symbol.clone(),
            price,
            size,
            aggressor,
            ts_event,
        });

        let codec = TickCodec::new();
        let line = codec.encode(&tick);
        let decoded = codec.decode(&symbol, &line).unwrap();

        // Field-for-field equality, including exact decimal scale.
        prop_assert_eq!(&decoded, &tick);
        // Canonical rendering: re-encoding reproduces the line.
        prop_assert_eq!(codec.encode(&decoded), line);
    }

    #[test]
    fn bar_document_round_trip_is_lossless(
        open in arb_decimal(),
        high in arb_decimal(),
        low in arb_decimal(),
        close in arb_decimal(),
        volume in arb_decimal(),
        ts_event in proptest::num::i64::ANY,
    ) {
        let original = Bar {
            bar_type: btc_usd_minute_last(),
            open,
            high,
            low,
            close,
            volume,
            ts_event,
        };

        let codec = DataCodec::new();
        let bytes = codec.encode(&Data::Bar(original.clone())).unwrap();
        prop_assert_eq!(codec.decode(&bytes).unwrap(), Data::Bar(original));
    }
}
