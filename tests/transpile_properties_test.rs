//! Property tests for the resolution engine
//!
//! - Arbitrary input never panics and always renders every line
//! - A complete signal in any line order transpiles cleanly
//! - One unrecognizable line never stops the rest of the signal
//! - Applying a record twice gives the same tokens and error

use proptest::prelude::*;

use signal_transpiler::{
    transpile, ErrorKind, InstructionRecord, SignalConfig, SignalTranspiler, TranspilerConfig,
};

const COMPLETE_SIGNAL: &[&str] = &[
    "MARKET: BTC/USDT",
    "START AT: 2021-06-22T15:21:03Z",
    "ENTER BETWEEN: 0.5 - 0.6",
    "TAKE PROFIT: 0.7, 0.8",
    "STOP LOSS: 0.4",
    "EXCHANGE: KRAKEN",
    "SHORT",
    "INVALIDATE AFTER 3 DAYS",
];

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("MARKET: BTC/USDT".to_string()),
        Just("ENTER: NOW".to_string()),
        Just("LONG".to_string()),
        Just("// note".to_string()),
        Just(String::new()),
        "[A-Za-z0-9:/.,\\- ]{0,30}",
    ]
}

proptest! {
    #[test]
    fn arbitrary_input_renders_every_line(lines in prop::collection::vec(line_strategy(), 0..12)) {
        let input = lines.join("\n");
        let output = transpile(&input);
        let line_count = input.split('\n').count();

        prop_assert!(output.tokenized_input.len() >= line_count);
        prop_assert!(output.tokenized_input.len() <= line_count + 4);
        prop_assert!(output.tokenized_input.iter().all(|line| !line.is_empty()));
        prop_assert_eq!(output.errors.len(), output.diagnostics.len());
        prop_assert_eq!(output.has_errors(), !output.errors.is_empty());
    }

    #[test]
    fn complete_signal_in_any_order_is_clean(lines in Just(COMPLETE_SIGNAL.to_vec()).prop_shuffle()) {
        let output = transpile(&lines.join("\n"));

        prop_assert!(output.errors.is_empty(), "{:?}", output.errors);
        prop_assert_eq!(output.tokenized_input.len(), COMPLETE_SIGNAL.len());
        let signal = &output.signal_input;
        prop_assert_eq!(signal.base_asset.as_str(), "BTC");
        prop_assert_eq!(signal.exchange.as_str(), "kraken");
        prop_assert!(signal.is_short);
        prop_assert_eq!(signal.take_profits.clone(), vec![0.7, 0.8]);
        prop_assert_eq!(signal.invalidate_after_seconds, 3 * 86_400);
    }

    #[test]
    fn one_bad_line_never_aborts(
        position in 0usize..4,
        junk in "[0-9]{1,3} [a-z]{3,8} [a-z]{3,8}",
    ) {
        let mut lines = vec![
            "MARKET: BTC/USDT".to_string(),
            "START AT: 2021-06-22".to_string(),
            "ENTER: NOW".to_string(),
        ];
        lines.insert(position, junk);
        let output = transpile(&lines.join("\n"));

        prop_assert_eq!(output.errors.len(), 1, "{:?}", output.errors);
        prop_assert_eq!(output.diagnostics[0].kind(), ErrorKind::Unrecognized);
        prop_assert_eq!(output.signal_input.base_asset.as_str(), "BTC");
        prop_assert!(output.signal_input.enters_immediately());
        prop_assert!(output.signal_input.has_initial_iso8601());
    }

    #[test]
    fn enter_range_keeps_bounds(low in 1u32..50_000, spread in 0u32..50_000) {
        let high = low + spread;
        let output = transpile(&format!(
            "MARKET: BTC/USDT\nSTART AT: 2021-06-22\nENTER BETWEEN: {} - {}",
            low, high
        ));

        prop_assert!(output.errors.is_empty(), "{:?}", output.errors);
        prop_assert_eq!(output.signal_input.enter_range_low, f64::from(low));
        prop_assert_eq!(output.signal_input.enter_range_high, f64::from(high));
    }

    #[test]
    fn apply_is_idempotent(line in line_strategy()) {
        let config = TranspilerConfig::default();
        let mut signal = SignalConfig::new();
        let mut record = InstructionRecord::explicit(line, 0);

        let first = record.apply(&mut signal, &config).cloned();
        let tokens = record.tokens().to_vec();
        let after_first = signal.clone();

        let second = record.apply(&mut signal, &config).cloned();
        prop_assert_eq!(first, second);
        prop_assert_eq!(record.tokens(), tokens.as_slice());
        prop_assert_eq!(signal, after_first);
    }
}

#[test]
fn shared_transpiler_keeps_calls_independent() {
    let transpiler = SignalTranspiler::default();
    let first = transpiler.transpile("MARKET: BTC/USDT\nSTART AT: 2021-06-22\nENTER: NOW");
    let second = transpiler.transpile("MARKET: ETH/BTC\nSTART AT: 2021-06-23\nENTER: NOW");

    assert!(first.errors.is_empty());
    assert!(second.errors.is_empty());
    assert_eq!(first.signal_input.base_asset, "BTC");
    assert_eq!(second.signal_input.base_asset, "ETH");
}

#[test]
fn concurrent_calls_share_one_transpiler() {
    let transpiler = std::sync::Arc::new(SignalTranspiler::default());
    let handles: Vec<_> = ["BTC", "ETH", "SOL", "ADA"]
        .into_iter()
        .map(|base| {
            let transpiler = transpiler.clone();
            std::thread::spawn(move || {
                let output = transpiler.transpile(&format!(
                    "MARKET: {}/USDT\nSTART AT: 2021-06-22\nENTER: NOW",
                    base
                ));
                (base, output)
            })
        })
        .collect();

    for handle in handles {
        let (base, output) = handle.join().unwrap();
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        assert_eq!(output.signal_input.base_asset, base);
    }
}
