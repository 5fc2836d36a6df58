//! End-to-end screening of hand-built series through `screen_series`.

use breakscan_core::config::{BreakoutRule, ScreenerConfig};
use breakscan_core::domain::{Bar, InstrumentSeries};
use breakscan_core::screen::{screen_series, SeriesOutcome, Validation};
use chrono::NaiveDate;

/// `n` bars alternating 100.5 / 99.5 on flat volume; the last bar jumps by
/// `jump` on `last_volume`.
fn choppy_then_breakout(n: usize, jump: f64, last_volume: u64) -> InstrumentSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut closes: Vec<f64> = (0..n - 1)
        .map(|i| if i % 2 == 0 { 100.5 } else { 99.5 })
        .collect();
    let prev = closes[n - 2];
    closes.push(prev + jump);

    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: close,
            high: close + 0.2,
            low: close - 0.2,
            close,
            volume: if i == n - 1 { last_volume } else { 1_000 },
        })
        .collect();
    InstrumentSeries::new("ANTM.JK", bars).unwrap()
}

#[test]
fn clean_breakout_is_a_hit() {
    let series = choppy_then_breakout(80, 8.0, 10_000);
    let outcome = screen_series(&series, &ScreenerConfig::default());

    let SeriesOutcome::Evaluated { decision, frame } = outcome else {
        panic!("series should be evaluated");
    };
    assert!(decision.checks.all(), "checks: {:?}", decision.checks);
    let hit = decision.hit.expect("breakout expected");
    assert_eq!(hit.symbol, "ANTM.JK");
    assert_eq!(hit.volume, 10_000);
    assert!(hit.rsi > 60.0 && hit.rsi < 85.0, "rsi {}", hit.rsi);
    assert!(hit.guppy_oscillator > hit.guppy_trigger);
    assert!(hit.close > hit.bollinger_upper);
    assert_eq!(frame.len(), 80);
    assert_eq!(hit.date, *frame.dates.last().unwrap());
}

#[test]
fn breakout_without_volume_is_rejected() {
    let series = choppy_then_breakout(80, 8.0, 1_000);
    let outcome = screen_series(&series, &ScreenerConfig::default());
    let SeriesOutcome::Evaluated { decision, .. } = outcome else {
        panic!("series should be evaluated");
    };
    assert!(!decision.checks.volume_surge);
    assert!(decision.checks.price_above_band);
    assert!(decision.hit.is_none());
}

#[test]
fn overextended_move_fails_rsi_ceiling() {
    // A jump this size pushes RSI past 85.
    let series = choppy_then_breakout(80, 60.0, 10_000);
    let outcome = screen_series(&series, &ScreenerConfig::default());
    let SeriesOutcome::Evaluated { decision, .. } = outcome else {
        panic!("series should be evaluated");
    };
    assert!(!decision.checks.rsi_in_range);
    assert!(decision.hit.is_none());
}

#[test]
fn custom_rule_can_admit_extended_move() {
    let series = choppy_then_breakout(80, 60.0, 10_000);
    let config = ScreenerConfig {
        rule: BreakoutRule {
            rsi_upper: 100.0,
            ..BreakoutRule::default()
        },
        ..ScreenerConfig::default()
    };
    assert!(screen_series(&series, &config).hit().is_some());
}

#[test]
fn forty_bars_is_skipped_even_with_perfect_last_bar() {
    let series = choppy_then_breakout(40, 8.0, 10_000);
    let outcome = screen_series(&series, &ScreenerConfig::default());
    assert!(matches!(
        outcome,
        SeriesOutcome::Skipped(Validation::InsufficientData { bars: 40, required: 60 })
    ));
}
