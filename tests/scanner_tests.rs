//! Poll cycles driven through scripted sources.

use std::sync::Arc;

use fundwatch::adapter::notifier::NotifierRegistry;
use fundwatch::adapter::store::{FileStore, MemoryStore};
use fundwatch::app::{AlertThrottle, Scanner};
use fundwatch::domain::{AlertPriority, ExchangeId, RawObservation, ThrottlePolicy};
use fundwatch::error::Error;
use fundwatch::port::{AlertStore, FundingSource};
use fundwatch::testkit::domain::{obs_8h, spread_pair};
use fundwatch::testkit::notifier::RecordingNotifier;
use fundwatch::testkit::source::{FailingSource, SharedSource, StaticSource};
use fundwatch::testkit::store::CountingStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const MINUTE: i64 = 60_000;

fn pct(spread_pct: Decimal) -> Decimal {
    spread_pct / Decimal::ONE_HUNDRED
}

/// Binance quotes zero on BTC; Bybit's quote is the spread.
fn btc_scanner(store: Arc<dyn AlertStore>) -> (Scanner, SharedSource, RecordingNotifier) {
    let binance = StaticSource::new(
        ExchangeId::Binance,
        vec![obs_8h(ExchangeId::Binance, "BTCUSDT", Decimal::ZERO)],
    );
    let bybit = SharedSource::new(ExchangeId::Bybit);
    let recorder = RecordingNotifier::new();

    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder.clone()));

    let sources: Vec<Box<dyn FundingSource>> = vec![Box::new(binance), Box::new(bybit.clone())];
    let scanner = Scanner::new(sources)
        .with_throttle(AlertThrottle::new(ThrottlePolicy::default(), store))
        .with_notifiers(Arc::new(registry));

    (scanner, bybit, recorder)
}

fn quote_btc(bybit: &SharedSource, spread_pct: Decimal) {
    bybit.set(vec![obs_8h(ExchangeId::Bybit, "BTCUSDT", pct(spread_pct))]);
}

#[tokio::test]
async fn throttle_scenario_across_cycles() {
    let (scanner, bybit, recorder) = btc_scanner(Arc::new(MemoryStore::new()));

    quote_btc(&bybit, dec!(12));
    let report = scanner.run_cycle(0).await.unwrap();
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].priority, AlertPriority::Standard);

    quote_btc(&bybit, dec!(12.5));
    assert!(scanner.run_cycle(10 * MINUTE).await.unwrap().alerts.is_empty());

    quote_btc(&bybit, dec!(15));
    let report = scanner.run_cycle(20 * MINUTE).await.unwrap();
    assert_eq!(report.alerts[0].priority, AlertPriority::High);

    quote_btc(&bybit, dec!(10.5));
    let report = scanner.run_cycle(90 * MINUTE).await.unwrap();
    assert_eq!(report.alerts[0].priority, AlertPriority::Standard);

    let priorities: Vec<AlertPriority> = recorder.alerts().iter().map(|a| a.priority).collect();
    assert_eq!(
        priorities,
        [AlertPriority::Standard, AlertPriority::High, AlertPriority::Standard]
    );
}

#[tokio::test]
async fn spread_at_threshold_never_reads_store() {
    let store = Arc::new(CountingStore::new());
    let (scanner, bybit, recorder) = btc_scanner(store.clone());

    quote_btc(&bybit, dec!(10));
    let report = scanner.run_cycle(0).await.unwrap();

    assert_eq!(report.opportunities.len(), 1);
    assert!(report.alerts.is_empty());
    assert!(store.gets().is_empty());
    assert!(store.sets().is_empty());
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn alerts_follow_rank_order() {
    let mut raw = spread_pair("ETH", dec!(11));
    raw.extend(spread_pair("BTC", dec!(30)));
    raw.extend(spread_pair("SOL", dec!(20)));

    let store = Arc::new(CountingStore::new());
    let recorder = RecordingNotifier::new();
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder.clone()));

    let scanner = Scanner::new(vec![Box::new(StaticSource::new(ExchangeId::Binance, raw))])
        .with_throttle(AlertThrottle::new(ThrottlePolicy::default(), store.clone()))
        .with_notifiers(Arc::new(registry));

    let report = scanner.run_cycle(0).await.unwrap();

    let symbols: Vec<String> = recorder
        .alerts()
        .into_iter()
        .map(|a| a.opportunity.symbol)
        .collect();
    assert_eq!(symbols, ["BTC-PERP", "SOL-PERP", "ETH-PERP"]);
    assert_eq!(report.alerts.len(), 3);
    assert_eq!(
        store.sets(),
        ["alert:BTC-PERP", "alert:SOL-PERP", "alert:ETH-PERP"]
    );
}

#[tokio::test]
async fn store_failure_skips_only_that_symbol() {
    let mut raw = spread_pair("BTC", dec!(30));
    raw.extend(spread_pair("ETH", dec!(20)));
    raw.extend(spread_pair("SOL", dec!(15)));

    let store = Arc::new(CountingStore::new());
    store.fail_key("alert:BTC-PERP");
    let recorder = RecordingNotifier::new();
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder.clone()));

    let scanner = Scanner::new(vec![Box::new(StaticSource::new(ExchangeId::Binance, raw))])
        .with_throttle(AlertThrottle::new(ThrottlePolicy::default(), store.clone()))
        .with_notifiers(Arc::new(registry));

    let report = scanner.run_cycle(0).await.unwrap();

    assert_eq!(report.opportunities.len(), 3);
    let alerted: Vec<String> = report
        .alerts
        .iter()
        .map(|a| a.opportunity.symbol.clone())
        .collect();
    assert_eq!(alerted, ["ETH-PERP", "SOL-PERP"]);
    assert_eq!(recorder.alerts().len(), 2);
    assert_eq!(
        store.gets(),
        ["alert:BTC-PERP", "alert:ETH-PERP", "alert:SOL-PERP"]
    );
    // Nothing written for the symbol whose read failed
    assert_eq!(store.sets(), ["alert:ETH-PERP", "alert:SOL-PERP"]);
}

#[tokio::test]
async fn failing_source_degrades_to_remaining_data() {
    let sources: Vec<Box<dyn FundingSource>> = vec![
        Box::new(StaticSource::new(
            ExchangeId::Binance,
            vec![obs_8h(ExchangeId::Binance, "BTCUSDT", dec!(0.0001))],
        )),
        Box::new(FailingSource::new(ExchangeId::Bybit)),
        Box::new(StaticSource::new(
            ExchangeId::Okx,
            vec![obs_8h(ExchangeId::Okx, "BTC-USDT-SWAP", dec!(0.0003))],
        )),
    ];
    let scanner = Scanner::new(sources);

    let report = scanner.run_cycle(0).await.unwrap();

    assert_eq!(report.opportunities.len(), 1);
    assert_eq!(report.observation_count(), 2);
    assert_eq!(report.failed_exchanges().collect::<Vec<_>>(), [ExchangeId::Bybit]);
}

#[tokio::test]
async fn every_source_failing_yields_empty_cycle() {
    let sources: Vec<Box<dyn FundingSource>> = vec![
        Box::new(FailingSource::new(ExchangeId::Binance)),
        Box::new(FailingSource::new(ExchangeId::Gate)),
    ];

    let report = Scanner::new(sources).run_cycle(0).await.unwrap();

    assert!(report.opportunities.is_empty());
    assert_eq!(report.failed_exchanges().count(), 2);
}

#[tokio::test]
async fn negative_interval_fails_cycle_without_alerting() {
    let store = Arc::new(CountingStore::new());
    let raw = vec![
        obs_8h(ExchangeId::Binance, "BTCUSDT", Decimal::ZERO),
        obs_8h(ExchangeId::Bybit, "BTCUSDT", dec!(0.5)),
        RawObservation::new(ExchangeId::Gate, "BTC_USDT", dec!(0.0001), dec!(-8)),
    ];
    let scanner = Scanner::new(vec![Box::new(StaticSource::new(ExchangeId::Binance, raw))])
        .with_throttle(AlertThrottle::new(ThrottlePolicy::default(), store.clone()));

    let err = scanner.run_cycle(0).await.unwrap_err();

    assert!(matches!(err, Error::Aggregation(_)));
    assert!(store.gets().is_empty());
}

#[tokio::test]
async fn scanner_without_throttle_never_alerts() {
    let recorder = RecordingNotifier::new();
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(recorder.clone()));

    let scanner = Scanner::new(vec![Box::new(StaticSource::new(
        ExchangeId::Binance,
        spread_pair("BTC", dec!(50)),
    ))])
    .with_notifiers(Arc::new(registry));

    let report = scanner.run_cycle(0).await.unwrap();

    assert_eq!(report.opportunities.len(), 1);
    assert!(report.alerts.is_empty());
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn file_store_keeps_throttle_state_across_restarts() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("alerts.json");

    {
        let store = Arc::new(FileStore::open(&path).unwrap());
        let (scanner, bybit, _) = btc_scanner(store);
        quote_btc(&bybit, dec!(12));
        assert_eq!(scanner.run_cycle(0).await.unwrap().alerts.len(), 1);
    }

    let store = Arc::new(FileStore::open(&path).unwrap());
    let (scanner, bybit, _) = btc_scanner(store);
    quote_btc(&bybit, dec!(12.5));
    assert!(scanner.run_cycle(10 * MINUTE).await.unwrap().alerts.is_empty());
}

#[tokio::test]
async fn each_cycle_fetches_every_source_once() {
    let source = SharedSource::new(ExchangeId::Paradex);
    let scanner = Scanner::new(vec![Box::new(source.clone())]);

    scanner.run_cycle(0).await.unwrap();
    scanner.run_cycle(MINUTE).await.unwrap();

    assert_eq!(source.fetch_count(), 2);
}
