use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use savings_ledger_core::display::format_number;
use savings_ledger_core::errors::CoreError;
use savings_ledger_core::models::delta::{ChangeKind, ReferencePolicy, Trend};
use savings_ledger_core::models::history::HistoryChange;
use savings_ledger_core::models::rates::Rates;
use savings_ledger_core::models::settings::{CloudConfig, Settings, HISTORY_KEY, SETTINGS_KEY};
use savings_ledger_core::models::snapshot::{Denomination, Snapshot};
use savings_ledger_core::providers::registry::RateProviderRegistry;
use savings_ledger_core::providers::traits::{RateKind, RateProvider};
use savings_ledger_core::storage::auth::{AuthSession, Identity};
use savings_ledger_core::storage::cloud::CloudStore;
use savings_ledger_core::storage::local::LocalStore;
use savings_ledger_core::storage::memory::MemoryDocumentBackend;
use savings_ledger_core::storage::traits::{DocumentBackend, RecordStore};
use savings_ledger_core::SavingsTracker;

// ═══════════════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════════════

/// Local store whose writes can be made to fail on demand.
struct FlakyStore {
    inner: LocalStore,
    fail_writes: AtomicBool,
    /// Record keys whose writes fail regardless of `fail_writes`
    failing_keys: Mutex<Vec<&'static str>>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: LocalStore::in_memory("flaky"),
            fail_writes: AtomicBool::new(false),
            failing_keys: Mutex::new(Vec::new()),
        }
    }

    fn fail_key(&self, key: &'static str) {
        self.failing_keys.lock().unwrap().push(key);
    }

    fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn read_value(&self, key: &str) -> Result<Option<Value>, CoreError> {
        self.inner.read_value(key).await
    }

    async fn write_value(&self, key: &str, value: Value) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) || self.failing_keys.lock().unwrap().iter().any(|k| *k == key) {
            return Err(CoreError::WriteFailed("disk full".into()));
        }
        self.inner.write_value(key, value).await
    }
}

struct OfflineRates;

#[async_trait]
impl RateProvider for OfflineRates {
    fn name(&self) -> &str {
        "offline"
    }

    fn supported_kinds(&self) -> Vec<RateKind> {
        vec![RateKind::UsdExchange, RateKind::Gold24Gram]
    }

    async fn get_current_rate(&self, kind: RateKind, _currency: &str) -> Result<f64, CoreError> {
        Ok(match kind {
            RateKind::UsdExchange => 48.0,
            RateKind::Gold24Gram => 4000.0,
        })
    }

    async fn get_historical_rate(
        &self,
        kind: RateKind,
        currency: &str,
        _date: NaiveDate,
    ) -> Result<f64, CoreError> {
        self.get_current_rate(kind, currency).await
    }
}

fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, day, 18, 0, 0).unwrap()
}

fn rates() -> Rates {
    Rates::new(50.0, 4200.0).unwrap()
}

fn local() -> Arc<dyn RecordStore> {
    Arc::new(LocalStore::in_memory("test"))
}

fn cloud_for(backend: &Arc<MemoryDocumentBackend>, auth: AuthSession) -> Arc<dyn RecordStore> {
    let backend: Arc<dyn DocumentBackend> = backend.clone();
    Arc::new(CloudStore::new(CloudConfig::default(), auth, backend))
}

async fn record_gold21(tracker: &mut SavingsTracker, day: u32, gold21: f64) {
    let snapshot = tracker.snapshot().with(Denomination::Gold21, gold21);
    tracker.set_snapshot(snapshot).await.unwrap();
    tracker.record_snapshot_at(rates(), ts(day)).await.unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Full workflow over the local store
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_fresh_tracker_is_empty() {
    let tracker = SavingsTracker::load(local()).await;
    assert!(tracker.snapshot().is_empty());
    assert!(tracker.history().is_empty());
    assert!(tracker.deltas(ReferencePolicy::PreviousEntry).is_empty());
    assert_eq!(tracker.latest_trend(), Trend::Unknown);
    assert!(!tracker.needs_sign_in());
}

#[tokio::test]
async fn test_record_and_derive_deltas() {
    let mut tracker = SavingsTracker::load(local()).await;
    record_gold21(&mut tracker, 1, 8.0).await;
    record_gold21(&mut tracker, 2, 8.0).await;
    record_gold21(&mut tracker, 3, 10.0).await;

    assert_eq!(tracker.history().len(), 3);
    assert_eq!(tracker.history().newest().unwrap().timestamp, ts(3));

    let groups = tracker.deltas(ReferencePolicy::PreviousEntry);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].denomination, Denomination::Gold21);
    assert_eq!(groups[0].changes.len(), 1);
    assert_eq!(groups[0].changes[0].difference, 2.0);
    assert_eq!(groups[0].changes[0].kind, ChangeKind::Added);

    let baseline = tracker.deltas(ReferencePolicy::FixedBaseline);
    assert_eq!(baseline[0].changes.len(), 1);
    assert_eq!(tracker.latest_trend(), Trend::Up);
}

#[tokio::test]
async fn test_recorded_total_uses_valuation() {
    let mut tracker = SavingsTracker::load(local()).await;
    let snapshot = Snapshot::new()
        .with(Denomination::Usd, 100.0)
        .with(Denomination::Egp, 1000.0)
        .with(Denomination::Gold24, 1.0);
    tracker.set_snapshot(snapshot).await.unwrap();

    let expected = 100.0 * 50.0 + 1000.0 + 4200.0;
    assert!((tracker.valuate(&rates()) - expected).abs() < 1e-9);

    tracker.record_snapshot(rates()).await.unwrap();
    let entry = tracker.history().newest().unwrap();
    assert!((entry.total - expected).abs() < 1e-9);
    assert_eq!(entry.amounts, snapshot);
    assert_eq!(entry.rates, rates());
}

#[tokio::test]
async fn test_entries_are_snapshots_not_references() {
    let mut tracker = SavingsTracker::load(local()).await;
    record_gold21(&mut tracker, 1, 5.0).await;

    let edited = tracker.snapshot().with(Denomination::Gold21, 99.0);
    tracker.set_snapshot(edited).await.unwrap();

    assert_eq!(tracker.history().newest().unwrap().amounts.gold21, 5.0);
}

#[tokio::test]
async fn test_remove_repairs_deltas() {
    let mut tracker = SavingsTracker::load(local()).await;
    record_gold21(&mut tracker, 1, 8.0).await;
    record_gold21(&mut tracker, 2, 4.0).await;
    record_gold21(&mut tracker, 3, 10.0).await;

    let removed = tracker.remove_history_entry(1).await.unwrap();
    assert_eq!(removed.timestamp, ts(2));

    let groups = tracker.deltas(ReferencePolicy::PreviousEntry);
    assert_eq!(groups[0].changes.len(), 1);
    assert_eq!(groups[0].changes[0].previous, 8.0);
    assert_eq!(groups[0].changes[0].current, 10.0);
}

#[tokio::test]
async fn test_remove_out_of_range_and_by_id() {
    let mut tracker = SavingsTracker::load(local()).await;
    record_gold21(&mut tracker, 1, 1.0).await;

    let err = tracker.remove_history_entry(5).await.unwrap_err();
    assert!(matches!(err, CoreError::EntryNotFound(_)));
    assert_eq!(tracker.history().len(), 1);

    let id = tracker.history().newest().unwrap().id;
    tracker.remove_history_entry_by_id(id).await.unwrap();
    assert!(tracker.history().is_empty());
    assert!(tracker.remove_history_entry_by_id(id).await.is_err());
}

#[tokio::test]
async fn test_clear_history() {
    let mut tracker = SavingsTracker::load(local()).await;
    record_gold21(&mut tracker, 1, 1.0).await;
    record_gold21(&mut tracker, 2, 2.0).await;

    assert_eq!(tracker.clear_history().await.unwrap(), 2);
    assert!(tracker.history().is_empty());
    assert!(tracker.deltas(ReferencePolicy::FixedBaseline).is_empty());
}

#[tokio::test]
async fn test_invalid_snapshot_is_rejected() {
    let mut tracker = SavingsTracker::load(local()).await;
    let err = tracker
        .set_snapshot(Snapshot::new().with(Denomination::Usd, -5.0))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationError(_)));
    assert!(tracker.snapshot().is_empty());
}

// ═══════════════════════════════════════════════════════════════════
// Persistence
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_state_survives_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    {
        let store: Arc<dyn RecordStore> = Arc::new(LocalStore::open("app", &path).unwrap());
        let mut tracker = SavingsTracker::load(store).await;
        record_gold21(&mut tracker, 1, 3.0).await;
        record_gold21(&mut tracker, 2, 6.0).await;
        tracker.set_local_currency("usd").await.unwrap();
    }

    let store: Arc<dyn RecordStore> = Arc::new(LocalStore::open("app", &path).unwrap());
    let tracker = SavingsTracker::load(store).await;
    assert_eq!(tracker.history().len(), 2);
    assert_eq!(tracker.snapshot().gold21, 6.0);
    assert_eq!(tracker.get_settings().local_currency, "USD");
    assert_eq!(tracker.history().newest().unwrap().timestamp, ts(2));
}

#[tokio::test]
async fn test_corrupt_history_loads_as_empty() {
    let store = Arc::new(LocalStore::in_memory("app"));
    store.set("savings_history", &"garbage").unwrap();
    store
        .set("savings_current", &Snapshot::new().with(Denomination::Egp, 7.0))
        .unwrap();

    let tracker = SavingsTracker::load(store).await;
    assert!(tracker.history().is_empty());
    assert_eq!(tracker.snapshot().egp, 7.0);
}

#[tokio::test]
async fn test_failed_write_keeps_previous_state() {
    let flaky = Arc::new(FlakyStore::new());
    let mut tracker = SavingsTracker::load(flaky.clone()).await;
    record_gold21(&mut tracker, 1, 2.0).await;

    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    let _sub = tracker.on_history_change(move |c| sink.lock().unwrap().push(c.clone()));

    flaky.set_failing(true);

    let err = tracker.record_snapshot_at(rates(), ts(2)).await.unwrap_err();
    assert!(matches!(err, CoreError::WriteFailed(_)));
    assert_eq!(tracker.history().len(), 1);

    assert!(tracker.clear_history().await.is_err());
    assert_eq!(tracker.history().len(), 1);

    let edited = tracker.snapshot().with(Denomination::Usd, 1.0);
    assert!(tracker.set_snapshot(edited).await.is_err());
    assert_eq!(tracker.snapshot().usd, 0.0);

    assert!(tracker.set_local_currency("USD").await.is_err());
    assert_eq!(tracker.get_settings().local_currency, "EGP");

    assert!(changes.lock().unwrap().is_empty());

    flaky.set_failing(false);
    tracker.record_snapshot_at(rates(), ts(2)).await.unwrap();
    assert_eq!(tracker.history().len(), 2);
}

// ═══════════════════════════════════════════════════════════════════
// History observers
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_history_listener_sees_structural_changes() {
    let mut tracker = SavingsTracker::load(local()).await;
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    let sub = tracker.on_history_change(move |c| sink.lock().unwrap().push(c.clone()));

    let id = tracker.record_snapshot_at(rates(), ts(1)).await.unwrap();
    tracker.record_snapshot_at(rates(), ts(2)).await.unwrap();
    let removed = tracker.remove_history_entry(1).await.unwrap();
    tracker.clear_history().await.unwrap();

    {
        let seen = changes.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], HistoryChange::Appended { id });
        assert_eq!(seen[2], HistoryChange::Removed { index: 1, id: removed.id });
        assert_eq!(seen[3], HistoryChange::Cleared { count: 1 });
    }

    drop(sub);
    tracker.record_snapshot_at(rates(), ts(3)).await.unwrap();
    assert_eq!(changes.lock().unwrap().len(), 4);
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_local_currency_validation() {
    let mut tracker = SavingsTracker::load(local()).await;
    tracker.set_local_currency(" sar ").await.unwrap();
    assert_eq!(tracker.get_settings().local_currency, "SAR");

    for bad in ["EURO", "E1R", ""] {
        let err = tracker.set_local_currency(bad).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }
    assert_eq!(tracker.get_settings().local_currency, "SAR");
}

#[tokio::test]
async fn test_history_limit_evicts_oldest() {
    let mut tracker = SavingsTracker::load(local()).await;
    for day in 1..=4 {
        record_gold21(&mut tracker, day, day as f64).await;
    }

    tracker.set_history_limit(Some(2)).await.unwrap();
    assert_eq!(tracker.history().len(), 2);
    assert_eq!(tracker.history().baseline().unwrap().timestamp, ts(3));

    record_gold21(&mut tracker, 5, 5.0).await;
    assert_eq!(tracker.history().len(), 2);
    assert_eq!(tracker.history().baseline().unwrap().timestamp, ts(4));

    assert!(tracker.set_history_limit(Some(0)).await.is_err());

    tracker.set_history_limit(None).await.unwrap();
    record_gold21(&mut tracker, 6, 6.0).await;
    assert_eq!(tracker.history().len(), 3);
}

#[tokio::test]
async fn test_history_limit_unchanged_when_trim_write_fails() {
    let flaky = Arc::new(FlakyStore::new());
    let mut tracker = SavingsTracker::load(flaky.clone()).await;
    for day in 1..=3 {
        record_gold21(&mut tracker, day, day as f64).await;
    }

    flaky.fail_key(HISTORY_KEY);
    assert!(tracker.set_history_limit(Some(1)).await.is_err());
    assert_eq!(tracker.get_settings().history_limit, None);
    assert_eq!(tracker.history().len(), 3);

    tracker.reload().await;
    assert_eq!(tracker.get_settings().history_limit, None);
    assert_eq!(tracker.history().len(), 3);
}

#[tokio::test]
async fn test_history_limit_restores_log_when_settings_write_fails() {
    let flaky = Arc::new(FlakyStore::new());
    let mut tracker = SavingsTracker::load(flaky.clone()).await;
    for day in 1..=3 {
        record_gold21(&mut tracker, day, day as f64).await;
    }

    flaky.fail_key(SETTINGS_KEY);
    assert!(tracker.set_history_limit(Some(1)).await.is_err());
    assert_eq!(tracker.get_settings().history_limit, None);
    assert_eq!(tracker.history().len(), 3);

    tracker.reload().await;
    assert_eq!(tracker.get_settings().history_limit, None);
    assert_eq!(tracker.history().len(), 3);
}

#[tokio::test]
async fn test_history_limit_applies_to_loaded_log() {
    let store = Arc::new(LocalStore::in_memory("app"));
    {
        let mut tracker = SavingsTracker::load(store.clone()).await;
        for day in 1..=3 {
            record_gold21(&mut tracker, day, day as f64).await;
        }
    }
    let mut settings = Settings::default();
    settings.history_limit = Some(2);
    store.set(SETTINGS_KEY, &settings).unwrap();

    let tracker = SavingsTracker::load(store).await;
    assert_eq!(tracker.history().len(), 2);
    assert_eq!(tracker.history().newest().unwrap().timestamp, ts(3));
    assert_eq!(tracker.history().baseline().unwrap().timestamp, ts(2));
}

#[tokio::test]
async fn test_api_keys() {
    let mut tracker = SavingsTracker::load(local()).await;
    assert!(!tracker.rate_service().has_provider_for(RateKind::Gold24Gram));

    tracker.set_api_key("metals_dev", "secret").await.unwrap();
    assert_eq!(
        tracker.get_settings().api_keys.get("metals_dev").map(String::as_str),
        Some("secret")
    );
    assert!(tracker.rate_service().has_provider_for(RateKind::Gold24Gram));

    assert!(tracker.remove_api_key("metals_dev").await.unwrap());
    assert!(!tracker.remove_api_key("metals_dev").await.unwrap());
    assert!(!tracker.rate_service().has_provider_for(RateKind::Gold24Gram));
}

#[tokio::test]
async fn test_fetch_rates_with_custom_providers() {
    let mut tracker = SavingsTracker::load(local()).await;
    let mut registry = RateProviderRegistry::new();
    registry.register(Box::new(OfflineRates));
    tracker.use_rate_providers(registry);

    let fetched = tracker.fetch_rates().await.unwrap();
    assert_eq!(fetched.usd, 48.0);
    assert_eq!(fetched.gold24, 4000.0);
    assert_eq!(fetched.source.as_deref(), Some("offline + offline"));
}

// ═══════════════════════════════════════════════════════════════════
// Cloud store and remote sync
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_signed_out_cloud_needs_sign_in() {
    let backend = Arc::new(MemoryDocumentBackend::new());
    let auth = AuthSession::new();
    let mut tracker = SavingsTracker::load(cloud_for(&backend, auth.clone())).await;

    assert!(tracker.needs_sign_in());
    assert!(tracker.history().is_empty());
    assert!(tracker.watch_remote().is_none());

    let err = tracker.record_snapshot(rates()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));
    assert!(tracker.history().is_empty());

    auth.sign_in(Identity::new("u1"));
    tracker.reload().await;
    assert!(!tracker.needs_sign_in());
    tracker.record_snapshot(rates()).await.unwrap();
    assert_eq!(backend.document_count(), 1);
}

#[tokio::test]
async fn test_cloud_round_trip_between_devices() {
    let backend = Arc::new(MemoryDocumentBackend::new());
    let mut phone =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u1")))).await;
    record_gold21(&mut phone, 1, 4.0).await;

    let laptop =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u1")))).await;
    assert_eq!(laptop.history().len(), 1);
    assert_eq!(laptop.snapshot().gold21, 4.0);

    let stranger =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u2")))).await;
    assert!(stranger.history().is_empty());
}

#[tokio::test]
async fn test_remote_push_is_applied() {
    let backend = Arc::new(MemoryDocumentBackend::new());
    let mut phone =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u1")))).await;
    let mut laptop =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u1")))).await;

    let replaced = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&replaced);
    let _sub = laptop.on_history_change(move |c| {
        if *c == HistoryChange::Replaced {
            *sink.lock().unwrap() += 1;
        }
    });

    let feed = laptop.watch_remote().unwrap();
    assert!(!feed.has_pending());

    record_gold21(&mut phone, 1, 3.0).await;
    record_gold21(&mut phone, 2, 5.0).await;
    assert!(feed.has_pending());

    assert_eq!(laptop.apply_remote(&feed), 2);
    assert!(!feed.has_pending());
    assert_eq!(laptop.history().len(), 2);
    assert_eq!(laptop.snapshot().gold21, 5.0);
    assert_eq!(*replaced.lock().unwrap(), 1);

    assert_eq!(laptop.apply_remote(&feed), 0);
}

#[tokio::test]
async fn test_last_push_wins_over_local_edit() {
    let backend = Arc::new(MemoryDocumentBackend::new());
    let mut phone =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u1")))).await;
    let mut laptop =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u1")))).await;
    let feed = laptop.watch_remote().unwrap();

    let local_edit = laptop.snapshot().with(Denomination::Usd, 10.0);
    laptop.set_snapshot(local_edit).await.unwrap();

    let remote_edit = phone.snapshot().with(Denomination::Usd, 20.0);
    phone.set_snapshot(remote_edit).await.unwrap();

    laptop.apply_remote(&feed);
    assert_eq!(laptop.snapshot().usd, 20.0);
}

#[tokio::test]
async fn test_pushed_history_respects_local_limit() {
    let backend = Arc::new(MemoryDocumentBackend::new());
    let mut phone =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u1")))).await;
    let mut laptop =
        SavingsTracker::load(cloud_for(&backend, AuthSession::signed_in(Identity::new("u1")))).await;
    laptop.set_history_limit(Some(2)).await.unwrap();
    let feed = laptop.watch_remote().unwrap();

    for day in 1..=3 {
        record_gold21(&mut phone, day, day as f64).await;
    }
    assert_eq!(phone.history().len(), 3);

    laptop.apply_remote(&feed);
    assert_eq!(laptop.get_settings().history_limit, Some(2));
    assert_eq!(laptop.history().len(), 2);
    assert_eq!(laptop.history().newest().unwrap().timestamp, ts(3));
}

#[tokio::test]
async fn test_local_store_has_no_remote_feed() {
    let tracker = SavingsTracker::load(local()).await;
    assert!(tracker.watch_remote().is_none());
}

// ═══════════════════════════════════════════════════════════════════
// Export and display
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_export_csv() {
    let mut tracker = SavingsTracker::load(local()).await;
    record_gold21(&mut tracker, 1, 2.0).await;
    record_gold21(&mut tracker, 2, 3.0).await;

    let csv = tracker.export_history_to_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "id,timestamp,usd,egp,gold18,gold21,gold24,usd_rate,gold24_rate,total"
    );
    assert_eq!(lines.len(), 3);
    let newest = tracker.history().newest().unwrap();
    assert!(lines[1].starts_with(&newest.id.to_string()));
    assert!(lines[1].contains(&ts(2).to_rfc3339()));
}

#[tokio::test]
async fn test_export_json_is_newest_first_array() {
    let mut tracker = SavingsTracker::load(local()).await;
    record_gold21(&mut tracker, 1, 2.0).await;
    record_gold21(&mut tracker, 2, 3.0).await;

    let json = tracker.export_history_to_json().unwrap();
    let parsed: Value = serde_json::from_str(&json).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["amounts"]["gold21"], 3.0);
}

#[tokio::test]
async fn test_totals_chart_and_display() {
    let mut tracker = SavingsTracker::load(local()).await;
    record_gold21(&mut tracker, 1, 1.0).await;
    record_gold21(&mut tracker, 2, 1.0).await;

    let chart = tracker.totals_chart();
    assert_eq!(chart.len(), 2);
    assert_eq!(chart[0].timestamp, ts(1));
    assert_eq!(chart[1].trend, Trend::Flat);

    assert_eq!(format_number(Some(tracker.snapshot().usd)), "-");
    assert_eq!(format_number(None), "-");
    assert_eq!(format_number(Some(chart[1].total)), "3,675.00");
}
