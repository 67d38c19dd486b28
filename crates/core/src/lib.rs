pub mod display;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use models::{
    chart::ChartDataPoint,
    delta::{DeltaGroup, ReferencePolicy, Trend},
    history::{HistoryChange, HistoryLog, RateEntry},
    rates::Rates,
    settings::{Settings, HISTORY_KEY, SETTINGS_KEY, SNAPSHOT_KEY},
    snapshot::{Denomination, Snapshot},
};
use providers::registry::RateProviderRegistry;
use serde_json::Value;
use services::{
    chart_service::ChartService, delta_service::DeltaService, rate_service::RateService,
    valuation_service::ValuationService,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use storage::{
    record::{parse_record, read_record, write_record},
    subscription::{Listeners, Subscription},
    traits::RecordStore,
};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the savings ledger core library.
///
/// Owns the snapshot being edited, the history log and the settings, and
/// is the only place they are mutated. Every mutation is written to the
/// store before it is applied in memory: if the write fails the tracker
/// keeps its previous state and the error is returned.
#[must_use]
pub struct SavingsTracker {
    snapshot: Snapshot,
    history: HistoryLog,
    settings: Settings,
    store: Arc<dyn RecordStore>,
    rate_service: RateService,
    valuation_service: ValuationService,
    delta_service: DeltaService,
    chart_service: ChartService,
    history_listeners: Listeners<HistoryChange>,
    /// Set when the last load found the store waiting for a sign-in.
    needs_sign_in: bool,
}

impl std::fmt::Debug for SavingsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavingsTracker")
            .field("store", &self.store.name())
            .field("snapshot", &self.snapshot)
            .field("history", &self.history.len())
            .field("settings", &self.settings)
            .field("needs_sign_in", &self.needs_sign_in)
            .finish()
    }
}

/// Latest values pushed by a subscribing store, one per record key.
///
/// Later pushes overwrite earlier ones that have not been applied yet, so
/// whichever push arrives last wins.
pub struct RemoteFeed {
    pending: Arc<Mutex<HashMap<String, Value>>>,
    _subscriptions: Vec<Subscription>,
}

impl RemoteFeed {
    pub fn has_pending(&self) -> bool {
        !lock(&self.pending).is_empty()
    }

    fn drain(&self) -> HashMap<String, Value> {
        std::mem::take(&mut *lock(&self.pending))
    }
}

impl std::fmt::Debug for RemoteFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFeed")
            .field("pending", &lock(&self.pending).len())
            .finish()
    }
}

impl SavingsTracker {
    /// Load all records from `store`. Never fails: unreadable or missing
    /// records fall back to their defaults.
    pub async fn load(store: Arc<dyn RecordStore>) -> Self {
        let mut tracker = Self::build(store, Settings::default());
        tracker.reload().await;
        tracker
    }

    /// Re-read every record from the store, replacing in-memory state.
    pub async fn reload(&mut self) {
        let store = Arc::clone(&self.store);
        let snapshot = read_record(store.as_ref(), SNAPSHOT_KEY, Snapshot::default()).await;
        let history = read_record(store.as_ref(), HISTORY_KEY, HistoryLog::new()).await;
        let settings = read_record(store.as_ref(), SETTINGS_KEY, Settings::default()).await;

        self.needs_sign_in =
            snapshot.needs_sign_in() || history.needs_sign_in() || settings.needs_sign_in();
        self.snapshot = snapshot.into_value();
        self.apply_settings(settings.into_value());
        self.adopt_history(history.into_value());
    }

    /// `true` when the last load could not read because nobody is signed in.
    #[must_use]
    pub fn needs_sign_in(&self) -> bool {
        self.needs_sign_in
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    // ── Snapshot ────────────────────────────────────────────────────

    /// The snapshot currently being edited.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Replace the edited snapshot. Does not touch the history log.
    pub async fn set_snapshot(&mut self, snapshot: Snapshot) -> Result<(), CoreError> {
        snapshot.validate()?;
        write_record(self.store.as_ref(), SNAPSHOT_KEY, &snapshot).await?;
        self.snapshot = snapshot;
        Ok(())
    }

    /// Value of the edited snapshot at `rates`.
    #[must_use]
    pub fn valuate(&self, rates: &Rates) -> f64 {
        self.valuation_service.valuate(&self.snapshot, rates)
    }

    /// Per-denomination contributions to `valuate`.
    #[must_use]
    pub fn valuation_breakdown(&self, rates: &Rates) -> Vec<(Denomination, f64)> {
        self.valuation_service.breakdown(&self.snapshot, rates)
    }

    // ── Rates ───────────────────────────────────────────────────────

    /// Fetch current rates in the local currency from the providers.
    pub async fn fetch_rates(&self) -> Result<Rates, CoreError> {
        self.rate_service
            .fetch_rates(&self.settings.local_currency)
            .await
    }

    /// Replace the provider registry (custom or offline providers).
    pub fn use_rate_providers(&mut self, registry: RateProviderRegistry) {
        self.rate_service = RateService::new(registry);
    }

    #[must_use]
    pub fn rate_service(&self) -> &RateService {
        &self.rate_service
    }

    // ── History ─────────────────────────────────────────────────────

    /// Record the edited snapshot at `rates`, timestamped now.
    pub async fn record_snapshot(&mut self, rates: Rates) -> Result<Uuid, CoreError> {
        self.record_snapshot_at(rates, Utc::now()).await
    }

    /// Record the edited snapshot at `rates` with an explicit timestamp.
    /// The entry goes to the head of the log regardless of its timestamp.
    pub async fn record_snapshot_at(
        &mut self,
        rates: Rates,
        timestamp: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        self.snapshot.validate()?;
        let total = self.valuation_service.valuate(&self.snapshot, &rates);
        let entry = RateEntry::new(timestamp, self.snapshot, rates, total);
        let id = entry.id;

        let mut next = self.history.clone();
        next.append(entry);
        if let Some(limit) = self.settings.history_limit {
            let evicted = next.truncate_to(limit);
            if !evicted.is_empty() {
                log::debug!("history limit {limit} evicted {} old entries", evicted.len());
            }
        }

        self.commit_history(next, HistoryChange::Appended { id })
            .await?;
        Ok(id)
    }

    /// Remove the entry at `index` (0 = newest). Older entries shift down.
    pub async fn remove_history_entry(&mut self, index: usize) -> Result<RateEntry, CoreError> {
        let mut next = self.history.clone();
        let removed = next.remove(index)?;
        let id = removed.id;
        self.commit_history(next, HistoryChange::Removed { index, id })
            .await?;
        Ok(removed)
    }

    /// Remove an entry by identity, wherever it currently sits.
    pub async fn remove_history_entry_by_id(&mut self, id: Uuid) -> Result<RateEntry, CoreError> {
        let index = self
            .history
            .position(id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))?;
        self.remove_history_entry(index).await
    }

    /// Drop every history entry. Returns how many were removed.
    pub async fn clear_history(&mut self) -> Result<usize, CoreError> {
        let count = self.history.len();
        self.commit_history(HistoryLog::new(), HistoryChange::Cleared { count })
            .await?;
        Ok(count)
    }

    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Register a callback for every structural change to the history.
    pub fn on_history_change(
        &self,
        callback: impl Fn(&HistoryChange) + Send + Sync + 'static,
    ) -> Subscription {
        self.history_listeners.add(Arc::new(callback))
    }

    // ── Derived views ───────────────────────────────────────────────

    /// Quantity changes per denomination under `policy`.
    #[must_use]
    pub fn deltas(&self, policy: ReferencePolicy) -> Vec<DeltaGroup> {
        self.delta_service.compute(&self.history, policy)
    }

    /// Recorded totals, oldest first.
    #[must_use]
    pub fn totals_chart(&self) -> Vec<ChartDataPoint> {
        self.chart_service.totals_over_time(&self.history)
    }

    /// Direction of the newest total against the one before it.
    #[must_use]
    pub fn latest_trend(&self) -> Trend {
        match self.history.newest() {
            Some(newest) => self
                .delta_service
                .trend(newest.total, self.history.get(1).map(|e| e.total)),
            None => Trend::Unknown,
        }
    }

    // ── Remote sync ─────────────────────────────────────────────────

    /// Subscribe to pushed changes of every record. Returns `None` when the
    /// store has no push support or nobody is signed in.
    pub fn watch_remote(&self) -> Option<RemoteFeed> {
        let pending: Arc<Mutex<HashMap<String, Value>>> = Arc::default();
        let mut subscriptions = Vec::with_capacity(3);

        for key in [SNAPSHOT_KEY, HISTORY_KEY, SETTINGS_KEY] {
            let sink = Arc::clone(&pending);
            let owned_key = key.to_string();
            let subscription = self.store.subscribe(
                key,
                Arc::new(move |value: &Value| {
                    lock(&sink).insert(owned_key.clone(), value.clone());
                }),
            )?;
            subscriptions.push(subscription);
        }

        Some(RemoteFeed {
            pending,
            _subscriptions: subscriptions,
        })
    }

    /// Replace local records with the latest pushed values. The pushed
    /// value wins over anything set locally in the meantime. Returns how
    /// many records were applied.
    pub fn apply_remote(&mut self, feed: &RemoteFeed) -> usize {
        let mut updates = feed.drain();
        let count = updates.len();

        // Settings first, so a pushed history limit applies to a pushed log.
        if let Some(value) = updates.remove(SETTINGS_KEY) {
            let settings = parse_record(SETTINGS_KEY, &value, Settings::default());
            self.apply_settings(settings);
        }
        if let Some(value) = updates.remove(SNAPSHOT_KEY) {
            self.snapshot = parse_record(SNAPSHOT_KEY, &value, Snapshot::default());
        }
        let history = match updates.remove(HISTORY_KEY) {
            Some(value) => parse_record(HISTORY_KEY, &value, HistoryLog::new()),
            None => self.history.clone(),
        };
        self.adopt_history(history);

        for other in updates.keys() {
            log::debug!("ignoring pushed record '{other}'");
        }

        if count > 0 {
            self.needs_sign_in = false;
        }
        count
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Set the local currency (e.g., "EGP"). Must be 3 ASCII letters.
    pub async fn set_local_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., EGP, USD)"
            )));
        }
        let mut next = self.settings.clone();
        next.local_currency = trimmed;
        self.commit_settings(next).await
    }

    /// Cap the history at `limit` entries (`None` = unbounded). Entries
    /// beyond a new cap are evicted immediately, oldest first.
    pub async fn set_history_limit(&mut self, limit: Option<usize>) -> Result<(), CoreError> {
        if limit == Some(0) {
            return Err(CoreError::ValidationError(
                "History limit must be at least 1".into(),
            ));
        }

        let mut next = self.settings.clone();
        next.history_limit = limit;

        // Trim before saving the limit: a saved limit is always in force.
        let previous = match limit {
            Some(limit) if self.history.len() > limit => {
                let previous = self.history.clone();
                let mut trimmed = previous.clone();
                let evicted = trimmed.truncate_to(limit);
                self.commit_history(trimmed, HistoryChange::Replaced).await?;
                log::debug!("history limit {limit} evicted {} old entries", evicted.len());
                Some(previous)
            }
            _ => None,
        };

        if let Err(e) = self.commit_settings(next).await {
            if let Some(previous) = previous {
                if let Err(restore) = self.commit_history(previous, HistoryChange::Replaced).await {
                    log::warn!("could not restore history after failed settings write: {restore}");
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Set an API key for a provider (e.g., "metals_dev").
    /// Rebuilds the provider registry so the new key takes effect immediately.
    pub async fn set_api_key(&mut self, provider: &str, key: &str) -> Result<(), CoreError> {
        let mut next = self.settings.clone();
        next.api_keys.insert(provider.to_string(), key.to_string());
        self.commit_settings(next).await
    }

    /// Remove an API key for a provider. Returns whether one was set.
    pub async fn remove_api_key(&mut self, provider: &str) -> Result<bool, CoreError> {
        if !self.settings.api_keys.contains_key(provider) {
            return Ok(false);
        }
        let mut next = self.settings.clone();
        next.api_keys.remove(provider);
        self.commit_settings(next).await?;
        Ok(true)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export the history log (newest first) as a JSON string.
    pub fn export_history_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.history)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize history to JSON: {e}")))
    }

    /// Export the history log (newest first) as a CSV string.
    /// Columns: id, timestamp, usd, egp, gold18, gold21, gold24, usd_rate, gold24_rate, total
    #[must_use]
    pub fn export_history_to_csv(&self) -> String {
        let mut csv = String::from("id,timestamp");
        for denomination in Denomination::ALL {
            csv.push(',');
            csv.push_str(denomination.key());
        }
        csv.push_str(",usd_rate,gold24_rate,total\n");

        for entry in &self.history {
            csv.push_str(&format!("{},{}", entry.id, entry.timestamp.to_rfc3339()));
            for denomination in Denomination::ALL {
                csv.push_str(&format!(",{}", entry.amounts.get(denomination)));
            }
            csv.push_str(&format!(
                ",{},{},{}\n",
                entry.rates.usd, entry.rates.gold24, entry.total
            ));
        }
        csv
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(store: Arc<dyn RecordStore>, settings: Settings) -> Self {
        let registry = RateProviderRegistry::new_with_defaults(&settings.api_keys);
        Self {
            snapshot: Snapshot::default(),
            history: HistoryLog::new(),
            settings,
            store,
            rate_service: RateService::new(registry),
            valuation_service: ValuationService::new(),
            delta_service: DeltaService::new(),
            chart_service: ChartService::new(),
            history_listeners: Listeners::new(),
            needs_sign_in: false,
        }
    }

    /// Persist `next` as the history, then adopt it and notify observers.
    async fn commit_history(
        &mut self,
        next: HistoryLog,
        change: HistoryChange,
    ) -> Result<(), CoreError> {
        write_record(self.store.as_ref(), HISTORY_KEY, &next).await?;
        self.history = next;
        log::debug!("history {change:?}, {} entries", self.history.len());
        self.history_listeners.notify(&change);
        Ok(())
    }

    /// Adopt a log read from the store or pushed by another device. The
    /// history limit is applied in memory only; the stored log shrinks on
    /// the next local history write.
    fn adopt_history(&mut self, mut history: HistoryLog) {
        if let Some(limit) = self.settings.history_limit {
            let evicted = history.truncate_to(limit);
            if !evicted.is_empty() {
                log::debug!("history limit {limit} hid {} old entries", evicted.len());
            }
        }
        if history != self.history {
            self.history = history;
            self.history_listeners.notify(&HistoryChange::Replaced);
        }
    }

    async fn commit_settings(&mut self, next: Settings) -> Result<(), CoreError> {
        write_record(self.store.as_ref(), SETTINGS_KEY, &next).await?;
        self.apply_settings(next);
        Ok(())
    }

    /// Adopt `settings`, rebuilding the provider registry if keys changed.
    fn apply_settings(&mut self, settings: Settings) {
        if settings.api_keys != self.settings.api_keys {
            let registry = RateProviderRegistry::new_with_defaults(&settings.api_keys);
            self.rate_service = RateService::new(registry);
        }
        self.settings = settings;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
