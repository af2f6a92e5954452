//! Affiliate performance counters.
//!
//! Clicks, impressions, conversions, and revenue are tallied in memory and
//! written through to a [`KvStore`] after every change, under the single key
//! [`COUNTERS_KEY`] as a JSON object:
//!
//! ```json
//! {"clicks": 3, "impressions": 24, "conversions": 1, "revenue": 89.99}
//! ```
//!
//! Loading merges whatever is stored over zero defaults. A missing key is
//! normal; an unreadable or corrupt value is logged and replaced by the
//! defaults. Storage failures never reach the caller.

use serde::{Deserialize, Serialize};

use crate::store::KvStore;

/// Storage key for the serialized counters.
pub const COUNTERS_KEY: &str = "amazonAffiliatePerformance";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceCounters {
    pub clicks: u64,
    pub impressions: u64,
    pub conversions: u64,
    pub revenue: f64,
}

/// Counters plus derived ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    #[serde(flatten)]
    pub counters: PerformanceCounters,
    /// Clicks per impression.
    pub ctr: f64,
    /// Conversions per click.
    pub conversion_rate: f64,
    pub revenue_per_click: f64,
}

impl PerformanceCounters {
    /// Derive ratios. Zero denominators are treated as one.
    pub fn report(&self) -> PerformanceReport {
        let impressions = self.impressions.max(1) as f64;
        let clicks = self.clicks.max(1) as f64;
        PerformanceReport {
            counters: *self,
            ctr: self.clicks as f64 / impressions,
            conversion_rate: self.conversions as f64 / clicks,
            revenue_per_click: self.revenue / clicks,
        }
    }
}

/// Tracks affiliate activity and persists it after each event.
#[derive(Debug)]
pub struct PerformanceTracker<S: KvStore> {
    store: S,
    counters: PerformanceCounters,
}

impl<S: KvStore> PerformanceTracker<S> {
    /// Load counters from `store`, falling back to zeros.
    pub fn load(store: S) -> Self {
        let counters = match store.get(COUNTERS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<PerformanceCounters>(&raw) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(error = %e, "could not parse affiliate performance data; using defaults");
                    PerformanceCounters::default()
                }
            },
            Ok(None) => PerformanceCounters::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not load affiliate performance data; using defaults");
                PerformanceCounters::default()
            }
        };
        Self { store, counters }
    }

    pub fn counters(&self) -> PerformanceCounters {
        self.counters
    }

    /// Current counters with derived ratios.
    pub fn snapshot(&self) -> PerformanceReport {
        self.counters.report()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record_click(&mut self, product_id: &str) {
        self.counters.clicks += 1;
        tracing::info!(product_id, "affiliate click tracked");
        self.save();
    }

    /// Count `count` products shown to the user.
    pub fn record_impression(&mut self, count: u64) {
        self.counters.impressions += count;
        self.save();
    }

    /// Record a purchase. Non-finite amounts are ignored.
    pub fn record_conversion(&mut self, product_id: &str, amount: f64) {
        if !amount.is_finite() {
            tracing::warn!(product_id, amount, "ignoring conversion with non-finite amount");
            return;
        }
        self.counters.conversions += 1;
        self.counters.revenue += amount;
        tracing::info!(product_id, amount, "affiliate conversion tracked");
        self.save();
    }

    /// A single product card scrolled into view. Logged only; not counted.
    pub fn record_product_view(&self, product_id: &str) {
        tracing::debug!(product_id, "affiliate product viewed");
    }

    fn save(&self) {
        let result = serde_json::to_string(&self.counters)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(COUNTERS_KEY, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "could not save affiliate performance data");
        }
    }
}
