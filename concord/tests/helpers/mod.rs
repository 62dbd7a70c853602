#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use concord::{Concord, ConcordBuilder, RawObservation, SeriesProvider};
use concord_mock::{DynamicMockController, DynamicMockProvider, MockProvider, fixtures};

// ---------- Lightweight fixtures and helpers for tests ----------

/// Common identifiers used across tests.
pub const BODY_WEIGHT: &str = "body_weight";
pub const RESTING_HR: &str = "resting_hr";
pub const SCALE: &str = "scale_api";
pub const WEARABLE: &str = "wearable_api";
pub const MANUAL: &str = "manual";

/// Short provider timeout so hanging mocks fail fast.
pub const FAST: Duration = Duration::from_millis(50);

/// Construct a `NaiveDate` from components for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("invalid date")
}

/// Fixture-backed provider for `source`.
pub fn fixture(source: &str) -> Arc<dyn SeriesProvider> {
    Arc::new(MockProvider::new(source))
}

/// Builder preloaded with the fixture catalog and a fast provider timeout.
pub fn builder() -> ConcordBuilder {
    Concord::builder()
        .with_catalog(fixtures::catalog())
        .provider_timeout(FAST)
}

/// Orchestrator with every body-weight fixture provider registered.
pub fn body_weight_concord() -> Concord {
    builder()
        .with_provider(fixture(SCALE))
        .with_provider(fixture(WEARABLE))
        .with_provider(fixture(MANUAL))
        .build()
        .expect("fixture orchestrator builds")
}

/// Scriptable provider for `source` plus its controller.
pub fn scripted(source: &str) -> (Arc<dyn SeriesProvider>, DynamicMockController) {
    let (p, ctl) = DynamicMockProvider::new_with_controller(source);
    (p as Arc<dyn SeriesProvider>, ctl)
}

/// `n` consecutive daily observations starting 2024-01-01.
pub fn daily(source: &str, values: &[f64]) -> Vec<RawObservation> {
    values
        .iter()
        .zip(0u64..)
        .map(|(&v, i)| RawObservation::new(source, d(2024, 1, 1) + chrono::Days::new(i), v))
        .collect()
}
