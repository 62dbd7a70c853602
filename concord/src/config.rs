use std::time::Duration;

/// Default per-provider timeout.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);
/// Default number of cached correlation reports.
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;
/// Default lifetime of a cached correlation report.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Runtime settings for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcordConfig {
    /// Upper bound on each provider call.
    pub provider_timeout: Duration,
    /// Upper bound on the whole fan-out, if any.
    pub request_timeout: Option<Duration>,
    /// Maximum number of cached correlation reports.
    pub cache_capacity: u64,
    /// Time a cached report stays valid.
    pub cache_ttl: Duration,
}

impl Default for ConcordConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            request_timeout: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}
