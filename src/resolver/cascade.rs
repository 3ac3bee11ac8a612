//! Cascade driver: local store first, then remote services in order

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
#[cfg(feature = "remote")]
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use super::local::LocalSource;
use super::registry::RemoteEndpoints;
use super::BinSource;
use crate::error::BinForgeError;
use crate::store::RecordStore;
use crate::types::{
    BinLookup, LookupTier, MetricsSnapshot, ResolvedBinInfo, ResolverConfig, ResolverMetrics,
    TierOutcome,
};

/// Resolves BIN prefixes through an ordered list of sources.
///
/// Tiers run strictly one after another and the first hit wins. Each remote
/// tier gets its own timeout; when it expires the request future is dropped,
/// which aborts the connection.
pub struct BinResolver {
    config: ResolverConfig,
    sources: Vec<Arc<dyn BinSource>>,
    semaphore: Arc<Semaphore>,
    metrics: Arc<ResolverMetrics>,
}

impl BinResolver {
    /// Local store plus the default remote endpoints
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self::with_config(store, ResolverConfig::default(), RemoteEndpoints::default())
    }

    /// Local store plus whichever remote tiers `config` and `endpoints` enable
    pub fn with_config(
        store: Arc<RecordStore>,
        config: ResolverConfig,
        endpoints: RemoteEndpoints,
    ) -> Self {
        let mut sources: Vec<Arc<dyn BinSource>> = Vec::new();
        sources.push(Arc::new(LocalSource::new(store)));

        #[cfg(feature = "remote")]
        {
            let client = Client::builder()
                .timeout(config.tier_timeout)
                .user_agent(config.user_agent.as_str())
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!("Failed to create HTTP client: {}. Using default.", e);
                    Client::new()
                });

            if config.enable_binlist {
                sources.push(Arc::new(super::BinlistSource::new(
                    client.clone(),
                    endpoints.binlist_base_url.clone(),
                )));
            }

            match (&endpoints.bintable_api_key, config.enable_bintable) {
                (Some(key), true) => sources.push(Arc::new(super::BintableSource::new(
                    client,
                    endpoints.bintable_base_url.clone(),
                    key.clone(),
                ))),
                (None, true) => {
                    tracing::debug!("No bintable API key configured; tier 3 disabled")
                }
                _ => {}
            }
        }

        #[cfg(not(feature = "remote"))]
        let _ = &endpoints;

        Self::with_sources(config, sources)
    }

    /// Use an explicit, ordered list of sources
    pub fn with_sources(config: ResolverConfig, sources: Vec<Arc<dyn BinSource>>) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.concurrent_lookups.max(1)));
        Self {
            config,
            sources,
            semaphore,
            metrics: Arc::new(ResolverMetrics::new()),
        }
    }

    /// Resolve a prefix; an empty result means every tier missed or failed.
    pub async fn resolve(&self, prefix: &str) -> ResolvedBinInfo {
        self.resolve_detailed(prefix).await.info
    }

    /// Resolve a prefix and report which tier answered
    pub async fn resolve_detailed(&self, prefix: &str) -> BinLookup {
        let start = Instant::now();

        for source in &self.sources {
            let tier = source.tier();
            match self.run_tier(source.as_ref(), prefix).await {
                TierOutcome::Hit(info) => {
                    let duration = start.elapsed();
                    self.metrics.record_lookup(tier, duration);
                    tracing::debug!(
                        bin = %prefix,
                        tier = %tier,
                        duration_ms = %duration.as_millis(),
                        "BIN resolved"
                    );
                    return BinLookup {
                        prefix: prefix.to_string(),
                        info,
                        tier,
                        resolved_at: Utc::now(),
                        duration,
                    };
                }
                TierOutcome::Miss => {
                    tracing::debug!(bin = %prefix, tier = %tier, "BIN not found in tier");
                }
                TierOutcome::Unavailable(reason) => {
                    self.metrics.record_unavailable();
                    tracing::debug!(bin = %prefix, tier = %tier, reason = %reason, "BIN tier unavailable");
                }
            }
        }

        let duration = start.elapsed();
        self.metrics.record_lookup(LookupTier::None, duration);
        tracing::warn!(
            bin = %prefix,
            duration_ms = %duration.as_millis(),
            "All BIN lookup tiers missed"
        );

        BinLookup {
            prefix: prefix.to_string(),
            info: ResolvedBinInfo::default(),
            tier: LookupTier::None,
            resolved_at: Utc::now(),
            duration,
        }
    }

    /// Resolve several prefixes concurrently, preserving input order
    pub async fn resolve_many(&self, prefixes: &[String]) -> Vec<BinLookup> {
        let batch_start = Instant::now();
        let futures = prefixes.iter().map(|prefix| async move {
            // The semaphore is never closed, so acquire only fails after drop.
            let _permit = self.semaphore.acquire().await.ok();
            self.resolve_detailed(prefix).await
        });
        let results = join_all(futures).await;

        tracing::info!(
            requested = prefixes.len(),
            resolved = results.iter().filter(|r| r.is_resolved()).count(),
            batch_duration_ms = %batch_start.elapsed().as_millis(),
            "Batch BIN resolution completed"
        );

        results
    }

    async fn run_tier(&self, source: &dyn BinSource, prefix: &str) -> TierOutcome {
        if !source.is_remote() {
            return source.lookup(prefix).await;
        }

        match timeout(self.config.tier_timeout, source.lookup(prefix)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let err = BinForgeError::timeout(
                    format!("{} lookup", source.tier()),
                    self.config.tier_timeout.as_millis() as u64,
                );
                TierOutcome::Unavailable(err.to_string())
            }
        }
    }

    /// Tiers in the order they are tried
    pub fn tiers(&self) -> Vec<LookupTier> {
        self.sources.iter().map(|s| s.tier()).collect()
    }

    pub fn get_metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
