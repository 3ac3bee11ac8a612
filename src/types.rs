//! Core types and structures for bin-forge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Placeholder stored for descriptive fields the import did not provide,
/// and substituted for absent fields when a result is displayed.
pub const UNKNOWN: &str = "unknown";

/// Placeholder for a missing 2-letter country code.
pub const UNKNOWN_COUNTRY_CODE: &str = "??";

/// One known BIN prefix and its issuer metadata.
///
/// Records come from the bulk import and are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinRecord {
    pub prefix: String,
    pub bank: String,
    pub brand: String,
    pub card_type: String,
    pub level: String,
    pub country_name: String,
    pub country_code: String,
}

/// Normalized answer from whichever tier resolved a BIN.
///
/// Fields stay `None` until presentation; use the `*_or_unknown` accessors
/// when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBinInfo {
    pub bank: Option<String>,
    pub brand: Option<String>,
    pub card_type: Option<String>,
    pub level: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

impl ResolvedBinInfo {
    /// True when no tier contributed any field
    pub fn is_empty(&self) -> bool {
        self.bank.is_none()
            && self.brand.is_none()
            && self.card_type.is_none()
            && self.level.is_none()
            && self.country.is_none()
            && self.country_code.is_none()
    }

    pub fn bank_or_unknown(&self) -> &str {
        self.bank.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn brand_or_unknown(&self) -> &str {
        self.brand.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn card_type_or_unknown(&self) -> &str {
        self.card_type.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn level_or_unknown(&self) -> &str {
        self.level.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn country_or_unknown(&self) -> &str {
        self.country.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn country_code_or_unknown(&self) -> &str {
        self.country_code.as_deref().unwrap_or(UNKNOWN_COUNTRY_CODE)
    }

    /// Regional-indicator flag for the country code, if it is two ASCII letters.
    pub fn country_flag(&self) -> Option<String> {
        let code = self.country_code.as_deref()?;
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        code.to_ascii_uppercase()
            .chars()
            .map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
            .collect()
    }
}

impl From<&BinRecord> for ResolvedBinInfo {
    fn from(record: &BinRecord) -> Self {
        Self {
            bank: Some(record.bank.clone()),
            brand: Some(record.brand.clone()),
            card_type: Some(record.card_type.clone()),
            level: Some(record.level.clone()),
            country: Some(record.country_name.clone()),
            country_code: Some(record.country_code.clone()),
        }
    }
}

/// A synthesized, Luhn-valid card number with expiry and CVV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCandidate {
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

impl std::fmt::Display for CardCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.number, self.expiry_month, self.expiry_year, self.cvv
        )
    }
}

/// Resolution tier that produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupTier {
    Local,
    Binlist,
    Bintable,
    None,
}

impl std::fmt::Display for LookupTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupTier::Local => write!(f, "local"),
            LookupTier::Binlist => write!(f, "binlist"),
            LookupTier::Bintable => write!(f, "bintable"),
            LookupTier::None => write!(f, "none"),
        }
    }
}

/// What a single tier reported for a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierOutcome {
    Hit(ResolvedBinInfo),
    Miss,
    Unavailable(String),
}

/// Full result of a cascade run, with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinLookup {
    pub prefix: String,
    pub info: ResolvedBinInfo,
    pub tier: LookupTier,
    pub resolved_at: DateTime<Utc>,
    pub duration: Duration,
}

impl BinLookup {
    pub fn is_resolved(&self) -> bool {
        self.tier != LookupTier::None
    }
}

/// Configuration for BIN resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Budget for each remote tier, applied independently
    pub tier_timeout: Duration,
    pub concurrent_lookups: usize,
    pub enable_binlist: bool,
    pub enable_bintable: bool,
    pub user_agent: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tier_timeout: Duration::from_millis(3000),
            concurrent_lookups: 8,
            enable_binlist: true,
            enable_bintable: true,
            user_agent: concat!("bin-forge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Configuration for card synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Total number of digits in a generated card number
    pub total_length: usize,
    /// Cards produced per generation request
    pub batch_size: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            total_length: 16,
            batch_size: 10,
        }
    }
}

/// Counters for the resolver cascade
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    lookups: AtomicU64,
    local_hits: AtomicU64,
    remote_hits: AtomicU64,
    tiers_unavailable: AtomicU64,
    exhausted: AtomicU64,
    total_lookup_time_ms: AtomicU64,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self, tier: LookupTier, duration: Duration) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.total_lookup_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
        match tier {
            LookupTier::Local => self.local_hits.fetch_add(1, Ordering::Relaxed),
            LookupTier::Binlist | LookupTier::Bintable => {
                self.remote_hits.fetch_add(1, Ordering::Relaxed)
            }
            LookupTier::None => self.exhausted.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_unavailable(&self) {
        self.tiers_unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            local_hits: self.local_hits.load(Ordering::Relaxed),
            remote_hits: self.remote_hits.load(Ordering::Relaxed),
            tiers_unavailable: self.tiers_unavailable.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            total_lookup_time_ms: self.total_lookup_time_ms.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ResolverMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub lookups: u64,
    pub local_hits: u64,
    pub remote_hits: u64,
    pub tiers_unavailable: u64,
    pub exhausted: u64,
    pub total_lookup_time_ms: u64,
}

impl MetricsSnapshot {
    pub fn avg_lookup_time_ms(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.total_lookup_time_ms as f64 / self.lookups as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_applied_only_on_display() {
        let info = ResolvedBinInfo {
            bank: Some("ACME BANK".to_string()),
            ..Default::default()
        };
        assert_eq!(info.brand, None);
        assert_eq!(info.bank_or_unknown(), "ACME BANK");
        assert_eq!(info.brand_or_unknown(), UNKNOWN);
        assert_eq!(info.country_code_or_unknown(), UNKNOWN_COUNTRY_CODE);
        assert!(!info.is_empty());
        assert!(ResolvedBinInfo::default().is_empty());
    }

    #[test]
    fn test_country_flag() {
        let mut info = ResolvedBinInfo {
            country_code: Some("us".to_string()),
            ..Default::default()
        };
        assert_eq!(info.country_flag().as_deref(), Some("🇺🇸"));

        info.country_code = Some(UNKNOWN_COUNTRY_CODE.to_string());
        assert_eq!(info.country_flag(), None);
    }

    #[test]
    fn test_card_candidate_display() {
        let card = CardCandidate {
            number: "4111111111111111".to_string(),
            expiry_month: "07".to_string(),
            expiry_year: "29".to_string(),
            cvv: "123".to_string(),
        };
        assert_eq!(card.to_string(), "4111111111111111|07|29|123");
    }

    #[test]
    fn test_metrics_counting() {
        let metrics = ResolverMetrics::new();
        metrics.record_lookup(LookupTier::Local, Duration::from_millis(2));
        metrics.record_lookup(LookupTier::Bintable, Duration::from_millis(8));
        metrics.record_lookup(LookupTier::None, Duration::from_millis(2));
        metrics.record_unavailable();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.lookups, 3);
        assert_eq!(snapshot.local_hits, 1);
        assert_eq!(snapshot.remote_hits, 1);
        assert_eq!(snapshot.exhausted, 1);
        assert_eq!(snapshot.tiers_unavailable, 1);
        assert!((snapshot.avg_lookup_time_ms() - 4.0).abs() < f64::EPSILON);
    }
}
