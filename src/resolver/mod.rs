//! BIN resolution: an ordered cascade of lookup tiers

#[cfg(feature = "remote")]
pub mod binlist;
#[cfg(feature = "remote")]
pub mod bintable;
pub mod cascade;
pub mod local;
pub mod registry;

pub use cascade::BinResolver;
pub use local::LocalSource;
pub use registry::RemoteEndpoints;

#[cfg(feature = "remote")]
pub use binlist::BinlistSource;
#[cfg(feature = "remote")]
pub use bintable::BintableSource;

use crate::types::{LookupTier, TierOutcome};
use async_trait::async_trait;

/// One tier of the resolution cascade
#[async_trait]
pub trait BinSource: Send + Sync {
    /// Look up a prefix. Failures are reported as `Unavailable`, never raised.
    async fn lookup(&self, prefix: &str) -> TierOutcome;

    /// Tier reported when this source answers
    fn tier(&self) -> LookupTier;

    /// Remote sources run under the per-tier timeout
    fn is_remote(&self) -> bool {
        true
    }
}

/// Trimmed value, or `None` when blank
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
