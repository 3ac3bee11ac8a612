//! Tier 1: the in-memory record store

use std::sync::Arc;

use async_trait::async_trait;

use super::BinSource;
use crate::store::RecordStore;
use crate::types::{LookupTier, ResolvedBinInfo, TierOutcome};

pub struct LocalSource {
    store: Arc<RecordStore>,
}

impl LocalSource {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BinSource for LocalSource {
    async fn lookup(&self, prefix: &str) -> TierOutcome {
        if !self.store.is_ready() {
            tracing::debug!(bin = %prefix, state = %self.store.state(), "BIN database not ready");
            return TierOutcome::Miss;
        }

        match self.store.lookup(prefix) {
            Some(record) => {
                tracing::debug!(bin = %prefix, key = %record.prefix, "BIN found in local database");
                TierOutcome::Hit(ResolvedBinInfo::from(&record))
            }
            None => TierOutcome::Miss,
        }
    }

    fn tier(&self) -> LookupTier {
        LookupTier::Local
    }

    fn is_remote(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BinRecord;

    #[tokio::test]
    async fn test_local_hit_and_miss() {
        let store = Arc::new(RecordStore::from_records([BinRecord {
            prefix: "123456".to_string(),
            bank: "SIX DIGIT BANK".to_string(),
            brand: "VISA".to_string(),
            card_type: "CREDIT".to_string(),
            level: "GOLD".to_string(),
            country_name: "FRANCE".to_string(),
            country_code: "FR".to_string(),
        }]));
        let source = LocalSource::new(store);

        match source.lookup("12345678").await {
            TierOutcome::Hit(info) => {
                assert_eq!(info.bank.as_deref(), Some("SIX DIGIT BANK"));
                assert_eq!(info.country_code.as_deref(), Some("FR"));
            }
            other => panic!("expected hit, got {:?}", other),
        }
        assert_eq!(source.lookup("999999").await, TierOutcome::Miss);
        assert!(!source.is_remote());
    }

    #[tokio::test]
    async fn test_unloaded_store_is_a_miss() {
        let source = LocalSource::new(Arc::new(RecordStore::new()));
        assert_eq!(source.lookup("123456").await, TierOutcome::Miss);
    }
}
