//! Tier 2: binlist-style lookup service

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::registry::binlist_url;
use super::{non_empty, BinSource};
use crate::error::{BinForgeError, Result};
use crate::types::{LookupTier, ResolvedBinInfo, TierOutcome};

pub struct BinlistSource {
    client: Client,
    base_url: String,
}

impl BinlistSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, prefix: &str) -> Result<ResolvedBinInfo> {
        let url = binlist_url(&self.base_url, prefix);

        let response = self
            .client
            .get(&url)
            .header("Accept-Version", "3")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BinForgeError::network(
                format!("binlist request failed with status {}", status),
                Some(status.as_u16()),
                Some(url),
            ));
        }

        let text = response.text().await?;
        let body: BinlistResponse = serde_json::from_str(&text)?;

        Ok(normalize(body))
    }
}

#[async_trait]
impl BinSource for BinlistSource {
    async fn lookup(&self, prefix: &str) -> TierOutcome {
        match self.fetch(prefix).await {
            Ok(info) => TierOutcome::Hit(info),
            Err(e) if e.is_not_found() => TierOutcome::Miss,
            Err(e) => TierOutcome::Unavailable(e.to_string()),
        }
    }

    fn tier(&self) -> LookupTier {
        LookupTier::Binlist
    }
}

/// Map a binlist body onto the common shape. The service reports the card
/// product (e.g. "Traditional") under `brand`, which is our `level`.
fn normalize(body: BinlistResponse) -> ResolvedBinInfo {
    let country = body.country.unwrap_or_default();
    ResolvedBinInfo {
        bank: non_empty(body.bank.and_then(|b| b.name)),
        brand: non_empty(body.scheme),
        card_type: non_empty(body.card_type),
        level: non_empty(body.brand),
        country: non_empty(country.name),
        country_code: non_empty(country.alpha2),
    }
}

#[derive(Debug, Deserialize)]
struct BinlistResponse {
    scheme: Option<String>,
    #[serde(rename = "type")]
    card_type: Option<String>,
    brand: Option<String>,
    country: Option<BinlistCountry>,
    bank: Option<BinlistBank>,
}

#[derive(Debug, Default, Deserialize)]
struct BinlistCountry {
    name: Option<String>,
    alpha2: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BinlistBank {
    name: Option<String>,
}
