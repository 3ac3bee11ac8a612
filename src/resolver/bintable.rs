//! Tier 3: bintable-style lookup service (API key required)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::registry::bintable_url;
use super::{non_empty, BinSource};
use crate::error::{BinForgeError, Result};
use crate::types::{LookupTier, ResolvedBinInfo, TierOutcome};

pub struct BintableSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BintableSource {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn fetch(&self, prefix: &str) -> Result<ResolvedBinInfo> {
        let url = bintable_url(&self.base_url, prefix);

        // The key rides in the query string; keep it out of error values.
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BinForgeError::network(
                format!("bintable request failed with status {}", status),
                Some(status.as_u16()),
                Some(url),
            ));
        }

        let text = response.text().await.map_err(reqwest::Error::without_url)?;
        let body: BintableResponse = serde_json::from_str(&text)?;

        Ok(normalize(body))
    }
}

#[async_trait]
impl BinSource for BintableSource {
    async fn lookup(&self, prefix: &str) -> TierOutcome {
        match self.fetch(prefix).await {
            Ok(info) => TierOutcome::Hit(info),
            Err(e) if e.is_not_found() => TierOutcome::Miss,
            Err(e) => TierOutcome::Unavailable(e.to_string()),
        }
    }

    fn tier(&self) -> LookupTier {
        LookupTier::Bintable
    }
}

/// Map a bintable body onto the common shape. The payload may be inline or
/// wrapped in a `data` envelope; `scheme` wins over `brand` for the brand.
fn normalize(body: BintableResponse) -> ResolvedBinInfo {
    let payload = body.data.unwrap_or(body.inline);
    let country = payload.country.unwrap_or_default();
    ResolvedBinInfo {
        bank: non_empty(payload.bank.and_then(|b| b.name)),
        brand: non_empty(payload.scheme).or_else(|| non_empty(payload.brand)),
        card_type: non_empty(payload.card_type),
        level: non_empty(payload.level),
        country: non_empty(country.name),
        country_code: non_empty(country.code),
    }
}

#[derive(Debug, Deserialize)]
struct BintableResponse {
    data: Option<BintablePayload>,
    #[serde(flatten)]
    inline: BintablePayload,
}

#[derive(Debug, Default, Deserialize)]
struct BintablePayload {
    scheme: Option<String>,
    brand: Option<String>,
    #[serde(rename = "type")]
    card_type: Option<String>,
    level: Option<String>,
    country: Option<BintableCountry>,
    bank: Option<BintableBank>,
}

#[derive(Debug, Default, Deserialize)]
struct BintableCountry {
    name: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BintableBank {
    name: Option<String>,
}
