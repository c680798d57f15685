use std::time::Duration;

use anyhow::{Context, Result};
use moka::future::Cache;
use once_cell::sync::Lazy;
use reqwest::Client;

/// Sentinel shown when the resolver cannot produce an address. Lookup
/// failures degrade to this string; they never block a punch.
pub const UNAVAILABLE: &str = "Location unavailable";

/// Resolved addresses keyed by rounded coordinates. Staff punch from the
/// same few sites every day, so this avoids hammering the upstream service.
static ADDRESS_CACHE: Lazy<Cache<String, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(86_400))
        .build()
});

/// Reverse-geocoding client against a Nominatim-style `/reverse` endpoint.
#[derive(Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .user_agent("attendpay/0.1")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }

    /// Resolves a display address for the coordinates. Infallible by
    /// contract: any transport or parse failure yields the sentinel.
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> String {
        let key = cache_key(latitude, longitude);
        if let Some(hit) = ADDRESS_CACHE.get(&key).await {
            return hit;
        }

        match self.lookup(latitude, longitude).await {
            Ok(address) => {
                ADDRESS_CACHE.insert(key, address.clone()).await;
                address
            }
            Err(e) => {
                tracing::warn!(error = %e, latitude, longitude, "Reverse geocoding failed");
                UNAVAILABLE.to_string()
            }
        }
    }

    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<String> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await
            .context("Failed to reach geocoding service")?;

        if !response.status().is_success() {
            anyhow::bail!("Geocoding API error ({})", response.status());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        body.get("display_name")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Geocoding response missing display_name"))
    }
}

fn cache_key(latitude: f64, longitude: f64) -> String {
    // ~11m resolution; punches from the same site share one entry
    format!("{:.4}:{:.4}", latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_coordinates_share_a_cache_key() {
        assert_eq!(cache_key(21.17021, 72.83110), cache_key(21.17019, 72.83112));
        assert_ne!(cache_key(21.1702, 72.8311), cache_key(21.1802, 72.8311));
    }
}
