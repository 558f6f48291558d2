pub mod normalize;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ProviderConfig;

/// One VOD entry as reported by the provider's catalog API.
///
/// `name` is rewritten during sanitization and `download_url` is filled in
/// during normalization; both start out as the raw API values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VodItem {
    pub name: String,
    #[serde(deserialize_with = "stream_id_compat")]
    pub stream_id: u64,
    pub container_extension: String,
    #[serde(skip)]
    pub download_url: Option<String>,
}

/// Some providers report `stream_id` as a JSON string, others as a number.
fn stream_id_compat<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(u64),
        Text(String),
    }

    match IdRepr::deserialize(deserializer)? {
        IdRepr::Num(n) => Ok(n),
        IdRepr::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub struct CatalogClient {
    http_client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl CatalogClient {
    pub fn new(provider: &ProviderConfig) -> Result<Self> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("vodgrab/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: provider.base_url.clone(),
            username: provider.username.clone(),
            password: provider.password.clone(),
        })
    }

    /// Fetch all VOD items in a category.
    ///
    /// A failed request or a malformed (non-array) payload is not fatal:
    /// it logs a warning and yields an empty list, so a batch over it
    /// simply does nothing.
    pub async fn fetch_category(&self, category_id: &str) -> Vec<VodItem> {
        match self.request_category(category_id).await {
            Ok(items) => {
                debug!(category_id, count = items.len(), "fetched category");
                items
            }
            Err(e) => {
                warn!(category_id, error = %e, "failed to fetch category");
                Vec::new()
            }
        }
    }

    async fn request_category(&self, category_id: &str) -> Result<Vec<VodItem>> {
        let url = format!("{}/player_api.php", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
                ("action", "get_vod_streams"),
                ("category_id", category_id),
            ])
            .send()
            .await
            .context("Failed to send catalog request")?;

        if !response.status().is_success() {
            bail!("catalog request failed with status: {}", response.status());
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .context("Failed to read catalog response body")?;

        if !payload.is_array() {
            bail!("catalog response is not an array");
        }

        serde_json::from_value(payload).context("Failed to parse catalog items")
    }

    /// Derive the download URL for an item.
    pub fn download_url(&self, item: &VodItem) -> String {
        format!(
            "{}/movie/{}/{}/{}.{}",
            self.base_url, self.username, self.password, item.stream_id, item.container_extension
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CatalogClient {
        CatalogClient::new(&ProviderConfig {
            base_url: "http://provider.example.com".to_string(),
            username: "user".to_string(),
            password: "secret".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_stream_id_as_number() {
        let item: VodItem = serde_json::from_str(
            r#"{"name": "Some Movie", "stream_id": 42, "container_extension": "mkv"}"#,
        )
        .unwrap();
        assert_eq!(item.stream_id, 42);
        assert_eq!(item.download_url, None);
    }

    #[test]
    fn test_stream_id_as_string() {
        let item: VodItem = serde_json::from_str(
            r#"{"name": "Some Movie", "stream_id": "42", "container_extension": "mp4"}"#,
        )
        .unwrap();
        assert_eq!(item.stream_id, 42);
    }

    #[test]
    fn test_extra_api_fields_are_ignored() {
        let item: VodItem = serde_json::from_str(
            r#"{"name": "Some Movie", "stream_id": 7, "container_extension": "mp4",
                "num": 1, "added": "1700000000", "rating": "7.5"}"#,
        )
        .unwrap();
        assert_eq!(item.name, "Some Movie");
    }

    #[test]
    fn test_download_url_shape() {
        let client = test_client();
        let item = VodItem {
            name: "Some-Movie".to_string(),
            stream_id: 42,
            container_extension: "mkv".to_string(),
            download_url: None,
        };

        assert_eq!(
            client.download_url(&item),
            "http://provider.example.com/movie/user/secret/42.mkv"
        );
    }
}
