//! OpenSea API provider

use super::{MetadataProvider, join_url, string_at};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

const IMAGE_FIELD: &str = "nft.display_image_url";

/// Reads `<contract>/nfts/<offset>` and downloads the display image at
/// 1024px instead of the default 500px
#[derive(Debug, Clone)]
pub struct OpenSea {
    base_url: String,
    api_key: String,
}

impl OpenSea {
    /// Create a provider for `base_url` authenticated by `api_key`
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

/// Ask the image CDN for the larger rendition
fn upscale(url: &str) -> String {
    url.replacen("w=500", "w=1024", 1)
}

#[async_trait]
impl MetadataProvider for OpenSea {
    fn name(&self) -> &'static str {
        "opensea"
    }

    fn metadata_request(
        &self,
        client: &reqwest::Client,
        collection: &str,
        offset: u64,
    ) -> reqwest::RequestBuilder {
        let contract = urlencoding::encode(collection);
        let offset = offset.to_string();
        client
            .get(join_url(
                &self.base_url,
                &[&*contract, "nfts", offset.as_str()],
            ))
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
    }

    fn extract_image_url(&self, offset: u64, metadata: &Value) -> Result<Option<String>> {
        match string_at(metadata, "/nft/display_image_url") {
            Some(url) => Ok(Some(upscale(url))),
            None => {
                tracing::warn!(offset, field = IMAGE_FIELD, "image url is not available");
                Err(Error::MissingImage { field: IMAGE_FIELD })
            }
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_request_is_path_based_with_api_key() {
        let provider = OpenSea::new(
            "https://api.opensea.io/api/v2/chain/ethereum/contract",
            "os-key",
        );
        let request = provider
            .metadata_request(&reqwest::Client::new(), "0xabc", 9)
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.opensea.io/api/v2/chain/ethereum/contract/0xabc/nfts/9"
        );
        assert_eq!(request.headers()["x-api-key"], "os-key");
        assert_eq!(request.headers()["content-type"], "application/json");
    }

    #[test]
    fn display_image_url_is_upscaled() {
        let provider = OpenSea::new("https://opensea.test", "k");
        let metadata = json!({
            "nft": { "display_image_url": "https://i.seadn.io/gae/abc?w=500&auto=format" }
        });

        assert_eq!(
            provider.extract_image_url(1, &metadata).unwrap().as_deref(),
            Some("https://i.seadn.io/gae/abc?w=1024&auto=format")
        );
    }

    #[test]
    fn urls_without_width_are_kept() {
        assert_eq!(
            upscale("https://i.seadn.io/gae/abc"),
            "https://i.seadn.io/gae/abc"
        );
        assert_eq!(upscale("x?w=500&y=w=500"), "x?w=1024&y=w=500");
    }

    #[test]
    fn missing_display_image_fails_the_token() {
        let provider = OpenSea::new("https://opensea.test", "k");

        assert!(matches!(
            provider.extract_image_url(2, &json!({ "nft": { "display_image_url": null } })),
            Err(Error::MissingImage { field: "nft.display_image_url" })
        ));
        assert!(provider.extract_image_url(2, &json!({})).is_err());
    }
}
