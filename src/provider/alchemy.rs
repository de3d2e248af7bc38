//! Alchemy NFT API provider

use super::{MetadataProvider, join_url, string_at};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

const IMAGE_FIELD: &str = "image.cachedUrl";

/// Reads `getNFTMetadata` and downloads Alchemy's cached image copy
#[derive(Debug, Clone)]
pub struct Alchemy {
    endpoint: String,
}

impl Alchemy {
    /// Create a provider for `base_url` (without key) authenticated by `api_key`
    pub fn new(base_url: impl AsRef<str>, api_key: impl AsRef<str>) -> Self {
        let key = urlencoding::encode(api_key.as_ref());
        Self {
            endpoint: join_url(base_url.as_ref(), &[&*key, "getNFTMetadata"]),
        }
    }
}

#[async_trait]
impl MetadataProvider for Alchemy {
    fn name(&self) -> &'static str {
        "alchemy"
    }

    fn metadata_request(
        &self,
        client: &reqwest::Client,
        collection: &str,
        offset: u64,
    ) -> reqwest::RequestBuilder {
        client.get(&self.endpoint).query(&[
            ("contractAddress", collection.to_string()),
            ("tokenId", offset.to_string()),
        ])
    }

    fn extract_image_url(&self, offset: u64, metadata: &Value) -> Result<Option<String>> {
        match string_at(metadata, "/image/cachedUrl") {
            Some(url) => Ok(Some(url.to_string())),
            None => {
                tracing::warn!(offset, field = IMAGE_FIELD, "image url is not available");
                Err(Error::MissingImage { field: IMAGE_FIELD })
            }
        }
    }
}
