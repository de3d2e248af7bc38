//! IPFS gateway provider

use super::{MetadataProvider, join_url};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

const IPFS_SCHEME: &str = "ipfs://";

/// Reads `<gateway>/<hash>/<offset>` metadata and resolves `ipfs://` images
/// through the same gateway
#[derive(Debug, Clone)]
pub struct IpfsGateway {
    gateway: String,
}

impl IpfsGateway {
    /// Create a provider for `gateway`, e.g. `https://ipfs.io/ipfs`
    pub fn new(gateway: impl AsRef<str>) -> Self {
        Self {
            gateway: gateway.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// Rewrite an `ipfs://` URI onto the gateway
    ///
    /// Returns `None` for any other scheme.
    pub fn resolve(&self, uri: &str) -> Option<String> {
        uri.strip_prefix(IPFS_SCHEME)
            .map(|path| join_url(&self.gateway, &[path]))
    }
}

#[async_trait]
impl MetadataProvider for IpfsGateway {
    fn name(&self) -> &'static str {
        "ipfs"
    }

    fn metadata_request(
        &self,
        client: &reqwest::Client,
        collection: &str,
        offset: u64,
    ) -> reqwest::RequestBuilder {
        // the hash may carry a sub-path, so it is not percent-encoded
        let offset = offset.to_string();
        client.get(join_url(&self.gateway, &[collection, offset.as_str()]))
    }

    fn extract_image_url(&self, _offset: u64, metadata: &Value) -> Result<Option<String>> {
        Ok(metadata
            .get("image")
            .and_then(Value::as_str)
            .and_then(|image| self.resolve(image)))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_url_is_path_based() {
        let provider = IpfsGateway::new("https://ipfs.io/ipfs/");
        let request = provider
            .metadata_request(&reqwest::Client::new(), "QmCollection", 42)
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().as_str(), "https://ipfs.io/ipfs/QmCollection/42");
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn ipfs_image_is_rewritten_to_gateway() {
        let provider = IpfsGateway::new("https://w3s.link/ipfs");
        let metadata = json!({ "image": "ipfs://QmImage/12.png" });

        assert_eq!(
            provider.extract_image_url(12, &metadata).unwrap().as_deref(),
            Some("https://w3s.link/ipfs/QmImage/12.png")
        );
    }

    #[test]
    fn non_ipfs_images_are_skipped() {
        let provider = IpfsGateway::new("https://ipfs.io/ipfs");

        for metadata in [
            json!({ "image": "https://example.com/x.png" }),
            json!({ "image": "ar://tx-id" }),
            json!({ "image": 5 }),
            json!({ "image": null }),
            json!({ "name": "no image" }),
            json!([]),
        ] {
            assert_eq!(
                provider.extract_image_url(0, &metadata).unwrap(),
                None,
                "{metadata}"
            );
        }
    }
}
