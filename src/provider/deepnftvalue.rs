//! deepnftvalue valuation API provider

use super::{MetadataProvider, join_url};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Reads `<slug>/<offset>` token records and downloads `image.src`
#[derive(Debug, Clone)]
pub struct DeepNftValue {
    base_url: String,
    authorization: String,
}

impl DeepNftValue {
    /// Create a provider for `base_url` authenticated by `token`
    ///
    /// `token` may be given bare or already prefixed with `Token `.
    pub fn new(base_url: impl AsRef<str>, token: impl AsRef<str>) -> Self {
        let token = token.as_ref().trim();
        let authorization = if token.starts_with("Token ") {
            token.to_string()
        } else {
            format!("Token {token}")
        };
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            authorization,
        }
    }
}

#[async_trait]
impl MetadataProvider for DeepNftValue {
    fn name(&self) -> &'static str {
        "deepnftvalue"
    }

    fn metadata_request(
        &self,
        client: &reqwest::Client,
        collection: &str,
        offset: u64,
    ) -> reqwest::RequestBuilder {
        let slug = urlencoding::encode(collection);
        let offset = offset.to_string();
        client
            .get(join_url(&self.base_url, &[&*slug, offset.as_str()]))
            .header("Authorization", &self.authorization)
    }

    fn extract_image_url(&self, offset: u64, metadata: &Value) -> Result<Option<String>> {
        // any string counts, even an empty one; it then fails at the image fetch
        let src = metadata
            .pointer("/image/src")
            .and_then(Value::as_str)
            .map(str::to_string);
        if src.is_none() {
            tracing::info!(offset, "image src is not returned from deepnftvalue API, skipped");
        }
        Ok(src)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_request_sends_token_header() {
        let provider = DeepNftValue::new("https://api.deepnftvalue.com/v1/tokens", "abc123");
        let request = provider
            .metadata_request(&reqwest::Client::new(), "boredapeyachtclub", 5)
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.deepnftvalue.com/v1/tokens/boredapeyachtclub/5"
        );
        assert_eq!(request.headers()["authorization"], "Token abc123");
    }

    #[test]
    fn prefixed_token_is_not_doubled() {
        let provider = DeepNftValue::new("https://dnv.test", "Token abc123");
        let request = provider
            .metadata_request(&reqwest::Client::new(), "slug", 0)
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Token abc123");
    }

    #[test]
    fn slug_is_percent_encoded() {
        let provider = DeepNftValue::new("https://dnv.test", "t");
        let request = provider
            .metadata_request(&reqwest::Client::new(), "my slug", 1)
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://dnv.test/my%20slug/1");
    }

    #[test]
    fn image_src_is_extracted_or_skipped() {
        let provider = DeepNftValue::new("https://dnv.test", "t");

        assert_eq!(
            provider
                .extract_image_url(0, &json!({ "image": { "src": "https://img.test/0.png" } }))
                .unwrap()
                .as_deref(),
            Some("https://img.test/0.png")
        );
        assert_eq!(
            provider.extract_image_url(0, &json!({ "image": { "src": 1 } })).unwrap(),
            None
        );
        assert_eq!(provider.extract_image_url(0, &json!({})).unwrap(), None);
    }

    #[test]
    fn empty_image_src_is_passed_through() {
        let provider = DeepNftValue::new("https://dnv.test", "t");

        assert_eq!(
            provider.extract_image_url(2, &json!({ "image": { "src": "" } })).unwrap(),
            Some(String::new())
        );
    }
}
