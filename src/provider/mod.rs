//! Metadata providers
//!
//! Each backend knows how to request one token's metadata and where the image
//! reference lives in its response. Everything else (guarding, image fetch,
//! persistence, pacing) is shared by the pipeline.
//!
//! - [`ipfs`] - collection metadata served from an IPFS gateway
//! - [`alchemy`] - Alchemy NFT API v3
//! - [`opensea`] - OpenSea API v2
//! - [`deepnftvalue`] - deepnftvalue valuation API

pub mod alchemy;
pub mod deepnftvalue;
pub mod ipfs;
pub mod opensea;

pub use alchemy::Alchemy;
pub use deepnftvalue::DeepNftValue;
pub use ipfs::IpfsGateway;
pub use opensea::OpenSea;

use crate::config::ProvidersConfig;
use crate::error::{Error, Result};
use crate::types::ProviderKind;
use async_trait::async_trait;
use serde_json::Value;

/// A source of per-token NFT metadata
///
/// Implementations build exactly one metadata request per token and pick the
/// image URL out of the provider specific JSON shape.
///
/// # Examples
///
/// ```no_run
/// use nft_art_dl::provider::{IpfsGateway, MetadataProvider};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = IpfsGateway::new("https://ipfs.io/ipfs");
/// let client = reqwest::Client::new();
///
/// let metadata = provider.fetch_metadata(&client, "QmCollectionHash", 0).await?;
/// if let Some(url) = provider.extract_image_url(0, &metadata)? {
///     println!("image at {url}");
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Build the metadata request for `offset` within `collection`
    ///
    /// Carries the provider's URL shape and any static auth header.
    fn metadata_request(
        &self,
        client: &reqwest::Client,
        collection: &str,
        offset: u64,
    ) -> reqwest::RequestBuilder;

    /// Pick the image URL out of a metadata record
    ///
    /// # Returns
    ///
    /// * `Ok(Some(url))` - fetch the image at `url`
    /// * `Ok(None)` - no qualifying image, the token is skipped
    ///
    /// # Errors
    ///
    /// [`Error::MissingImage`] when the provider guarantees an image field and
    /// it is absent.
    fn extract_image_url(&self, offset: u64, metadata: &Value) -> Result<Option<String>>;

    /// Issue the metadata request and parse the body as JSON
    ///
    /// # Errors
    ///
    /// - [`Error::Network`] if the request cannot be sent or the body read
    /// - [`Error::HttpStatus`] on a non-success status
    /// - [`Error::Parse`] if the body is not JSON
    async fn fetch_metadata(
        &self,
        client: &reqwest::Client,
        collection: &str,
        offset: u64,
    ) -> Result<Value> {
        let response = self
            .metadata_request(client, collection, offset)
            .send()
            .await?;
        let response = check_status(response)?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Turn a non-success response into [`Error::HttpStatus`]
pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(Error::HttpStatus {
        url: response.url().to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}

/// Join `base` and already-encoded path segments with single slashes
pub(crate) fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
    url
}

/// Non-empty string at a JSON pointer
pub(crate) fn string_at<'a>(metadata: &'a Value, pointer: &str) -> Option<&'a str> {
    metadata
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Build the provider selected for this run from its configuration
///
/// # Errors
///
/// Returns [`Error::Config`] when the provider's secret is missing.
pub fn from_config(
    kind: ProviderKind,
    providers: &ProvidersConfig,
) -> Result<Box<dyn MetadataProvider>> {
    fn secret(value: &Option<String>, key: &str) -> Result<String> {
        value
            .clone()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| Error::config(format!("{key} must be set"), key))
    }

    let provider: Box<dyn MetadataProvider> = match kind {
        ProviderKind::Ipfs => Box::new(IpfsGateway::new(&providers.ipfs.gateway)),
        ProviderKind::Alchemy => Box::new(Alchemy::new(
            &providers.alchemy.base_url,
            secret(&providers.alchemy.api_key, crate::config::ALCHEMY_KEY_ENV)?,
        )),
        ProviderKind::Opensea => Box::new(OpenSea::new(
            &providers.opensea.base_url,
            secret(&providers.opensea.api_key, crate::config::OPENSEA_API_KEY_ENV)?,
        )),
        ProviderKind::Deepnftvalue => Box::new(DeepNftValue::new(
            &providers.deepnftvalue.base_url,
            secret(
                &providers.deepnftvalue.token,
                crate::config::DEEPNFTVALUE_TOKEN_ENV,
            )?,
        )),
    };
    Ok(provider)
}
