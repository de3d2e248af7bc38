//! Fetch-and-persist pipeline for a single token
//!
//! Per token: existence guard, metadata request, image URL extraction, image
//! request, content-type check, write, then the rate-limit pause. Errors are
//! caught at [`ArtifactFetcher::fetch_and_save`] and turned into
//! [`TokenOutcome::Failed`] so one bad token never stops a run.

use crate::content_type::ImageExtension;
use crate::error::{Error, Result};
use crate::output::{ArtifactIndex, write_artifact};
use crate::provider::{MetadataProvider, check_status};
use crate::types::TokenOutcome;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Image payload ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    /// Extension resolved from the response `Content-Type`
    pub extension: ImageExtension,
    /// Full response body
    pub bytes: Vec<u8>,
}

/// Downloads and stores the image of one token at a time
pub struct ArtifactFetcher {
    client: reqwest::Client,
    provider: Arc<dyn MetadataProvider>,
    collection: String,
    output_dir: PathBuf,
    index: ArtifactIndex,
    delay: Duration,
}

impl ArtifactFetcher {
    /// Create a fetcher writing into `output_dir`
    ///
    /// `index` must describe the current contents of `output_dir`; the
    /// fetcher keeps it up to date as it writes.
    pub fn new(
        client: reqwest::Client,
        provider: Arc<dyn MetadataProvider>,
        collection: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        index: ArtifactIndex,
        delay: Duration,
    ) -> Self {
        Self {
            client,
            provider,
            collection: collection.into(),
            output_dir: output_dir.into(),
            index,
            delay,
        }
    }

    /// Known artifacts, including the ones written by this fetcher
    pub fn index(&self) -> &ArtifactIndex {
        &self.index
    }

    /// Run the pipeline for `offset`
    ///
    /// Never fails: errors are logged with the offset and returned as
    /// [`TokenOutcome::Failed`].
    pub async fn fetch_and_save(&mut self, offset: u64) -> TokenOutcome {
        if self.index.contains(offset) {
            tracing::info!(offset, "image of token exists, skipped");
            return TokenOutcome::AlreadyPresent;
        }

        match self.try_fetch_and_save(offset).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    offset,
                    provider = self.provider.name(),
                    code = e.error_code(),
                    error = %e,
                    "failed to save token image"
                );
                TokenOutcome::Failed {
                    code: e.error_code(),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_fetch_and_save(&mut self, offset: u64) -> Result<TokenOutcome> {
        let metadata = self
            .provider
            .fetch_metadata(&self.client, &self.collection, offset)
            .await?;

        // adapters log their own skips where one is expected
        let Some(image_url) = self.provider.extract_image_url(offset, &metadata)? else {
            return Ok(TokenOutcome::Skipped {
                reason: format!("{} returned no usable image reference", self.provider.name()),
            });
        };
        drop(metadata);

        let image = self.fetch_image(&image_url).await?;
        let path = write_artifact(&self.output_dir, offset, image.extension, &image.bytes).await?;
        self.index.record(offset);

        tracing::info!(
            offset,
            path = %path.display(),
            bytes = image.bytes.len(),
            "saved token image"
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(TokenOutcome::Persisted {
            path,
            bytes: image.bytes.len(),
        })
    }

    /// GET the image and resolve its extension before reading the body
    async fn fetch_image(&self, url: &str) -> Result<ImageArtifact> {
        let response = check_status(self.client.get(url).send().await?)?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let extension = ImageExtension::from_content_type(&content_type)
            .ok_or(Error::UnsupportedContentType { content_type })?;

        let bytes = response.bytes().await?.to_vec();
        Ok(ImageArtifact { extension, bytes })
    }
}
