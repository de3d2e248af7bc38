//! Collection-wide driver
//!
//! Walks token offsets `0..total_supply` strictly in order, one token at a
//! time, including the post-write pause. The output directory doubles as the
//! progress record, so re-running with the same arguments resumes at the first
//! missing token.

use crate::config::Config;
use crate::error::Result;
use crate::output::{ArtifactIndex, ensure_output_dir};
use crate::pipeline::ArtifactFetcher;
use crate::provider::MetadataProvider;
use crate::types::RunSummary;
use std::sync::Arc;

/// Downloads every token image of a collection from one provider
pub struct CollectionDownloader {
    config: Config,
    client: reqwest::Client,
    provider: Arc<dyn MetadataProvider>,
}

impl CollectionDownloader {
    /// Create a downloader using `provider` and the settings in `config`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Network`] if the HTTP client cannot be built.
    pub fn new(config: Config, provider: Arc<dyn MetadataProvider>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            config,
            client,
            provider,
        })
    }

    /// Fetch and store the image of every token in `0..total_supply`
    ///
    /// Per-token failures are logged and counted in the returned summary.
    ///
    /// # Errors
    ///
    /// Only fails when the output directory cannot be created or listed.
    pub async fn run(&self, collection: &str, total_supply: u64) -> Result<RunSummary> {
        let output_dir = &self.config.output_dir;
        ensure_output_dir(output_dir).await?;
        let index = ArtifactIndex::scan(output_dir).await?;

        tracing::info!(
            provider = self.provider.name(),
            collection,
            total_supply,
            output_dir = %output_dir.display(),
            "start fetching NFT metadata"
        );

        let mut fetcher = ArtifactFetcher::new(
            self.client.clone(),
            Arc::clone(&self.provider),
            collection,
            output_dir.clone(),
            index,
            self.config.request_delay,
        );

        let mut summary = RunSummary::default();
        for offset in 0..total_supply {
            let outcome = fetcher.fetch_and_save(offset).await;
            summary.record(offset, &outcome);
        }

        if summary.is_success() {
            tracing::info!(
                persisted = summary.persisted,
                already_present = summary.already_present,
                skipped = summary.skipped,
                "finished fetching collection"
            );
        } else {
            tracing::warn!(
                persisted = summary.persisted,
                already_present = summary.already_present,
                skipped = summary.skipped,
                failed = summary.failed,
                failed_offsets = ?summary.failed_offsets,
                "finished fetching collection with failures"
            );
        }

        Ok(summary)
    }
}
