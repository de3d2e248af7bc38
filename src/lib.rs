//! # nft-art-dl
//!
//! Downloads the artwork of an NFT collection, one token at a time, from one
//! of several metadata providers:
//!
//! - an IPFS gateway serving `<hash>/<token id>` metadata
//! - the Alchemy NFT API
//! - the OpenSea API
//! - the deepnftvalue valuation API
//!
//! For every token id in `0..total_supply` the provider's metadata is fetched,
//! the image URL extracted, the image downloaded and written to
//! `<output dir>/<token id>.<png|jpg>`. Tokens that already have a file are
//! skipped without any request, so an interrupted run resumes where it
//! stopped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use nft_art_dl::{CollectionDownloader, Config};
//! use nft_art_dl::provider::IpfsGateway;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let provider = Arc::new(IpfsGateway::new(&config.providers.ipfs.gateway));
//!
//!     let downloader = CollectionDownloader::new(config, provider)?;
//!     let summary = downloader.run("QmCollectionHash", 10_000).await?;
//!     println!("saved {} images, {} failed", summary.persisted, summary.failed);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Command-line surface
pub mod cli;
/// Collection-wide driver
pub mod collection;
/// Configuration types
pub mod config;
/// Content-type to extension mapping
pub mod content_type;
/// Error types
pub mod error;
/// Output directory handling
pub mod output;
/// Single-token fetch-and-persist pipeline
pub mod pipeline;
/// Metadata provider adapters
pub mod provider;
/// Core types
pub mod types;

// Re-export commonly used types
pub use collection::CollectionDownloader;
pub use config::Config;
pub use content_type::ImageExtension;
pub use error::{Error, Result};
pub use pipeline::{ArtifactFetcher, ImageArtifact};
pub use provider::MetadataProvider;
pub use types::{ProviderKind, RunSummary, TokenOutcome};
