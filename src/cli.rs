//! Command-line surface
//!
//! One subcommand per provider, each taking the collection reference and the
//! total supply. Global options tweak the output directory, the pause between
//! saved images and an optional JSON configuration file.

use crate::collection::CollectionDownloader;
use crate::config::Config;
use crate::error::Result;
use crate::provider;
use crate::types::{ProviderKind, RunSummary};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Download NFT collection artwork token by token
#[derive(Debug, Parser)]
#[command(name = "nft-art-dl", author, version, about)]
pub struct Cli {
    /// Directory images are written to (default: ./output)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Pause after each saved image in milliseconds (default: 500)
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Metadata provider to read from
    #[command(subcommand)]
    pub command: Commands,
}

/// Provider subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch metadata from an IPFS gateway
    Ipfs(IpfsArgs),
    /// Fetch metadata from the Alchemy NFT API (needs ALCHEMY_KEY)
    Alchemy(ContractArgs),
    /// Fetch metadata from the OpenSea API (needs OPENSEA_API_KEY)
    Opensea(ContractArgs),
    /// Fetch metadata from the deepnftvalue API (needs DEEPNFTVALUE_TOKEN)
    Deepnftvalue(SlugArgs),
}

/// Arguments of the `ipfs` subcommand
#[derive(Debug, Args)]
pub struct IpfsArgs {
    /// Collection IPFS hash
    #[arg(short = 'H', long)]
    pub hash: String,

    /// The total supply of the collection
    #[arg(short = 's', long)]
    pub total_supply: u64,

    /// Gateway base URL (default: https://ipfs.io/ipfs)
    #[arg(long)]
    pub gateway: Option<String>,
}

/// Arguments of the contract-address based subcommands
#[derive(Debug, Args)]
pub struct ContractArgs {
    /// Collection contract address
    #[arg(short, long)]
    pub contract_address: String,

    /// The total supply of the collection
    #[arg(short = 's', long)]
    pub total_supply: u64,
}

/// Arguments of the `deepnftvalue` subcommand
#[derive(Debug, Args)]
pub struct SlugArgs {
    /// Collection deepnftvalue slug
    #[arg(short, long)]
    pub slug: String,

    /// The total supply of the collection
    #[arg(short = 't', long)]
    pub total_supply: u64,
}

impl Commands {
    /// Provider selected by this subcommand
    pub fn provider(&self) -> ProviderKind {
        match self {
            Commands::Ipfs(_) => ProviderKind::Ipfs,
            Commands::Alchemy(_) => ProviderKind::Alchemy,
            Commands::Opensea(_) => ProviderKind::Opensea,
            Commands::Deepnftvalue(_) => ProviderKind::Deepnftvalue,
        }
    }

    /// Collection reference (hash, contract address or slug)
    pub fn collection(&self) -> &str {
        match self {
            Commands::Ipfs(args) => &args.hash,
            Commands::Alchemy(args) | Commands::Opensea(args) => &args.contract_address,
            Commands::Deepnftvalue(args) => &args.slug,
        }
    }

    /// Number of tokens to walk
    pub fn total_supply(&self) -> u64 {
        match self {
            Commands::Ipfs(args) => args.total_supply,
            Commands::Alchemy(args) | Commands::Opensea(args) => args.total_supply,
            Commands::Deepnftvalue(args) => args.total_supply,
        }
    }
}

impl Cli {
    /// Resolve the effective configuration
    ///
    /// Precedence: command-line flags, then environment secrets, then the
    /// config file, then defaults.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply_env();

        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(ms) = self.delay_ms {
            config.request_delay = Duration::from_millis(ms);
        }
        if let Commands::Ipfs(IpfsArgs {
            gateway: Some(gateway),
            ..
        }) = &self.command
        {
            config.providers.ipfs.gateway = gateway.clone();
        }

        Ok(config)
    }
}

/// Validate the configuration for the selected provider and run the download
///
/// # Errors
///
/// Configuration problems (missing secret, bad URL) and output directory
/// failures abort before any token is processed. Per-token failures are only
/// reflected in the returned [`RunSummary`].
pub async fn execute(cli: Cli) -> Result<RunSummary> {
    let config = cli.resolve_config()?;
    let kind = cli.command.provider();
    config.validate_for(kind)?;

    let source: Arc<dyn provider::MetadataProvider> =
        Arc::from(provider::from_config(kind, &config.providers)?);
    let downloader = CollectionDownloader::new(config, source)?;

    downloader
        .run(cli.command.collection(), cli.command.total_supply())
        .await
}
