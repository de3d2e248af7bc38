//! Core types for nft-art-dl

use std::fmt;
use std::path::PathBuf;

/// Metadata backend a run pulls from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Token metadata served as `<hash>/<offset>` from an IPFS gateway
    Ipfs,
    /// Alchemy NFT API v3 `getNFTMetadata`
    Alchemy,
    /// OpenSea API v2 contract NFT endpoint
    Opensea,
    /// deepnftvalue valuation API
    Deepnftvalue,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Ipfs => "IPFS",
            ProviderKind::Alchemy => "Alchemy",
            ProviderKind::Opensea => "OpenSea",
            ProviderKind::Deepnftvalue => "deepnftvalue",
        };
        f.write_str(name)
    }
}

/// Terminal state of one token's fetch-and-persist run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    /// Image written to `path`
    Persisted {
        /// Location of the written artifact
        path: PathBuf,
        /// Size of the payload in bytes
        bytes: usize,
    },
    /// An artifact for this offset was already in the output directory
    AlreadyPresent,
    /// The provider returned no qualifying image reference
    Skipped {
        /// Why the token was skipped
        reason: String,
    },
    /// The token was abandoned after an error
    Failed {
        /// Machine-readable error code
        code: &'static str,
        /// Rendered error message
        error: String,
    },
}

/// Counts of token outcomes across a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tokens whose image was written during this run
    pub persisted: u64,
    /// Tokens skipped because an artifact already existed
    pub already_present: u64,
    /// Tokens without a qualifying image reference
    pub skipped: u64,
    /// Tokens abandoned after an error
    pub failed: u64,
    /// Offsets of the failed tokens, in order
    pub failed_offsets: Vec<u64>,
}

impl RunSummary {
    /// Fold one token outcome into the summary
    pub fn record(&mut self, offset: u64, outcome: &TokenOutcome) {
        match outcome {
            TokenOutcome::Persisted { .. } => self.persisted += 1,
            TokenOutcome::AlreadyPresent => self.already_present += 1,
            TokenOutcome::Skipped { .. } => self.skipped += 1,
            TokenOutcome::Failed { .. } => {
                self.failed += 1;
                self.failed_offsets.push(offset);
            }
        }
    }

    /// Number of tokens processed
    pub fn total(&self) -> u64 {
        self.persisted + self.already_present + self.skipped + self.failed
    }

    /// Whether every token ended without an error
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = RunSummary::default();
        summary.record(
            0,
            &TokenOutcome::Persisted {
                path: PathBuf::from("output/0.png"),
                bytes: 10,
            },
        );
        summary.record(1, &TokenOutcome::AlreadyPresent);
        summary.record(
            2,
            &TokenOutcome::Skipped {
                reason: "no ipfs image".into(),
            },
        );
        summary.record(
            3,
            &TokenOutcome::Failed {
                code: "http_status",
                error: "404 Not Found".into(),
            },
        );
        summary.record(
            5,
            &TokenOutcome::Failed {
                code: "network_error",
                error: "connection refused".into(),
            },
        );

        assert_eq!(summary.persisted, 1);
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.failed_offsets, vec![3, 5]);
        assert_eq!(summary.total(), 5);
        assert!(!summary.is_success());
    }

    #[test]
    fn skips_do_not_count_as_failures() {
        let mut summary = RunSummary::default();
        summary.record(
            0,
            &TokenOutcome::Skipped {
                reason: "image src missing".into(),
            },
        );
        assert!(summary.is_success());
    }

    #[test]
    fn provider_kind_display_names() {
        assert_eq!(ProviderKind::Ipfs.to_string(), "IPFS");
        assert_eq!(ProviderKind::Opensea.to_string(), "OpenSea");
    }
}
