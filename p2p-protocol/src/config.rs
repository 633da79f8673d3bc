//! Configuration for the p2p wire-protocol layer.

use serde::{Deserialize, Serialize};

/// Environment variable that switches on development mode at startup.
pub const DEVELOPMENT_MODE_ENV: &str = "TRV1_P2P_DEVELOPMENT_MODE";

/// Configuration for the p2p route table and peer communicator.
///
/// Read once when the route table is built; nothing here is consulted
/// per request after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct P2pConfig {
    /// When enabled, routes are advertised publicly instead of being
    /// tagged internal-only. Does not change the dispatch pipeline.
    pub development_mode: bool,

    /// Minimum protocol versions accepted in request headers.
    /// A header version passes if it is `>=` any entry. Empty accepts any
    /// well-formed version.
    pub minimum_versions: Vec<String>,

    /// Ceiling for the large inbound routes (`/postBlock`, `/postProposal`,
    /// `/postTransactions`).
    pub max_payload: usize,

    /// Ceiling for replies read by the peer communicator.
    pub max_payload_client: usize,

    /// Maximum number of transactions accepted in one `/postTransactions`.
    pub max_transactions_per_request: usize,

    /// Maximum blocks requested or returned by `/getBlocks`.
    pub max_download_blocks: u32,

    /// Maximum block ids in one `/getCommonBlocks` request.
    pub max_common_block_ids: usize,

    /// Maximum peers accepted in a `/getPeers` reply.
    pub max_peers_getpeers: usize,

    /// Timeout for outbound `/getBlocks` (ms).
    pub get_blocks_timeout_ms: u64,

    /// Timeout for outbound queries such as `/getStatus` and `/getPeers` (ms).
    pub query_timeout_ms: u64,

    /// Timeout for outbound posts (proposals, votes, blocks, transactions) (ms).
    pub post_timeout_ms: u64,
}

impl Default for P2pConfig {
    fn default() -> Self {
        Self {
            development_mode: false,
            minimum_versions: Vec::new(),
            max_payload: 20_971_520,        // 20 MiB
            max_payload_client: 20_971_520, // 20 MiB
            max_transactions_per_request: 40,
            max_download_blocks: 400,
            max_common_block_ids: 10,
            max_peers_getpeers: 2_000,
            get_blocks_timeout_ms: 30_000,
            query_timeout_ms: 5_000,
            post_timeout_ms: 10_000,
        }
    }
}

impl P2pConfig {
    /// Apply overrides from the process environment.
    ///
    /// Only [`DEVELOPMENT_MODE_ENV`] is recognised; `true` or `1` enables
    /// development mode, anything else leaves the configured value alone.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var(DEVELOPMENT_MODE_ENV) {
            if let Some(enabled) = parse_flag(&value) {
                self.development_mode = enabled;
            }
        }
        self
    }

    /// Create a config suitable for local testing with shorter timeouts.
    #[cfg(any(test, feature = "dev-context-only-utils"))]
    pub fn dev_default() -> Self {
        Self {
            development_mode: true,
            max_payload: 1_048_576,
            max_payload_client: 1_048_576,
            get_blocks_timeout_ms: 1_000,
            query_timeout_ms: 500,
            post_timeout_ms: 500,
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = P2pConfig::default();
        assert!(!cfg.development_mode);
        assert!(cfg.minimum_versions.is_empty());
        assert_eq!(cfg.max_payload, 20 * 1024 * 1024);
        assert_eq!(cfg.max_transactions_per_request, 40);
        assert_eq!(cfg.max_download_blocks, 400);
        assert_eq!(cfg.max_common_block_ids, 10);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_serde_partial_config_uses_defaults() {
        let cfg: P2pConfig =
            serde_json::from_str(r#"{"developmentMode": true, "minimumVersions": ["0.1.0"]}"#)
                .unwrap();
        assert!(cfg.development_mode);
        assert_eq!(cfg.minimum_versions, vec!["0.1.0".to_string()]);
        assert_eq!(cfg.max_payload, P2pConfig::default().max_payload);
    }

    #[test]
    fn test_serde_roundtrip() {
        let cfg = P2pConfig::dev_default();
        let json = serde_json::to_string(&cfg).unwrap();
        let decoded: P2pConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, decoded);
    }
}
