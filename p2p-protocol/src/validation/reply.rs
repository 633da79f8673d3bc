//! Schemas for replies received from peers.
//!
//! `/getApiNodes`, `/postBlock` and `/postTransactions` replies are accepted
//! without a schema.

use {
    super::{ensure, is_block_id, Schema, SchemaResult},
    crate::{
        config::P2pConfig,
        message::{
            blocks::{GetBlocksResponse, GetCommonBlocksResponse},
            consensus::{
                GetMessagesResponse, GetProposalResponse, PostPrecommitResponse,
                PostPrevoteResponse, PostProposalResponse,
            },
            peer::GetPeersResponse,
            status::{Config, GetStatusResponse, Network},
            Headers, Step, WithHeaders,
        },
    },
    std::{net::IpAddr, ops::RangeInclusive, sync::Arc},
};

const MAX_PORT: u32 = u16::MAX as u32;
const MAX_PROTOCOL: u32 = u8::MAX as u32;
const MAX_PLUGINS: usize = 32;
const MAX_NETWORK_VERSION: u32 = u8::MAX as u32;

/// Headers a peer must attach to every reply that carries them.
///
/// Peers encode `height`, `round` and `step` as plain proto3 scalars, so a
/// zero value never reaches the wire. An absent scalar reads as 0.
pub fn check_headers(headers: Option<&Headers>) -> SchemaResult {
    let headers = headers.ok_or_else(|| "headers are required".to_owned())?;
    let height = headers.height.unwrap_or_default();
    ensure(height >= 1, || {
        format!("headers.height must be >= 1, got {height}")
    })?;
    let step = headers.step.unwrap_or_default();
    ensure(step <= Step::Precommit as u32, || {
        format!("headers.step must be <= 2, got {step}")
    })?;
    match headers.proposed_block_id.as_deref() {
        Some(id) if !is_block_id(id) => {
            Err("headers.proposedBlockId is not a block id".to_owned())
        }
        _ => Ok(()),
    }
}

fn headers_only<T: WithHeaders + 'static>() -> Schema<T> {
    Arc::new(|reply: &T| check_headers(reply.headers()))
}

fn check_len(field: &str, value: &str, range: RangeInclusive<usize>) -> SchemaResult {
    let len = value.chars().count();
    ensure(range.contains(&len), || {
        format!(
            "{field} length must be in {}..={}, got {len}",
            range.start(),
            range.end()
        )
    })
}

pub fn get_blocks(config: &P2pConfig) -> Schema<GetBlocksResponse> {
    let max_blocks = usize::try_from(config.max_download_blocks).unwrap_or(usize::MAX);
    Arc::new(move |reply: &GetBlocksResponse| {
        check_headers(reply.headers.as_ref())?;
        ensure(reply.blocks.len() <= max_blocks, || {
            format!("at most {max_blocks} blocks, got {}", reply.blocks.len())
        })
    })
}

pub fn get_common_blocks() -> Schema<GetCommonBlocksResponse> {
    Arc::new(|reply: &GetCommonBlocksResponse| {
        check_headers(reply.headers.as_ref())?;
        let Some(common) = &reply.common else {
            return Ok(());
        };
        ensure(common.height >= 1, || {
            format!("common.height must be >= 1, got {}", common.height)
        })?;
        ensure(is_block_id(&common.id), || {
            "common.id is not a block id".to_owned()
        })
    })
}

pub fn get_messages() -> Schema<GetMessagesResponse> {
    headers_only()
}

pub fn get_proposal() -> Schema<GetProposalResponse> {
    headers_only()
}

pub fn post_precommit() -> Schema<PostPrecommitResponse> {
    headers_only()
}

pub fn post_prevote() -> Schema<PostPrevoteResponse> {
    headers_only()
}

pub fn post_proposal() -> Schema<PostProposalResponse> {
    headers_only()
}

pub fn get_peers(config: &P2pConfig) -> Schema<GetPeersResponse> {
    let max_peers = config.max_peers_getpeers;
    Arc::new(move |reply: &GetPeersResponse| {
        ensure(reply.peers.len() <= max_peers, || {
            format!("at most {max_peers} peers, got {}", reply.peers.len())
        })?;
        for (index, peer) in reply.peers.iter().enumerate() {
            ensure(peer.ip.parse::<IpAddr>().is_ok(), || {
                format!("peers[{index}].ip {:?} is not an IP address", peer.ip)
            })?;
            ensure(peer.port <= MAX_PORT, || {
                format!("peers[{index}].port {} is out of range", peer.port)
            })?;
            ensure(peer.protocol <= MAX_PROTOCOL, || {
                format!("peers[{index}].protocol {} is out of range", peer.protocol)
            })?;
        }
        Ok(())
    })
}

fn check_network(network: &Network) -> SchemaResult {
    check_len("config.network.name", &network.name, 1..=20)?;
    ensure(is_block_id(&network.nethash), || {
        "config.network.nethash must be 64 hex characters".to_owned()
    })?;
    check_len("config.network.explorer", &network.explorer, 0..=128)?;
    let token = network
        .token
        .as_ref()
        .ok_or_else(|| "config.network.token is required".to_owned())?;
    check_len("config.network.token.name", &token.name, 1..=8)?;
    check_len("config.network.token.symbol", &token.symbol, 1..=4)?;
    ensure(network.version <= MAX_NETWORK_VERSION, || {
        format!("config.network.version {} is out of range", network.version)
    })
}

fn check_config(config: &Config) -> SchemaResult {
    check_len("config.version", &config.version, 5..=24)?;
    let network = config
        .network
        .as_ref()
        .ok_or_else(|| "config.network is required".to_owned())?;
    check_network(network)?;
    ensure(config.plugins.len() <= MAX_PLUGINS, || {
        format!(
            "at most {MAX_PLUGINS} plugins, got {}",
            config.plugins.len()
        )
    })?;
    for (name, plugin) in &config.plugins {
        check_len("config.plugins key", name, 4..=64)?;
        ensure(plugin.port <= MAX_PORT, || {
            format!("config.plugins[{name}].port {} is out of range", plugin.port)
        })?;
    }
    Ok(())
}

pub fn get_status() -> Schema<GetStatusResponse> {
    Arc::new(|reply: &GetStatusResponse| {
        check_headers(reply.headers.as_ref())?;
        let state = &reply.state;
        ensure(state.height >= 1, || {
            format!("state.height must be >= 1, got {}", state.height)
        })?;
        let config = reply
            .config
            .as_ref()
            .ok_or_else(|| "config is required".to_owned())?;
        check_config(config)
    })
}
