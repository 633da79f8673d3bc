//! `/getStatus` response: wire structs and the domain model.
//!
//! The wire form carries monetary amounts as presence-tracked decimal
//! strings; the domain form holds them as [`BigUint`]. Conversion fails
//! closed when an amount is absent or malformed, and so when `state` or
//! `state.header` is absent: without them there are no amounts to read.

use {
    super::{impl_with_headers, FillDefaults, Headers},
    crate::{
        error::{P2pError, Result},
        numeric::{required_from_wire, to_wire_string},
    },
    num_bigint::BigUint,
    std::collections::HashMap,
};

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct WireBlockHeader {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(uint32, tag = "2")]
    pub version: u32,
    #[prost(uint64, tag = "3")]
    pub timestamp: u64,
    #[prost(string, tag = "4")]
    pub previous_block: String,
    #[prost(uint32, tag = "5")]
    pub height: u32,
    #[prost(uint32, tag = "6")]
    pub number_of_transactions: u32,
    #[prost(string, optional, tag = "7")]
    pub total_amount: Option<String>,
    #[prost(string, optional, tag = "8")]
    pub total_fee: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub reward: Option<String>,
    #[prost(uint32, tag = "10")]
    pub payload_length: u32,
    #[prost(string, tag = "11")]
    pub payload_hash: String,
    #[prost(string, tag = "12")]
    pub generator_public_key: String,
    #[prost(string, tag = "13")]
    pub block_signature: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct WireState {
    #[prost(uint32, tag = "1")]
    pub height: u32,
    #[prost(bool, tag = "2")]
    pub forging_allowed: bool,
    #[prost(uint32, tag = "3")]
    pub current_slot: u32,
    #[prost(message, optional, tag = "4")]
    pub header: Option<WireBlockHeader>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Token {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub symbol: String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Network {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub nethash: String,
    #[prost(string, tag = "3")]
    pub explorer: String,
    #[prost(message, optional, tag = "4")]
    pub token: Option<Token>,
    #[prost(uint32, tag = "5")]
    pub version: u32,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Plugin {
    #[prost(uint32, tag = "1")]
    pub port: u32,
    #[prost(bool, tag = "2")]
    pub enabled: bool,
    #[prost(bool, tag = "3")]
    pub estimate_total_count: bool,
}

/// Node software and network identity advertised to peers.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Config {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(message, optional, tag = "2")]
    pub network: Option<Network>,
    #[prost(map = "string, message", tag = "3")]
    pub plugins: HashMap<String, Plugin>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WireGetStatusResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
    #[prost(message, optional, tag = "2")]
    pub state: Option<WireState>,
    #[prost(message, optional, tag = "3")]
    pub config: Option<Config>,
}

/// Block header with exact monetary amounts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockHeader {
    pub id: String,
    pub version: u32,
    pub timestamp: u64,
    pub previous_block: String,
    pub height: u32,
    pub number_of_transactions: u32,
    pub total_amount: BigUint,
    pub total_fee: BigUint,
    pub reward: BigUint,
    pub payload_length: u32,
    pub payload_hash: String,
    pub generator_public_key: String,
    pub block_signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct State {
    pub height: u32,
    pub forging_allowed: bool,
    pub current_slot: u32,
    pub header: BlockHeader,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetStatusResponse {
    pub headers: Option<Headers>,
    pub state: State,
    pub config: Option<Config>,
}

impl TryFrom<WireBlockHeader> for BlockHeader {
    type Error = P2pError;

    fn try_from(wire: WireBlockHeader) -> Result<Self> {
        Ok(Self {
            total_amount: required_from_wire(wire.total_amount.as_deref(), "totalAmount")?,
            total_fee: required_from_wire(wire.total_fee.as_deref(), "totalFee")?,
            reward: required_from_wire(wire.reward.as_deref(), "reward")?,
            id: wire.id,
            version: wire.version,
            timestamp: wire.timestamp,
            previous_block: wire.previous_block,
            height: wire.height,
            number_of_transactions: wire.number_of_transactions,
            payload_length: wire.payload_length,
            payload_hash: wire.payload_hash,
            generator_public_key: wire.generator_public_key,
            block_signature: wire.block_signature,
        })
    }
}

impl From<BlockHeader> for WireBlockHeader {
    fn from(header: BlockHeader) -> Self {
        Self {
            total_amount: Some(to_wire_string(&header.total_amount)),
            total_fee: Some(to_wire_string(&header.total_fee)),
            reward: Some(to_wire_string(&header.reward)),
            id: header.id,
            version: header.version,
            timestamp: header.timestamp,
            previous_block: header.previous_block,
            height: header.height,
            number_of_transactions: header.number_of_transactions,
            payload_length: header.payload_length,
            payload_hash: header.payload_hash,
            generator_public_key: header.generator_public_key,
            block_signature: header.block_signature,
        }
    }
}

impl TryFrom<WireState> for State {
    type Error = P2pError;

    fn try_from(wire: WireState) -> Result<Self> {
        Ok(Self {
            height: wire.height,
            forging_allowed: wire.forging_allowed,
            current_slot: wire.current_slot,
            header: wire
                .header
                .ok_or(P2pError::MissingRequiredField("header"))?
                .try_into()?,
        })
    }
}

impl From<State> for WireState {
    fn from(state: State) -> Self {
        Self {
            height: state.height,
            forging_allowed: state.forging_allowed,
            current_slot: state.current_slot,
            header: Some(state.header.into()),
        }
    }
}

impl TryFrom<WireGetStatusResponse> for GetStatusResponse {
    type Error = P2pError;

    fn try_from(wire: WireGetStatusResponse) -> Result<Self> {
        Ok(Self {
            headers: wire.headers,
            state: wire
                .state
                .ok_or(P2pError::MissingRequiredField("state"))?
                .try_into()?,
            config: wire.config,
        })
    }
}

impl From<GetStatusResponse> for WireGetStatusResponse {
    fn from(response: GetStatusResponse) -> Self {
        Self {
            headers: response.headers,
            state: Some(response.state.into()),
            config: response.config,
        }
    }
}

impl FillDefaults for WireGetStatusResponse {
    fn fill_defaults(&mut self) {
        self.headers.fill_defaults();
    }
}

impl_with_headers!(WireGetStatusResponse, GetStatusResponse);
