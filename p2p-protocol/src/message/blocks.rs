//! Block synchronization messages: `/getBlocks`, `/getCommonBlocks`, `/postBlock`.

use super::{impl_with_headers, Headers};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlocksRequest {
    #[prost(uint32, tag = "1")]
    pub from_height: u32,
    #[prost(uint32, tag = "2")]
    pub limit: u32,
    #[prost(message, optional, tag = "3")]
    pub headers: Option<Headers>,
}

/// Serialized blocks in ascending height order.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetBlocksResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub blocks: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetCommonBlocksRequest {
    #[prost(string, repeated, tag = "1")]
    pub ids: Vec<String>,
    #[prost(message, optional, tag = "2")]
    pub headers: Option<Headers>,
}

/// Highest block both peers agree on.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Common {
    #[prost(uint32, tag = "1")]
    pub height: u32,
    #[prost(string, tag = "2")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetCommonBlocksResponse {
    #[prost(message, optional, tag = "1")]
    pub common: Option<Common>,
    #[prost(message, optional, tag = "2")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostBlockRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub block: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostBlockResponse {
    #[prost(bool, tag = "1")]
    pub status: bool,
    #[prost(uint32, tag = "2")]
    pub height: u32,
    #[prost(message, optional, tag = "3")]
    pub headers: Option<Headers>,
}

impl_with_headers!(
    GetBlocksRequest,
    GetBlocksResponse,
    GetCommonBlocksRequest,
    GetCommonBlocksResponse,
    PostBlockRequest,
    PostBlockResponse,
);
