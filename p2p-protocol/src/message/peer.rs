//! Peer queries: `/getApiNodes`, `/getPeers`, and the `/getStatus` request.

use super::{impl_fill_headers, impl_with_headers, Headers, PeerLike};

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ApiNode {
    #[prost(string, tag = "1")]
    pub url: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetApiNodesRequest {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetApiNodesResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
    #[prost(message, repeated, tag = "2")]
    pub api_nodes: Vec<ApiNode>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetPeersRequest {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetPeersResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
    #[prost(message, repeated, tag = "2")]
    pub peers: Vec<PeerLike>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetStatusRequest {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
}

impl_with_headers!(
    GetApiNodesRequest,
    GetApiNodesResponse,
    GetPeersRequest,
    GetPeersResponse,
    GetStatusRequest,
);

impl_fill_headers!(GetApiNodesResponse);
