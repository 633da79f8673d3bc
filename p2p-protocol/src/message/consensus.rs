//! Consensus messages: proposals, prevotes and precommits.
//!
//! Payloads are opaque serialized consensus messages; signatures are
//! verified by the consensus layer.

use super::{impl_fill_headers, impl_with_headers, Headers};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMessagesRequest {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetMessagesResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub prevotes: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub precommits: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetProposalRequest {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
}

/// `proposal` is empty when the peer has none for the current round.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetProposalResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
    #[prost(bytes = "vec", tag = "2")]
    pub proposal: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostPrecommitRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub precommit: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostPrecommitResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostPrevoteRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub prevote: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostPrevoteResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostProposalRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub proposal: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub headers: Option<Headers>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostProposalResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
}

impl_with_headers!(
    GetMessagesRequest,
    GetMessagesResponse,
    GetProposalRequest,
    GetProposalResponse,
    PostPrecommitRequest,
    PostPrecommitResponse,
    PostPrevoteRequest,
    PostPrevoteResponse,
    PostProposalRequest,
    PostProposalResponse,
);

impl_fill_headers!(
    GetMessagesResponse,
    PostPrecommitResponse,
    PostProposalResponse
);
