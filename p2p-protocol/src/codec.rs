//! Per-route message codecs.
//!
//! A codec is a stateless type with symmetric request/response
//! serialization. Each route binds its codec statically; [`RouteId`] is the
//! registry of paths, observability ids and codec types.

use {
    crate::{
        error::Result,
        message::{
            blocks::{
                GetBlocksRequest, GetBlocksResponse, GetCommonBlocksRequest,
                GetCommonBlocksResponse, PostBlockRequest, PostBlockResponse,
            },
            consensus::{
                GetMessagesRequest, GetMessagesResponse, GetProposalRequest, GetProposalResponse,
                PostPrecommitRequest, PostPrecommitResponse, PostPrevoteRequest,
                PostPrevoteResponse, PostProposalRequest, PostProposalResponse,
            },
            peer::{
                GetApiNodesRequest, GetApiNodesResponse, GetPeersRequest, GetPeersResponse,
                GetStatusRequest,
            },
            status::{GetStatusResponse, WireGetStatusResponse},
            transactions::{
                PostTransactionsRequest, PostTransactionsResponse, WirePostTransactionsRequest,
            },
            FillDefaults,
        },
    },
    prost::Message,
    std::{fmt, marker::PhantomData},
};

/// Symmetric serialization for one route.
pub trait Codec: Send + Sync + 'static {
    type Request: Send + 'static;
    type Response: Send + 'static;

    fn serialize_request(request: &Self::Request) -> Result<Vec<u8>>;
    fn deserialize_request(bytes: &[u8]) -> Result<Self::Request>;
    fn serialize_response(response: &Self::Response) -> Result<Vec<u8>>;
    fn deserialize_response(bytes: &[u8]) -> Result<Self::Response>;
}

// ── Generic codecs ──────────────────────────────────────────────────────────

/// Plain prost codec: the wire struct is the domain type.
pub struct ProtoCodec<Req, Res>(PhantomData<fn() -> (Req, Res)>);

impl<Req, Res> Codec for ProtoCodec<Req, Res>
where
    Req: Message + Default + 'static,
    Res: Message + Default + 'static,
{
    type Request = Req;
    type Response = Res;

    fn serialize_request(request: &Req) -> Result<Vec<u8>> {
        Ok(request.encode_to_vec())
    }

    fn deserialize_request(bytes: &[u8]) -> Result<Req> {
        Ok(Req::decode(bytes)?)
    }

    fn serialize_response(response: &Res) -> Result<Vec<u8>> {
        Ok(response.encode_to_vec())
    }

    fn deserialize_response(bytes: &[u8]) -> Result<Res> {
        Ok(Res::decode(bytes)?)
    }
}

/// Prost codec that materializes absent optional scalars on decoded
/// responses (see [`FillDefaults`]).
pub struct DefaultFillingCodec<Req, Res>(PhantomData<fn() -> (Req, Res)>);

impl<Req, Res> Codec for DefaultFillingCodec<Req, Res>
where
    Req: Message + Default + 'static,
    Res: Message + Default + FillDefaults + 'static,
{
    type Request = Req;
    type Response = Res;

    fn serialize_request(request: &Req) -> Result<Vec<u8>> {
        Ok(request.encode_to_vec())
    }

    fn deserialize_request(bytes: &[u8]) -> Result<Req> {
        Ok(Req::decode(bytes)?)
    }

    fn serialize_response(response: &Res) -> Result<Vec<u8>> {
        Ok(response.encode_to_vec())
    }

    fn deserialize_response(bytes: &[u8]) -> Result<Res> {
        let mut response = Res::decode(bytes)?;
        response.fill_defaults();
        Ok(response)
    }
}

// ── Route-specific codecs ───────────────────────────────────────────────────

/// `/getStatus`: default-filling plus exact monetary conversion.
pub struct GetStatusCodec;

impl Codec for GetStatusCodec {
    type Request = GetStatusRequest;
    type Response = GetStatusResponse;

    fn serialize_request(request: &GetStatusRequest) -> Result<Vec<u8>> {
        Ok(request.encode_to_vec())
    }

    fn deserialize_request(bytes: &[u8]) -> Result<GetStatusRequest> {
        Ok(GetStatusRequest::decode(bytes)?)
    }

    fn serialize_response(response: &GetStatusResponse) -> Result<Vec<u8>> {
        Ok(WireGetStatusResponse::from(response.clone()).encode_to_vec())
    }

    fn deserialize_response(bytes: &[u8]) -> Result<GetStatusResponse> {
        let mut wire = WireGetStatusResponse::decode(bytes)?;
        wire.fill_defaults();
        GetStatusResponse::try_from(wire)
    }
}

/// `/postTransactions`: batch framing inside the request's bytes field.
pub struct PostTransactionsCodec;

impl Codec for PostTransactionsCodec {
    type Request = PostTransactionsRequest;
    type Response = PostTransactionsResponse;

    fn serialize_request(request: &PostTransactionsRequest) -> Result<Vec<u8>> {
        Ok(request.to_wire()?.encode_to_vec())
    }

    fn deserialize_request(bytes: &[u8]) -> Result<PostTransactionsRequest> {
        PostTransactionsRequest::from_wire(WirePostTransactionsRequest::decode(bytes)?)
    }

    fn serialize_response(response: &PostTransactionsResponse) -> Result<Vec<u8>> {
        Ok(response.encode_to_vec())
    }

    fn deserialize_response(bytes: &[u8]) -> Result<PostTransactionsResponse> {
        Ok(PostTransactionsResponse::decode(bytes)?)
    }
}

// ── Registry ────────────────────────────────────────────────────────────────

pub type GetApiNodesCodec = DefaultFillingCodec<GetApiNodesRequest, GetApiNodesResponse>;
pub type GetBlocksCodec = ProtoCodec<GetBlocksRequest, GetBlocksResponse>;
pub type GetCommonBlocksCodec = ProtoCodec<GetCommonBlocksRequest, GetCommonBlocksResponse>;
pub type GetMessagesCodec = DefaultFillingCodec<GetMessagesRequest, GetMessagesResponse>;
pub type GetPeersCodec = ProtoCodec<GetPeersRequest, GetPeersResponse>;
pub type GetProposalCodec = ProtoCodec<GetProposalRequest, GetProposalResponse>;
pub type PostBlockCodec = ProtoCodec<PostBlockRequest, PostBlockResponse>;
pub type PostPrecommitCodec = DefaultFillingCodec<PostPrecommitRequest, PostPrecommitResponse>;
pub type PostPrevoteCodec = ProtoCodec<PostPrevoteRequest, PostPrevoteResponse>;
pub type PostProposalCodec = DefaultFillingCodec<PostProposalRequest, PostProposalResponse>;

/// Every route of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    GetApiNodes,
    GetBlocks,
    GetCommonBlocks,
    GetMessages,
    GetPeers,
    GetProposal,
    GetStatus,
    PostBlock,
    PostPrecommit,
    PostPrevote,
    PostProposal,
    PostTransactions,
}

impl RouteId {
    pub const ALL: [RouteId; 12] = [
        Self::GetApiNodes,
        Self::GetBlocks,
        Self::GetCommonBlocks,
        Self::GetMessages,
        Self::GetPeers,
        Self::GetProposal,
        Self::GetStatus,
        Self::PostBlock,
        Self::PostPrecommit,
        Self::PostPrevote,
        Self::PostProposal,
        Self::PostTransactions,
    ];

    /// Request path on the wire.
    pub const fn path(self) -> &'static str {
        match self {
            Self::GetApiNodes => "/getApiNodes",
            Self::GetBlocks => "/getBlocks",
            Self::GetCommonBlocks => "/getCommonBlocks",
            Self::GetMessages => "/getMessages",
            Self::GetPeers => "/getPeers",
            Self::GetProposal => "/getProposal",
            Self::GetStatus => "/getStatus",
            Self::PostBlock => "/postBlock",
            Self::PostPrecommit => "/postPrecommit",
            Self::PostPrevote => "/postPrevote",
            Self::PostProposal => "/postProposal",
            Self::PostTransactions => "/postTransactions",
        }
    }

    /// Observability id; never affects dispatch.
    pub const fn id(self) -> &'static str {
        match self {
            Self::GetApiNodes => "p2p.peer.getApiNodes",
            Self::GetBlocks => "p2p.blocks.getBlocks",
            Self::GetCommonBlocks => "p2p.blocks.getCommonBlocks",
            Self::GetMessages => "p2p.consensus.getMessages",
            Self::GetPeers => "p2p.peer.getPeers",
            Self::GetProposal => "p2p.consensus.getProposal",
            Self::GetStatus => "p2p.peer.getStatus",
            Self::PostBlock => "p2p.blocks.postBlock",
            Self::PostPrecommit => "p2p.consensus.postPrecommit",
            Self::PostPrevote => "p2p.consensus.postPrevote",
            Self::PostProposal => "p2p.consensus.postProposal",
            Self::PostTransactions => "p2p.transactions.postTransactions",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
