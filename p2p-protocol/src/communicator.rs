//! Outbound requests to peers.
//!
//! [`PeerCommunicator`] mirrors the dispatcher for the client side: attach
//! local headers, serialize, emit through a [`PeerTransport`] under a
//! timeout, bound the reply size, decode, then check the reply schema.

use {
    crate::{
        codec::{
            Codec, GetApiNodesCodec, GetBlocksCodec, GetCommonBlocksCodec, GetMessagesCodec,
            GetPeersCodec, GetProposalCodec, GetStatusCodec, PostBlockCodec, PostPrecommitCodec,
            PostPrevoteCodec, PostProposalCodec, PostTransactionsCodec, RouteId,
        },
        config::P2pConfig,
        error::{P2pError, Result},
        message::{
            blocks::{
                Common, GetBlocksRequest, GetBlocksResponse, GetCommonBlocksRequest,
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
            status::GetStatusResponse,
            transactions::{PostTransactionsRequest, PostTransactionsResponse},
            Headers, PeerLike, WithHeaders,
        },
        validation::{reply, Schema},
    },
    async_trait::async_trait,
    log::{debug, warn},
    std::{sync::Arc, time::Duration},
};

/// Delivers a framed request to a peer and returns the raw reply.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn emit(&self, peer: &PeerLike, path: &str, payload: Vec<u8>)
        -> anyhow::Result<Vec<u8>>;
}

/// Supplies the local node's current consensus headers.
pub trait HeaderSource: Send + Sync {
    fn headers(&self) -> Headers;
}

struct ReplySchemas {
    get_blocks: Schema<GetBlocksResponse>,
    get_common_blocks: Schema<GetCommonBlocksResponse>,
    get_messages: Schema<GetMessagesResponse>,
    get_peers: Schema<GetPeersResponse>,
    get_proposal: Schema<GetProposalResponse>,
    get_status: Schema<GetStatusResponse>,
    post_precommit: Schema<PostPrecommitResponse>,
    post_prevote: Schema<PostPrevoteResponse>,
    post_proposal: Schema<PostProposalResponse>,
}

impl ReplySchemas {
    fn new(config: &P2pConfig) -> Self {
        Self {
            get_blocks: reply::get_blocks(config),
            get_common_blocks: reply::get_common_blocks(),
            get_messages: reply::get_messages(),
            get_peers: reply::get_peers(config),
            get_proposal: reply::get_proposal(),
            get_status: reply::get_status(),
            post_precommit: reply::post_precommit(),
            post_prevote: reply::post_prevote(),
            post_proposal: reply::post_proposal(),
        }
    }
}

/// Per-call limits for one outbound request.
struct Emit<'a, R> {
    route: RouteId,
    timeout_ms: u64,
    max_reply_bytes: usize,
    schema: Option<&'a Schema<R>>,
}

pub struct PeerCommunicator<T, H> {
    transport: Arc<T>,
    header_source: Arc<H>,
    config: P2pConfig,
    schemas: ReplySchemas,
}

impl<T: PeerTransport, H: HeaderSource> PeerCommunicator<T, H> {
    pub fn new(config: P2pConfig, transport: Arc<T>, header_source: Arc<H>) -> Self {
        Self {
            schemas: ReplySchemas::new(&config),
            transport,
            header_source,
            config,
        }
    }

    async fn emit<C>(
        &self,
        peer: &PeerLike,
        mut request: C::Request,
        call: Emit<'_, C::Response>,
    ) -> Result<C::Response>
    where
        C: Codec,
        C::Request: WithHeaders,
    {
        let path = call.route.path();
        request.set_headers(self.header_source.headers());
        let payload = C::serialize_request(&request)?;

        debug!(
            "emitting {path} to {}:{} ({} bytes)",
            peer.ip,
            peer.port,
            payload.len()
        );
        let reply = tokio::time::timeout(
            Duration::from_millis(call.timeout_ms),
            self.transport.emit(peer, path, payload),
        )
        .await
        .map_err(|_| P2pError::Timeout(call.timeout_ms))?
        .map_err(P2pError::Transport)?;

        if reply.len() > call.max_reply_bytes {
            warn!(
                "{path} reply from {} is {} bytes, limit {}",
                peer.ip,
                reply.len(),
                call.max_reply_bytes
            );
            return Err(P2pError::PayloadTooLarge {
                size: reply.len(),
                max: call.max_reply_bytes,
            });
        }

        let response = C::deserialize_response(&reply)?;
        if let Some(schema) = call.schema {
            if let Err(reason) = schema(&response) {
                warn!("{path} reply from {} failed validation: {reason}", peer.ip);
                return Err(P2pError::ReplyValidation(reason));
            }
        }
        Ok(response)
    }

    fn query<'a, R>(&self, route: RouteId, schema: Option<&'a Schema<R>>) -> Emit<'a, R> {
        Emit {
            route,
            timeout_ms: self.config.query_timeout_ms,
            max_reply_bytes: self.config.max_payload_client,
            schema,
        }
    }

    fn post<'a, R>(&self, route: RouteId, schema: Option<&'a Schema<R>>) -> Emit<'a, R> {
        Emit {
            route,
            timeout_ms: self.config.post_timeout_ms,
            max_reply_bytes: self.config.max_payload_client,
            schema,
        }
    }

    /// Query a peer's status. `timeout_ms` can only shorten the configured
    /// query timeout.
    pub async fn get_status(
        &self,
        peer: &PeerLike,
        timeout_ms: Option<u64>,
    ) -> Result<GetStatusResponse> {
        let mut call = self.query(RouteId::GetStatus, Some(&self.schemas.get_status));
        if let Some(timeout_ms) = timeout_ms {
            call.timeout_ms = call.timeout_ms.min(timeout_ms);
        }
        self.emit::<GetStatusCodec>(peer, GetStatusRequest::default(), call)
            .await
    }

    pub async fn get_peers(&self, peer: &PeerLike) -> Result<GetPeersResponse> {
        let call = self.query(RouteId::GetPeers, Some(&self.schemas.get_peers));
        self.emit::<GetPeersCodec>(peer, GetPeersRequest::default(), call)
            .await
    }

    pub async fn get_api_nodes(&self, peer: &PeerLike) -> Result<GetApiNodesResponse> {
        let call = self.query(RouteId::GetApiNodes, None);
        self.emit::<GetApiNodesCodec>(peer, GetApiNodesRequest::default(), call)
            .await
    }

    pub async fn get_messages(&self, peer: &PeerLike) -> Result<GetMessagesResponse> {
        let call = self.query(RouteId::GetMessages, Some(&self.schemas.get_messages));
        self.emit::<GetMessagesCodec>(peer, GetMessagesRequest::default(), call)
            .await
    }

    pub async fn get_proposal(&self, peer: &PeerLike) -> Result<GetProposalResponse> {
        let call = self.query(RouteId::GetProposal, Some(&self.schemas.get_proposal));
        self.emit::<GetProposalCodec>(peer, GetProposalRequest::default(), call)
            .await
    }

    /// Download up to `limit` blocks starting at `from_height`.
    ///
    /// `max_reply_bytes` overrides `max_payload_client` for this call.
    pub async fn get_blocks(
        &self,
        peer: &PeerLike,
        from_height: u32,
        limit: u32,
        max_reply_bytes: Option<usize>,
    ) -> Result<GetBlocksResponse> {
        let call = Emit {
            route: RouteId::GetBlocks,
            timeout_ms: self.config.get_blocks_timeout_ms,
            max_reply_bytes: max_reply_bytes.unwrap_or(self.config.max_payload_client),
            schema: Some(&self.schemas.get_blocks),
        };
        let request = GetBlocksRequest {
            from_height,
            limit,
            headers: None,
        };
        self.emit::<GetBlocksCodec>(peer, request, call).await
    }

    /// Ask a peer which of `ids` it holds; returns the highest common block.
    pub async fn has_common_blocks(
        &self,
        peer: &PeerLike,
        ids: Vec<String>,
    ) -> Result<Option<Common>> {
        let call = self.query(
            RouteId::GetCommonBlocks,
            Some(&self.schemas.get_common_blocks),
        );
        let request = GetCommonBlocksRequest { ids, headers: None };
        let response = self
            .emit::<GetCommonBlocksCodec>(peer, request, call)
            .await?;
        Ok(response.common)
    }

    pub async fn post_block(&self, peer: &PeerLike, block: Vec<u8>) -> Result<PostBlockResponse> {
        let call = self.post(RouteId::PostBlock, None);
        let request = PostBlockRequest {
            block,
            headers: None,
        };
        self.emit::<PostBlockCodec>(peer, request, call).await
    }

    pub async fn post_proposal(
        &self,
        peer: &PeerLike,
        proposal: Vec<u8>,
    ) -> Result<PostProposalResponse> {
        let call = self.post(RouteId::PostProposal, Some(&self.schemas.post_proposal));
        let request = PostProposalRequest {
            proposal,
            headers: None,
        };
        self.emit::<PostProposalCodec>(peer, request, call).await
    }

    pub async fn post_prevote(
        &self,
        peer: &PeerLike,
        prevote: Vec<u8>,
    ) -> Result<PostPrevoteResponse> {
        let call = self.post(RouteId::PostPrevote, Some(&self.schemas.post_prevote));
        let request = PostPrevoteRequest {
            prevote,
            headers: None,
        };
        self.emit::<PostPrevoteCodec>(peer, request, call).await
    }

    pub async fn post_precommit(
        &self,
        peer: &PeerLike,
        precommit: Vec<u8>,
    ) -> Result<PostPrecommitResponse> {
        let call = self.post(RouteId::PostPrecommit, Some(&self.schemas.post_precommit));
        let request = PostPrecommitRequest {
            precommit,
            headers: None,
        };
        self.emit::<PostPrecommitCodec>(peer, request, call).await
    }

    pub async fn post_transactions(
        &self,
        peer: &PeerLike,
        transactions: Vec<Vec<u8>>,
    ) -> Result<PostTransactionsResponse> {
        let call = self.post(RouteId::PostTransactions, None);
        let request = PostTransactionsRequest {
            transactions,
            headers: None,
        };
        self.emit::<PostTransactionsCodec>(peer, request, call)
            .await
    }
}
