//! End-to-end tests for the route table, route groups and the communicator.

use {
    crate::{
        codec::{Codec, GetStatusCodec, PostTransactionsCodec, RouteId},
        communicator::{HeaderSource, PeerCommunicator, PeerTransport},
        config::P2pConfig,
        dispatcher::RouteTable,
        error::{P2pError, RejectionKind, Result},
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
            status::{BlockHeader, GetStatusResponse, WireGetStatusResponse},
            transactions::{
                PostTransactionsRequest, PostTransactionsResponse, WirePostTransactionsRequest,
            },
            Headers, PeerLike, WithHeaders,
        },
        route::{handler, Route, RouteConfig},
        routes::{
            BlocksController, BlocksRoute, ConsensusController, ConsensusRoute, PeerController,
            PeerRoute, TransactionsController, TransactionsRoute,
        },
        validation::reply::tests::{valid_headers, valid_status},
    },
    assert_matches::assert_matches,
    async_trait::async_trait,
    num_bigint::BigUint,
    prost::Message,
    std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A node whose controllers answer with canned data and count calls.
#[derive(Default)]
struct Node {
    calls: AtomicUsize,
    fail: bool,
    transactions: Mutex<Vec<Vec<u8>>>,
}

impl Node {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn called(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("storage unavailable at /var/lib/node/blocks");
        }
        Ok(())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn status_with_zero_amounts() -> GetStatusResponse {
    let mut status = valid_status();
    status.state.header = BlockHeader {
        id: "ab".repeat(32),
        height: 1,
        ..BlockHeader::default()
    };
    status
}

#[async_trait]
impl BlocksController for Node {
    async fn get_blocks(&self, request: GetBlocksRequest) -> anyhow::Result<GetBlocksResponse> {
        self.called()?;
        let count = usize::try_from(request.limit)?;
        Ok(GetBlocksResponse {
            headers: Some(valid_headers()),
            blocks: vec![vec![0xb1]; count],
        })
    }

    async fn get_common_blocks(
        &self,
        _request: GetCommonBlocksRequest,
    ) -> anyhow::Result<GetCommonBlocksResponse> {
        self.called()?;
        Ok(GetCommonBlocksResponse {
            common: None,
            headers: Some(valid_headers()),
        })
    }

    async fn post_block(&self, _request: PostBlockRequest) -> anyhow::Result<PostBlockResponse> {
        self.called()?;
        Ok(PostBlockResponse {
            status: true,
            height: 2,
            headers: Some(valid_headers()),
        })
    }
}

#[async_trait]
impl ConsensusController for Node {
    async fn get_messages(
        &self,
        _request: GetMessagesRequest,
    ) -> anyhow::Result<GetMessagesResponse> {
        self.called()?;
        Ok(GetMessagesResponse {
            headers: Some(valid_headers()),
            ..GetMessagesResponse::default()
        })
    }

    async fn get_proposal(
        &self,
        _request: GetProposalRequest,
    ) -> anyhow::Result<GetProposalResponse> {
        self.called()?;
        Ok(GetProposalResponse {
            headers: Some(valid_headers()),
            proposal: Vec::new(),
        })
    }

    async fn post_precommit(
        &self,
        _request: PostPrecommitRequest,
    ) -> anyhow::Result<PostPrecommitResponse> {
        self.called()?;
        // Height deliberately left out.
        Ok(PostPrecommitResponse {
            headers: Some(Headers::with_version("0.0.1")),
        })
    }

    async fn post_prevote(
        &self,
        _request: PostPrevoteRequest,
    ) -> anyhow::Result<PostPrevoteResponse> {
        self.called()?;
        Ok(PostPrevoteResponse {
            headers: Some(valid_headers()),
        })
    }

    async fn post_proposal(
        &self,
        _request: PostProposalRequest,
    ) -> anyhow::Result<PostProposalResponse> {
        self.called()?;
        Ok(PostProposalResponse {
            headers: Some(valid_headers()),
        })
    }
}

#[async_trait]
impl PeerController for Node {
    async fn get_api_nodes(
        &self,
        _request: GetApiNodesRequest,
    ) -> anyhow::Result<GetApiNodesResponse> {
        self.called()?;
        Ok(GetApiNodesResponse::default())
    }

    async fn get_peers(&self, _request: GetPeersRequest) -> anyhow::Result<GetPeersResponse> {
        self.called()?;
        Ok(GetPeersResponse {
            headers: None,
            peers: vec![PeerLike {
                ip: "10.0.0.7".into(),
                port: 4000,
                protocol: 1,
            }],
        })
    }

    async fn get_status(&self, _request: GetStatusRequest) -> anyhow::Result<GetStatusResponse> {
        self.called()?;
        Ok(status_with_zero_amounts())
    }
}

#[async_trait]
impl TransactionsController for Node {
    async fn post_transactions(
        &self,
        request: PostTransactionsRequest,
    ) -> anyhow::Result<PostTransactionsResponse> {
        self.called()?;
        let accept = (0..request.transactions.len())
            .map(u32::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.transactions
            .lock()
            .map_err(|_| anyhow::anyhow!("poisoned"))?
            .extend(request.transactions);
        Ok(PostTransactionsResponse {
            headers: Some(valid_headers()),
            accept,
        })
    }
}

fn table_for(node: &Arc<Node>, config: &P2pConfig) -> RouteTable {
    let blocks = BlocksRoute::new(Arc::clone(node));
    let consensus = ConsensusRoute::new(Arc::clone(node));
    let peer = PeerRoute::new(Arc::clone(node));
    let transactions = TransactionsRoute::new(Arc::clone(node));
    RouteTable::new(config, &[&blocks, &consensus, &peer, &transactions]).unwrap()
}

fn table(node: &Arc<Node>) -> RouteTable {
    table_for(node, &P2pConfig::default())
}

// ===========================================================================
// 1. Size gate runs before decoding
// ===========================================================================

static OPAQUE_DECODES: AtomicUsize = AtomicUsize::new(0);

/// Request type whose decoder only counts invocations and then fails.
struct Opaque;

impl WithHeaders for Opaque {
    fn headers(&self) -> Option<&Headers> {
        None
    }

    fn set_headers(&mut self, _headers: Headers) {}
}

struct CountingCodec;

impl Codec for CountingCodec {
    type Request = Opaque;
    type Response = ();

    fn serialize_request(_request: &Opaque) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn deserialize_request(_bytes: &[u8]) -> Result<Opaque> {
        OPAQUE_DECODES.fetch_add(1, Ordering::SeqCst);
        Err(P2pError::MalformedNumeric("counted".into()))
    }

    fn serialize_response(_response: &()) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    fn deserialize_response(_bytes: &[u8]) -> Result<()> {
        Ok(())
    }
}

struct CountingRoute;

impl Route for CountingRoute {
    fn routes(&self, _config: &P2pConfig) -> Vec<RouteConfig> {
        vec![RouteConfig::new::<CountingCodec>(
            "test.counting",
            "/counting",
            8,
            None,
            handler(|_request: Opaque| async { Ok(()) }),
        )]
    }
}

#[tokio::test]
async fn oversize_payload_never_reaches_codec() {
    init_logger();
    let table = RouteTable::new(&P2pConfig::default(), &[&CountingRoute]).unwrap();

    let err = table.dispatch("/counting", &[0u8; 9]).await.unwrap_err();
    assert_matches!(err, P2pError::PayloadTooLarge { size: 9, max: 8 });
    assert_eq!(OPAQUE_DECODES.load(Ordering::SeqCst), 0);

    let err = table.dispatch("/counting", &[0u8; 8]).await.unwrap_err();
    assert_eq!(err.kind(), RejectionKind::DecodeError);
    assert_eq!(OPAQUE_DECODES.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversize_garbage_is_rejected_as_too_large() {
    let node = Arc::new(Node::default());
    let table = table(&node);
    // Would fail to decode; the size gate answers first.
    let err = table
        .dispatch("/postPrecommit", &[0xff; 1_025])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), RejectionKind::PayloadTooLarge);
    assert_eq!(node.calls(), 0);
}

// ===========================================================================
// 2. Full pipeline per route
// ===========================================================================

#[tokio::test]
async fn get_status_roundtrip_keeps_zero_amounts() {
    init_logger();
    let node = Arc::new(Node::default());
    let table = table(&node);

    let request = GetStatusRequest {
        headers: Some(Headers::with_version("0.0.1")),
    };
    let bytes = GetStatusCodec::serialize_request(&request).unwrap();
    let reply = table.dispatch("/getStatus", &bytes).await.unwrap();

    let wire = WireGetStatusResponse::decode(reply.as_slice()).unwrap();
    let header = wire.state.unwrap().header.unwrap();
    assert_eq!(header.total_amount.as_deref(), Some("0"));
    assert_eq!(header.total_fee.as_deref(), Some("0"));
    assert_eq!(header.reward.as_deref(), Some("0"));

    let decoded = GetStatusCodec::deserialize_response(&reply).unwrap();
    let header = decoded.state.header;
    assert_eq!(header.total_amount, BigUint::default());
    assert_eq!(node.calls(), 1);
}

#[tokio::test]
async fn get_blocks_schema_rejects_before_handler() {
    let node = Arc::new(Node::default());
    let table = table(&node);

    let request = GetBlocksRequest {
        from_height: 1,
        limit: 0,
        headers: None,
    };
    let err = table
        .dispatch("/getBlocks", &request.encode_to_vec())
        .await
        .unwrap_err();
    assert_matches!(err, P2pError::Validation(ref reason) if reason.contains("limit"));
    assert_eq!(node.calls(), 0);

    let request = GetBlocksRequest {
        from_height: 1,
        limit: 3,
        headers: None,
    };
    let reply = table
        .dispatch("/getBlocks", &request.encode_to_vec())
        .await
        .unwrap();
    assert_eq!(GetBlocksResponse::decode(reply.as_slice()).unwrap().blocks.len(), 3);
}

#[tokio::test]
async fn get_common_blocks_rejects_bad_ids() {
    let node = Arc::new(Node::default());
    let table = table(&node);
    let request = GetCommonBlocksRequest {
        ids: vec!["not-a-block-id".into()],
        headers: None,
    };
    let err = table
        .dispatch("/getCommonBlocks", &request.encode_to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), RejectionKind::ValidationError);
}

#[tokio::test]
async fn empty_consensus_payloads_rejected() {
    let node = Arc::new(Node::default());
    let table = table(&node);
    for path in ["/postPrecommit", "/postPrevote", "/postProposal", "/postBlock"] {
        let err = table.dispatch(path, &[]).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::ValidationError, "{path}");
    }
    assert_eq!(node.calls(), 0);
}

#[tokio::test]
async fn malformed_bytes_are_decode_errors() {
    let node = Arc::new(Node::default());
    let table = table(&node);
    // Field 1 length-delimited, declares 5 bytes, has 1.
    let err = table
        .dispatch("/postPrevote", &[0x0a, 0x05, 0x01])
        .await
        .unwrap_err();
    assert_matches!(err, P2pError::Decode(_));
    assert_eq!(err.kind(), RejectionKind::DecodeError);
}

#[tokio::test]
async fn handler_failure_is_opaque() {
    let node = Arc::new(Node::failing());
    let table = table(&node);
    let err = table.dispatch("/getPeers", &[]).await.unwrap_err();
    assert_eq!(err.kind(), RejectionKind::HandlerError);
    assert_eq!(err.kind().as_str(), "handler_error");
    assert_eq!(node.calls(), 1);
}

// ===========================================================================
// 3. Version policy
// ===========================================================================

#[tokio::test]
async fn version_policy_applies_only_when_headers_present() {
    let node = Arc::new(Node::default());
    let config = P2pConfig {
        minimum_versions: vec!["1.0.0".into()],
        ..P2pConfig::default()
    };
    let table = table_for(&node, &config);

    let old = GetPeersRequest {
        headers: Some(Headers::with_version("0.0.1")),
    };
    let err = table
        .dispatch("/getPeers", &old.encode_to_vec())
        .await
        .unwrap_err();
    assert_matches!(err, P2pError::Validation(ref reason) if reason.contains("0.0.1"));

    let invalid = GetPeersRequest {
        headers: Some(Headers::with_version("one")),
    };
    assert!(table
        .dispatch("/getPeers", &invalid.encode_to_vec())
        .await
        .is_err());

    let current = GetPeersRequest {
        headers: Some(Headers::with_version("1.2.0")),
    };
    assert!(table
        .dispatch("/getPeers", &current.encode_to_vec())
        .await
        .is_ok());

    // No headers at all: nothing to check.
    assert!(table.dispatch("/getPeers", &[]).await.is_ok());
    assert_eq!(node.calls(), 2);
}

// ===========================================================================
// 4. Transactions
// ===========================================================================

#[tokio::test]
async fn post_transactions_delivers_batch_in_order() {
    let node = Arc::new(Node::default());
    let table = table(&node);
    let transactions = vec![vec![1u8; 10], vec![2u8; 20], vec![3u8; 30]];
    let request = PostTransactionsRequest {
        transactions: transactions.clone(),
        headers: Some(Headers::with_version("0.0.1")),
    };
    let bytes = PostTransactionsCodec::serialize_request(&request).unwrap();
    let reply = table.dispatch("/postTransactions", &bytes).await.unwrap();

    let response = PostTransactionsResponse::decode(reply.as_slice()).unwrap();
    assert_eq!(response.accept, vec![0, 1, 2]);
    assert_eq!(*node.transactions.lock().unwrap(), transactions);
}

#[tokio::test]
async fn post_transactions_over_request_limit() {
    let node = Arc::new(Node::default());
    let table = table(&node);
    let request = PostTransactionsRequest {
        transactions: vec![vec![9u8]; 41],
        headers: None,
    };
    let bytes = PostTransactionsCodec::serialize_request(&request).unwrap();
    let err = table.dispatch("/postTransactions", &bytes).await.unwrap_err();
    assert_eq!(err.kind(), RejectionKind::ValidationError);
    assert_eq!(node.calls(), 0);
}

#[tokio::test]
async fn post_transactions_truncated_batch() {
    let node = Arc::new(Node::default());
    let table = table(&node);
    let wire = WirePostTransactionsRequest {
        transactions: vec![0, 0, 0, 1, 0xaa, 0, 0, 0, 9, 0xbb],
        headers: None,
    };
    let err = table
        .dispatch("/postTransactions", &wire.encode_to_vec())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        P2pError::TruncatedTransaction {
            offset: 5,
            declared: 9,
            remaining: 1,
        }
    );
    assert_eq!(err.kind(), RejectionKind::DecodeError);
}

// ===========================================================================
// 5. Visibility
// ===========================================================================

#[test]
fn routes_internal_by_default() {
    let node = Arc::new(Node::default());
    let table = table(&node);
    assert_eq!(table.len(), RouteId::ALL.len());
    for route in RouteId::ALL {
        assert!(table.is_internal(route.path()), "{route}");
        assert_eq!(table.route(route.path()).unwrap().id, route.id());
    }
    assert!(table.public_paths().is_empty());
}

#[test]
fn development_mode_publishes_routes() {
    let node = Arc::new(Node::default());
    let config = P2pConfig {
        development_mode: true,
        ..P2pConfig::default()
    };
    let table = table_for(&node, &config);
    assert!(table.development_mode());
    let mut expected: Vec<_> = RouteId::ALL.iter().map(|r| r.path()).collect();
    expected.sort_unstable();
    assert_eq!(table.public_paths(), expected);
    assert_eq!(table.paths(), expected);
}

#[test]
fn route_limits() {
    let node = Arc::new(Node::default());
    let config = P2pConfig::default();
    let table = table_for(&node, &config);
    let max_bytes = |path: &str| table.route(path).unwrap().max_bytes;
    assert_eq!(max_bytes("/getStatus"), 1_024);
    assert_eq!(max_bytes("/postPrevote"), 1_024);
    assert_eq!(max_bytes("/getCommonBlocks"), 10_240);
    assert_eq!(max_bytes("/postBlock"), config.max_payload);
    assert_eq!(max_bytes("/postProposal"), config.max_payload);
    assert_eq!(max_bytes("/postTransactions"), config.max_payload);
}

// ===========================================================================
// 6. Concurrency
// ===========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatch_on_shared_table() {
    let node = Arc::new(Node::default());
    let table = Arc::new(table(&node));

    let tasks: Vec<_> = (0..32)
        .map(|_| {
            let table = Arc::clone(&table);
            tokio::spawn(async move { table.dispatch("/getPeers", &[]).await })
        })
        .collect();
    for task in tasks {
        let reply = task.await.unwrap().unwrap();
        assert_eq!(GetPeersResponse::decode(reply.as_slice()).unwrap().peers.len(), 1);
    }
    assert_eq!(node.calls(), 32);
}

// ===========================================================================
// 7. Communicator against a local route table
// ===========================================================================

/// Transport that dispatches straight into a local route table.
struct Loopback {
    table: RouteTable,
}

#[async_trait]
impl PeerTransport for Loopback {
    async fn emit(
        &self,
        _peer: &PeerLike,
        path: &str,
        payload: Vec<u8>,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(self.table.dispatch(path, &payload).await?)
    }
}

struct LocalHeaders;

impl HeaderSource for LocalHeaders {
    fn headers(&self) -> Headers {
        valid_headers()
    }
}

fn loopback(node: &Arc<Node>) -> PeerCommunicator<Loopback, LocalHeaders> {
    let config = P2pConfig::dev_default();
    let transport = Loopback {
        table: table_for(node, &config),
    };
    PeerCommunicator::new(config, Arc::new(transport), Arc::new(LocalHeaders))
}

fn local_peer() -> PeerLike {
    PeerLike {
        ip: "127.0.0.1".into(),
        port: 4000,
        protocol: 1,
    }
}

#[tokio::test]
async fn communicator_roundtrips_through_dispatcher() {
    init_logger();
    let node = Arc::new(Node::default());
    let communicator = loopback(&node);
    let peer = local_peer();

    let status = communicator.get_status(&peer, None).await.unwrap();
    assert_eq!(status, status_with_zero_amounts());

    let peers = communicator.get_peers(&peer).await.unwrap();
    assert_eq!(peers.peers[0].ip, "10.0.0.7");

    let blocks = communicator.get_blocks(&peer, 1, 5, None).await.unwrap();
    assert_eq!(blocks.blocks.len(), 5);

    assert_eq!(
        communicator
            .has_common_blocks(&peer, vec!["ab".repeat(32)])
            .await
            .unwrap(),
        None
    );
    assert!(communicator.post_prevote(&peer, vec![1]).await.is_ok());
    assert!(communicator.post_proposal(&peer, vec![1]).await.is_ok());
    assert!(communicator.post_block(&peer, vec![1]).await.unwrap().status);
    assert!(communicator.get_messages(&peer).await.is_ok());
    assert!(communicator.get_proposal(&peer).await.is_ok());
    assert!(communicator.get_api_nodes(&peer).await.is_ok());

    let accepted = communicator
        .post_transactions(&peer, vec![b"a".to_vec(), b"b".to_vec()])
        .await
        .unwrap();
    assert_eq!(accepted.accept, vec![0, 1]);
}

#[tokio::test]
async fn communicator_rejects_reply_without_height() {
    let node = Arc::new(Node::default());
    let communicator = loopback(&node);
    // The node answers /postPrecommit without a height; the reply is
    // default-filled to height 0 and fails the reply schema.
    assert_matches!(
        communicator.post_precommit(&local_peer(), vec![1]).await,
        Err(P2pError::ReplyValidation(_))
    );
}

#[tokio::test]
async fn communicator_surfaces_remote_rejection_as_transport_error() {
    let node = Arc::new(Node::default());
    let communicator = loopback(&node);
    // limit 0 is rejected by the remote request schema.
    assert_matches!(
        communicator.get_blocks(&local_peer(), 1, 0, None).await,
        Err(P2pError::Transport(_))
    );
}
