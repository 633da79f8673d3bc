use {
    super::bind,
    crate::{
        codec::{GetApiNodesCodec, GetPeersCodec, GetStatusCodec, RouteId},
        config::P2pConfig,
        message::{
            peer::{
                GetApiNodesRequest, GetApiNodesResponse, GetPeersRequest, GetPeersResponse,
                GetStatusRequest,
            },
            status::GetStatusResponse,
        },
        route::{Route, RouteConfig, SMALL_PAYLOAD},
    },
    async_trait::async_trait,
    std::sync::Arc,
};

#[async_trait]
pub trait PeerController: Send + Sync + 'static {
    async fn get_api_nodes(
        &self,
        request: GetApiNodesRequest,
    ) -> anyhow::Result<GetApiNodesResponse>;

    async fn get_peers(&self, request: GetPeersRequest) -> anyhow::Result<GetPeersResponse>;

    async fn get_status(&self, request: GetStatusRequest) -> anyhow::Result<GetStatusResponse>;
}

/// `/getApiNodes`, `/getPeers` and `/getStatus`. None of these carry a
/// request schema beyond the header version check.
pub struct PeerRoute<C> {
    controller: Arc<C>,
}

impl<C: PeerController> PeerRoute<C> {
    pub fn new(controller: Arc<C>) -> Self {
        Self { controller }
    }
}

impl<C: PeerController> Route for PeerRoute<C> {
    fn routes(&self, _config: &P2pConfig) -> Vec<RouteConfig> {
        vec![
            RouteConfig::for_route::<GetApiNodesCodec>(
                RouteId::GetApiNodes,
                SMALL_PAYLOAD,
                None,
                bind(&self.controller, |c, r| async move {
                    c.get_api_nodes(r).await
                }),
            ),
            RouteConfig::for_route::<GetPeersCodec>(
                RouteId::GetPeers,
                SMALL_PAYLOAD,
                None,
                bind(&self.controller, |c, r| async move { c.get_peers(r).await }),
            ),
            RouteConfig::for_route::<GetStatusCodec>(
                RouteId::GetStatus,
                SMALL_PAYLOAD,
                None,
                bind(&self.controller, |c, r| async move { c.get_status(r).await }),
            ),
        ]
    }
}
