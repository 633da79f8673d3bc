use {
    super::bind,
    crate::{
        codec::{GetBlocksCodec, GetCommonBlocksCodec, PostBlockCodec, RouteId},
        config::P2pConfig,
        message::blocks::{
            GetBlocksRequest, GetBlocksResponse, GetCommonBlocksRequest, GetCommonBlocksResponse,
            PostBlockRequest, PostBlockResponse,
        },
        route::{Route, RouteConfig, COMMON_BLOCKS_PAYLOAD, SMALL_PAYLOAD},
        validation::request,
    },
    async_trait::async_trait,
    std::sync::Arc,
};

/// Serves block synchronization requests from local storage.
#[async_trait]
pub trait BlocksController: Send + Sync + 'static {
    async fn get_blocks(&self, request: GetBlocksRequest) -> anyhow::Result<GetBlocksResponse>;

    async fn get_common_blocks(
        &self,
        request: GetCommonBlocksRequest,
    ) -> anyhow::Result<GetCommonBlocksResponse>;

    async fn post_block(&self, request: PostBlockRequest) -> anyhow::Result<PostBlockResponse>;
}

/// `/getBlocks`, `/getCommonBlocks` and `/postBlock`.
pub struct BlocksRoute<C> {
    controller: Arc<C>,
}

impl<C: BlocksController> BlocksRoute<C> {
    pub fn new(controller: Arc<C>) -> Self {
        Self { controller }
    }
}

impl<C: BlocksController> Route for BlocksRoute<C> {
    fn routes(&self, config: &P2pConfig) -> Vec<RouteConfig> {
        vec![
            RouteConfig::for_route::<GetBlocksCodec>(
                RouteId::GetBlocks,
                SMALL_PAYLOAD,
                Some(request::get_blocks(config)),
                bind(&self.controller, |c, r| async move { c.get_blocks(r).await }),
            ),
            RouteConfig::for_route::<GetCommonBlocksCodec>(
                RouteId::GetCommonBlocks,
                COMMON_BLOCKS_PAYLOAD,
                Some(request::get_common_blocks(config)),
                bind(&self.controller, |c, r| async move {
                    c.get_common_blocks(r).await
                }),
            ),
            RouteConfig::for_route::<PostBlockCodec>(
                RouteId::PostBlock,
                config.max_payload,
                Some(request::post_block()),
                bind(&self.controller, |c, r| async move { c.post_block(r).await }),
            ),
        ]
    }
}
