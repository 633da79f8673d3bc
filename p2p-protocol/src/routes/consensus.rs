use {
    super::bind,
    crate::{
        codec::{
            GetMessagesCodec, GetProposalCodec, PostPrecommitCodec, PostPrevoteCodec,
            PostProposalCodec, RouteId,
        },
        config::P2pConfig,
        message::consensus::{
            GetMessagesRequest, GetMessagesResponse, GetProposalRequest, GetProposalResponse,
            PostPrecommitRequest, PostPrecommitResponse, PostPrevoteRequest, PostPrevoteResponse,
            PostProposalRequest, PostProposalResponse,
        },
        route::{Route, RouteConfig, SMALL_PAYLOAD},
        validation::request,
    },
    async_trait::async_trait,
    std::sync::Arc,
};

/// Hands consensus messages to the consensus engine and serves its
/// current-round state.
#[async_trait]
pub trait ConsensusController: Send + Sync + 'static {
    async fn get_messages(
        &self,
        request: GetMessagesRequest,
    ) -> anyhow::Result<GetMessagesResponse>;

    async fn get_proposal(
        &self,
        request: GetProposalRequest,
    ) -> anyhow::Result<GetProposalResponse>;

    async fn post_precommit(
        &self,
        request: PostPrecommitRequest,
    ) -> anyhow::Result<PostPrecommitResponse>;

    async fn post_prevote(
        &self,
        request: PostPrevoteRequest,
    ) -> anyhow::Result<PostPrevoteResponse>;

    async fn post_proposal(
        &self,
        request: PostProposalRequest,
    ) -> anyhow::Result<PostProposalResponse>;
}

pub struct ConsensusRoute<C> {
    controller: Arc<C>,
}

impl<C: ConsensusController> ConsensusRoute<C> {
    pub fn new(controller: Arc<C>) -> Self {
        Self { controller }
    }
}

impl<C: ConsensusController> Route for ConsensusRoute<C> {
    fn routes(&self, config: &P2pConfig) -> Vec<RouteConfig> {
        vec![
            RouteConfig::for_route::<GetMessagesCodec>(
                RouteId::GetMessages,
                SMALL_PAYLOAD,
                None,
                bind(&self.controller, |c, r| async move { c.get_messages(r).await }),
            ),
            RouteConfig::for_route::<GetProposalCodec>(
                RouteId::GetProposal,
                SMALL_PAYLOAD,
                None,
                bind(&self.controller, |c, r| async move { c.get_proposal(r).await }),
            ),
            RouteConfig::for_route::<PostPrecommitCodec>(
                RouteId::PostPrecommit,
                SMALL_PAYLOAD,
                Some(request::post_precommit()),
                bind(&self.controller, |c, r| async move {
                    c.post_precommit(r).await
                }),
            ),
            RouteConfig::for_route::<PostPrevoteCodec>(
                RouteId::PostPrevote,
                SMALL_PAYLOAD,
                Some(request::post_prevote()),
                bind(&self.controller, |c, r| async move { c.post_prevote(r).await }),
            ),
            RouteConfig::for_route::<PostProposalCodec>(
                RouteId::PostProposal,
                config.max_payload,
                Some(request::post_proposal()),
                bind(&self.controller, |c, r| async move {
                    c.post_proposal(r).await
                }),
            ),
        ]
    }
}
