use {
    super::bind,
    crate::{
        codec::{PostTransactionsCodec, RouteId},
        config::P2pConfig,
        message::transactions::{PostTransactionsRequest, PostTransactionsResponse},
        route::{Route, RouteConfig},
        validation::request,
    },
    async_trait::async_trait,
    std::sync::Arc,
};

/// Feeds broadcast transactions into the local pool.
#[async_trait]
pub trait TransactionsController: Send + Sync + 'static {
    async fn post_transactions(
        &self,
        request: PostTransactionsRequest,
    ) -> anyhow::Result<PostTransactionsResponse>;
}

pub struct TransactionsRoute<C> {
    controller: Arc<C>,
}

impl<C: TransactionsController> TransactionsRoute<C> {
    pub fn new(controller: Arc<C>) -> Self {
        Self { controller }
    }
}

impl<C: TransactionsController> Route for TransactionsRoute<C> {
    fn routes(&self, config: &P2pConfig) -> Vec<RouteConfig> {
        vec![RouteConfig::for_route::<PostTransactionsCodec>(
            RouteId::PostTransactions,
            config.max_payload,
            Some(request::post_transactions(config)),
            bind(&self.controller, |c, r| async move {
                c.post_transactions(r).await
            }),
        )]
    }
}
