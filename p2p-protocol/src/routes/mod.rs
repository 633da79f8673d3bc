//! Route groups. Each binds one controller to its routes' codecs, limits
//! and request schemas.

mod blocks;
mod consensus;
mod peer;
mod transactions;

pub use {
    blocks::{BlocksController, BlocksRoute},
    consensus::{ConsensusController, ConsensusRoute},
    peer::{PeerController, PeerRoute},
    transactions::{TransactionsController, TransactionsRoute},
};

use {
    crate::route::{handler, Handler},
    std::{future::Future, sync::Arc},
};

/// Build a handler that calls `f` with a clone of `controller`.
fn bind<C, Req, Res, F, Fut>(controller: &Arc<C>, f: F) -> Handler<Req, Res>
where
    C: Send + Sync + 'static + ?Sized,
    F: Fn(Arc<C>, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Res>> + Send + 'static,
{
    let controller = Arc::clone(controller);
    handler(move |request| f(Arc::clone(&controller), request))
}
