//! Route configuration and the per-route request pipeline.
//!
//! A [`RouteConfig`] erases its codec and handler types behind a
//! [`Pipeline`] so routes with different message types can live in one
//! table. The pipeline runs decode → validate → handle → encode; the size
//! gate runs before it, in the dispatcher.

use {
    crate::{
        codec::{Codec, RouteId},
        config::P2pConfig,
        error::{P2pError, Result},
        message::WithHeaders,
        validation::{Schema, VersionPolicy},
    },
    async_trait::async_trait,
    futures::future::{BoxFuture, FutureExt},
    log::*,
    std::{fmt, future::Future, marker::PhantomData, sync::Arc},
};

/// Ceiling for routes carrying only headers or small consensus payloads.
pub const SMALL_PAYLOAD: usize = 1_024;
/// Ceiling for `/getCommonBlocks`.
pub const COMMON_BLOCKS_PAYLOAD: usize = 10_240;

/// Type-erased handler for one route.
pub type Handler<Req, Res> =
    Arc<dyn Fn(Req) -> BoxFuture<'static, anyhow::Result<Res>> + Send + Sync>;

/// Wrap an async closure as a [`Handler`].
pub fn handler<Req, Res, F, Fut>(f: F) -> Handler<Req, Res>
where
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Res>> + Send + 'static,
{
    Arc::new(move |request| f(request).boxed())
}

/// A group of routes registered together, backed by one controller.
pub trait Route: Send + Sync {
    fn routes(&self, config: &P2pConfig) -> Vec<RouteConfig>;
}

#[async_trait]
pub(crate) trait Pipeline: Send + Sync {
    async fn run(
        &self,
        id: &'static str,
        versions: &VersionPolicy,
        payload: &[u8],
    ) -> Result<Vec<u8>>;
}

struct TypedPipeline<C: Codec> {
    validation: Option<Schema<C::Request>>,
    handler: Handler<C::Request, C::Response>,
    codec: PhantomData<fn() -> C>,
}

#[async_trait]
impl<C> Pipeline for TypedPipeline<C>
where
    C: Codec,
    C::Request: WithHeaders,
{
    async fn run(
        &self,
        id: &'static str,
        versions: &VersionPolicy,
        payload: &[u8],
    ) -> Result<Vec<u8>> {
        let request = C::deserialize_request(payload)?;
        trace!("{id}: decoded {} bytes", payload.len());

        if let Some(schema) = &self.validation {
            schema(&request).map_err(P2pError::Validation)?;
        }
        if let Some(headers) = request.headers() {
            versions
                .check(&headers.version)
                .map_err(P2pError::Validation)?;
        }

        let response = (self.handler)(request)
            .await
            .map_err(P2pError::Handler)?;
        C::serialize_response(&response)
    }
}

/// Everything the dispatcher needs to serve one path.
#[derive(Clone)]
pub struct RouteConfig {
    /// Observability id, e.g. `p2p.peer.getStatus`.
    pub id: &'static str,
    pub path: &'static str,
    /// Inbound payloads longer than this are rejected before decoding.
    pub max_bytes: usize,
    /// Hidden from public route listings. Set by the route table.
    pub internal: bool,
    pub(crate) pipeline: Arc<dyn Pipeline>,
}

impl RouteConfig {
    pub fn new<C>(
        id: &'static str,
        path: &'static str,
        max_bytes: usize,
        validation: Option<Schema<C::Request>>,
        handler: Handler<C::Request, C::Response>,
    ) -> Self
    where
        C: Codec,
        C::Request: WithHeaders,
    {
        Self {
            id,
            path,
            max_bytes,
            internal: true,
            pipeline: Arc::new(TypedPipeline::<C> {
                validation,
                handler,
                codec: PhantomData,
            }),
        }
    }

    /// Build a config for one of the protocol's own routes.
    pub fn for_route<C>(
        route: RouteId,
        max_bytes: usize,
        validation: Option<Schema<C::Request>>,
        handler: Handler<C::Request, C::Response>,
    ) -> Self
    where
        C: Codec,
        C::Request: WithHeaders,
    {
        Self::new::<C>(route.id(), route.path(), max_bytes, validation, handler)
    }
}

impl fmt::Debug for RouteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteConfig")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("internal", &self.internal)
            .finish_non_exhaustive()
    }
}
