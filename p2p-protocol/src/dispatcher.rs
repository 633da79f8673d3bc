//! Inbound dispatch: path lookup, size gate, then the route's pipeline.
//!
//! The [`RouteTable`] is built once from the route groups and never
//! mutated afterwards. Share it as `Arc<RouteTable>`; [`RouteTable::dispatch`]
//! takes `&self` and may run from any number of tasks at once.

use {
    crate::{
        config::P2pConfig,
        error::{P2pError, RejectionKind, Result},
        route::{Route, RouteConfig},
        validation::VersionPolicy,
    },
    log::{debug, info, log, Level},
    std::{
        collections::{hash_map::Entry, HashMap},
        fmt,
    },
};

pub struct RouteTable {
    routes: HashMap<&'static str, RouteConfig>,
    versions: VersionPolicy,
    development_mode: bool,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("paths", &self.paths())
            .field("development_mode", &self.development_mode)
            .finish_non_exhaustive()
    }
}

/// Log level for a rejected request. Anything a peer can trigger at will
/// stays at `debug`; only failures on the local side reach `warn`.
fn rejection_level(kind: RejectionKind) -> Level {
    match kind {
        RejectionKind::HandlerError | RejectionKind::EncodeError | RejectionKind::Internal => {
            Level::Warn
        }
        RejectionKind::PayloadTooLarge
        | RejectionKind::DecodeError
        | RejectionKind::ValidationError
        | RejectionKind::NotFound => Level::Debug,
    }
}

impl RouteTable {
    /// Compose route groups into a table.
    ///
    /// Visibility is fixed here: every route is internal unless
    /// `config.development_mode` is set.
    pub fn new(config: &P2pConfig, groups: &[&dyn Route]) -> Result<Self> {
        let versions = VersionPolicy::new(&config.minimum_versions)?;
        let internal = !config.development_mode;

        let mut routes = HashMap::new();
        for group in groups {
            for mut route in group.routes(config) {
                route.internal = internal;
                match routes.entry(route.path) {
                    Entry::Occupied(_) => return Err(P2pError::DuplicateRoute(route.path)),
                    Entry::Vacant(slot) => {
                        debug!(
                            "registered {} ({}) max_bytes={}",
                            route.path, route.id, route.max_bytes
                        );
                        slot.insert(route);
                    }
                }
            }
        }

        info!(
            "p2p route table ready: {} routes, development_mode={}",
            routes.len(),
            config.development_mode
        );
        Ok(Self {
            routes,
            versions,
            development_mode: config.development_mode,
        })
    }

    pub fn route(&self, path: &str) -> Option<&RouteConfig> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn development_mode(&self) -> bool {
        self.development_mode
    }

    /// Whether `path` is hidden from public listings. Unknown paths are
    /// reported internal.
    pub fn is_internal(&self, path: &str) -> bool {
        self.routes.get(path).map_or(true, |route| route.internal)
    }

    /// Paths that may be advertised publicly, sorted.
    pub fn public_paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self
            .routes
            .values()
            .filter(|route| !route.internal)
            .map(|route| route.path)
            .collect();
        paths.sort_unstable();
        paths
    }

    /// All registered paths, sorted.
    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.routes.keys().copied().collect();
        paths.sort_unstable();
        paths
    }

    /// Run one inbound request through its route.
    ///
    /// The size gate runs before any decoding: an oversize payload never
    /// reaches the codec.
    pub async fn dispatch(&self, path: &str, payload: &[u8]) -> Result<Vec<u8>> {
        let Some(route) = self.routes.get(path) else {
            debug!("no route for {path}");
            return Err(P2pError::RouteNotFound(path.to_owned()));
        };

        let result = if payload.len() > route.max_bytes {
            Err(P2pError::PayloadTooLarge {
                size: payload.len(),
                max: route.max_bytes,
            })
        } else {
            route.pipeline.run(route.id, &self.versions, payload).await
        };

        match &result {
            Ok(response) => debug!("{}: responded with {} bytes", route.id, response.len()),
            Err(err) => {
                let kind = err.kind();
                log!(
                    rejection_level(kind),
                    "{}: rejected ({}): {err}",
                    route.id,
                    kind.as_str()
                );
            }
        }
        result
    }
}
