//! TRv1 P2P Wire Protocol
//!
//! This crate defines how peers exchange consensus messages, block
//! synchronization requests, transaction broadcasts and status queries.
//! It handles:
//!
//! - **Message framing**: one prost message pair per route, plus a
//!   length-prefixed sub-framing for transaction batches carried in a
//!   single bytes field.
//! - **Monetary precision**: amounts travel as decimal strings and are held
//!   as arbitrary-precision integers, exact far beyond `u64`.
//! - **Inbound dispatch**: every request passes
//!   size check → decode → validate → handle → encode, in that order.
//! - **Outbound requests**: the peer communicator attaches local headers,
//!   applies timeouts and validates peers' replies.
//!
//! ## Architecture
//!
//! ```text
//!   transport (path, bytes)                      caller
//!          │                                        │
//!  ┌───────▼──────────────────────┐   ┌─────────────▼─────────────────┐
//!  │ RouteTable::dispatch         │   │ PeerCommunicator              │
//!  │ • size gate (max_bytes)      │   │ • attach local Headers        │
//!  │ • codec decode               │   │ • codec encode                │
//!  │ • request schema + version   │   │ • PeerTransport::emit+timeout │
//!  │ • controller handler         │   │ • reply size bound            │
//!  │ • codec encode               │   │ • codec decode + reply schema │
//!  └───────┬──────────────────────┘   └─────────────┬─────────────────┘
//!          │                                        │
//!  ┌───────▼────────────────────────────────────────▼─────────────────┐
//!  │ codec: ProtoCodec / DefaultFillingCodec / GetStatusCodec /       │
//!  │        PostTransactionsCodec                                     │
//!  │ message: Headers, per-route prost structs                        │
//!  │ numeric (BigUint ⇄ decimal)      tx_batch (u32-be length frames) │
//!  └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Crate modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`]       | `P2pConfig` defaults, dev overrides, env flag |
//! | [`message`]      | Wire structs and domain types per route |
//! | [`numeric`]      | Decimal string ⇄ `BigUint` |
//! | [`tx_batch`]     | Transaction batch pack/unpack |
//! | [`codec`]        | Per-route codecs and the route registry |
//! | [`validation`]   | Request schemas, reply schemas, version policy |
//! | [`route`]        | `RouteConfig`, handlers, the `Route` trait |
//! | [`routes`]       | Route groups and their controller traits |
//! | [`dispatcher`]   | `RouteTable` and inbound dispatch |
//! | [`communicator`] | Outbound requests to peers |
//! | [`error`]        | Crate-wide error enum |

pub mod codec;
pub mod communicator;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod numeric;
pub mod route;
pub mod routes;
pub mod tx_batch;
pub mod validation;

pub use {
    codec::RouteId,
    communicator::{HeaderSource, PeerCommunicator, PeerTransport},
    config::P2pConfig,
    dispatcher::RouteTable,
    error::{P2pError, RejectionKind, Result},
    message::Headers,
    route::{Route, RouteConfig},
};

#[cfg(test)]
mod tests;
