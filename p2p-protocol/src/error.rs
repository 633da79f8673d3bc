//! Error types for the p2p wire-protocol layer.

use thiserror::Error;

/// Errors that can occur while framing, decoding or dispatching p2p messages.
#[derive(Error, Debug)]
pub enum P2pError {
    /// Inbound payload exceeds the route's `max_bytes` ceiling.
    #[error("payload too large: {size} bytes (max {max} bytes)")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Route ceiling.
        max: usize,
    },

    /// Malformed protobuf bytes (bad wire type, truncated field, invalid varint).
    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Protobuf encoding into a fixed-capacity buffer failed.
    #[error("encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    /// A field that must be present on the wire was absent.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// A wire decimal string is not a base-10 non-negative integer literal.
    #[error("malformed numeric string: {0:?}")]
    MalformedNumeric(String),

    /// A transaction batch record claims more bytes than remain in the buffer.
    #[error(
        "truncated transaction at offset {offset}: length prefix claims {declared} bytes, \
         {remaining} remain"
    )]
    TruncatedTransaction {
        /// Offset of the record's length prefix.
        offset: usize,
        /// Length announced by the prefix.
        declared: usize,
        /// Bytes actually left after the prefix.
        remaining: usize,
    },

    /// A transaction is too long to be described by a 4-byte length prefix.
    #[error("transaction too large for batch framing: {0} bytes")]
    TransactionTooLarge(usize),

    /// The decoded request (or reply) failed structural validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The route handler failed. The inner error is opaque to this layer.
    #[error("handler error: {0}")]
    Handler(#[source] anyhow::Error),

    /// No route is registered for the requested path.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// Two route groups registered the same path.
    #[error("duplicate route: {0}")]
    DuplicateRoute(&'static str),

    /// A configured value cannot be used (e.g. an unparseable minimum version).
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The peer did not answer within the allotted time.
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// The outbound transport failed to deliver the request.
    #[error("transport error: {0}")]
    Transport(#[source] anyhow::Error),

    /// A peer's reply did not match the expected reply schema.
    #[error("reply validation failed: {0}")]
    ReplyValidation(String),
}

/// Coarse classification of a failure, stable enough to hand to a transport.
///
/// Transports map these to rejected responses without exposing the
/// underlying error text (which may carry handler internals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    PayloadTooLarge,
    DecodeError,
    ValidationError,
    HandlerError,
    EncodeError,
    NotFound,
    /// Route-table construction and outbound failures; never produced by dispatch.
    Internal,
}

impl RejectionKind {
    /// Stable tag for transports and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PayloadTooLarge => "payload_too_large",
            Self::DecodeError => "decode_error",
            Self::ValidationError => "validation_error",
            Self::HandlerError => "handler_error",
            Self::EncodeError => "encode_error",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

impl P2pError {
    /// Classify this error for the transport layer.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::PayloadTooLarge { .. } => RejectionKind::PayloadTooLarge,
            Self::Decode(_)
            | Self::MissingRequiredField(_)
            | Self::MalformedNumeric(_)
            | Self::TruncatedTransaction { .. } => RejectionKind::DecodeError,
            Self::Validation(_) => RejectionKind::ValidationError,
            Self::Handler(_) => RejectionKind::HandlerError,
            Self::Encode(_) | Self::TransactionTooLarge(_) => RejectionKind::EncodeError,
            Self::RouteNotFound(_) => RejectionKind::NotFound,
            Self::DuplicateRoute(_)
            | Self::InvalidConfig(_)
            | Self::Timeout(_)
            | Self::Transport(_)
            | Self::ReplyValidation(_) => RejectionKind::Internal,
        }
    }
}

/// Convenience result type for p2p protocol operations.
pub type Result<T> = std::result::Result<T, P2pError>;
