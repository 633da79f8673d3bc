//! `/postTransactions` messages.
//!
//! On the wire the request carries every transaction in one bytes field,
//! framed by [`crate::tx_batch`]. The domain request holds them as a list.

use {
    super::{impl_with_headers, Headers},
    crate::{error::Result, tx_batch},
};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WirePostTransactionsRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub transactions: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub headers: Option<Headers>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostTransactionsRequest {
    pub transactions: Vec<Vec<u8>>,
    pub headers: Option<Headers>,
}

/// `accept` lists the indices of the transactions the peer took into its pool.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PostTransactionsResponse {
    #[prost(message, optional, tag = "1")]
    pub headers: Option<Headers>,
    #[prost(uint32, repeated, tag = "2")]
    pub accept: Vec<u32>,
}

impl PostTransactionsRequest {
    pub fn to_wire(&self) -> Result<WirePostTransactionsRequest> {
        Ok(WirePostTransactionsRequest {
            transactions: tx_batch::pack(&self.transactions)?,
            headers: self.headers.clone(),
        })
    }

    pub fn from_wire(wire: WirePostTransactionsRequest) -> Result<Self> {
        Ok(Self {
            transactions: tx_batch::unpack(&wire.transactions)?,
            headers: wire.headers,
        })
    }
}

impl_with_headers!(
    WirePostTransactionsRequest,
    PostTransactionsRequest,
    PostTransactionsResponse,
);
