//! Wire message structs, one module per route group.
//!
//! Every route uses its prost struct as its domain type except
//! `/getStatus` responses (monetary fields become [`num_bigint::BigUint`])
//! and `/postTransactions` requests (the batch buffer becomes a list of
//! transactions).

pub mod blocks;
pub mod consensus;
pub mod peer;
pub mod shared;
pub mod status;
pub mod transactions;

pub use shared::{FillDefaults, Headers, PeerLike, Step};

/// Access to the [`Headers`] carried by a request or response.
pub trait WithHeaders {
    fn headers(&self) -> Option<&Headers>;
    fn set_headers(&mut self, headers: Headers);
}

/// Implements [`WithHeaders`] for structs with a `headers: Option<Headers>` field.
macro_rules! impl_with_headers {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::message::WithHeaders for $ty {
                fn headers(&self) -> Option<&$crate::message::Headers> {
                    self.headers.as_ref()
                }

                fn set_headers(&mut self, headers: $crate::message::Headers) {
                    self.headers = Some(headers);
                }
            }
        )+
    };
}

/// Implements [`FillDefaults`] for structs whose only optional scalars live
/// in their `headers` field.
macro_rules! impl_fill_headers {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::message::FillDefaults for $ty {
                fn fill_defaults(&mut self) {
                    $crate::message::FillDefaults::fill_defaults(&mut self.headers);
                }
            }
        )+
    };
}

pub(crate) use {impl_fill_headers, impl_with_headers};
