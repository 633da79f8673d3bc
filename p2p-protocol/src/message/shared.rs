//! Types shared by every route: consensus headers and peer descriptors.

/// Consensus step ordinal carried in [`Headers::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Step {
    Propose = 0,
    Prevote = 1,
    Precommit = 2,
}

impl TryFrom<u32> for Step {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Propose),
            1 => Ok(Self::Prevote),
            2 => Ok(Self::Precommit),
            other => Err(other),
        }
    }
}

/// Consensus context piggybacked on requests and responses.
///
/// `height`, `round`, `step` and `proposed_block_id` are presence-tracked
/// here, but peers send the three scalars as plain proto3 fields and omit
/// them when zero, so `None` for those means 0 on the wire.
/// `proposed_block_id: Some(String::new())` and `None` are different values
/// and survive a round trip as such.
///
/// The two bitmaps hold one entry per validator slot, in validator-index
/// order. Their length is checked by the consensus layer, not here.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Headers {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(uint32, optional, tag = "2")]
    pub height: Option<u32>,
    #[prost(uint32, optional, tag = "3")]
    pub round: Option<u32>,
    #[prost(uint32, optional, tag = "4")]
    pub step: Option<u32>,
    #[prost(string, optional, tag = "5")]
    pub proposed_block_id: Option<String>,
    #[prost(bool, repeated, tag = "6")]
    pub validators_signed_prevote: Vec<bool>,
    #[prost(bool, repeated, tag = "7")]
    pub validators_signed_precommit: Vec<bool>,
}

impl Headers {
    /// Headers carrying only a protocol version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// The step as an enum, if present and in range.
    pub fn consensus_step(&self) -> Option<Step> {
        self.step.and_then(|s| Step::try_from(s).ok())
    }
}

/// Minimal peer descriptor exchanged by `/getPeers`.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct PeerLike {
    #[prost(string, tag = "1")]
    pub ip: String,
    /// u16 in the domain; u32 on the wire.
    #[prost(uint32, tag = "2")]
    pub port: u32,
    /// u8 in the domain; u32 on the wire.
    #[prost(uint32, tag = "3")]
    pub protocol: u32,
}

/// Decode-completion policy: materialize absent optional scalars with their
/// zero value so downstream code sees fully-populated structs.
///
/// Only ever applied to optional consensus scalars. Presence-meaningful
/// fields (`proposed_block_id`) and required fields (monetary amounts) are
/// never filled.
pub trait FillDefaults {
    fn fill_defaults(&mut self);
}

impl FillDefaults for Headers {
    fn fill_defaults(&mut self) {
        self.height.get_or_insert(0);
        self.round.get_or_insert(0);
        self.step.get_or_insert(0);
    }
}

impl<T: FillDefaults> FillDefaults for Option<T> {
    fn fill_defaults(&mut self) {
        if let Some(inner) = self {
            inner.fill_defaults();
        }
    }
}
