//! Structural validation of decoded messages.
//!
//! [`request`] holds the schemas the dispatcher applies to inbound requests,
//! [`reply`] the schemas the communicator applies to peers' replies. Both
//! report a human-readable reason; callers wrap it in the matching
//! [`P2pError`] variant.

pub mod reply;
pub mod request;

use {
    crate::error::{P2pError, Result},
    semver::{Version, VersionReq},
    std::sync::Arc,
};

/// Outcome of a schema check: `Err` carries the rejection reason.
pub type SchemaResult = std::result::Result<(), String>;

/// A structural check over a decoded message.
pub type Schema<T> = Arc<dyn Fn(&T) -> SchemaResult + Send + Sync>;

/// Block ids are full SHA-256 digests in hex, either case.
pub fn is_block_id(id: &str) -> bool {
    id.len() == 64 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

pub(crate) fn ensure(condition: bool, reason: impl FnOnce() -> String) -> SchemaResult {
    if condition {
        Ok(())
    } else {
        Err(reason())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MinimumVersion {
    /// A bare version `x.y.z` means "at least x.y.z", prereleases included.
    AtLeast(Version),
    Requirement(VersionReq),
}

impl MinimumVersion {
    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Ok(version) = Version::parse(raw) {
            return Ok(Self::AtLeast(version));
        }
        VersionReq::parse(raw)
            .map(Self::Requirement)
            .map_err(|e| P2pError::InvalidConfig(format!("minimum version {raw:?}: {e}")))
    }

    fn matches(&self, version: &Version) -> bool {
        match self {
            Self::AtLeast(minimum) => version >= minimum,
            Self::Requirement(req) => req.matches(version),
        }
    }
}

/// Protocol-version gate applied to request headers.
///
/// A version passes when it is valid semver and satisfies at least one
/// configured minimum. With no minimums configured any valid version passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPolicy {
    minimums: Vec<MinimumVersion>,
}

impl VersionPolicy {
    pub fn new<S: AsRef<str>>(minimums: &[S]) -> Result<Self> {
        let minimums = minimums
            .iter()
            .map(|m| MinimumVersion::parse(m.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { minimums })
    }

    pub fn check(&self, version: &str) -> SchemaResult {
        let parsed =
            Version::parse(version).map_err(|_| format!("invalid version {version:?}"))?;
        ensure(
            self.minimums.is_empty() || self.minimums.iter().any(|m| m.matches(&parsed)),
            || format!("version {version} is below the accepted minimum"),
        )
    }
}
