//! Identity handles and their stable 128-bit wire projection.
//! A RefId carries no payload; two RefIds are "the same thing" only if one was
//! copied from the other. Guids are the textual/byte form references take on
//! the wire, with the mixed-endian group layout shared with the host format.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

static REF_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque reference handle. Minted by [`RefId::new`]; copying the handle
/// copies the identity, so a `RefId` can be used directly as a map key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefId(u64);

impl RefId {
    pub fn new() -> Self {
        Self(REF_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for RefId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefId({})", self.0)
    }
}

/// 128-bit stable identity value.
///
/// The byte constructor and `to_bytes` use the mixed-endian layout of the
/// format: the first three text groups are little-endian reads of the leading
/// 4+2+2 bytes, the remaining 8 bytes print in order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid(Uuid);

impl Guid {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes_le(bytes))
    }

    pub fn to_bytes(self) -> [u8; 16] {
        self.0.to_bytes_le()
    }

    /// Integer projection, little-endian over the byte layout. Counter-minted
    /// guids (serialization contexts) use this constructor.
    pub fn from_u128(value: u128) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }

    pub fn as_u128(self) -> u128 {
        u128::from_le_bytes(self.to_bytes())
    }

    /// Parse the canonical 8-4-4-4-12 hyphenated form (hex case-insensitive).
    /// Other textual shapes (braced, simple, urn) are rejected.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.len() != 36 {
            return Err(format!("Invalid GUID: {}", s));
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| format!("Invalid GUID: {}", s))
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.0)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
