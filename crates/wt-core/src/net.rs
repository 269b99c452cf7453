//! Link-layer addressing.

use std::fmt;

/// A 48-bit MAC address.
///
/// Engines allocate these sequentially, so [`MacAddr::from_index`] produces
/// `00:00:00:00:00:01`, `00:00:00:00:00:02`, … for indices 1, 2, ….
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Address whose low 48 bits are `n` (big-endian).
    pub fn from_index(n: u64) -> Self {
        let b = n.to_be_bytes();
        MacAddr([b[2], b[3], b[4], b[5], b[6], b[7]])
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}
