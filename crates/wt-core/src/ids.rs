//! Strongly typed identifier wrappers.
//!
//! Every entity the engine reports on is addressed by one of these ids rather
//! than by a path string.  All ids are `Copy + Ord + Hash` so they work as map
//! keys and sort keys without ceremony; the inner integer is `pub` so stores
//! can index their `Vec`s with `id.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a client station within one run.  Stable for the run's lifetime.
    pub struct ClientId(u32);
}

typed_id! {
    /// Index of an access point within one run.
    pub struct ApId(u32);
}

typed_id! {
    /// Engine-wide node index.  Access points are numbered first, then clients,
    /// matching the order the topology is built in.
    pub struct NodeId(u32);
}

typed_id! {
    /// Identity of one payload instance travelling through a MAC queue.
    /// Unique for the lifetime of a run.
    pub struct PacketId(u64);
}

typed_id! {
    /// Flow-statistics table key.  Assigned by the engine, starting at 1.
    pub struct FlowId(u32);
}
