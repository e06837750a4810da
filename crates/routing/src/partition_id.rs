//! Partition identifier type

use std::fmt;

/// Dense index of a partition in the `PartitionTable`
///
/// Assigned sequentially at registration, so it can index a `Vec` directly.
///
/// ```
/// use memc_routing::PartitionId;
///
/// let id = PartitionId::new(2);
/// let slots = ["idfa", "gaid", "adid"];
/// assert_eq!(slots[id.as_usize()], "adid");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionId(u16);

impl PartitionId {
    /// Maximum number of partitions supported
    pub const MAX: u16 = u16::MAX;

    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Index as usize (for slice indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "partition:{}", self.0)
    }
}

impl From<u16> for PartitionId {
    #[inline]
    fn from(index: u16) -> Self {
        Self::new(index)
    }
}

impl From<PartitionId> for usize {
    #[inline]
    fn from(id: PartitionId) -> Self {
        id.as_usize()
    }
}
