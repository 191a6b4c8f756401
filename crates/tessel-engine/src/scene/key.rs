use core::cmp::Ordering;

/// Layer of a draw command. Higher values paint on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    /// One layer above `self`, saturating.
    #[inline]
    pub const fn above(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Paint order key: ascending `z`, then ascending `order` (traversal order).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.z.cmp(&other.z).then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_dominates_order() {
        let back = SortKey::new(ZIndex(0), 9);
        let front = SortKey::new(ZIndex(1), 0);
        assert!(back < front);
        assert!(SortKey::new(ZIndex(1), 1) > front);
    }

    #[test]
    fn above_saturates() {
        assert_eq!(ZIndex(i32::MAX).above(), ZIndex(i32::MAX));
        assert_eq!(ZIndex(-1).above(), ZIndex(0));
    }
}
