use std::fmt;

/// Identity of a reusable display slot (a list row, a grid cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot#{}", self.0)
    }
}

/// Binding of a slot to one particular item.
///
/// A slot gets a fresh token (a higher generation) every time it is reused
/// for another item. Deliveries carrying an older generation are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotToken {
    slot: SlotId,
    generation: u64,
}

impl SlotToken {
    pub const fn new(slot: SlotId, generation: u64) -> Self {
        Self { slot, generation }
    }

    /// Initial binding of `slot`.
    pub const fn first(slot: SlotId) -> Self {
        Self::new(slot, 0)
    }

    /// Token for the next item shown in the same slot.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.slot, self.generation.wrapping_add(1))
    }

    pub const fn slot(&self) -> SlotId {
        self.slot
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// True when `self` is a later binding of the same slot than `other`.
    pub fn supersedes(&self, other: &SlotToken) -> bool {
        self.slot == other.slot && self.generation > other.generation
    }
}

impl fmt::Display for SlotToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.slot, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuse_produces_a_superseding_token() {
        let first = SlotToken::first(SlotId(7));
        let second = first.next();
        assert_eq!(second.slot(), SlotId(7));
        assert_eq!(second.generation(), 1);
        assert!(second.supersedes(&first));
        assert!(!first.supersedes(&second));
        assert!(!first.supersedes(&first));
    }

    #[test]
    fn tokens_of_other_slots_never_supersede() {
        let a = SlotToken::new(SlotId(1), 5);
        let b = SlotToken::new(SlotId(2), 9);
        assert!(!b.supersedes(&a));
        assert_eq!(b.to_string(), "slot#2@9");
    }
}
