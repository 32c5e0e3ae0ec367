// ─────────────────────────────────────────────────────────────────────
// SCPN VERA Bridge — ID Allocation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Monotonic ID counters for the synthesized model.
//!
//! Every ID family starts at 100 so that all emitted identifiers are at
//! least triple-digit and never collide with hand-authored low IDs when a
//! synthesized model is merged into a larger input by downstream tooling.
//! Allocation order is the synthesis traversal order, which is itself
//! deterministic, so identical input always yields identical IDs.

/// First identifier handed out by every counter.
pub const FIRST_ID: u32 = 100;

/// A monotonic ID source for one family (surfaces, cells, materials or
/// universes).
#[derive(Debug, Clone)]
pub struct Counter {
    next: u32,
}

impl Counter {
    pub fn new() -> Self {
        Counter { next: FIRST_ID }
    }

    /// Hand out the next ID.
    pub fn take(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of IDs handed out so far.
    pub fn issued(&self) -> usize {
        (self.next - FIRST_ID) as usize
    }
}

impl Default for Counter {
    fn default() -> Self {
        Counter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_triple_digit() {
        let mut counter = Counter::new();
        assert_eq!(counter.take(), 100);
        assert_eq!(counter.take(), 101);
        assert_eq!(counter.issued(), 2);
    }
}
