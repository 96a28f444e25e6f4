//! Lazily assigned node identities.
//!
//! Every node carries a [`NodeId`] slot that stays empty until the identity
//! is first asked for. At that point the next value is drawn from an
//! [`IdGenerator`], normally the process-wide one returned by
//! [`IdGenerator::global`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

static GLOBAL_IDS: IdGenerator = IdGenerator::new();

/// Monotonic counter handing out node identities.
///
/// Safe to share between threads; each call to [`next_id`](Self::next_id)
/// returns a value strictly greater than every earlier one from the same
/// generator.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Creates a generator whose first identity is 1.
    pub const fn new() -> Self {
        IdGenerator {
            next: AtomicU64::new(1),
        }
    }

    /// Returns the process-wide generator.
    pub fn global() -> &'static IdGenerator {
        &GLOBAL_IDS
    }

    /// Allocates the next identity.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity slot embedded in every node.
///
/// Cloning a node produces a distinct node, so the clone starts unassigned.
#[derive(Default)]
pub struct NodeId(OnceLock<u64>);

impl NodeId {
    /// Creates an unassigned slot.
    pub const fn new() -> Self {
        NodeId(OnceLock::new())
    }

    /// Returns the identity, drawing it from the global generator on first use.
    pub fn get(&self) -> u64 {
        self.get_from(IdGenerator::global())
    }

    /// Returns the identity, drawing it from `generator` on first use.
    ///
    /// Once assigned, the identity never changes regardless of which
    /// generator is passed later.
    pub fn get_from(&self, generator: &IdGenerator) -> u64 {
        *self.0.get_or_init(|| generator.next_id())
    }

    /// Returns the identity without assigning one.
    pub fn peek(&self) -> Option<u64> {
        self.0.get().copied()
    }
}

impl Clone for NodeId {
    fn clone(&self) -> Self {
        NodeId::new()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(id) => write!(f, "NodeId({id})"),
            None => write!(f, "NodeId(unassigned)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_is_strictly_increasing() {
        let generator = IdGenerator::new();
        let a = generator.next_id();
        let b = generator.next_id();
        let c = generator.next_id();
        assert_eq!(a, 1);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_id_is_assigned_once() {
        let generator = IdGenerator::new();
        let id = NodeId::new();
        assert_eq!(id.peek(), None);

        let first = id.get_from(&generator);
        assert_eq!(id.peek(), Some(first));
        assert_eq!(id.get_from(&generator), first);
        assert_eq!(id.get(), first);
    }

    #[test]
    fn test_clone_starts_unassigned() {
        let generator = IdGenerator::new();
        let id = NodeId::new();
        id.get_from(&generator);

        let copy = id.clone();
        assert_eq!(copy.peek(), None);
        assert!(copy.get_from(&generator) > id.peek().unwrap_or_default());
    }

    #[test]
    fn test_concurrent_allocation_never_repeats() {
        let generator = IdGenerator::new();
        let mut ids: Vec<u64> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| (0..250).map(|_| generator.next_id()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 1000);
    }
}
