//! Latest-request-wins adoption of asynchronous results.
//!
//! Schema resolution can take a while when referenced collections must be
//! read. If the user switches records in the meantime, an older resolution
//! may finish after a newer one. [`LatestOnly`] lets the caller tag each
//! request and discard results that have been superseded.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Identifies one issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Holds the result of the most recently issued request only.
///
/// ```
/// use strata::supersede::LatestOnly;
///
/// let latest = LatestOnly::new();
/// let slow = latest.issue();
/// let fast = latest.issue();
/// assert!(latest.commit(fast, "fast"));
/// assert!(!latest.commit(slow, "slow"));
/// assert_eq!(latest.current(), Some("fast"));
/// ```
#[derive(Debug)]
pub struct LatestOnly<T> {
    issued: AtomicU64,
    adopted: Mutex<Option<(Ticket, T)>>,
}

impl<T> LatestOnly<T> {
    /// Create an empty guard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            adopted: Mutex::new(None),
        }
    }

    /// Start a request, superseding every earlier one.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns `true` while no later request has been issued.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::Acquire) == ticket.0
    }

    /// Adopt `value` if `ticket` is still the latest request.
    ///
    /// Returns `false`, dropping `value`, when a later request was issued.
    pub fn commit(&self, ticket: Ticket, value: T) -> bool {
        let mut adopted = self.adopted.lock();
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding superseded result");
            return false;
        }
        *adopted = Some((ticket, value));
        true
    }

    /// Forget the adopted value.
    pub fn clear(&self) {
        self.adopted.lock().take();
    }
}

impl<T> Default for LatestOnly<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> LatestOnly<T> {
    /// Clone of the adopted value.
    #[must_use]
    pub fn current(&self) -> Option<T> {
        self.adopted.lock().as_ref().map(|(_, value)| value.clone())
    }
}
