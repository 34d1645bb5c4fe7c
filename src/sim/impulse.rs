//! Depth-one message slot for one-shot impulse forces

use serde::{Deserialize, Serialize};

/// Holds at most one pending force until the next tick consumes it.
///
/// A second push before the tick replaces the first; forces never stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpulseSlot {
    pending: Option<f32>,
}

impl ImpulseSlot {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Queue a force. Returns false (and leaves the slot alone) for
    /// non-positive or non-finite values.
    pub fn push(&mut self, force: f32) -> bool {
        if !force.is_finite() || force <= 0.0 {
            log::debug!("Rejected impulse force {}", force);
            return false;
        }
        if let Some(prev) = self.pending.replace(force) {
            log::trace!("Impulse {} replaced before consumption", prev);
        }
        true
    }

    /// Consume the pending force, leaving the slot empty
    pub fn take(&mut self) -> Option<f32> {
        self.pending.take()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_once() {
        let mut slot = ImpulseSlot::new();
        assert!(slot.push(260.0));
        assert!(!slot.is_empty());
        assert_eq!(slot.take(), Some(260.0));
        assert_eq!(slot.take(), None);
        assert!(slot.is_empty());
    }

    #[test]
    fn test_push_overwrites() {
        let mut slot = ImpulseSlot::new();
        slot.push(100.0);
        slot.push(260.0);
        assert_eq!(slot.take(), Some(260.0));
        assert!(slot.is_empty());
    }

    #[test]
    fn test_rejects_invalid_forces() {
        let mut slot = ImpulseSlot::new();
        assert!(!slot.push(0.0));
        assert!(!slot.push(-5.0));
        assert!(!slot.push(f32::NAN));
        assert!(!slot.push(f32::INFINITY));
        assert!(slot.is_empty());

        // An invalid push must not clobber a valid pending one
        slot.push(50.0);
        slot.push(-1.0);
        assert_eq!(slot.take(), Some(50.0));
    }
}
