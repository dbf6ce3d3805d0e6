//! Cooperative cancellation for scans

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag checked by the engine between chunk reads
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; visible to every clone
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Guard that requests cancellation when dropped
    pub fn guard(&self) -> CancelGuard {
        CancelGuard { flag: self.clone() }
    }
}

/// Cancels its flag on drop, so an abandoned request stops its scan
#[derive(Debug)]
pub struct CancelGuard {
    flag: CancelFlag,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.flag.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());
        flag.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_guard_cancels_on_drop() {
        let flag = CancelFlag::new();
        let guard = flag.guard();
        assert!(!flag.is_cancelled());
        drop(guard);
        assert!(flag.is_cancelled());
    }
}
