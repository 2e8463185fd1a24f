use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative, poll based cancellation supplied by the host.
///
/// The validator never owns the signal's lifecycle, it only asks whether the
/// host wants the current pass to stop.
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

/// A signal that is never raised
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<F: Fn() -> bool> CancelSignal for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Clonable cancel handle, one clone goes to the validation pass and the
/// host keeps another to raise it
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl CancelSignal for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
