use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Whether the view owning some state is still on screen.
///
/// Cloned into every in-flight request; a response that arrives after
/// [`Mounted::unmount`] must not write back.
#[derive(Clone, Debug)]
pub struct Mounted(Arc<AtomicBool>);

impl Mounted {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Mounted {
    fn default() -> Self {
        Self::new()
    }
}
