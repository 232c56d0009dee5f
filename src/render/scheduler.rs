use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Generation counter owned by the renderer. Starting a new pass bumps the
/// generation, which invalidates every token issued for the old pass; a
/// superseded continuation thus becomes a no-op instead of writing stale
/// pixels onto a reconfigured surface.
///
/// An atomic is used even though the driver is single-threaded, so the same
/// discipline survives a move to a task-pool scheduler.
#[derive(Debug, Default)]
pub struct CancelSource {
    generation: Arc<AtomicU64>,
}

impl CancelSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token bound to the current generation.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            generation: Arc::clone(&self.generation),
            issued: self.generation.load(Ordering::Acquire),
        }
    }

    /// Invalidate all outstanding tokens and return a fresh one.
    pub fn cancel(&self) -> CancelToken {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.token()
    }
}

/// Cancellation token carried by every unit of chunked work.
#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl CancelToken {
    #[inline]
    pub fn is_canceled(&self) -> bool {
        self.generation.load(Ordering::Acquire) != self.issued
    }
}
