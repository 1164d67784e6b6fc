//! Progress reporting for long-running algorithms.
//!
//! Smoothing a full-resolution depth mesh can take a while; callers that
//! drive a UI or a log line can register a callback to follow along.

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives the current step (0-based), the total number of
/// steps, and a description of the operation.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_callback_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        progress.report(0, 10, "step");
        progress.report(5, 10, "step");
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_none_is_silent() {
        Progress::none().report(3, 7, "ignored");
    }
}
