// Single-writer cell holding the latest committed value
use std::sync::Arc;
use tokio::sync::watch;

/// Readers always get a fully committed snapshot; writers replace the whole
/// value under the channel lock, so two commits can never interleave.
pub struct SnapshotCell<T> {
    sender: Arc<watch::Sender<Arc<T>>>,
}

impl<T> Clone for SnapshotCell<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T: Default + Send + Sync> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Send + Sync> SnapshotCell<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(Arc::new(initial));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> Arc<T> {
        Arc::clone(&self.sender.borrow())
    }

    pub fn replace(&self, value: T) -> Arc<T> {
        self.replace_with(|_| value)
    }

    /// Derive the next value from the current one and publish it atomically
    pub fn replace_with(&self, build: impl FnOnce(&T) -> T) -> Arc<T> {
        let mut committed: Option<Arc<T>> = None;
        self.sender.send_modify(|current| {
            let next = Arc::new(build(current));
            committed = Some(Arc::clone(&next));
            *current = next;
        });
        committed.unwrap_or_else(|| self.snapshot())
    }
}
