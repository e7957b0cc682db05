//! Observable state container shared by the controllers.
//!
//! Every mutation goes through [`Observable::update`] and is published to
//! subscribers, which decouples what changed from whoever renders it.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug)]
pub struct Observable<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.tx.borrow())
    }

    /// Mutate in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

/// State that counts in-flight operations.
pub trait Tracked {
    fn activity_mut(&mut self) -> &mut usize;
}

/// Scoped in-flight marker: increments the activity count on creation and
/// decrements it when dropped, on every exit path.
#[must_use = "the activity ends as soon as the guard is dropped"]
pub struct ActivityGuard<T: Tracked + Clone> {
    state: Observable<T>,
}

impl<T: Tracked + Clone> ActivityGuard<T> {
    pub fn begin(state: &Observable<T>) -> Self {
        state.update(|s| *s.activity_mut() += 1);
        Self {
            state: state.clone(),
        }
    }
}

impl<T: Tracked + Clone> Drop for ActivityGuard<T> {
    fn drop(&mut self) {
        self.state.update(|s| {
            let activity = s.activity_mut();
            *activity = activity.saturating_sub(1);
        });
    }
}
