//! Observable value with synchronous callback observers and async streams.
//!
//! An [`Observable`] always holds a current value. Publishing replaces the value
//! and then calls every registered callback in registration order, on the
//! publishing thread, before `publish` returns. Async consumers can instead take
//! a [`WatchStream`], which yields the current value first and then the most
//! recent value after each change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    sender: watch::Sender<T>,
    observers: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: Send + Sync> Detach for Shared<T> {
    fn detach(&self, id: u64) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(observer_id, _)| *observer_id != id);
    }
}

/// A value that notifies observers whenever it is published.
///
/// # Examples
///
/// ```
/// use myflix::store::Observable;
/// use std::sync::{Arc, Mutex};
///
/// let value = Observable::new(1);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// let _subscription = value.subscribe(move |v| sink.lock().unwrap().push(*v));
/// value.publish(2);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// ```
pub struct Observable<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Creates an observable holding `initial`.
    pub fn new(initial: T) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self {
            shared: Arc::new(Shared {
                sender,
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the last published value without waiting.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.sender.borrow().clone()
    }

    /// Replaces the value and notifies every observer.
    ///
    /// Callbacks run after the new value is visible through [`Observable::get`],
    /// so an observer that reads back the value sees the one it was called with.
    pub fn publish(&self, value: T) {
        self.shared.sender.send_replace(value.clone());

        let observers: Vec<Callback<T>> = self
            .shared
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in observers {
            callback(&value);
        }
    }

    /// Registers a callback and immediately calls it with the current value.
    ///
    /// The callback stays registered until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unregisters the observer"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);

        self.shared
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&callback)));

        callback(&self.get());

        let shared: Arc<dyn Detach> = self.shared.clone();
        Subscription {
            shared: Arc::downgrade(&shared),
            id,
        }
    }

    /// A watch receiver positioned at the current value.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<T> {
        self.shared.sender.subscribe()
    }

    /// A stream that yields the current value, then each later value.
    ///
    /// Intermediate values published faster than the stream is polled are
    /// skipped; the most recent value is always delivered.
    #[must_use]
    pub fn stream(&self) -> WatchStream<T> {
        WatchStream::new(self.watch())
    }

    /// Number of registered callback observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.shared
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Observable<T> {
    /// Publishes only if `value` differs from the current value.
    ///
    /// Returns whether observers were notified.
    pub fn publish_if_changed(&self, value: T) -> bool {
        if *self.shared.sender.borrow() == value {
            return false;
        }
        self.publish(value);
        true
    }
}

/// Handle that keeps a callback observer registered.
///
/// Dropping the handle unregisters the callback, which is how a view tears down
/// its subscriptions when it goes away.
pub struct Subscription {
    shared: Weak<dyn Detach>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
