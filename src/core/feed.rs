//! Push-style change feed.
//!
//! Consumers depend on [`EventSource`] only; whether changes come from an
//! in-memory publisher, a database poller or anything else is not their
//! concern. A [`Subscription`] unsubscribes when dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Row-level change delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T, K> {
    Insert(T),
    Update(T),
    Delete(K),
}

pub type Handler<E> = Box<dyn FnMut(&E) + Send>;

pub trait EventSource<E> {
    fn subscribe(&self, handler: Handler<E>) -> Subscription;
}

/// Handle returned by [`EventSource::subscribe`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

struct Registry<E> {
    next_id: u64,
    handlers: BTreeMap<u64, Handler<E>>,
    /// Nesting depth of `publish` calls currently delivering.
    publishing: usize,
    /// Ids cancelled while their handler was checked out for delivery.
    cancelled: BTreeSet<u64>,
}

/// In-memory fan-out. Handlers run synchronously inside `publish` without
/// the registry lock held, so a callback may subscribe or drop its own
/// [`Subscription`]. Handlers added during delivery first see the next event.
pub struct Feed<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for Feed<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: 'static> Default for Feed<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<E>(registry: &Mutex<Registry<E>>) -> MutexGuard<'_, Registry<E>> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl<E: 'static> Feed<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                handlers: BTreeMap::new(),
                publishing: 0,
                cancelled: BTreeSet::new(),
            })),
        }
    }

    /// Deliver `event` to every current subscriber, in subscription order.
    pub fn publish(&self, event: &E) -> usize {
        let mut delivering = {
            let mut registry = lock(&self.registry);
            registry.publishing += 1;
            std::mem::take(&mut registry.handlers)
        };

        for handler in delivering.values_mut() {
            handler(event);
        }
        let delivered = delivering.len();

        let mut registry = lock(&self.registry);
        for (id, handler) in delivering {
            if !registry.cancelled.contains(&id) {
                registry.handlers.insert(id, handler);
            }
        }
        registry.publishing -= 1;
        if registry.publishing == 0 {
            registry.cancelled.clear();
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).handlers.len()
    }
}

impl<E: Send + 'static> EventSource<E> for Feed<E> {
    fn subscribe(&self, handler: Handler<E>) -> Subscription {
        let id = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.handlers.insert(id, handler);
            id
        };

        let weak = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                let mut registry = lock(&registry);
                if registry.handlers.remove(&id).is_none() && registry.publishing > 0 {
                    registry.cancelled.insert(id);
                }
            }
        })
    }
}
