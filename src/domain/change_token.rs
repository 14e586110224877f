// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot change notification.
//!
//! A [`ChangeToken`] starts unfired and transitions to fired exactly once. Callbacks
//! registered on it run once, at or after that transition. Producers hold a
//! [`ReloadTrigger`], which hands out the current token and, when something changes,
//! atomically swaps in a fresh token before firing the old one. Observers must fetch
//! a new token after every firing to keep observing; [`on_change`] automates that.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback = Box<dyn FnOnce() + Send>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct TokenState {
    fired: AtomicBool,
    next_id: AtomicU64,
    callbacks: Mutex<Vec<(u64, Callback)>>,
}

impl TokenState {
    fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
            next_id: AtomicU64::new(0),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    fn fire(&self) {
        let callbacks = {
            let mut guard = lock(&self.callbacks);
            if self.fired.swap(true, Ordering::SeqCst) {
                return;
            }
            std::mem::take(&mut *guard)
        };

        // Callbacks run outside the lock so they may register on other tokens.
        for (_, callback) in callbacks {
            callback();
        }
    }

    fn unregister(&self, id: u64) {
        lock(&self.callbacks).retain(|(existing, _)| *existing != id);
    }
}

/// A single-use "has this changed" signal.
///
/// Cloning a token yields another handle to the same signal.
///
/// # Examples
///
/// ```
/// use layercfg::domain::ReloadTrigger;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let trigger = ReloadTrigger::new();
/// let token = trigger.token();
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// let _registration = token.register(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// trigger.fire();
/// trigger.fire();
///
/// assert!(token.has_changed());
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct ChangeToken {
    state: Arc<TokenState>,
}

impl ChangeToken {
    /// Returns a token that never fires.
    pub fn never() -> Self {
        Self {
            state: Arc::new(TokenState::new()),
        }
    }

    /// Returns `true` once the token has fired.
    pub fn has_changed(&self) -> bool {
        self.state.fired.load(Ordering::SeqCst)
    }

    /// Registers a callback that runs once when the token fires.
    ///
    /// If the token has already fired the callback runs immediately on the
    /// calling thread. Dropping the returned registration before the token
    /// fires prevents the callback from ever running.
    pub fn register<F>(&self, callback: F) -> ChangeRegistration
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut callbacks = lock(&self.state.callbacks);
            if !self.state.fired.load(Ordering::SeqCst) {
                let id = self.state.next_id.fetch_add(1, Ordering::Relaxed);
                callbacks.push((id, Box::new(callback)));
                return ChangeRegistration {
                    state: Arc::downgrade(&self.state),
                    id: Some(id),
                };
            }
        }

        callback();
        ChangeRegistration {
            state: Weak::new(),
            id: None,
        }
    }

    /// Returns `true` if both handles refer to the same signal.
    pub fn same_token(&self, other: &ChangeToken) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for ChangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeToken")
            .field("has_changed", &self.has_changed())
            .finish()
    }
}

/// Handle to a callback registered on a [`ChangeToken`].
///
/// Dropping (or calling [`dispose`](ChangeRegistration::dispose)) removes the
/// callback if it has not run yet. Use [`detach`](ChangeRegistration::detach) to
/// keep the callback registered without holding the handle.
#[must_use = "dropping the registration unregisters the callback"]
#[derive(Debug)]
pub struct ChangeRegistration {
    state: Weak<TokenState>,
    id: Option<u64>,
}

impl ChangeRegistration {
    /// Unregisters the callback.
    pub fn dispose(mut self) {
        self.release();
    }

    /// Leaves the callback registered for the lifetime of the token.
    pub fn detach(mut self) {
        self.id = None;
    }

    fn release(&mut self) {
        if let (Some(id), Some(state)) = (self.id.take(), self.state.upgrade()) {
            state.unregister(id);
        }
    }
}

impl Drop for ChangeRegistration {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("fired", &self.fired.load(Ordering::SeqCst))
            .finish()
    }
}

/// Producer side of the reload signal.
///
/// Holds the current unfired token. [`fire`](ReloadTrigger::fire) swaps in a fresh
/// token with a single atomic exchange and then fires the previous one, so an
/// observer that re-fetches the token from inside its callback always gets the
/// next cycle's token.
pub struct ReloadTrigger {
    current: ArcSwap<TokenState>,
}

impl ReloadTrigger {
    /// Creates a trigger holding a fresh token.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(TokenState::new()),
        }
    }

    /// Returns the current, not yet fired, token.
    pub fn token(&self) -> ChangeToken {
        ChangeToken {
            state: self.current.load_full(),
        }
    }

    /// Replaces the current token and fires the one it replaced.
    pub fn fire(&self) {
        let previous = self.current.swap(Arc::new(TokenState::new()));
        previous.fire();
    }
}

impl Default for ReloadTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReloadTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadTrigger").finish_non_exhaustive()
    }
}

struct SubscriptionState {
    producer: Box<dyn Fn() -> ChangeToken + Send + Sync>,
    consumer: Box<dyn Fn() + Send + Sync>,
    generation: AtomicU64,
    registration: Mutex<Option<(u64, ChangeRegistration)>>,
    disposed: AtomicBool,
}

impl SubscriptionState {
    fn subscribe(this: &Arc<SubscriptionState>) {
        if this.disposed.load(Ordering::SeqCst) {
            return;
        }

        let generation = this.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = (this.producer)();
        let weak = Arc::downgrade(this);
        let registration = token.register(move || {
            if let Some(state) = weak.upgrade() {
                if state.disposed.load(Ordering::SeqCst) {
                    return;
                }
                (state.consumer)();
                SubscriptionState::subscribe(&state);
            }
        });

        // A newer generation means this token already fired and re-subscribed.
        let replaced = {
            let mut slot = lock(&this.registration);
            match slot.as_ref() {
                Some((stored, _)) if *stored > generation => Some((generation, registration)),
                _ => slot.replace((generation, registration)),
            }
        };
        drop(replaced);
    }
}

/// Keeps a consumer subscribed to a stream of change tokens.
///
/// Returned by [`on_change`]. Dropping it stops the subscription.
#[must_use = "dropping the subscription stops change notifications"]
pub struct ChangeSubscription {
    state: Arc<SubscriptionState>,
}

impl ChangeSubscription {
    /// Stops the subscription.
    pub fn dispose(self) {}
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.state.disposed.store(true, Ordering::SeqCst);
        let registration = lock(&self.state.registration).take();
        drop(registration);
    }
}

impl fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSubscription")
            .field("disposed", &self.state.disposed.load(Ordering::SeqCst))
            .finish()
    }
}

/// Invokes `consumer` every time a token produced by `producer` fires.
///
/// After each firing `producer` is called again for the next token, so the
/// consumer keeps observing until the returned subscription is dropped.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{on_change, ReloadTrigger};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let trigger = Arc::new(ReloadTrigger::new());
/// let hits = Arc::new(AtomicUsize::new(0));
///
/// let source = Arc::clone(&trigger);
/// let counter = Arc::clone(&hits);
/// let subscription = on_change(move || source.token(), move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// trigger.fire();
/// trigger.fire();
/// drop(subscription);
/// trigger.fire();
///
/// assert_eq!(hits.load(Ordering::SeqCst), 2);
/// ```
pub fn on_change<P, C>(producer: P, consumer: C) -> ChangeSubscription
where
    P: Fn() -> ChangeToken + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
{
    let state = Arc::new(SubscriptionState {
        producer: Box::new(producer),
        consumer: Box::new(consumer),
        generation: AtomicU64::new(0),
        registration: Mutex::new(None),
        disposed: AtomicBool::new(false),
    });
    SubscriptionState::subscribe(&state);
    ChangeSubscription { state }
}
