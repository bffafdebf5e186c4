//! Subscriber registry and notification.
//!
//! Callers register a callback and hold only the returned
//! [`SubscriptionId`] as a capability token; the registry owns the
//! callbacks. Ids come from a monotonic counter and are never reused, so a
//! stale token can at worst address nothing.

use std::collections::BTreeMap;
use std::fmt;

/// Callback invoked on state changes.
///
/// `old` is `None` only for initialization calls (hot start), where there is
/// no prior value to diff against. `force` is forwarded verbatim from the
/// dispatch site; the registry applies no skip logic of its own.
pub type Subscriber<S> = Box<dyn FnMut(&S, Option<&S>, bool)>;

/// Opaque capability token identifying a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Mapping from subscription identity to notification callback.
pub(crate) struct Registry<S> {
    subscribers: BTreeMap<SubscriptionId, Subscriber<S>>,
    counter: u64,
}

impl<S> Registry<S> {
    pub(crate) fn new() -> Self {
        Self {
            subscribers: BTreeMap::new(),
            counter: 0,
        }
    }

    /// Store `callback` under a fresh id. Does not invoke it.
    pub(crate) fn subscribe(
        &mut self,
        callback: impl FnMut(&S, Option<&S>, bool) + 'static,
    ) -> SubscriptionId {
        self.counter += 1;
        let id = SubscriptionId(self.counter);
        self.subscribers.insert(id.clone(), Box::new(callback));
        id
    }

    /// Remove a subscription. Unknown ids are a no-op.
    pub(crate) fn unsubscribe(&mut self, id: &SubscriptionId) {
        self.subscribers.remove(id);
    }

    pub(crate) fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Invoke every registered callback with the same payload.
    ///
    /// Iteration order is unspecified. A panicking callback propagates and
    /// the remaining callbacks are skipped.
    pub(crate) fn notify_all(&mut self, new: &S, old: Option<&S>, force: bool) {
        for callback in self.subscribers.values_mut() {
            callback(new, old, force);
        }
    }

    /// Invoke one callback with `(state, None, true)`, the hot-start
    /// initialization payload. Unknown ids are a no-op.
    pub(crate) fn run_one(&mut self, id: &SubscriptionId, state: &S) {
        if let Some(callback) = self.subscribers.get_mut(id) {
            callback(state, None, true);
        }
    }
}

/// Wrap a callback so it only fires when something actually changed.
///
/// The wrapped callback runs when `old` is absent (initialization), when
/// `force` is set, or when `new != old`. Plain change-sensitive subscribers
/// can use this instead of hand-rolling the comparison.
///
/// # Example
///
/// ```
/// use lodestone_state::{changed_only, StateStore};
///
/// let mut store = StateStore::new(0i64);
/// let sub = store.subscribe(changed_only(|new: &i64, _old, _force| {
///     println!("now {}", new);
/// }));
/// store.hot_start(&sub);
/// ```
pub fn changed_only<S, F>(mut callback: F) -> impl FnMut(&S, Option<&S>, bool)
where
    S: PartialEq,
    F: FnMut(&S, Option<&S>, bool),
{
    move |new, old, force| {
        let unchanged = matches!(old, Some(prior) if prior == new);
        if force || !unchanged {
            callback(new, old, force);
        }
    }
}
