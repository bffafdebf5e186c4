//! Action and reducer contract.
//!
//! An action is a self-describing command value carrying its parameters plus
//! a pure reducer `(S) -> S`. The provided `execute` adapter runs the reducer
//! and returns the prior state alongside the new one, which is what the
//! dispatch engine needs for rollback and subscriber diffing.

use std::fmt;

/// The `(new, prior)` state pair produced by executing an action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S> {
    /// The state produced by the reducer.
    pub state: S,
    /// The state the reducer was applied to.
    pub prior: S,
}

/// A dispatchable command that transforms state through a pure reducer.
///
/// Reducers must not read anything beyond their `state` argument and the
/// action's own payload (no hidden globals or clocks). Replay over recorded
/// history is only deterministic under that rule.
///
/// # Example
///
/// ```
/// use lodestone_state::Action;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Counter {
///     value: i64,
/// }
///
/// #[derive(Debug)]
/// struct Add(i64);
///
/// impl Action<Counter> for Add {
///     fn reduce(&self, state: Counter) -> Counter {
///         Counter {
///             value: state.value + self.0,
///         }
///     }
/// }
///
/// let transition = Add(3).execute(Counter { value: 1 });
/// assert_eq!(transition.state.value, 4);
/// assert_eq!(transition.prior.value, 1);
/// ```
pub trait Action<S>: fmt::Debug {
    /// Produce the next state from the current one.
    fn reduce(&self, state: S) -> S;

    /// Run the reducer, keeping the prior state alongside the result.
    fn execute(&self, current: S) -> Transition<S>
    where
        S: Clone,
    {
        let prior = current.clone();
        Transition {
            state: self.reduce(current),
            prior,
        }
    }

    /// Human-readable rendering recorded in history.
    ///
    /// Defaults to the action's `Debug` output, which for enum actions
    /// includes the variant and its payload.
    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// Replaces the whole state. Dispatched internally by time-travel
/// [`apply_state`](crate::StateStore::apply_state).
pub(crate) struct ReplaceState<S>(pub(crate) S);

impl<S> fmt::Debug for ReplaceState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReplaceState")
    }
}

impl<S: Clone> Action<S> for ReplaceState<S> {
    fn reduce(&self, _state: S) -> S {
        self.0.clone()
    }

    fn describe(&self) -> String {
        "state replaced".to_string()
    }
}
