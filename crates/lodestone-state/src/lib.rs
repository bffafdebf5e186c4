//! Typed single-source-of-truth state container with validation, history,
//! and time travel.
//!
//! `lodestone-state` holds an application's entire state in one
//! [`StateStore`]. Callers dispatch typed [`Action`]s whose pure reducers
//! produce replacement states; an optional [`Validator`] gates each proposed
//! transition, subscribers are notified of every accepted change, and an
//! optional debug mode records every attempt for replay and time travel.
//!
//! # Core Concepts
//!
//! - **[`StateStore`]**: the container holding current state, validator,
//!   subscribers, history, and engine flags
//! - **[`Action`]**: a command value with a pure reducer `(S) -> S`
//! - **[`Validator`]**: predicate gate over proposed states; rejection is
//!   soft and leaves the prior state untouched
//! - **[`SubscriptionId`]**: capability token returned by `subscribe`
//! - **[`HistoryRecord`]**: one attempted transition, recorded while debug
//!   mode is on; navigated with 1-based indices via `show_state`
//!
//! # Dispatch Pipeline
//!
//! ```text
//! dispatch(action) -> reducer -> validator -> (commit | keep prior)
//!                              -> history (if debug) -> subscribers (if engine on)
//! ```
//!
//! Everything is synchronous and single-writer: `dispatch` returns only
//! after every subscriber callback has run. Embedders needing cross-thread
//! access wrap the store in their own lock.
//!
//! # Quick Start
//!
//! ```
//! use lodestone_state::{Action, StateStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Counter {
//!     value: i64,
//! }
//!
//! #[derive(Debug)]
//! struct Add(i64);
//!
//! impl Action<Counter> for Add {
//!     fn reduce(&self, state: Counter) -> Counter {
//!         Counter {
//!             value: state.value + self.0,
//!         }
//!     }
//! }
//!
//! let mut store = StateStore::new(Counter { value: 0 });
//! store.set_validator(|s: &Counter| s.value >= 0);
//!
//! let sub = store.subscribe(|new: &Counter, old, _force| {
//!     if old.is_none() {
//!         // initialization call, no prior value to diff against
//!         assert_eq!(new.value, 0);
//!     }
//! });
//! store.hot_start(&sub);
//!
//! store.dispatch(Add(2));
//! assert_eq!(store.state().value, 2);
//!
//! store.dispatch(Add(-5)); // would go negative: rejected, state unchanged
//! assert_eq!(store.state().value, 2);
//! ```
//!
//! # Time Travel
//!
//! With debug recording on, every attempted transition is appended to an
//! ordered log. `show_state(index)` moves a 1-based cursor over the log;
//! viewing the newest record keeps the view "live" (following new records),
//! viewing an earlier one pins it. `apply_state` pushes a historical state
//! back into the live store as a fresh entry, never by rewinding the log.
//!
//! ```
//! # use lodestone_state::{Action, StateStore};
//! # #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
//! # struct Counter { value: i64 }
//! # #[derive(Debug)]
//! # struct Add(i64);
//! # impl Action<Counter> for Add {
//! #     fn reduce(&self, state: Counter) -> Counter {
//! #         Counter { value: state.value + self.0 }
//! #     }
//! # }
//! let mut store = StateStore::new(Counter { value: 0 });
//! store.start_debug();
//! store.dispatch(Add(1));
//! store.dispatch(Add(1));
//!
//! assert_eq!(store.history().len(), 3); // seed + 2 dispatches
//!
//! let earlier = store.show_state(2).unwrap().state.clone();
//! store.apply_state(earlier, true);
//! assert_eq!(store.state().value, 1);
//! assert_eq!(store.history().len(), 4); // append-only
//! ```

mod action;
mod error;
mod history;
mod persist;
mod store;
mod subscription;
mod travel;
mod validator;

pub use action::{Action, Transition};
pub use error::{PersistError, PersistResult};
pub use history::HistoryRecord;
pub use persist::{from_json, to_json, STATE_FILE_NAME};
pub use store::{EngineConfig, StateStore};
pub use subscription::{changed_only, SubscriptionId};
pub use validator::Validator;
