//! The state store and dispatch engine.
//!
//! [`StateStore`] is the single place holding canonical application state.
//! It is an explicitly constructed value owned by the embedding application
//! and passed to whatever needs store access; there are no hidden globals.
//!
//! All operations take `&self`/`&mut self`, so Rust's borrow rules enforce
//! the single-writer model: a multi-threaded embedder must serialize access
//! externally (e.g. `Mutex<StateStore<S>>`). The store itself performs no
//! locking and has no suspension points: a `dispatch` call returns only
//! after validation, recording, and every subscriber callback have run.

use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::action::{Action, ReplaceState, Transition};
use crate::history::{HistoryLog, HistoryRecord};
use crate::persist;
use crate::subscription::{Registry, SubscriptionId};
use crate::travel::Cursor;
use crate::validator::Validator;

/// Description recorded by the synthetic seed entry when debug recording
/// starts on an empty log.
const DEBUG_SEED: &str = "debug recording started";

/// Engine configuration as seen by external debug surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Whether dispatched actions are applied and notified.
    pub engine_on: bool,
    /// Whether transitions are being recorded.
    pub debug: bool,
}

/// Single-source-of-truth state container.
///
/// Dispatching an action runs its reducer against the current state, gates
/// the result through the installed [`Validator`], records the attempt when
/// debug recording is on, and notifies subscribers of the outcome. Rejected
/// transitions leave the prior state untouched and are never surfaced to the
/// dispatching caller.
pub struct StateStore<S> {
    state: S,
    validator: Option<Box<dyn Validator<S>>>,
    subscribers: Registry<S>,
    history: HistoryLog<S>,
    cursor: Cursor,
    engine_on: bool,
    debug: bool,
    data_dir: Option<PathBuf>,
}

impl<S> StateStore<S> {
    /// Create a store owning `initial` as the current state.
    ///
    /// The engine starts on and debug recording starts off.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            validator: None,
            subscribers: Registry::new(),
            history: HistoryLog::new(),
            cursor: Cursor::new(),
            engine_on: true,
            debug: false,
            data_dir: None,
        }
    }

    /// Persist state under `dir` instead of the platform data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// The current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Engine configuration snapshot.
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            engine_on: self.engine_on,
            debug: self.debug,
        }
    }

    /// Apply and notify dispatched actions again.
    pub fn start_engine(&mut self) {
        self.engine_on = true;
    }

    /// Make dispatched actions inert. They are still recorded while debug
    /// recording is on.
    pub fn stop_engine(&mut self) {
        self.engine_on = false;
    }

    /// Stop recording transitions. Existing records are kept.
    pub fn stop_debug(&mut self) {
        self.debug = false;
    }

    /// Install or replace the validation gate. The last installed validator
    /// wins.
    pub fn set_validator(&mut self, validator: impl Validator<S> + 'static) {
        self.validator = Some(Box::new(validator));
    }

    /// Remove the validation gate.
    pub fn clear_validator(&mut self) {
        self.validator = None;
    }

    /// Check `state` against the installed validator. `true` when none is
    /// installed.
    pub fn validate(&self, state: &S) -> bool {
        self.validator.as_ref().map_or(true, |v| v.validate(state))
    }

    /// Register `callback` for state-change notifications.
    ///
    /// The callback is not invoked here; use [`hot_start`](Self::hot_start)
    /// for an immediate initialization call. The returned id is the only
    /// handle to the subscription.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&S, Option<&S>, bool) + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    /// Invoke `id`'s callback now with `(current, None, true)`, letting a
    /// new subscriber initialize itself without waiting for the next real
    /// transition. Unknown ids are a no-op.
    pub fn hot_start(&mut self, id: &SubscriptionId) {
        self.subscribers.run_one(id, &self.state);
    }

    /// Remove a subscription. Unknown or already-removed ids are a no-op.
    pub fn unsubscribe(&mut self, id: &SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    /// Chronological record of every attempted transition while debug
    /// recording was on.
    pub fn history(&self) -> &[HistoryRecord<S>] {
        self.history.records()
    }

    /// 1-based position of the time-travel cursor; 0 before any record
    /// exists.
    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    /// Whether the time-travel view tracks the newest record.
    pub fn is_live(&self) -> bool {
        self.cursor.is_live()
    }

    /// View the record at 1-based `index`, clamped to the log bounds.
    ///
    /// Viewing the newest record marks the view live (it then follows new
    /// records); viewing an earlier one pins it, and later dispatches leave
    /// the view in place. Returns `None` when the log is empty or the
    /// clamped index is the one already shown.
    pub fn show_state(&mut self, index: usize) -> Option<&HistoryRecord<S>> {
        if self.cursor.seek(index, self.history.len()) {
            self.history.at(self.cursor.index())
        } else {
            None
        }
    }

    /// Move the view one record toward the oldest entry.
    pub fn step_back(&mut self) -> Option<&HistoryRecord<S>> {
        self.show_state(self.cursor.index().saturating_sub(1))
    }

    /// Move the view one record toward the newest entry.
    pub fn step_forward(&mut self) -> Option<&HistoryRecord<S>> {
        self.show_state(self.cursor.index() + 1)
    }

    /// Drop all history records and reset the time-travel cursor.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.cursor.reset();
    }

    /// Delete the persisted state file. Best-effort: failures are logged,
    /// not propagated.
    pub fn reset_saved_state(&self) {
        let path = match persist::state_file_path(self.data_dir.as_deref()) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "saved state not deleted");
                return;
            }
        };
        match persist::remove_state_file(&path) {
            Ok(true) => tracing::debug!(path = %path.display(), "saved state deleted"),
            Ok(false) => tracing::debug!(path = %path.display(), "no saved state to delete"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "saved state not deleted")
            }
        }
    }
}

impl<S: Clone> StateStore<S> {
    /// An owned copy of the current state.
    pub fn snapshot(&self) -> S {
        self.state.clone()
    }

    /// Begin recording transitions.
    ///
    /// An empty log is seeded with a synthetic record capturing the current
    /// state, so the history always has a starting point to travel back to.
    /// Calling this while already recording is a no-op.
    pub fn start_debug(&mut self) {
        if self.history.is_empty() {
            self.record(DEBUG_SEED.to_string(), self.state.clone(), true);
        }
        self.debug = true;
    }

    /// Dispatch `action` through the reducer, validator, history, and
    /// subscriber pipeline.
    pub fn dispatch<A: Action<S>>(&mut self, action: A) {
        self.process(&action, false);
    }

    /// Dispatch with the `force` flag set on subscriber notifications.
    /// Callback-side skip logic (such as [`changed_only`]) treats forced
    /// notifications as always relevant.
    ///
    /// [`changed_only`]: crate::changed_only
    pub fn dispatch_forced<A: Action<S>>(&mut self, action: A) {
        self.process(&action, true);
    }

    /// Make `candidate` the live state, re-validating it first. Invalid
    /// candidates are dropped silently.
    ///
    /// Recording is suspended for the replacement dispatch unless
    /// `add_to_history` is set; the previous recording mode is restored
    /// either way. History stays append-only: applying an old state adds
    /// a record, it never rewinds the log.
    pub fn apply_state(&mut self, candidate: S, add_to_history: bool) {
        if !self.validate(&candidate) {
            tracing::debug!("historical state rejected by validator, not applied");
            return;
        }
        let was_debug = self.debug;
        if !add_to_history {
            self.debug = false;
        }
        self.dispatch(ReplaceState(candidate));
        self.debug = was_debug;
    }

    fn process<A: Action<S>>(&mut self, action: &A, force: bool) {
        let description = action.describe();
        let Transition { state: next, prior } = action.execute(self.state.clone());
        let accepted = self.validate(&next);

        tracing::trace!(
            action = %description,
            accepted,
            engine_on = self.engine_on,
            "dispatch"
        );

        if self.debug {
            self.record(description.clone(), next.clone(), accepted);
        }

        if !self.engine_on {
            return;
        }

        if accepted {
            self.state = next;
        } else {
            tracing::debug!(action = %description, "transition rejected by validator");
        }
        self.subscribers.notify_all(&self.state, Some(&prior), force);
    }

    fn record(&mut self, action: String, state: S, accepted: bool) {
        self.history.append(HistoryRecord::new(action, state, accepted));
        self.cursor.follow_tip(self.history.len());
    }
}

impl<S: Serialize> StateStore<S> {
    /// Persist the current state to the state file as pretty-printed JSON,
    /// creating the file and its directories as needed. Best-effort:
    /// failures are logged, not propagated.
    pub fn save(&self) {
        let path = match persist::state_file_path(self.data_dir.as_deref()) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "state not saved");
                return;
            }
        };
        let json = match persist::to_json(&self.state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "state not saved");
                return;
            }
        };
        match persist::write_state_file(&path, &json) {
            Ok(()) => tracing::debug!(path = %path.display(), "state saved"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "state not saved"),
        }
    }
}

impl<S: DeserializeOwned> StateStore<S> {
    /// Replace the in-memory state with the persisted one, if present and
    /// decodable. A missing file or a decode failure keeps the current
    /// state and logs a diagnostic; nothing is propagated to the caller.
    ///
    /// On success every subscriber is notified with the loaded state as
    /// both `new` and `old` and with `force` set, so change detection does
    /// not fire spuriously but initialization logic does. This synthetic
    /// notification bypasses the engine flag and is not recorded in
    /// history.
    pub fn load(&mut self) {
        let path = match persist::state_file_path(self.data_dir.as_deref()) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "state not loaded");
                return;
            }
        };
        let text = match persist::read_state_file(&path) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::info!(path = %path.display(), "no persisted state, keeping current state");
                return;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "state not loaded");
                return;
            }
        };
        match persist::from_json(&text) {
            Ok(state) => {
                self.state = state;
                self.subscribers.notify_all(&self.state, Some(&self.state), true);
                tracing::debug!(path = %path.display(), "state loaded");
            }
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "persisted state unreadable, keeping current state"
            ),
        }
    }

    /// Replace the in-memory state from the supplied JSON text, without
    /// notifying subscribers. A decode failure keeps the current state and
    /// logs a diagnostic. This is the explicit low-level override path.
    pub fn load_json(&mut self, json: &str) {
        match persist::from_json(json) {
            Ok(state) => self.state = state,
            Err(e) => tracing::warn!(error = %e, "supplied JSON unreadable, keeping current state"),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for StateStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("state", &self.state)
            .field("engine_on", &self.engine_on)
            .field("debug", &self.debug)
            .field("subscribers", &self.subscribers.len())
            .field("history_len", &self.history.len())
            .finish()
    }
}
