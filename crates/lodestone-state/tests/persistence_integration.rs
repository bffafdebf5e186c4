//! Integration tests for state persistence: save, load, reset, and the
//! direct JSON override path.

mod common;

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use common::{SwitchAction, SwitchPanel};
use lodestone_state::{from_json, to_json, StateStore, STATE_FILE_NAME};
use tempfile::TempDir;

fn panel_store(dir: &TempDir) -> StateStore<SwitchPanel> {
    StateStore::new(SwitchPanel::with_max(2)).with_data_dir(dir.path())
}

#[test]
fn test_json_round_trip_preserves_state() {
    let mut state = SwitchPanel::with_max(2);
    state.switches_on = vec!["s1".to_string(), "s2".to_string()];
    state.banned_switches = vec!["s9".to_string()];

    let decoded: SwitchPanel = from_json(&to_json(&state).unwrap()).unwrap();
    assert_eq!(decoded, state);
}

#[test]
fn test_save_writes_pretty_json_at_fixed_name() {
    let dir = TempDir::new().unwrap();
    let mut store = panel_store(&dir);
    store.dispatch(SwitchAction::on("s1"));

    store.save();

    let text = fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
    assert!(text.contains('\n')); // human-diffable form
    let on_disk: SwitchPanel = from_json(&text).unwrap();
    assert_eq!(&on_disk, store.state());
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let mut store = panel_store(&dir);

    store.dispatch(SwitchAction::on("s1"));
    store.save();
    store.dispatch(SwitchAction::on("s2"));
    store.save();

    let on_disk: SwitchPanel =
        from_json(&fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap()).unwrap();
    assert_eq!(on_disk.switches_on, vec!["s1", "s2"]);
}

#[test]
fn test_load_replaces_state_across_sessions() {
    let dir = TempDir::new().unwrap();
    let mut first = panel_store(&dir);
    first.dispatch(SwitchAction::on("s1"));
    first.save();

    let mut second = panel_store(&dir);
    second.load();

    assert_eq!(second.state().switches_on, vec!["s1"]);
}

#[test]
fn test_load_notifies_with_loaded_state_as_new_and_old() {
    let dir = TempDir::new().unwrap();
    let mut writer = panel_store(&dir);
    writer.dispatch(SwitchAction::on("s1"));
    writer.save();

    let payloads = Rc::new(RefCell::new(Vec::new()));
    let mut store = panel_store(&dir);
    let payloads_seen = payloads.clone();
    store.subscribe(move |new: &SwitchPanel, old: Option<&SwitchPanel>, force| {
        payloads_seen
            .borrow_mut()
            .push((new.clone(), old.cloned(), force));
    });

    store.load();

    let seen = payloads.borrow();
    assert_eq!(seen.len(), 1);
    let (new, old, force) = &seen[0];
    assert_eq!(Some(new), old.as_ref()); // no spurious diff to react to
    assert!(*force); // but initialization logic must run
    assert_eq!(new.switches_on, vec!["s1"]);
}

#[test]
fn test_load_missing_file_keeps_state_and_stays_silent() {
    let dir = TempDir::new().unwrap();
    let notified = Rc::new(RefCell::new(0));
    let mut store = panel_store(&dir);

    let notified_seen = notified.clone();
    store.subscribe(move |_: &SwitchPanel, _, _| *notified_seen.borrow_mut() += 1);
    store.dispatch(SwitchAction::on("s1"));

    let before = store.state().clone();
    store.load();

    assert_eq!(store.state(), &before);
    assert_eq!(*notified.borrow(), 1); // only the dispatch, not the load
}

#[test]
fn test_load_corrupt_file_keeps_state() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(STATE_FILE_NAME), "{ definitely not json").unwrap();

    let mut store = panel_store(&dir);
    store.dispatch(SwitchAction::on("s1"));
    let before = store.state().clone();

    store.load();
    assert_eq!(store.state(), &before);
}

#[test]
fn test_reset_saved_state_deletes_artifact() {
    let dir = TempDir::new().unwrap();
    let mut store = panel_store(&dir);
    store.dispatch(SwitchAction::on("s1"));
    store.save();
    assert!(dir.path().join(STATE_FILE_NAME).exists());

    store.reset_saved_state();
    assert!(!dir.path().join(STATE_FILE_NAME).exists());

    // Deleting again is best-effort and quiet.
    store.reset_saved_state();
}

#[test]
fn test_load_after_reset_uses_default_state() {
    let dir = TempDir::new().unwrap();
    let mut store = panel_store(&dir);
    store.dispatch(SwitchAction::on("s1"));
    store.save();
    store.reset_saved_state();

    let mut fresh = panel_store(&dir);
    fresh.load();
    assert!(fresh.state().switches_on.is_empty());
}

#[test]
fn test_load_json_replaces_without_notifying() {
    let dir = TempDir::new().unwrap();
    let notified = Rc::new(RefCell::new(0));
    let mut store = panel_store(&dir);

    let notified_seen = notified.clone();
    store.subscribe(move |_: &SwitchPanel, _, _| *notified_seen.borrow_mut() += 1);

    let mut replacement = SwitchPanel::with_max(5);
    replacement.switches_on = vec!["s7".to_string()];
    store.load_json(&to_json(&replacement).unwrap());

    assert_eq!(store.state(), &replacement);
    assert_eq!(*notified.borrow(), 0);
}

#[test]
fn test_load_json_rejects_garbage_and_keeps_state() {
    let dir = TempDir::new().unwrap();
    let mut store = panel_store(&dir);
    store.dispatch(SwitchAction::on("s1"));
    let before = store.state().clone();

    store.load_json("not json at all");
    assert_eq!(store.state(), &before);
}

#[test]
fn test_saved_state_survives_debug_history() {
    // History is in-memory only; the persisted document is just the state.
    let dir = TempDir::new().unwrap();
    let mut store = panel_store(&dir);
    store.start_debug();
    store.dispatch(SwitchAction::on("s1"));
    store.save();

    let text = fs::read_to_string(dir.path().join(STATE_FILE_NAME)).unwrap();
    let decoded: SwitchPanel = from_json(&text).unwrap();
    assert_eq!(decoded.switches_on, vec!["s1"]);
    assert!(!text.contains("accepted"));
}
