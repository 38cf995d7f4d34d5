use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::store::MemoryStore;

// =============================================================
// Helpers
// =============================================================

/// Observable state of one control and its card.
#[derive(Default)]
struct FakeDom {
    active: Cell<bool>,
    collapsed: Cell<bool>,
    applied: Cell<usize>,
}

struct FakeControl {
    id: Option<String>,
    dom: Rc<FakeDom>,
}

impl Control for FakeControl {
    fn card_id(&self) -> Option<String> {
        self.id.clone()
    }

    fn is_active(&self) -> bool {
        self.dom.active.get()
    }

    fn apply(&self, visual: Visual) {
        self.dom.active.set(visual.control_active);
        match visual.card {
            CardDisplay::Collapsed => self.dom.collapsed.set(true),
            CardDisplay::Restored => self.dom.collapsed.set(false),
            CardDisplay::Unchanged => {}
        }
        self.dom.applied.set(self.dom.applied.get() + 1);
    }
}

fn card(id: &str) -> (FakeControl, Rc<FakeDom>) {
    let dom = Rc::new(FakeDom::default());
    (FakeControl { id: Some(id.to_owned()), dom: Rc::clone(&dom) }, dom)
}

fn orphan() -> (FakeControl, Rc<FakeDom>) {
    let dom = Rc::new(FakeDom::default());
    (FakeControl { id: None, dom: Rc::clone(&dom) }, dom)
}

/// Reads and writes both refused.
struct DisabledStore;

impl KeyValueStore for DisabledStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
}

/// Reads succeed; writes fail as if the quota were exhausted.
struct FullStore(MemoryStore);

impl KeyValueStore for FullStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
}

/// Reads fail; writes go through to the inner store.
struct WriteOnlyStore(MemoryStore);

impl KeyValueStore for WriteOnlyStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("read refused".into()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.set_item(key, value)
    }
}

fn stored(store: &MemoryStore, key: &str) -> Vec<String> {
    store.raw(key).map_or_else(Vec::new, |raw| serde_json::from_str(&raw).unwrap())
}

// =============================================================
// Visual
// =============================================================

#[test]
fn visual_for_non_collapsing_group_leaves_card_alone() {
    let on = Visual::for_membership(Membership::Active, false);
    let off = Visual::for_membership(Membership::Inactive, false);
    assert_eq!(on, Visual { control_active: true, card: CardDisplay::Unchanged });
    assert_eq!(off, Visual { control_active: false, card: CardDisplay::Unchanged });
}

#[test]
fn visual_for_collapsing_group_collapses_and_restores() {
    let on = Visual::for_membership(Membership::Active, true);
    let off = Visual::for_membership(Membership::Inactive, true);
    assert_eq!(on, Visual { control_active: true, card: CardDisplay::Collapsed });
    assert_eq!(off, Visual { control_active: false, card: CardDisplay::Restored });
}

// =============================================================
// initialize
// =============================================================

#[test]
fn initialize_marks_persisted_favorites_active() {
    let store = MemoryStore::with_items([("favorites", r#"["p1","p3"]"#)]);
    let sync = GroupSync::new(&store, &GroupConfig::favorites());
    let (c1, d1) = card("p1");
    let (c2, d2) = card("p2");
    let (c3, d3) = card("p3");

    let bound = sync.initialize([c1, c2, c3]);

    assert_eq!(bound.len(), 3);
    assert!(d1.active.get());
    assert!(!d2.active.get());
    assert!(d3.active.get());
    assert_eq!(d2.applied.get(), 0);
    assert!(!d1.collapsed.get());
}

#[test]
fn initialize_hidden_collapses_member_cards() {
    let store = MemoryStore::with_items([("hiddenProjects", r#"["p2"]"#)]);
    let sync = GroupSync::new(&store, &GroupConfig::hidden());
    let (c1, d1) = card("p1");
    let (c2, d2) = card("p2");

    sync.initialize([c1, c2]);

    assert!(!d1.collapsed.get());
    assert!(d2.collapsed.get());
    assert!(d2.active.get());
}

#[test]
fn initialize_skips_control_without_card() {
    let store = MemoryStore::with_items([("favorites", r#"["p1"]"#)]);
    let sync = GroupSync::new(&store, &GroupConfig::favorites());
    let (lost, lost_dom) = orphan();
    let (c1, _) = card("p1");

    let bound = sync.initialize([lost, c1]);

    assert_eq!(bound.len(), 1);
    assert_eq!(bound[0].id, "p1");
    assert_eq!(lost_dom.applied.get(), 0);
    assert_eq!(store.raw("favorites").as_deref(), Some(r#"["p1"]"#));
}

#[test]
fn initialize_absent_key_binds_everything_inactive() {
    let store = MemoryStore::new();
    let sync = GroupSync::new(&store, &GroupConfig::favorites());
    let (c1, d1) = card("p1");

    let bound = sync.initialize([c1]);

    assert_eq!(bound.len(), 1);
    assert_eq!(d1.applied.get(), 0);
    assert_eq!(store.raw("favorites"), None);
}

#[test]
fn initialize_corrupt_storage_binds_everything_inactive() {
    let store = MemoryStore::with_items([("favorites", "{not json")]);
    let sync = GroupSync::new(&store, &GroupConfig::favorites());
    let (c1, d1) = card("p1");

    let bound = sync.initialize([c1]);

    assert_eq!(bound.len(), 1);
    assert!(!d1.active.get());
}

#[test]
fn initialize_disabled_storage_binds_everything_inactive() {
    let sync = GroupSync::new(DisabledStore, &GroupConfig::hidden());
    let (c1, d1) = card("p1");

    let bound = sync.initialize([c1]);

    assert_eq!(bound.len(), 1);
    assert!(!d1.collapsed.get());
}

// =============================================================
// toggle
// =============================================================

#[test]
fn hide_toggle_collapses_then_restores() {
    let store = MemoryStore::with_items([("hiddenProjects", r#"["p1"]"#)]);
    let sync = GroupSync::new(&store, &GroupConfig::hidden());
    let (c2, d2) = card("p2");
    let bound = sync.initialize([c2]);
    let b = &bound[0];

    let first = sync.toggle(&b.control, &b.id);
    assert_eq!(first, ToggleOutcome { membership: Membership::Active, persisted: true });
    assert!(d2.active.get());
    assert!(d2.collapsed.get());
    assert_eq!(stored(&store, "hiddenProjects"), vec!["p1", "p2"]);

    let second = sync.toggle(&b.control, &b.id);
    assert_eq!(second, ToggleOutcome { membership: Membership::Inactive, persisted: true });
    assert!(!d2.active.get());
    assert!(!d2.collapsed.get());
    assert_eq!(stored(&store, "hiddenProjects"), vec!["p1"]);
}

#[test]
fn favorite_toggle_never_touches_card_display() {
    let store = MemoryStore::new();
    let sync = GroupSync::new(&store, &GroupConfig::favorites());
    let (c1, d1) = card("p1");
    d1.collapsed.set(true);

    sync.toggle(&c1, "p1");
    assert!(d1.active.get());
    assert!(d1.collapsed.get());
    sync.toggle(&c1, "p1");
    assert!(!d1.active.get());
    assert!(d1.collapsed.get());
}

#[test]
fn toggle_rereads_storage_instead_of_caching() {
    let store = MemoryStore::new();
    let sync = GroupSync::new(&store, &GroupConfig::favorites());
    let (c1, _) = card("p1");
    let bound = sync.initialize([c1]);

    // Another view adds p1 after this page loaded.
    store.set_item("favorites", r#"["p0","p1"]"#).unwrap();

    let outcome = sync.toggle(&bound[0].control, "p1");
    assert_eq!(outcome.membership, Membership::Inactive);
    assert_eq!(stored(&store, "favorites"), vec!["p0"]);
}

#[test]
fn toggle_overwrites_corrupt_storage() {
    let store = MemoryStore::with_items([("hiddenProjects", "[1,2")]);
    let sync = GroupSync::new(&store, &GroupConfig::hidden());
    let (c1, d1) = card("p1");

    let outcome = sync.toggle(&c1, "p1");

    assert_eq!(outcome, ToggleOutcome { membership: Membership::Active, persisted: true });
    assert!(d1.collapsed.get());
    assert_eq!(store.raw("hiddenProjects").as_deref(), Some(r#"["p1"]"#));
}

#[test]
fn toggle_without_storage_still_alternates_visual() {
    let sync = GroupSync::new(DisabledStore, &GroupConfig::hidden());
    let (c1, d1) = card("p1");

    for expect_active in [true, false, true, false] {
        let outcome = sync.toggle(&c1, "p1");
        assert!(!outcome.persisted);
        assert_eq!(outcome.membership.is_active(), expect_active);
        assert_eq!(d1.active.get(), expect_active);
        assert_eq!(d1.collapsed.get(), expect_active);
    }
}

#[test]
fn toggle_with_full_storage_flips_visual_but_does_not_persist() {
    let store = FullStore(MemoryStore::with_items([("favorites", r#"["p9"]"#)]));
    let sync = GroupSync::new(&store, &GroupConfig::favorites());
    let (c1, d1) = card("p1");

    let outcome = sync.toggle(&c1, "p1");

    assert_eq!(outcome, ToggleOutcome { membership: Membership::Active, persisted: false });
    assert!(d1.active.get());
    assert_eq!(store.0.raw("favorites").as_deref(), Some(r#"["p9"]"#));
}

#[test]
fn toggle_after_failed_read_keeps_stored_set_intact() {
    let store = WriteOnlyStore(MemoryStore::with_items([("hiddenProjects", r#"["p1","p3","p7"]"#)]));
    let sync = GroupSync::new(&store, &GroupConfig::hidden());
    let (c2, d2) = card("p2");

    let outcome = sync.toggle(&c2, "p2");

    assert_eq!(outcome, ToggleOutcome { membership: Membership::Active, persisted: false });
    assert!(d2.active.get());
    assert!(d2.collapsed.get());
    assert_eq!(stored(&store.0, "hiddenProjects"), vec!["p1", "p3", "p7"]);

    let outcome = sync.toggle(&c2, "p2");
    assert_eq!(outcome, ToggleOutcome { membership: Membership::Inactive, persisted: false });
    assert!(!d2.collapsed.get());
    assert_eq!(stored(&store.0, "hiddenProjects"), vec!["p1", "p3", "p7"]);
}

#[test]
fn toggle_on_storage_corrupted_after_load_flips_active_control_off() {
    let store = MemoryStore::with_items([("hiddenProjects", r#"["p2"]"#)]);
    let sync = GroupSync::new(&store, &GroupConfig::hidden());
    let (c2, d2) = card("p2");
    let bound = sync.initialize([c2]);
    assert!(d2.active.get());

    store.set_item("hiddenProjects", "{garbage").unwrap();
    let outcome = sync.toggle(&bound[0].control, "p2");

    assert_eq!(outcome, ToggleOutcome { membership: Membership::Inactive, persisted: true });
    assert!(!d2.active.get());
    assert!(!d2.collapsed.get());
    assert_eq!(store.raw("hiddenProjects").as_deref(), Some("[]"));

    let outcome = sync.toggle(&bound[0].control, "p2");
    assert_eq!(outcome.membership, Membership::Active);
    assert_eq!(stored(&store, "hiddenProjects"), vec!["p2"]);
}

#[test]
fn toggle_parity_over_many_clicks() {
    let store = MemoryStore::with_items([("favorites", r#"["p1"]"#)]);
    let sync = GroupSync::new(&store, &GroupConfig::favorites());
    let (c1, d1) = card("p1");
    let bound = sync.initialize([c1]);

    for click in 1..=9_usize {
        sync.toggle(&bound[0].control, "p1");
        let expected = click % 2 == 0;
        assert_eq!(d1.active.get(), expected);
        let ids = stored(&store, "favorites");
        assert_eq!(ids.iter().filter(|id| *id == "p1").count(), usize::from(expected));
    }
}

#[test]
fn groups_on_one_store_stay_independent() {
    let store = Rc::new(MemoryStore::new());
    let favorites = GroupSync::new(Rc::clone(&store), &GroupConfig::favorites());
    let hidden = GroupSync::new(Rc::clone(&store), &GroupConfig::hidden());
    let (fav, fav_dom) = card("p1");
    let (hide, hide_dom) = card("p1");

    favorites.toggle(&fav, "p1");
    assert_eq!(stored(&store, "favorites"), vec!["p1"]);
    assert_eq!(store.raw("hiddenProjects"), None);

    hidden.toggle(&hide, "p1");
    hidden.toggle(&hide, "p1");
    assert_eq!(stored(&store, "favorites"), vec!["p1"]);
    assert!(stored(&store, "hiddenProjects").is_empty());
    assert!(fav_dom.active.get());
    assert!(!hide_dom.active.get());
}

#[test]
fn group_sync_exposes_name_and_key() {
    let store = MemoryStore::new();
    let sync = GroupSync::new(&store, &GroupConfig::hidden());
    assert_eq!(sync.name(), "hidden");
    assert_eq!(sync.repo().key(), "hiddenProjects");
}
