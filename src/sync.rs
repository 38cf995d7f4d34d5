//! Group initialization and toggle handling.
//!
//! SYSTEM CONTEXT
//! ==============
//! A [`GroupSync`] owns one persisted set (favorites or hidden) and drives the
//! controls bound to it through the [`Control`] trait. The browser implements
//! `Control` over a button and its card; tests implement it in memory.
//!
//! DESIGN
//! ======
//! The decision of what a control should look like is pure
//! ([`crate::set::transition`] then [`Visual::for_membership`]). Only
//! [`Control::apply`] touches the page. Every toggle re-reads storage, so
//! writes made elsewhere since page load are respected.
//!
//! TRADE-OFFS
//! ==========
//! Storage failures never abort a toggle. The visual always flips; an
//! unwritable store only costs persistence.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use crate::config::GroupConfig;
use crate::error::StoreError;
use crate::repo::SetRepository;
use crate::set::{IdSet, Membership, transition};
use crate::store::KeyValueStore;

/// What happens to the card's layout presence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardDisplay {
    /// Leave the card's inline style alone.
    Unchanged,
    /// Remove the card from layout (`display: none`).
    Collapsed,
    /// Drop the inline `display` override.
    Restored,
}

/// Visual state to apply to one control and its card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visual {
    /// Whether the control carries the active class.
    pub control_active: bool,
    pub card: CardDisplay,
}

impl Visual {
    #[must_use]
    pub fn for_membership(membership: Membership, collapses_card: bool) -> Self {
        let card = match (collapses_card, membership) {
            (false, _) => CardDisplay::Unchanged,
            (true, Membership::Active) => CardDisplay::Collapsed,
            (true, Membership::Inactive) => CardDisplay::Restored,
        };
        Self { control_active: membership.is_active(), card }
    }
}

/// A control on the page, scoped to its nearest enclosing card.
pub trait Control {
    /// Identifier of the enclosing card, or `None` when there is no card or
    /// the card carries no identifier.
    fn card_id(&self) -> Option<String>;

    /// Whether the control currently shows the active visual.
    fn is_active(&self) -> bool;

    fn apply(&self, visual: Visual);
}

/// A control that passed initialization, paired with its identifier.
#[derive(Debug)]
pub struct Bound<C> {
    pub control: C,
    pub id: String,
}

/// Result of one toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub membership: Membership,
    /// `false` when the stored set could not be read or the write was refused.
    pub persisted: bool,
}

pub struct GroupSync<S> {
    name: String,
    collapses_card: bool,
    repo: SetRepository<S>,
}

impl<S: KeyValueStore> GroupSync<S> {
    pub fn new(store: S, group: &GroupConfig) -> Self {
        Self {
            name: group.name.clone(),
            collapses_card: group.collapses_card,
            repo: SetRepository::new(store, group.storage_key.clone()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn repo(&self) -> &SetRepository<S> {
        &self.repo
    }

    /// Reflect persisted membership onto `controls`.
    ///
    /// Members get the active visual; everything else is left as rendered.
    /// Controls without an identified card are dropped, so only the returned
    /// bindings should receive click handlers.
    pub fn initialize<C: Control>(&self, controls: impl IntoIterator<Item = C>) -> Vec<Bound<C>> {
        let set = self.repo.load();
        log::debug!("initializing {}, current: {:?}", self.name, set.iter().collect::<Vec<_>>());

        let mut bound = Vec::new();
        for control in controls {
            let Some(id) = control.card_id() else {
                log::debug!("{}: no card found for control", self.name);
                continue;
            };
            if set.contains(&id) {
                control.apply(Visual::for_membership(Membership::Active, self.collapses_card));
                log::debug!("{}: set active for {id}", self.name);
            }
            bound.push(Bound { control, id });
        }
        bound
    }

    /// Flip `id` in the persisted set and update `control` to match.
    ///
    /// When the stored set cannot be read, the control's visible state stands
    /// in for membership. An unreadable store is never written, since the
    /// stand-in would replace every other identifier under the key. A corrupt
    /// value holds nothing to lose and is overwritten.
    pub fn toggle<C: Control>(&self, control: &C, id: &str) -> ToggleOutcome {
        let visible = || if control.is_active() { [id].into_iter().collect() } else { IdSet::new() };
        let (current, writable) = match self.repo.get() {
            Ok(set) => (set, true),
            Err(StoreError::Unavailable(reason)) => {
                log::warn!("{}: storage unavailable ({reason}); toggling from the visible state", self.name);
                (visible(), false)
            }
            Err(e) => {
                log::warn!("{}: {e}; toggling from the visible state", self.name);
                (visible(), true)
            }
        };

        let (next, membership) = transition(current, id);
        control.apply(Visual::for_membership(membership, self.collapses_card));
        let verb = if membership.is_active() { "added" } else { "removed" };
        log::debug!("{}: {verb} {id}", self.name);

        if !writable {
            log::warn!("{}: {id} not persisted: stored set could not be read", self.name);
            return ToggleOutcome { membership, persisted: false };
        }
        let persisted = match self.repo.set(&next) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}: {id} not persisted: {e}", self.name);
                false
            }
        };
        ToggleOutcome { membership, persisted }
    }
}
