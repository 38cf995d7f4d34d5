//! Ordered identifier sets and the pure toggle transition.
//!
//! An [`IdSet`] is what each storage key holds: a JSON array of project
//! identifiers in insertion order, each appearing at most once. The
//! [`transition`] function is the whole state machine for one
//! (control, identifier) pair, computed without touching storage or the DOM.

#[cfg(test)]
#[path = "set_test.rs"]
mod set_test;

use serde::{Deserialize, Serialize, Serializer};

/// Membership of one identifier in one set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    /// In the set; the special visual is applied.
    Active,
    /// Not in the set; the default visual is shown.
    Inactive,
}

impl Membership {
    #[must_use]
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Ordered sequence of unique project identifiers.
///
/// Deserializing collapses duplicates, keeping the first occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct IdSet {
    ids: Vec<String>,
}

impl IdSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse stored text as a JSON array of strings.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the text is not valid JSON, is not
    /// an array, or contains a non-string element.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Encode as a JSON array, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Append `id` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_owned());
        true
    }

    /// Remove `id` by value. Returns `true` if it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Flip membership of `id` and return the new state.
    pub fn toggle(&mut self, id: &str) -> Membership {
        if self.remove(id) {
            Membership::Inactive
        } else {
            self.ids.push(id.to_owned());
            Membership::Active
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }
}

impl From<Vec<String>> for IdSet {
    fn from(ids: Vec<String>) -> Self {
        let mut set = Self::new();
        for id in &ids {
            set.insert(id);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for IdSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl Serialize for IdSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ids.serialize(serializer)
    }
}

/// Toggle `id` in `set`, returning the new set and the identifier's new state.
#[must_use]
pub fn transition(mut set: IdSet, id: &str) -> (IdSet, Membership) {
    let membership = set.toggle(id);
    (set, membership)
}
