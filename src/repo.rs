//! Typed repository over one persisted identifier set.
//!
//! DESIGN
//! ======
//! Each storage key is a named register. [`SetRepository`] owns the JSON
//! encoding for that register so callers only deal in [`IdSet`]. Writes
//! always replace the whole value.

#[cfg(test)]
#[path = "repo_test.rs"]
mod repo_test;

use crate::error::StoreError;
use crate::set::IdSet;
use crate::store::KeyValueStore;

pub struct SetRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SetRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the set. An absent key is an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the store cannot be read and
    /// [`StoreError::Corrupt`] if the stored text is not a JSON array of strings.
    pub fn get(&self) -> Result<IdSet, StoreError> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(IdSet::new());
        };
        IdSet::from_json(&raw).map_err(|source| StoreError::Corrupt { key: self.key.clone(), source })
    }

    /// Read the set, falling back to empty on any failure.
    pub fn load(&self) -> IdSet {
        match self.get() {
            Ok(set) => set,
            Err(e) => {
                log::warn!("{}: {e}; using an empty set", self.key);
                IdSet::new()
            }
        }
    }

    /// Overwrite the stored set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the write is refused.
    pub fn set(&self, set: &IdSet) -> Result<(), StoreError> {
        let raw = set.to_json()?;
        self.store.set_item(&self.key, &raw)?;
        log::debug!("saved {}: {raw}", self.key);
        Ok(())
    }
}
