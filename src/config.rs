//! DOM contract and storage keys.
//!
//! Every field has a default matching the stock page markup. A page can
//! override any subset through an inline JSON block (see
//! [`crate::consts::CONFIG_ELEMENT_ID`]); missing fields keep their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Deserializer};

use crate::consts;
use crate::error::ConfigError;

/// One toggleable group: which controls it binds and where it persists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupConfig {
    /// Label used in log messages.
    pub name: String,
    pub storage_key: String,
    pub control_selector: String,
    /// Whether the active state also removes the card from layout.
    pub collapses_card: bool,
}

impl GroupConfig {
    #[must_use]
    pub fn favorites() -> Self {
        Self {
            name: "favorites".into(),
            storage_key: consts::FAVORITES_KEY.into(),
            control_selector: consts::FAVORITE_CONTROL_SELECTOR.into(),
            collapses_card: false,
        }
    }

    #[must_use]
    pub fn hidden() -> Self {
        Self {
            name: "hidden".into(),
            storage_key: consts::HIDDEN_KEY.into(),
            control_selector: consts::HIDE_CONTROL_SELECTOR.into(),
            collapses_card: true,
        }
    }
}

/// Partial group override; absent fields keep the group's own defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GroupOverride {
    name: Option<String>,
    storage_key: Option<String>,
    control_selector: Option<String>,
    collapses_card: Option<bool>,
}

impl GroupOverride {
    fn apply(self, base: GroupConfig) -> GroupConfig {
        GroupConfig {
            name: self.name.unwrap_or(base.name),
            storage_key: self.storage_key.unwrap_or(base.storage_key),
            control_selector: self.control_selector.unwrap_or(base.control_selector),
            collapses_card: self.collapses_card.unwrap_or(base.collapses_card),
        }
    }
}

fn favorites_group<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GroupConfig, D::Error> {
    Ok(GroupOverride::deserialize(deserializer)?.apply(GroupConfig::favorites()))
}

fn hidden_group<'de, D: Deserializer<'de>>(deserializer: D) -> Result<GroupConfig, D::Error> {
    Ok(GroupOverride::deserialize(deserializer)?.apply(GroupConfig::hidden()))
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub card_selector: String,
    pub id_attribute: String,
    pub active_class: String,
    #[serde(deserialize_with = "favorites_group")]
    pub favorites: GroupConfig,
    #[serde(deserialize_with = "hidden_group")]
    pub hidden: GroupConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            card_selector: consts::CARD_SELECTOR.into(),
            id_attribute: consts::ID_ATTRIBUTE.into(),
            active_class: consts::ACTIVE_CLASS.into(),
            favorites: GroupConfig::favorites(),
            hidden: GroupConfig::hidden(),
        }
    }
}

impl Config {
    /// Parse a partial JSON override and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any error from
    /// [`Config::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Both groups, favorites first.
    #[must_use]
    pub fn groups(&self) -> [&GroupConfig; 2] {
        [&self.favorites, &self.hidden]
    }

    /// Reject empty selectors or keys and groups sharing a storage key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] or [`ConfigError::SharedKey`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("card_selector", &self.card_selector)?;
        non_empty("id_attribute", &self.id_attribute)?;
        non_empty("active_class", &self.active_class)?;
        for group in self.groups() {
            non_empty("storage_key", &group.storage_key)?;
            non_empty("control_selector", &group.control_selector)?;
        }
        if self.favorites.storage_key == self.hidden.storage_key {
            return Err(ConfigError::SharedKey {
                first: self.favorites.name.clone(),
                second: self.hidden.name.clone(),
                key: self.favorites.storage_key.clone(),
            });
        }
        Ok(())
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { field });
    }
    Ok(())
}
