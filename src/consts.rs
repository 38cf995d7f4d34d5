//! Default DOM contract and storage keys.

// ── Storage ─────────────────────────────────────────────────────

/// Storage key holding the favorite project identifiers.
pub const FAVORITES_KEY: &str = "favorites";

/// Storage key holding the hidden project identifiers.
pub const HIDDEN_KEY: &str = "hiddenProjects";

// ── DOM ─────────────────────────────────────────────────────────

/// Selector for card containers.
pub const CARD_SELECTOR: &str = ".card";

/// Card attribute carrying the project identifier.
pub const ID_ATTRIBUTE: &str = "data-project";

/// Class applied to a control whose project is in the set.
pub const ACTIVE_CLASS: &str = "active";

/// Selector for favorite controls.
pub const FAVORITE_CONTROL_SELECTOR: &str = ".card-btn.favorite-btn";

/// Selector for hide controls.
pub const HIDE_CONTROL_SELECTOR: &str = ".card-btn.hide-btn";

/// Id of the optional inline `<script type="application/json">` config override.
pub const CONFIG_ELEMENT_ID: &str = "card-marks-config";
