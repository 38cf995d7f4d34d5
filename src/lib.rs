//! Favorite and hidden toggles for project cards, persisted to `localStorage`.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It binds the
//! favorite and hide controls found on a page of project cards, keeps two named
//! identifier sets in browser storage, and reflects set membership onto the
//! controls (and, for hidden projects, onto the cards themselves). The page
//! markup and styling are owned by the host; this crate only reads the DOM
//! contract and mutates classes and inline styles.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`set`] | Ordered identifier set and the pure toggle transition |
//! | [`store`] | Key-value storage seam and the in-memory store |
//! | [`repo`] | Typed repository over one storage key |
//! | [`config`] | DOM contract and storage keys, with JSON overrides |
//! | [`sync`] | Group initialization and toggle handling over [`sync::Control`] |
//! | [`error`] | Storage and configuration errors |
//! | [`consts`] | Default keys, selectors, and class names |
//! | `browser` | web-sys bindings and the start-up entry (`hydrate` only) |

pub mod config;
pub mod consts;
pub mod error;
pub mod repo;
pub mod set;
pub mod store;
pub mod sync;

#[cfg(feature = "hydrate")]
pub mod browser;
