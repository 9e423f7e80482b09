//! Carts
//!
//! A [`CartStore`] owns the persisted cart slot and the change channel. Every
//! independently driven view attaches to it and gets its own [`CartView`],
//! which keeps a local copy of the cart and replaces it wholesale from the
//! slot whenever another view announces a change.

pub mod errors;
pub mod models;
pub mod slot;
pub mod store;
pub mod watcher;

pub use errors::{CartDecodeError, CartSyncError, SlotError};
pub use models::{Cart, CartLine};
pub use slot::{CartSlot, DEFAULT_SLOT_NAME, FileCartSlot, MemoryCartSlot};
pub use store::{CartChanged, CartStore, CartView, ViewId};
pub use watcher::SlotWatcher;
