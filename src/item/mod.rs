//! Item model consumed by the loadout engine.
//!
//! - [`StatVector`]: fixed-schema, name-addressable stat storage
//! - [`Item`]: one piece of equipment, identified by [`ItemId`]
//! - [`ItemPool`]: items grouped by equipment class, rings isolated

mod pool;
mod stats;
mod types;

pub use pool::{ItemPool, RING_CLASS};
pub use stats::{StatCategory, StatField, StatKey, StatValue, StatVector, TextField};
pub use types::{Item, ItemId};
