//! Inventory catalog types.
//!
//! `identity` holds the id newtype and the closed enums used by every facet,
//! `model` the record shape shared by the CSV and JSON feeds, and `index` the
//! loaded, immutable inventory with id lookup for detail and cart views.

pub mod identity;
pub mod index;
pub mod model;

pub use identity::{Audience, Category, Condition, ItemId, Status};
pub use index::InventoryIndex;
pub use model::{InventoryRecord, NEW_ARRIVAL_DAYS, Timestamp};
