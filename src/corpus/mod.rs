//! Drill corpora: items, pools, built-in content, custom sets.

pub mod builtin;
pub mod custom;
pub mod item;

pub use builtin::builtin_pool;
pub use custom::CustomSet;
pub use item::{Item, ItemPool, UnitType};
