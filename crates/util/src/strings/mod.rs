//! String utilities.
//!
//! Category token splitting and compact base-36 number formatting.

mod base36;
mod categories;

pub use base36::to_base36;
pub use categories::split_categories;
