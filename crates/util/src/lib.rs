//! calendrift-util - Small helpers shared by the calendrift crates.
//!
//! Id generation for journal entries and the string helpers used to turn
//! form input into entry fields.

pub mod id;
pub mod strings;

// Re-exports for convenience
pub use id::IdGenerator;
pub use strings::{split_categories, to_base36};
