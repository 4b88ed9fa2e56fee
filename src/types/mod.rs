//! Data types for the table engine: column model, sort keys, filter conditions.

mod column;
mod filter;
mod sort;

pub use column::*;
pub use filter::*;
pub use sort::*;
