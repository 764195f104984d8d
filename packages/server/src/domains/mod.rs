//! Domain modules.

pub mod compliance;
pub mod memory;
pub mod travel;
