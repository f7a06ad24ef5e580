//! Utility Module
//!
//! - [`interner`]: String interning for script identifiers
//! - [`time`]: Frame timer used by host loops to produce per-frame deltas

pub mod interner;
pub mod time;

pub use interner::Symbol;
pub use time::Timer;
