//! Wire Sizing Module
//!
//! AWG gauge table, conductor derating and the gauge selection search.

pub mod conductor;
pub mod gauge;
pub mod sizing;

pub use conductor::*;
pub use gauge::*;
pub use sizing::*;
