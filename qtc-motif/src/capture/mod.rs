//! Motion capture module
//!
//! Joint/frame data model and the Captury Live CSV reader that produces it.
//! The analysis core only ever reads these types.

pub mod types;
pub mod captury;

pub use types::*;
pub use captury::CapturyReader;
