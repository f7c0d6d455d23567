//! Sample-rate timing
//!
//! Motion-capture frames carry an integer frame index; every time value the
//! analysis produces is derived from that index and the capture's fixed
//! sample rate.

pub mod sample_clock;

pub use sample_clock::SampleClock;
