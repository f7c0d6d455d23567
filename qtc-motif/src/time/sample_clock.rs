//! Frame Index to Seconds
//!
//! Converts capture frame indices to timestamps and expresses durations as
//! sample counts at the capture's native rate.

/// Default capture rate when a recording does not declare one (Hz)
pub const DEFAULT_SAMPLE_RATE: f64 = 60.0;

/// Fixed-rate sample clock
///
/// A validated sample rate. Construction fails for rates that would produce
/// infinite or negative timestamps, so every clock in circulation is usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleClock {
    sample_rate: f64,
}

impl SampleClock {
    /// Create a clock for the given rate (frames per second).
    pub fn new(sample_rate: f64) -> crate::Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(crate::Error::InvalidConfiguration(format!(
                "sample rate must be a positive finite number, got {}",
                sample_rate
            )));
        }
        Ok(Self { sample_rate })
    }

    /// Frames per second.
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Timestamp in seconds of a frame index.
    #[inline]
    pub fn timestamp(&self, frame_index: u64) -> f64 {
        frame_index as f64 / self.sample_rate
    }

    /// Number of samples spanning `seconds` at this rate.
    ///
    /// Rounded to the nearest sample and never less than one.
    pub fn samples_in(&self, seconds: f64) -> usize {
        let samples = (seconds.max(0.0) * self.sample_rate).round();
        (samples as usize).max(1)
    }

    /// Duration in seconds covered by `frame_count` samples.
    #[inline]
    pub fn duration_of(&self, frame_count: usize) -> f64 {
        frame_count as f64 / self.sample_rate
    }
}

impl Default for SampleClock {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}
