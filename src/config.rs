//! Device configuration consumed by the parser.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sample rate of the device ADC in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 9615;
/// Analysis window of the pitch detector in samples.
pub const DEFAULT_WINDOW_SIZE: usize = 200;
/// Lead-in skipped at the start of a recorded note file.
pub const DEFAULT_SECONDS_TO_SKIP: u32 = 1;

/// Parser configuration.
///
/// # Examples
///
/// ```
/// use monowave::Config;
///
/// const CONFIG: Config = Config::new().with_sample_rate(19231).with_window_size(256);
/// assert_eq!(CONFIG.samples_to_skip(), 19231);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// The only sample rate accepted in the "fmt " chunk, in Hz.
    pub sample_rate: u32,
    /// Number of samples handed out per window by [`crate::SampleReader`].
    pub window_size: usize,
    /// Seconds skipped by [`crate::SampleReader::skip_lead_in`].
    pub seconds_to_skip: u32,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            sample_rate: DEFAULT_SAMPLE_RATE,
            window_size: DEFAULT_WINDOW_SIZE,
            seconds_to_skip: DEFAULT_SECONDS_TO_SKIP,
        }
    }

    pub const fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub const fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub const fn with_seconds_to_skip(mut self, seconds_to_skip: u32) -> Self {
        self.seconds_to_skip = seconds_to_skip;
        self
    }

    /// Number of lead-in samples, saturating at `u32::MAX`.
    pub const fn samples_to_skip(&self) -> u32 {
        self.sample_rate.saturating_mul(self.seconds_to_skip)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
