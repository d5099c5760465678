//! Extraction of signed samples from the "data" chunk.

use crate::config::Config;
use crate::error::WaveError;
use crate::stream::{read_bytes, ByteStream};
use crate::wav::WaveHeader;
use log::{trace, warn};

/// Added to every unsigned PCM byte to move [0, 255] onto [-128, 127].
pub const SAMPLE_BIAS: i8 = i8::MIN;

/// Reads `count` samples into the start of `dest`, removing the unsigned bias.
///
/// `stream` must be positioned at the first sample byte, i.e. right after
/// [`crate::parse_header`] succeeded. Elements of `dest` past `count` are left untouched.
///
/// # Errors
///
/// * `WaveError::InsufficientBuffer` - `dest` holds fewer than `count` samples. Nothing is read.
/// * `WaveError::TruncatedSampleData` - The stream ended early. `dest` must be discarded.
pub fn read_samples<S: ByteStream + ?Sized>(
    stream: &mut S,
    count: u32,
    dest: &mut [i8],
) -> Result<(), WaveError> {
    let len = usize::try_from(count).unwrap_or(usize::MAX);
    if dest.len() < len {
        warn!("buffer of {} samples cannot hold {count} samples", dest.len());
        return Err(WaveError::InsufficientBuffer);
    }
    let dest: &mut [u8] = bytemuck::cast_slice_mut(&mut dest[..len]);
    read_bytes(stream, count, SAMPLE_BIAS, Some(dest)).map_err(|_| {
        warn!("stream ended inside {count} samples");
        WaveError::TruncatedSampleData
    })
}

/// Pull reader over the sample data of one WAV stream.
///
/// Hands out analysis windows of at most [`Config::window_size`] samples until
/// the "data" chunk is exhausted.
///
/// # Examples
///
/// ```no_run
/// use monowave::{Config, SampleReader, WaveError};
///
/// # fn main() -> Result<(), WaveError> {
/// # let wav: &[u8] = &[];
/// let config = Config::default();
/// let mut reader = SampleReader::new(wav, &config)?;
/// reader.skip_lead_in()?;
/// loop {
///     match reader.next_window::<200>() {
///         // hand `window` to the pitch detector
///         Ok(window) => { let _ = window; }
///         Err(WaveError::FinishedReading) => break,
///         Err(e) => return Err(e),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SampleReader<S> {
    stream: S,
    header: WaveHeader,
    config: Config,
    /// Samples left in the "data" chunk.
    remaining: u32,
    /// Set after a short read; every later read fails with `TruncatedSampleData`.
    poisoned: bool,
}

impl<S: ByteStream> SampleReader<S> {
    /// Parses the header of `stream` and positions the reader at the first sample.
    pub fn new(mut stream: S, config: &Config) -> Result<Self, WaveError> {
        let header = WaveHeader::parse(&mut stream, config)?;
        Ok(SampleReader {
            stream,
            header,
            config: *config,
            remaining: header.sample_count,
            poisoned: false,
        })
    }

    pub fn header(&self) -> &WaveHeader {
        &self.header
    }

    /// Number of samples not yet read or skipped. Zero once the reader is poisoned.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Discards up to `count` samples and returns how many were skipped.
    pub fn skip(&mut self, count: u32) -> Result<u32, WaveError> {
        if self.poisoned {
            return Err(WaveError::TruncatedSampleData);
        }
        let count = count.min(self.remaining);
        trace!("skipping {count} samples");
        if read_bytes(&mut self.stream, count, 0, None).is_err() {
            return Err(self.poison());
        }
        self.remaining -= count;
        Ok(count)
    }

    /// Skips [`Config::seconds_to_skip`] seconds of lead-in.
    pub fn skip_lead_in(&mut self) -> Result<u32, WaveError> {
        self.skip(self.config.samples_to_skip())
    }

    /// Reads the next window into the start of `out` and returns its length.
    ///
    /// The window holds `min(out.len(), window_size, remaining)` samples.
    ///
    /// # Errors
    ///
    /// * `WaveError::FinishedReading` - All samples have been read.
    /// * `WaveError::InsufficientBuffer` - `out` or the configured window is empty.
    /// * `WaveError::TruncatedSampleData` - The stream ended early, now or on an earlier call.
    ///   No further samples are handed out.
    pub fn read_window(&mut self, out: &mut [i8]) -> Result<usize, WaveError> {
        if self.poisoned {
            return Err(WaveError::TruncatedSampleData);
        }
        if self.remaining == 0 {
            return Err(WaveError::FinishedReading);
        }
        let window = out.len().min(self.config.window_size);
        let len = u32::try_from(window)
            .unwrap_or(u32::MAX)
            .min(self.remaining);
        if len == 0 {
            return Err(WaveError::InsufficientBuffer);
        }

        // `len` is bounded by `out.len()`, so it fits in usize.
        let out = &mut out[..len as usize];
        if let Err(e) = read_samples(&mut self.stream, len, out) {
            return Err(match e {
                WaveError::TruncatedSampleData => self.poison(),
                e => e,
            });
        }
        self.remaining -= len;
        Ok(len as usize)
    }

    /// Reads the next window into a fixed-capacity vector.
    pub fn next_window<const N: usize>(&mut self) -> Result<heapless::Vec<i8, N>, WaveError> {
        let mut window = heapless::Vec::<i8, N>::new();
        window
            .resize(N, 0)
            .map_err(|_| WaveError::InsufficientBuffer)?;
        let len = self.read_window(&mut window)?;
        window.truncate(len);
        Ok(window)
    }

    /// Returns the stream, positioned after the last consumed sample.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// After a short read the stream position is unknown, so nothing more may be read.
    fn poison(&mut self) -> WaveError {
        self.remaining = 0;
        self.poisoned = true;
        WaveError::TruncatedSampleData
    }
}
