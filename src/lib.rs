//! monowave extracts 8-bit mono PCM samples from WAV files for embedded pitch detection.
//!
//! The file is consumed strictly front to back, one byte at a time, so it can be
//! read straight from a sequential medium such as an SD card without buffering
//! the whole file. The header is checked first ([`parse_header`]); only then are
//! the samples read ([`read_samples`]), with the unsigned PCM bias removed.
//!
//! Only 8-bit mono linear PCM at the configured sample rate is accepted, with
//! the chunk layout RIFF -> "fmt " -> "data".
//!
//! # Examples
//!
//! Read every window of an embedded WAV file.
//! ```no_run
//! use monowave::{Config, SampleReader, WaveError};
//!
//! # fn main() -> Result<(), WaveError> {
//! # let wav: &[u8] = &[];
//! // let wav = include_bytes!("note.wav");
//! let config = Config::default();
//! let mut reader = SampleReader::new(&wav[..], &config)?;
//! println!("{} samples, {} ms", reader.remaining(), reader.header().duration_ms());
//!
//! let mut window = [0i8; 200];
//! loop {
//!     match reader.read_window(&mut window) {
//!         Ok(len) => println!("{:?}", &window[..len]),
//!         Err(WaveError::FinishedReading) => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), no_std)]

mod config;
mod error;
mod samples;
mod stream;
mod wav;

pub use config::{Config, DEFAULT_SAMPLE_RATE, DEFAULT_SECONDS_TO_SKIP, DEFAULT_WINDOW_SIZE};
pub use error::{ReadError, WaveError};
pub use samples::{read_samples, SampleReader, SAMPLE_BIAS};
pub use stream::{read_bytes, ByteStream, IoStream};
pub use wav::{
    parse_header, ChunkHeader, ChunkId, DataDescriptor, FormatDescriptor, RiffContainerHeader,
    WaveHeader,
};
