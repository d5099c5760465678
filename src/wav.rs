//! RIFF/WAVE header parsing.
//!
//! The header is read in fixed-size blocks from the stream into stack buffers,
//! and each block is decoded field by field with little-endian parsers.
//! Only the layout RIFF -> "fmt " -> "data" is accepted.
//! http://soundfile.sapp.org/doc/WaveFormat/

use crate::config::Config;
use crate::error::WaveError;
use crate::stream::{read_array, read_bytes, ByteStream};
use log::{debug, trace, warn};
use winnow::binary::{le_u16, le_u32};
use winnow::error::ModalResult;
use winnow::token::take;
use winnow::Parser;

/// wFormatTag of uncompressed linear PCM.
const WAVE_FORMAT_PCM: u16 = 0x0001;

/// The chunk identifiers this parser knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkId {
    Riff, // b"RIFF"
    Wave, // b"WAVE"
    Fmt,  // b"fmt "
    Data, // b"data"
}

impl ChunkId {
    pub const fn tag(self) -> &'static [u8; 4] {
        match self {
            ChunkId::Riff => b"RIFF",
            ChunkId::Wave => b"WAVE",
            ChunkId::Fmt => b"fmt ",
            ChunkId::Data => b"data",
        }
    }
}

impl PartialEq<ChunkId> for [u8; 4] {
    fn eq(&self, other: &ChunkId) -> bool {
        self == other.tag()
    }
}

/// Generic header in front of every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub length: u32,
}

impl ChunkHeader {
    pub const SIZE: usize = 8;
}

/// The outermost chunk.
///
/// * 'declared_length' - File size in bytes minus 8. Read but never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffContainerHeader {
    pub id: [u8; 4],
    pub declared_length: u32,
    pub format_tag: [u8; 4],
}

impl RiffContainerHeader {
    pub const SIZE: usize = ChunkHeader::SIZE + 4;
}

/// Fixed fields of the "fmt " chunk.
///
/// Encoders may append extension fields after `bits_per_sample`; those are
/// skipped and never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

impl FormatDescriptor {
    pub const SIZE: usize = 16;

    /// 8-bit mono linear PCM at exactly `sample_rate`.
    pub fn is_supported(&self, sample_rate: u32) -> bool {
        self.audio_format == WAVE_FORMAT_PCM
            && self.num_channels == 1
            && self.bits_per_sample == 8
            && self.sample_rate == sample_rate
    }
}

/// Header of the "data" chunk. Its length is the number of samples that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    pub header: ChunkHeader,
}

/// Everything learned from a successful header parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHeader {
    pub container: RiffContainerHeader,
    pub format: FormatDescriptor,
    /// Number of extension bytes skipped after the fixed "fmt " fields.
    pub format_extension_len: u32,
    /// Number of 8-bit samples in the "data" chunk.
    pub sample_count: u32,
}

impl WaveHeader {
    /// Parses and validates the header, leaving `stream` at the first sample byte.
    ///
    /// On error the stream position is unspecified and the stream must be abandoned.
    pub fn parse<S: ByteStream + ?Sized>(
        stream: &mut S,
        config: &Config,
    ) -> Result<Self, WaveError> {
        let container = read_container(stream)?;
        let (format, format_extension_len) = read_format(stream, config)?;
        let data = read_data(stream)?;
        Ok(WaveHeader {
            container,
            format,
            format_extension_len,
            sample_count: data.header.length,
        })
    }

    /// Play time of the sample data in milliseconds, rounded down.
    pub fn duration_ms(&self) -> u64 {
        (self.sample_count as u64 * 1000)
            .checked_div(self.format.sample_rate as u64)
            .unwrap_or(0)
    }
}

/// Parses the header and returns the number of samples in the "data" chunk.
///
/// The stream is left at the first sample byte, ready for [`crate::read_samples`].
///
/// # Examples
///
/// ```
/// use monowave::{parse_header, read_samples, Config, WaveError};
///
/// # fn main() -> Result<(), WaveError> {
/// let mut wav: Vec<u8> = Vec::new();
/// wav.extend_from_slice(b"RIFF");
/// wav.extend_from_slice(&39u32.to_le_bytes());
/// wav.extend_from_slice(b"WAVEfmt ");
/// wav.extend_from_slice(&16u32.to_le_bytes());
/// wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
/// wav.extend_from_slice(&1u16.to_le_bytes()); // mono
/// wav.extend_from_slice(&9615u32.to_le_bytes());
/// wav.extend_from_slice(&9615u32.to_le_bytes());
/// wav.extend_from_slice(&1u16.to_le_bytes());
/// wav.extend_from_slice(&8u16.to_le_bytes());
/// wav.extend_from_slice(b"data");
/// wav.extend_from_slice(&3u32.to_le_bytes());
/// wav.extend_from_slice(&[0, 128, 255]);
///
/// let mut input = &wav[..];
/// let count = parse_header(&mut input, &Config::default())?;
/// let mut samples = [0i8; 3];
/// read_samples(&mut input, count, &mut samples)?;
/// assert_eq!(samples, [-128, 0, 127]);
/// # Ok(())
/// # }
/// ```
pub fn parse_header<S: ByteStream + ?Sized>(
    stream: &mut S,
    config: &Config,
) -> Result<u32, WaveError> {
    WaveHeader::parse(stream, config).map(|header| header.sample_count)
}

/// Checks that the stream starts with RIFF and the identifier is WAVE.
fn read_container<S: ByteStream + ?Sized>(
    stream: &mut S,
) -> Result<RiffContainerHeader, WaveError> {
    let buf: [u8; RiffContainerHeader::SIZE] = read_array(stream).map_err(|_| {
        warn!("stream ended inside the RIFF header");
        WaveError::MalformedContainer
    })?;
    let container = parse_riff_header
        .parse_next(&mut &buf[..])
        .map_err(|_| WaveError::MalformedContainer)?;

    if container.id != ChunkId::Riff || container.format_tag != ChunkId::Wave {
        warn!(
            "not a RIFF/WAVE container: id={:02x?} format={:02x?}",
            container.id, container.format_tag
        );
        return Err(WaveError::MalformedContainer);
    }
    debug!("RIFF/WAVE container, declared length {}", container.declared_length);
    Ok(container)
}

/// Reads the "fmt " chunk including its extension bytes, then checks the encoding.
fn read_format<S: ByteStream + ?Sized>(
    stream: &mut S,
    config: &Config,
) -> Result<(FormatDescriptor, u32), WaveError> {
    let header = read_chunk_header(stream).ok_or(WaveError::MissingFormatChunk)?;
    if header.id != ChunkId::Fmt {
        warn!("expected \"fmt \" chunk, found {:02x?}", header.id);
        return Err(WaveError::MissingFormatChunk);
    }

    let Some(extension_len) = header.length.checked_sub(FormatDescriptor::SIZE as u32) else {
        warn!("\"fmt \" chunk length {} is too short", header.length);
        return Err(WaveError::TruncatedFormatChunk);
    };
    let buf: [u8; FormatDescriptor::SIZE] =
        read_array(stream).map_err(|_| WaveError::TruncatedFormatChunk)?;
    let format = parse_format
        .parse_next(&mut &buf[..])
        .map_err(|_| WaveError::TruncatedFormatChunk)?;

    trace!("skipping {extension_len} \"fmt \" extension bytes");
    read_bytes(stream, extension_len, 0, None).map_err(|_| {
        warn!("stream ended inside {extension_len} \"fmt \" extension bytes");
        WaveError::TruncatedFormatChunk
    })?;

    if !format.is_supported(config.sample_rate) {
        warn!(
            "unsupported format: tag={} channels={} rate={} bits={} (want PCM mono 8-bit at {} Hz)",
            format.audio_format,
            format.num_channels,
            format.sample_rate,
            format.bits_per_sample,
            config.sample_rate
        );
        return Err(WaveError::UnsupportedFormat);
    }
    debug!("8-bit mono PCM at {} Hz", format.sample_rate);
    Ok((format, extension_len))
}

/// Reads the "data" chunk header. The samples themselves are left in the stream.
fn read_data<S: ByteStream + ?Sized>(stream: &mut S) -> Result<DataDescriptor, WaveError> {
    let header = read_chunk_header(stream).ok_or(WaveError::MissingDataChunk)?;
    if header.id != ChunkId::Data {
        warn!("expected \"data\" chunk, found {:02x?}", header.id);
        return Err(WaveError::MissingDataChunk);
    }
    debug!("\"data\" chunk with {} samples", header.length);
    Ok(DataDescriptor { header })
}

fn read_chunk_header<S: ByteStream + ?Sized>(stream: &mut S) -> Option<ChunkHeader> {
    let Ok(buf) = read_array::<{ ChunkHeader::SIZE }, _>(stream) else {
        warn!("stream ended inside a chunk header");
        return None;
    };
    parse_chunk_header.parse_next(&mut &buf[..]).ok()
}

fn parse_tag(input: &mut &[u8]) -> ModalResult<[u8; 4]> {
    take(4usize)
        .map(|t: &[u8]| [t[0], t[1], t[2], t[3]])
        .parse_next(input)
}

fn parse_chunk_header(input: &mut &[u8]) -> ModalResult<ChunkHeader> {
    let id = parse_tag.parse_next(input)?;
    let length = le_u32.parse_next(input)?;
    Ok(ChunkHeader { id, length })
}

fn parse_riff_header(input: &mut &[u8]) -> ModalResult<RiffContainerHeader> {
    let ChunkHeader { id, length } = parse_chunk_header.parse_next(input)?;
    let format_tag = parse_tag.parse_next(input)?;
    Ok(RiffContainerHeader {
        id,
        declared_length: length,
        format_tag,
    })
}

fn parse_format(input: &mut &[u8]) -> ModalResult<FormatDescriptor> {
    let audio_format = le_u16.parse_next(input)?; //1
    let num_channels = le_u16.parse_next(input)?; //1
    let sample_rate = le_u32.parse_next(input)?; //9615
    let byte_rate = le_u32.parse_next(input)?;
    let block_align = le_u16.parse_next(input)?;
    let bits_per_sample = le_u16.parse_next(input)?; //8
    Ok(FormatDescriptor {
        audio_format,
        num_channels,
        sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt_chunk(length: u32, audio_format: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(b"fmt ");
        v.extend_from_slice(&length.to_le_bytes());
        v.extend_from_slice(&audio_format.to_le_bytes());
        v.extend_from_slice(&channels.to_le_bytes());
        v.extend_from_slice(&rate.to_le_bytes());
        v.extend_from_slice(&rate.to_le_bytes());
        v.extend_from_slice(&1u16.to_le_bytes());
        v.extend_from_slice(&bits.to_le_bytes());
        v
    }

    #[test]
    fn chunk_header_fields() {
        let data = [b'd', b'a', b't', b'a', 0x10, 0x27, 0x00, 0x00];
        let header = parse_chunk_header.parse_next(&mut &data[..]).unwrap();
        assert_eq!(header.id, ChunkId::Data);
        assert_eq!(header.length, 10000);
    }

    #[test]
    fn riff_header_fields() {
        let mut data = Vec::new();
        data.extend_from_slice(b"RIFF");
        data.extend_from_slice(&0xDEADBEEFu32.to_le_bytes());
        data.extend_from_slice(b"WAVE");
        let container = read_container(&mut &data[..]).unwrap();
        assert_eq!(container.declared_length, 0xDEADBEEF);
        assert_eq!(&container.format_tag, ChunkId::Wave.tag());
    }

    #[test]
    fn container_rejects_avi() {
        let data = *b"RIFF\x00\x00\x00\x00AVI ";
        assert_eq!(
            read_container(&mut &data[..]),
            Err(WaveError::MalformedContainer)
        );
    }

    #[test]
    fn format_fields_decoded() {
        let data = fmt_chunk(16, 1, 1, 9615, 8);
        let mut input = &data[..];
        let config = Config::default();
        let (format, extension_len) = read_format(&mut input, &config).unwrap();
        assert_eq!(extension_len, 0);
        assert_eq!(format.audio_format, 1);
        assert_eq!(format.num_channels, 1);
        assert_eq!(format.sample_rate, 9615);
        assert_eq!(format.byte_rate, 9615);
        assert_eq!(format.block_align, 1);
        assert_eq!(format.bits_per_sample, 8);
        assert!(input.is_empty());
    }

    #[test]
    fn format_shorter_than_fixed_fields() {
        let data = fmt_chunk(14, 1, 1, 9615, 8);
        let mut input = &data[..];
        assert_eq!(
            read_format(&mut input, &Config::default()),
            Err(WaveError::TruncatedFormatChunk)
        );
        // Nothing past the chunk header was consumed.
        assert_eq!(input.len(), FormatDescriptor::SIZE);
    }

    #[test]
    fn extension_longer_than_u16() {
        let mut data = fmt_chunk(16 + 65_552, 1, 1, 9615, 8);
        data.resize(data.len() + 65_552, 0xEE);
        data.extend_from_slice(b"data");
        data.extend_from_slice(&7u32.to_le_bytes());
        let mut input = &data[..];
        let (_, extension_len) = read_format(&mut input, &Config::default()).unwrap();
        assert_eq!(extension_len, 65_552);
        assert_eq!(read_data(&mut input).unwrap().header.length, 7);
        assert!(input.is_empty());
    }

    #[test]
    fn supported_format_requires_exact_rate() {
        let format = FormatDescriptor {
            audio_format: 1,
            num_channels: 1,
            sample_rate: 9615,
            byte_rate: 9615,
            block_align: 1,
            bits_per_sample: 8,
        };
        assert!(format.is_supported(9615));
        assert!(!format.is_supported(9616));
        assert!(!format.is_supported(9614));
    }

    #[test]
    fn duration() {
        let header = WaveHeader {
            container: RiffContainerHeader {
                id: *b"RIFF",
                declared_length: 0,
                format_tag: *b"WAVE",
            },
            format: FormatDescriptor {
                audio_format: 1,
                num_channels: 1,
                sample_rate: 8000,
                byte_rate: 8000,
                block_align: 1,
                bits_per_sample: 8,
            },
            format_extension_len: 0,
            sample_count: 12000,
        };
        assert_eq!(header.duration_ms(), 1500);
    }
}
