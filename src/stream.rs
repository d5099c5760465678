//! Forward-only byte streams and the single read primitive built on top of them.

use crate::error::ReadError;

/// A sequential source of bytes. No seek, no peek.
pub trait ByteStream {
    /// Returns the next byte, or `None` at end-of-stream or on a read error.
    fn read_byte(&mut self) -> Option<u8>;
}

impl ByteStream for &[u8] {
    fn read_byte(&mut self) -> Option<u8> {
        let (&first, rest) = self.split_first()?;
        *self = rest;
        Some(first)
    }
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }
}

/// Adapts an [`embedded_io::Read`] (an SD card file, a UART, ...) to [`ByteStream`].
///
/// `Ok(0)` and read errors are both reported as end-of-stream.
#[derive(Debug)]
pub struct IoStream<R> {
    inner: R,
}

impl<R: embedded_io::Read> IoStream<R> {
    pub fn new(inner: R) -> Self {
        IoStream { inner }
    }

    /// Returns the wrapped reader so the caller can close it.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: embedded_io::Read> ByteStream for IoStream<R> {
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) | Err(_) => None,
        }
    }
}

/// Reads `len` bytes from `stream`, adding `offset` to each (wrapping).
///
/// The bytes are stored at the start of `dest`, or discarded when `dest` is `None`.
/// Reading stops at the first byte the stream fails to produce; whatever was
/// written to `dest` up to that point must not be used.
///
/// # Errors
///
/// * `ReadError::BufferTooShort` - `dest` is shorter than `len`. Nothing is read.
/// * `ReadError::EndOfStream` - The stream ended before `len` bytes were produced.
pub fn read_bytes<S: ByteStream + ?Sized>(
    stream: &mut S,
    len: u32,
    offset: i8,
    dest: Option<&mut [u8]>,
) -> Result<(), ReadError> {
    let offset = offset as u8;
    match dest {
        Some(buf) => {
            let len = usize::try_from(len).map_err(|_| ReadError::BufferTooShort)?;
            let Some(buf) = buf.get_mut(..len) else {
                return Err(ReadError::BufferTooShort);
            };
            for slot in buf {
                *slot = stream
                    .read_byte()
                    .ok_or(ReadError::EndOfStream)?
                    .wrapping_add(offset);
            }
        }
        None => {
            for _ in 0..len {
                stream.read_byte().ok_or(ReadError::EndOfStream)?;
            }
        }
    }
    Ok(())
}

/// Fills a fixed-size array from the stream with no offset.
pub(crate) fn read_array<const N: usize, S: ByteStream + ?Sized>(
    stream: &mut S,
) -> Result<[u8; N], ReadError> {
    let mut buf = [0u8; N];
    // Header blocks are at most 16 bytes.
    read_bytes(stream, N as u32, 0, Some(&mut buf))?;
    Ok(buf)
}
