/// Error type for WAV parsing and sample reading.
///
/// Every variant is terminal: the stream is left at an unspecified position and
/// must be abandoned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[repr(u8)]
pub enum WaveError {
    #[error("The stream is not a RIFF/WAVE container.")]
    MalformedContainer = 1,
    #[error("The \"fmt \" chunk was not found after the RIFF header.")]
    MissingFormatChunk = 2,
    #[error("The \"fmt \" chunk is shorter than its declared or required length.")]
    TruncatedFormatChunk = 3,
    #[error("Only 8-bit mono linear PCM at the configured sample rate is supported.")]
    UnsupportedFormat = 4,
    #[error("The \"data\" chunk was not found after the \"fmt \" chunk.")]
    MissingDataChunk = 5,
    #[error("The stream ended before all declared samples were read.")]
    TruncatedSampleData = 6,
    #[error("The output buffer is smaller than the number of samples to read.")]
    InsufficientBuffer = 7,
    #[error("All samples have been read.")]
    FinishedReading = 8,
}

impl WaveError {
    /// Numeric error code, stable across releases.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Error type of [`crate::read_bytes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// The stream reported end-of-stream (or an error) before the requested bytes were produced.
    #[error("Unexpected end of stream.")]
    EndOfStream,
    /// The destination is shorter than the number of bytes to read. Nothing was read.
    #[error("The destination buffer is shorter than the read length.")]
    BufferTooShort,
}

#[cfg(test)]
mod tests {
    use super::WaveError;

    #[test]
    fn codes_follow_validation_order() {
        assert_eq!(WaveError::MalformedContainer.code(), 1);
        assert_eq!(WaveError::MissingFormatChunk.code(), 2);
        assert_eq!(WaveError::TruncatedFormatChunk.code(), 3);
        assert_eq!(WaveError::UnsupportedFormat.code(), 4);
        assert_eq!(WaveError::MissingDataChunk.code(), 5);
        assert_eq!(WaveError::TruncatedSampleData.code(), 6);
        assert_eq!(WaveError::InsufficientBuffer.code(), 7);
        assert_eq!(WaveError::FinishedReading.code(), 8);
    }
}
