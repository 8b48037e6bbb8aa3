use crate::png::ChunkType;

/// An error from decoding PNG data.
///
/// Decoding is fail-fast: the first problem found anywhere in the pipeline is
/// the error you get, and no partial image is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PngError {
  /// The file couldn't be read.
  #[cfg(feature = "std")]
  Io(std::io::ErrorKind),

  /// The first 8 bytes aren't the PNG signature.
  InvalidSignature,

  /// The first chunk isn't `IHDR`.
  InvalidBlockOrder,

  /// A second `IHDR` chunk was found.
  DuplicateHeaderBlock,

  /// A chunk's stored CRC doesn't match the CRC of its type and data.
  CrcMismatch {
    /// The type tag of the damaged chunk.
    chunk_type: ChunkType,
    /// The CRC stored in the file.
    declared: u32,
    /// The CRC computed from the bytes actually present.
    actual: u32,
  },

  /// The `IHDR` payload isn't exactly 13 bytes.
  IllegalHeaderLength(u32),

  /// The header describes an image outside of what this crate decodes.
  ///
  /// Supported images are 8 bits per channel, RGB or RGBA, compression method
  /// 0, filter method 0, and not interlaced.
  UnsupportedImageOptions,

  /// A scanline's filter type byte isn't in `0..=4`.
  InvalidFilterType(u8),

  /// The zlib stream was damaged, ended early, or didn't decompress to
  /// exactly the number of bytes the header calls for.
  CompressionError,

  /// The data ended in the middle of a chunk (or before `IEND`).
  TruncatedInput,

  /// The image's byte size overflows `usize`, or exceeds a limit set in the
  /// [`DecodeOptions`](crate::png::DecodeOptions).
  ImageTooLarge,

  /// The allocator couldn't give us enough space.
  #[cfg(feature = "alloc")]
  AllocationFailed,
}

/// Result alias for this crate.
pub type PngResult<T> = Result<T, PngError>;

impl core::fmt::Display for PngError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      #[cfg(feature = "std")]
      Self::Io(kind) => write!(f, "couldn't read the file: {kind}"),
      Self::InvalidSignature => write!(f, "not PNG data (bad signature)"),
      Self::InvalidBlockOrder => write!(f, "the first chunk isn't IHDR"),
      Self::DuplicateHeaderBlock => write!(f, "found more than one IHDR chunk"),
      Self::CrcMismatch { chunk_type, declared, actual } => write!(
        f,
        "CRC mismatch in {chunk_type:?} chunk (declared {declared:#010X}, actual {actual:#010X})"
      ),
      Self::IllegalHeaderLength(len) => write!(f, "IHDR payload is {len} bytes, expected 13"),
      Self::UnsupportedImageOptions => write!(f, "unsupported image options in IHDR"),
      Self::InvalidFilterType(ty) => write!(f, "invalid scanline filter type {ty}"),
      Self::CompressionError => write!(f, "the zlib image data couldn't be decompressed"),
      Self::TruncatedInput => write!(f, "the PNG data ended unexpectedly"),
      Self::ImageTooLarge => write!(f, "the image is too large"),
      #[cfg(feature = "alloc")]
      Self::AllocationFailed => write!(f, "allocation failed"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for PngError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for PngError {
  #[inline]
  fn from(e: std::io::Error) -> Self {
    Self::Io(e.kind())
  }
}

#[cfg(feature = "alloc")]
impl From<alloc::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::AllocationFailed
  }
}
