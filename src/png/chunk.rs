use super::*;
use crate::parser_helpers::{try_pull_byte_array, try_pull_slice, try_pull_u32_be};

/// The four byte type tag of a chunk.
///
/// Bit 5 of each byte (the ascii lowercase bit) carries a property of the
/// chunk type, see the methods.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkType {
  /// Image Header
  pub const IHDR: Self = Self(*b"IHDR");
  /// Image Data
  pub const IDAT: Self = Self(*b"IDAT");
  /// Image End
  pub const IEND: Self = Self(*b"IEND");

  /// Ancillary chunks can be skipped by a decoder that doesn't know them.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    (self.0[0] & 32) != 0
  }
  /// Private chunks aren't part of the registered public chunk list.
  #[inline]
  #[must_use]
  pub const fn is_private(self) -> bool {
    (self.0[1] & 32) != 0
  }
  /// Must be clear in every chunk type that conforms to the current PNG
  /// version.
  #[inline]
  #[must_use]
  pub const fn is_reserved(self) -> bool {
    (self.0[2] & 32) != 0
  }
  /// Editors may copy a safe-to-copy chunk even after changing critical
  /// chunks.
  #[inline]
  #[must_use]
  pub const fn is_safe_to_copy(self) -> bool {
    (self.0[3] & 32) != 0
  }
}
impl core::fmt::Debug for ChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    core::fmt::Debug::fmt(&AsciiArray(self.0), f)
  }
}
impl From<[u8; 4]> for ChunkType {
  #[inline]
  fn from(tag: [u8; 4]) -> Self {
    Self(tag)
  }
}

/// An unparsed chunk from a PNG.
///
/// This borrows the payload from the source bytes, nothing is copied.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawChunk<'b> {
  /// The type tag.
  pub chunk_type: ChunkType,
  /// The payload.
  pub data: &'b [u8],
  /// The CRC that was stored after the payload.
  pub declared_crc: u32,
}
impl core::fmt::Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("chunk_type", &self.chunk_type)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> RawChunk<'b> {
  /// Computes the CRC of the type and payload that are actually present.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_crc_of(self.chunk_type.0, self.data)
  }

  /// Checks the declared CRC against the actual CRC.
  #[inline]
  pub fn verify_crc(&self) -> PngResult<()> {
    let actual = self.actual_crc();
    if actual == self.declared_crc {
      Ok(())
    } else {
      Err(PngError::CrcMismatch {
        chunk_type: self.chunk_type,
        declared: self.declared_crc,
        actual,
      })
    }
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// Each step reads the length, type, payload, and CRC of one chunk. If the
/// bytes run out partway through a chunk the iterator yields a single
/// [`PngError::TruncatedInput`] and then stops. Running out of bytes exactly
/// at a chunk boundary just ends the iteration.
///
/// CRCs are *not* checked here, that's up to the consumer (see
/// [`RawChunk::verify_crc`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawChunkIter<'b> {
  spare: &'b [u8],
}
impl<'b> RawChunkIter<'b> {
  /// Iterates the chunks in the bytes *after* the PNG signature.
  #[inline]
  #[must_use]
  pub const fn new(after_signature: &'b [u8]) -> Self {
    Self { spare: after_signature }
  }

  /// Checks the PNG signature, then iterates the chunks after it.
  #[inline]
  pub const fn from_png_bytes(png: &'b [u8]) -> PngResult<Self> {
    match check_signature(png) {
      Ok(rest) => Ok(Self::new(rest)),
      Err(e) => Err(e),
    }
  }

  /// The bytes that haven't been read yet.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> &'b [u8] {
    self.spare
  }

  fn pull_chunk(&mut self) -> PngResult<RawChunk<'b>> {
    let (length, rest) = try_pull_u32_be(self.spare)?;
    let (tag, rest) = try_pull_byte_array::<4>(rest)?;
    let len = usize::try_from(length).map_err(|_| PngError::TruncatedInput)?;
    let (data, rest) = try_pull_slice(rest, len)?;
    let (declared_crc, rest) = try_pull_u32_be(rest)?;
    self.spare = rest;
    Ok(RawChunk { chunk_type: ChunkType(tag), data, declared_crc })
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = PngResult<RawChunk<'b>>;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if self.spare.is_empty() {
      return None;
    }
    let out = self.pull_chunk();
    if out.is_err() {
      self.spare = &[];
    }
    Some(out)
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    let more_chunks = !self.spare.is_empty();
    (more_chunks as usize, Some(self.spare.len() / 12 + more_chunks as usize))
  }
}
impl core::iter::FusedIterator for RawChunkIter<'_> {}

#[test]
fn test_chunk_type_property_bits() {
  assert!(!ChunkType::IHDR.is_ancillary());
  assert!(!ChunkType::IDAT.is_private());
  assert!(ChunkType(*b"gAMA").is_ancillary());
  assert!(ChunkType(*b"tEXt").is_safe_to_copy());
  assert!(ChunkType(*b"prVt").is_private());
  assert!(!ChunkType(*b"sRGB").is_reserved());
}

#[test]
fn test_raw_chunk_iter_reads_and_truncates() {
  let mut bytes = [0_u8; 12 + 3 + 6];
  // a 3-byte chunk with a correct CRC
  bytes[..4].copy_from_slice(&3_u32.to_be_bytes());
  bytes[4..8].copy_from_slice(b"abCd");
  bytes[8..11].copy_from_slice(&[1, 2, 3]);
  bytes[11..15].copy_from_slice(&png_crc_of(*b"abCd", &[1, 2, 3]).to_be_bytes());
  // then a chunk claiming 255 bytes that aren't there
  bytes[15..19].copy_from_slice(&255_u32.to_be_bytes());
  let mut it = RawChunkIter::new(&bytes);
  let first = it.next().unwrap().unwrap();
  assert_eq!(first.chunk_type, ChunkType(*b"abCd"));
  assert_eq!(first.data, &[1, 2, 3]);
  assert_eq!(first.verify_crc(), Ok(()));
  assert_eq!(it.next(), Some(Err(PngError::TruncatedInput)));
  assert_eq!(it.next(), None);
}
