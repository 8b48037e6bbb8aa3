use super::*;

use alloc::vec::Vec;

/// All of the `IDAT` payloads of an image, joined in file order.
///
/// PNG lets an encoder split the zlib stream across any number of `IDAT`
/// chunks at any byte position, so the payloads mean nothing on their own
/// until they're put back together.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct CompressedStream {
  bytes: Vec<u8>,
  chunk_count: usize,
}
impl core::fmt::Debug for CompressedStream {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("CompressedStream")
      .field("bytes", &(&self.bytes[..self.bytes.len().min(12)], self.bytes.len()))
      .field("chunk_count", &self.chunk_count)
      .finish()
  }
}
impl CompressedStream {
  /// An empty stream.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { bytes: Vec::new(), chunk_count: 0 }
  }

  /// Appends one `IDAT` payload to the end of the stream.
  #[inline]
  pub fn append(&mut self, idat: &[u8]) -> PngResult<()> {
    self.bytes.try_reserve(idat.len())?;
    self.bytes.extend_from_slice(idat);
    self.chunk_count += 1;
    Ok(())
  }

  /// The joined bytes.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  /// Total bytes across all payloads.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  /// If no payload bytes were appended.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }

  /// How many `IDAT` chunks went into the stream (empty ones included).
  #[inline]
  #[must_use]
  pub const fn chunk_count(&self) -> usize {
    self.chunk_count
  }

  /// Unwraps the joined bytes.
  #[inline]
  #[must_use]
  pub fn into_vec(self) -> Vec<u8> {
    self.bytes
  }
}

#[test]
fn test_compressed_stream_keeps_order() {
  let mut s = CompressedStream::new();
  assert!(s.is_empty());
  s.append(&[1, 2]).unwrap();
  s.append(&[]).unwrap();
  s.append(&[3, 1, 2]).unwrap();
  assert_eq!(s.as_bytes(), &[1, 2, 3, 1, 2]);
  assert_eq!(s.chunk_count(), 3);
  assert_eq!(s.len(), 5);
  assert_eq!(s.into_vec(), alloc::vec![1, 2, 3, 1, 2]);
}
