use super::*;

use alloc::vec::Vec;

/// Decompresses the zlib stream held in the `IDAT` chunks.
///
/// The decoder only cares that the output is *exactly* `expected_len` bytes.
/// Any failure, including output that is too short or too long, must come
/// back as [`PngError::CompressionError`].
pub trait Inflater {
  /// Decompresses all of `compressed`.
  fn inflate_to_vec(&self, compressed: &[u8], expected_len: usize) -> PngResult<Vec<u8>>;
}

/// An [`Inflater`] using `miniz_oxide`.
///
/// Output is produced through a fixed size window (`chunk_len` bytes) and
/// copied out after each pass, so the inflater state is the only other
/// allocation.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinizInflater {
  /// Size of the output window.
  pub chunk_len: usize,
}
#[cfg(feature = "miniz_oxide")]
impl MinizInflater {
  /// The default output window size.
  pub const DEFAULT_CHUNK_LEN: usize = 2048;

  /// Makes an inflater with the given output window size.
  ///
  /// A size of 0 is bumped up to 1.
  #[inline]
  #[must_use]
  pub const fn new(chunk_len: usize) -> Self {
    Self { chunk_len: if chunk_len == 0 { 1 } else { chunk_len } }
  }
}
#[cfg(feature = "miniz_oxide")]
impl Default for MinizInflater {
  #[inline]
  fn default() -> Self {
    Self::new(Self::DEFAULT_CHUNK_LEN)
  }
}
#[cfg(feature = "miniz_oxide")]
impl Inflater for MinizInflater {
  fn inflate_to_vec(&self, compressed: &[u8], expected_len: usize) -> PngResult<Vec<u8>> {
    use miniz_oxide::{
      inflate::stream::{inflate, InflateState},
      DataFormat, MZFlush, MZStatus,
    };

    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(expected_len)?;
    let mut window = alloc::vec![0_u8; self.chunk_len.max(1)];
    let mut state = InflateState::new_boxed(DataFormat::Zlib);
    let mut input = compressed;
    loop {
      let result = inflate(&mut state, input, &mut window, MZFlush::None);
      input = &input[result.bytes_consumed..];
      let produced = &window[..result.bytes_written];
      if out.len() + produced.len() > expected_len {
        log::debug!("zlib stream has more than the expected {expected_len} bytes");
        return Err(PngError::CompressionError);
      }
      out.extend_from_slice(produced);
      match result.status {
        Ok(MZStatus::StreamEnd) => break,
        Ok(MZStatus::Ok) => {
          if result.bytes_consumed == 0 && result.bytes_written == 0 {
            log::debug!("zlib stream stalled after {} bytes", out.len());
            return Err(PngError::CompressionError);
          }
        }
        Ok(MZStatus::NeedDict) | Err(_) => {
          log::debug!("zlib stream failed after {} bytes: {:?}", out.len(), result.status);
          return Err(PngError::CompressionError);
        }
      }
    }
    if out.len() != expected_len {
      log::debug!("zlib stream gave {} bytes, expected {expected_len}", out.len());
      return Err(PngError::CompressionError);
    }
    if !input.is_empty() {
      log::warn!("{} bytes of trailing data after the zlib stream", input.len());
    }
    Ok(out)
  }
}

#[cfg(feature = "miniz_oxide")]
#[test]
fn test_miniz_inflater_exact_length() {
  use miniz_oxide::deflate::compress_to_vec_zlib;
  let raw: Vec<u8> = (0..10_000_u32).map(|i| (i * 7 % 251) as u8).collect();
  let z = compress_to_vec_zlib(&raw, 6);
  // windows both smaller and bigger than the output
  for chunk_len in [1, 7, 2048, 65536] {
    let inflater = MinizInflater::new(chunk_len);
    assert_eq!(inflater.inflate_to_vec(&z, raw.len()), Ok(raw.clone()), "{chunk_len}");
  }
  let inflater = MinizInflater::default();
  assert_eq!(inflater.inflate_to_vec(&z, raw.len() - 1), Err(PngError::CompressionError));
  assert_eq!(inflater.inflate_to_vec(&z, raw.len() + 1), Err(PngError::CompressionError));
}

#[cfg(feature = "miniz_oxide")]
#[test]
fn test_miniz_inflater_bad_streams() {
  use miniz_oxide::deflate::compress_to_vec_zlib;
  let inflater = MinizInflater::default();
  let z = compress_to_vec_zlib(&[9; 300], 6);
  // cut off partway
  assert_eq!(inflater.inflate_to_vec(&z[..z.len() / 2], 300), Err(PngError::CompressionError));
  // nothing at all
  assert_eq!(inflater.inflate_to_vec(&[], 300), Err(PngError::CompressionError));
  // not zlib
  assert_eq!(inflater.inflate_to_vec(&[0xFF; 20], 300), Err(PngError::CompressionError));
}
