use super::*;

/// Limits and tuning for [`PngDecoder`].
///
/// The default has no limits at all: any width and height that fits in the
/// address space is decoded. If you're decoding files you don't trust, set
/// some limits so that a tiny file can't make you allocate gigabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeOptions {
  /// The widest image accepted.
  pub max_width: u32,
  /// The tallest image accepted.
  pub max_height: u32,
  /// The largest final pixel buffer accepted, in bytes.
  pub max_pixel_bytes: usize,
  /// Output window size of the default inflater.
  pub inflate_chunk_len: usize,
}
impl Default for DecodeOptions {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl DecodeOptions {
  /// The default options.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      max_width: u32::MAX,
      max_height: u32::MAX,
      max_pixel_bytes: usize::MAX,
      inflate_chunk_len: 2048,
    }
  }

  /// Sets the largest accepted width and height.
  #[inline]
  #[must_use]
  pub const fn with_max_dimensions(self, max_width: u32, max_height: u32) -> Self {
    Self { max_width, max_height, ..self }
  }

  /// Sets the largest accepted pixel buffer.
  #[inline]
  #[must_use]
  pub const fn with_max_pixel_bytes(self, max_pixel_bytes: usize) -> Self {
    Self { max_pixel_bytes, ..self }
  }

  /// Sets the inflater's output window size.
  #[inline]
  #[must_use]
  pub const fn with_inflate_chunk_len(self, inflate_chunk_len: usize) -> Self {
    Self { inflate_chunk_len, ..self }
  }

  /// Checks a header against the limits.
  ///
  /// ## Failure
  /// * [`PngError::ImageTooLarge`] if any limit is exceeded, or if the
  ///   buffer sizes overflow `usize`.
  pub fn check_header(&self, header: &ImageHeader) -> PngResult<()> {
    if header.width > self.max_width || header.height > self.max_height {
      log::debug!(
        "{}x{} is over the {}x{} limit",
        header.width,
        header.height,
        self.max_width,
        self.max_height
      );
      return Err(PngError::ImageTooLarge);
    }
    // this also makes sure that the decompressed size fits in a usize.
    header.filtered_len()?;
    if header.pixel_len()? > self.max_pixel_bytes {
      return Err(PngError::ImageTooLarge);
    }
    Ok(())
  }
}

#[test]
fn test_decode_options_limits() {
  let header = ImageHeader {
    width: 100,
    height: 50,
    bit_depth: 8,
    color_type: PngColorType::RGBA,
    compression_method: 0,
    filter_method: 0,
    interlace_method: 0,
  };
  assert_eq!(DecodeOptions::default().check_header(&header), Ok(()));
  let o = DecodeOptions::new().with_max_dimensions(100, 50);
  assert_eq!(o.check_header(&header), Ok(()));
  let o = DecodeOptions::new().with_max_dimensions(99, 50);
  assert_eq!(o.check_header(&header), Err(PngError::ImageTooLarge));
  let o = DecodeOptions::new().with_max_pixel_bytes(100 * 50 * 4);
  assert_eq!(o.check_header(&header), Ok(()));
  let o = o.with_max_pixel_bytes(100 * 50 * 4 - 1);
  assert_eq!(o.check_header(&header), Err(PngError::ImageTooLarge));
  assert_eq!(DecodeOptions::new().with_inflate_chunk_len(7).inflate_chunk_len, 7);
}
