use super::*;

/// The color types that this crate decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Red, Green, Blue
  RGB = 2,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> u8 {
    match self {
      Self::RGB => 3,
      Self::RGBA => 4,
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      2 => PngColorType::RGB,
      6 => PngColorType::RGBA,
      _ => return Err(PngError::UnsupportedImageOptions),
    })
  }
}

/// Image Header, from the `IHDR` chunk.
///
/// All seven fields are kept exactly as stored, even though a validated
/// header always has the same values for all but the first four of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageHeader {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
  /// always 0 (zlib deflate)
  pub compression_method: u8,
  /// always 0 (adaptive filtering with five filter types)
  pub filter_method: u8,
  /// always 0 (no interlace)
  pub interlace_method: u8,
}
impl ImageHeader {
  /// Byte length of the `IHDR` payload.
  pub const PAYLOAD_LEN: usize = 13;

  /// Bytes per pixel, which is also bytes per filter unit.
  #[inline]
  #[must_use]
  pub const fn component_count(&self) -> u8 {
    self.color_type.channel_count()
  }

  /// Bytes of pixel data in one scanline (not counting the filter byte).
  #[inline]
  pub fn bytes_per_scanline(&self) -> PngResult<usize> {
    usize::try_from(self.width)
      .ok()
      .and_then(|w| w.checked_mul(usize::from(self.component_count())))
      .ok_or(PngError::ImageTooLarge)
  }

  /// Bytes in one scanline of the decompressed data, including the filter
  /// byte.
  #[inline]
  pub fn bytes_per_filterline(&self) -> PngResult<usize> {
    self.bytes_per_scanline()?.checked_add(1).ok_or(PngError::ImageTooLarge)
  }

  /// The exact number of bytes the zlib stream must decompress to.
  #[inline]
  pub fn filtered_len(&self) -> PngResult<usize> {
    let h = usize::try_from(self.height).map_err(|_| PngError::ImageTooLarge)?;
    self.bytes_per_filterline()?.checked_mul(h).ok_or(PngError::ImageTooLarge)
  }

  /// The number of bytes in the final pixel buffer.
  #[inline]
  pub fn pixel_len(&self) -> PngResult<usize> {
    let h = usize::try_from(self.height).map_err(|_| PngError::ImageTooLarge)?;
    self.bytes_per_scanline()?.checked_mul(h).ok_or(PngError::ImageTooLarge)
  }
}
impl TryFrom<&[u8]> for ImageHeader {
  type Error = PngError;
  /// Parses and validates an `IHDR` payload.
  ///
  /// All of the subset checks are made together, so any combination of bad
  /// fields gives the same [`PngError::UnsupportedImageOptions`].
  fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
    match value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        let supported = *bit_depth == 8
          && matches!(color_type, 2 | 6)
          && *compression_method == 0
          && *filter_method == 0
          && *interlace_method == 0;
        if !supported {
          return Err(PngError::UnsupportedImageOptions);
        }
        Ok(Self {
          width: u32::from_be_bytes([*w0, *w1, *w2, *w3]),
          height: u32::from_be_bytes([*h0, *h1, *h2, *h3]),
          bit_depth: *bit_depth,
          color_type: PngColorType::try_from(*color_type)?,
          compression_method: *compression_method,
          filter_method: *filter_method,
          interlace_method: *interlace_method,
        })
      }
      _ => Err(PngError::IllegalHeaderLength(value.len() as u32)),
    }
  }
}

#[cfg(test)]
fn ihdr_payload(w: u32, h: u32, rest: [u8; 5]) -> [u8; 13] {
  let mut out = [0; 13];
  out[..4].copy_from_slice(&w.to_be_bytes());
  out[4..8].copy_from_slice(&h.to_be_bytes());
  out[8..].copy_from_slice(&rest);
  out
}

#[test]
fn test_header_parse_rgb_and_rgba() {
  let h = ImageHeader::try_from(&ihdr_payload(640, 480, [8, 2, 0, 0, 0])[..]).unwrap();
  assert_eq!((h.width, h.height, h.color_type), (640, 480, PngColorType::RGB));
  assert_eq!(h.component_count(), 3);
  assert_eq!(h.bytes_per_filterline(), Ok(640 * 3 + 1));
  assert_eq!(h.filtered_len(), Ok((640 * 3 + 1) * 480));
  assert_eq!(h.pixel_len(), Ok(640 * 3 * 480));
  //
  let h = ImageHeader::try_from(&ihdr_payload(1, 2, [8, 6, 0, 0, 0])[..]).unwrap();
  assert_eq!(h.component_count(), 4);
  assert_eq!(h.filtered_len(), Ok(10));
}

#[test]
fn test_header_rejects_unsupported_options() {
  for rest in [
    [8, 0, 0, 0, 0],  // greyscale
    [8, 3, 0, 0, 0],  // palette
    [8, 4, 0, 0, 0],  // greyscale + alpha
    [16, 2, 0, 0, 0], // 16-bit
    [4, 6, 0, 0, 0],  // not a legal depth at all
    [8, 2, 1, 0, 0],  // compression method
    [8, 2, 0, 1, 0],  // filter method
    [8, 6, 0, 0, 1],  // Adam7
    [16, 3, 1, 1, 1], // everything
  ] {
    assert_eq!(
      ImageHeader::try_from(&ihdr_payload(1, 1, rest)[..]),
      Err(PngError::UnsupportedImageOptions),
      "{rest:?}"
    );
  }
}

#[test]
fn test_header_length_must_be_13() {
  assert_eq!(ImageHeader::try_from(&[0_u8; 12][..]), Err(PngError::IllegalHeaderLength(12)));
  assert_eq!(ImageHeader::try_from(&[0_u8; 14][..]), Err(PngError::IllegalHeaderLength(14)));
}

#[test]
fn test_header_zero_dimensions_are_accepted() {
  let h = ImageHeader::try_from(&ihdr_payload(0, 5, [8, 2, 0, 0, 0])[..]).unwrap();
  assert_eq!(h.filtered_len(), Ok(5));
  assert_eq!(h.pixel_len(), Ok(0));
  let h = ImageHeader::try_from(&ihdr_payload(7, 0, [8, 6, 0, 0, 0])[..]).unwrap();
  assert_eq!(h.filtered_len(), Ok(0));
}
