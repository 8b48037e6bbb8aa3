use super::*;

use alloc::vec::Vec;

/// A fully decoded image.
///
/// The pixels are row-major starting at the top left, one byte per channel,
/// channels interleaved (`RGBRGB...` or `RGBARGBA...`), with no padding
/// between rows.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DecodedImage {
  width: u32,
  height: u32,
  color_type: PngColorType,
  pixels: Vec<u8>,
}
impl core::fmt::Debug for DecodedImage {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("DecodedImage")
      .field("width", &self.width)
      .field("height", &self.height)
      .field("color_type", &self.color_type)
      .field("pixels", &(&self.pixels[..self.pixels.len().min(12)], self.pixels.len()))
      .finish()
  }
}
impl DecodedImage {
  /// Width in pixels.
  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }
  /// Height in pixels.
  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }
  /// Bytes per pixel: 3 for RGB, 4 for RGBA.
  #[inline]
  #[must_use]
  pub const fn component_count(&self) -> u8 {
    self.color_type.channel_count()
  }
  /// The color type the image was stored with.
  #[inline]
  #[must_use]
  pub const fn color_type(&self) -> PngColorType {
    self.color_type
  }
  /// Bytes per row of pixels.
  #[inline]
  #[must_use]
  pub const fn stride(&self) -> usize {
    self.width as usize * self.component_count() as usize
  }
  /// All of the pixel bytes.
  #[inline]
  #[must_use]
  pub fn pixels(&self) -> &[u8] {
    &self.pixels
  }
  /// Unwraps the pixel bytes.
  #[inline]
  #[must_use]
  pub fn into_pixels(self) -> Vec<u8> {
    self.pixels
  }

  /// The bytes of the pixel at `(x, y)`, or `None` if that's out of bounds.
  #[inline]
  #[must_use]
  pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
    if x < self.width && y < self.height {
      let bpp = usize::from(self.component_count());
      let i = (y as usize * self.width as usize + x as usize) * bpp;
      self.pixels.get(i..i + bpp)
    } else {
      None
    }
  }

  /// Iterates the rows of pixel bytes, top to bottom.
  ///
  /// An image with 0 width has no rows to give.
  #[inline]
  pub fn rows(&self) -> core::slice::ChunksExact<'_, u8> {
    self.pixels.chunks_exact(self.stride().max(1))
  }

  /// Views the pixels as [`RGB8`], if this is an RGB image.
  #[inline]
  #[must_use]
  pub fn as_rgb8(&self) -> Option<&[RGB8]> {
    match self.color_type {
      PngColorType::RGB => bytemuck::try_cast_slice(&self.pixels).ok(),
      PngColorType::RGBA => None,
    }
  }

  /// Views the pixels as [`RGBA8`], if this is an RGBA image.
  #[inline]
  #[must_use]
  pub fn as_rgba8(&self) -> Option<&[RGBA8]> {
    match self.color_type {
      PngColorType::RGBA => bytemuck::try_cast_slice(&self.pixels).ok(),
      PngColorType::RGB => None,
    }
  }

  /// Decodes PNG bytes with the default options.
  ///
  /// Same as [`decode_png`].
  #[cfg(feature = "miniz_oxide")]
  #[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
  #[inline]
  pub fn try_from_png_bytes(png: &[u8]) -> PngResult<Self> {
    decode_png(png)
  }
}

/// Runs the whole decode: signature, chunks, inflate, unfilter.
///
/// Each decode owns all of its buffers, so one decoder can be shared and
/// used for any number of images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PngDecoder<I> {
  options: DecodeOptions,
  inflater: I,
}
#[cfg(feature = "miniz_oxide")]
impl PngDecoder<MinizInflater> {
  /// A decoder with default options.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self::with_options(DecodeOptions::new())
  }

  /// A decoder with the given options.
  #[inline]
  #[must_use]
  pub const fn with_options(options: DecodeOptions) -> Self {
    Self { options, inflater: MinizInflater::new(options.inflate_chunk_len) }
  }
}
#[cfg(feature = "miniz_oxide")]
impl Default for PngDecoder<MinizInflater> {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl<I: Inflater> PngDecoder<I> {
  /// A decoder using your own [`Inflater`].
  ///
  /// The `inflate_chunk_len` of the options is not used in this case.
  #[inline]
  #[must_use]
  pub const fn with_inflater(options: DecodeOptions, inflater: I) -> Self {
    Self { options, inflater }
  }

  /// The options in use.
  #[inline]
  #[must_use]
  pub const fn options(&self) -> &DecodeOptions {
    &self.options
  }

  /// The inflater in use.
  #[inline]
  #[must_use]
  pub const fn inflater(&self) -> &I {
    &self.inflater
  }

  /// Decodes PNG bytes.
  ///
  /// ## Failure
  /// The first problem found stops the decode, see [`PngError`] for the
  /// possibilities.
  pub fn decode(&self, png: &[u8]) -> PngResult<DecodedImage> {
    let (header, stream) = scan_chunks(png)?;
    self.options.check_header(&header)?;
    let filtered = self.inflater.inflate_to_vec(stream.as_bytes(), header.filtered_len()?)?;
    drop(stream);
    let pixels = reconstruct_scanlines(filtered, &header)?;
    log::debug!(
      "decoded {}x{} {:?}, {} pixel bytes",
      header.width,
      header.height,
      header.color_type,
      pixels.len()
    );
    Ok(DecodedImage {
      width: header.width,
      height: header.height,
      color_type: header.color_type,
      pixels,
    })
  }
}

/// Decodes PNG bytes with the default options.
#[cfg(feature = "miniz_oxide")]
#[cfg_attr(docs_rs, doc(cfg(feature = "miniz_oxide")))]
#[inline]
pub fn decode_png(png: &[u8]) -> PngResult<DecodedImage> {
  PngDecoder::new().decode(png)
}

/// Reads a file and decodes it with the default options.
///
/// ## Failure
/// * [`PngError::Io`] if the file can't be read.
/// * Otherwise, anything that [`decode_png`] can fail with.
#[cfg(all(feature = "std", feature = "miniz_oxide"))]
#[cfg_attr(docs_rs, doc(cfg(all(feature = "std", feature = "miniz_oxide"))))]
pub fn decode_png_file<P: AsRef<std::path::Path>>(path: P) -> PngResult<DecodedImage> {
  let path = path.as_ref();
  let bytes = std::fs::read(path)?;
  log::debug!("read {} bytes from {}", bytes.len(), path.display());
  decode_png(&bytes)
}
