//! Undoing the per-scanline filters.
//!
//! From the PNG spec:
//!
//! > Filters are applied to **bytes**, not to pixels, regardless of the bit
//! > depth or color type of the image.
//!
//! Each byte is reconstructed from bytes that were *already* reconstructed:
//! `a` is the matching byte of the pixel to the left, `b` the byte directly
//! above, and `c` the matching byte of the pixel above and to the left. Any of
//! these that would fall outside the image counts as 0. That makes the work
//! strictly sequential, top to bottom and left to right.

use super::*;

/// The filter type byte at the start of each scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  /// Bytes are stored as-is.
  None = 0,
  /// Stored as the difference from `a`.
  Sub = 1,
  /// Stored as the difference from `b`.
  Up = 2,
  /// Stored as the difference from the floor average of `a` and `b`.
  Average = 3,
  /// Stored as the difference from [`paeth_predict`].
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(PngError::InvalidFilterType(other)),
    })
  }
}

/// The Paeth filter function computes a simple linear function of the three
/// neighboring bytes (left `a`, above `b`, upper left `c`).
///
/// The output is whichever of the three is closest to `a + b - c`. The result
/// is always exactly one of the inputs.
#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  // Note(Lokathor): PNG spec says "The calculations within the PaethPredictor
  // function shall be performed exactly, without overflow.", so we use i32 math
  // here, which is wide enough for any u8 inputs.
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note(Lokathor): The PNG spec is extremely specific that you shall not,
  // under any circumstances, alter the order of evaluation of this
  // expression's tests.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Reconstruct Filter Type 3
///
/// * `fx` filtered X
/// * `ra` reconstructed `a`
/// * `rb` reconstructed `b`
///
/// The sum is done at 9 bits so that it can't overflow before the divide.
#[inline]
#[must_use]
const fn reconstruct_average(fx: u8, ra: u8, rb: u8) -> u8 {
  fx.wrapping_add(((ra as u16 + rb as u16) / 2) as u8)
}

/// Unfilters one line of bytes, given the already unfiltered line above it.
///
/// `previous` is empty for the first line of the image.
fn unfilter_line(filter: FilterType, current: &mut [u8], previous: &[u8], bpp: usize) {
  match filter {
    FilterType::None => (),
    FilterType::Sub => {
      // the first pixel has a = 0, so it's left alone.
      for x in bpp..current.len() {
        current[x] = current[x].wrapping_add(current[x - bpp]);
      }
    }
    FilterType::Up => {
      // on the first line b = 0, and the zip is empty.
      current.iter_mut().zip(previous.iter()).for_each(|(x, b)| *x = x.wrapping_add(*b));
    }
    FilterType::Average => {
      for x in 0..current.len() {
        let a = if x >= bpp { current[x - bpp] } else { 0 };
        let b = previous.get(x).copied().unwrap_or(0);
        current[x] = reconstruct_average(current[x], a, b);
      }
    }
    FilterType::Paeth => {
      for x in 0..current.len() {
        let (a, c) = if x >= bpp {
          (current[x - bpp], previous.get(x - bpp).copied().unwrap_or(0))
        } else {
          (0, 0)
        };
        let b = previous.get(x).copied().unwrap_or(0);
        current[x] = current[x].wrapping_add(paeth_predict(a, b, c));
      }
    }
  }
}

/// Unfilters decompressed image data in place.
///
/// `filtered` must be exactly [`ImageHeader::filtered_len`] bytes: `height`
/// lines that are each a filter byte followed by the line's filtered bytes.
///
/// Afterwards each line holds its final pixel bytes, and each filter byte is
/// reset to 0 ("no filter"), so running this again on the same buffer changes
/// nothing.
///
/// ## Failure
/// * [`PngError::CompressionError`] if the buffer is the wrong size.
/// * [`PngError::InvalidFilterType`] for a filter byte above 4. Lines above
///   the bad one will already have been unfiltered, the rest are untouched.
pub fn reconstruct_in_place(filtered: &mut [u8], header: &ImageHeader) -> PngResult<()> {
  let bytes_per_filterline = header.bytes_per_filterline()?;
  if filtered.len() != header.filtered_len()? {
    return Err(PngError::CompressionError);
  }
  let bpp = usize::from(header.component_count());
  let mut previous: &[u8] = &[];
  for line in filtered.chunks_exact_mut(bytes_per_filterline) {
    let (filter_byte, current) = line.split_at_mut(1);
    let filter = FilterType::try_from(filter_byte[0])?;
    unfilter_line(filter, current, previous, bpp);
    filter_byte[0] = FilterType::None as u8;
    previous = current;
  }
  Ok(())
}

/// Unfilters decompressed image data and packs the lines together, dropping
/// the filter bytes.
///
/// The buffer is reused for the output, so this doesn't allocate. The output
/// is [`ImageHeader::pixel_len`] bytes, row-major with channels interleaved.
///
/// Fails just like [`reconstruct_in_place`].
#[cfg(feature = "alloc")]
pub fn reconstruct_scanlines(
  mut filtered: alloc::vec::Vec<u8>, header: &ImageHeader,
) -> PngResult<alloc::vec::Vec<u8>> {
  reconstruct_in_place(&mut filtered, header)?;
  let bytes_per_scanline = header.bytes_per_scanline()?;
  let bytes_per_filterline = bytes_per_scanline + 1;
  let height = header.height as usize;
  for y in 0..height {
    let src = y * bytes_per_filterline + 1;
    filtered.copy_within(src..src + bytes_per_scanline, y * bytes_per_scanline);
  }
  filtered.truncate(header.pixel_len()?);
  Ok(filtered)
}

#[cfg(test)]
fn rgb_header(width: u32, height: u32) -> ImageHeader {
  ImageHeader {
    width,
    height,
    bit_depth: 8,
    color_type: PngColorType::RGB,
    compression_method: 0,
    filter_method: 0,
    interlace_method: 0,
  }
}

#[test]
fn test_paeth_predict_picks_an_input() {
  for a in 0..=255_u8 {
    for b in 0..=255_u8 {
      for c in (0..=255_u8).step_by(5) {
        let p = paeth_predict(a, b, c);
        assert!(p == a || p == b || p == c, "a:{a} b:{b} c:{c} gave {p}");
      }
    }
  }
}

#[test]
fn test_paeth_predict_tie_breaks() {
  // all tie, a wins
  assert_eq!(paeth_predict(100, 100, 100), 100);
  // p = 10: pa = 10, pb = 20, pc = 10 -> a beats c on a tie
  assert_eq!(paeth_predict(0, 30, 20), 0);
  // p = 20: pa = 20, pb = 10, pc = 10 -> b beats c on a tie
  assert_eq!(paeth_predict(0, 30, 10), 30);
  // p = -10: pa = 10, pb = 20, pc = 30 -> a
  assert_eq!(paeth_predict(0, 10, 20), 0);
  // p = 55: pa = 5, pb = 5, pc = 0 -> c
  assert_eq!(paeth_predict(50, 60, 55), 55);
  // p = 255 + 255 - 0 is past u8 range, which must not wrap.
  assert_eq!(paeth_predict(255, 255, 0), 255);
}

#[test]
fn test_filter_type_from_u8() {
  assert_eq!(FilterType::try_from(4), Ok(FilterType::Paeth));
  assert_eq!(FilterType::try_from(5), Err(PngError::InvalidFilterType(5)));
  assert_eq!(FilterType::try_from(255), Err(PngError::InvalidFilterType(255)));
}

#[test]
fn test_reconstruct_single_pixel_none() {
  let mut data = [0, 12, 34, 56];
  reconstruct_in_place(&mut data, &rgb_header(1, 1)).unwrap();
  assert_eq!(data, [0, 12, 34, 56]);
}

#[test]
fn test_reconstruct_sub_adds_left_neighbor() {
  let mut data = [1, 10, 20, 30, 5, 5, 5];
  reconstruct_in_place(&mut data, &rgb_header(2, 1)).unwrap();
  assert_eq!(data, [0, 10, 20, 30, 15, 25, 35]);
  // with wraparound
  let mut data = [1, 250, 0, 1, 10, 255, 255];
  reconstruct_in_place(&mut data, &rgb_header(2, 1)).unwrap();
  assert_eq!(&data[4..], &[4, 255, 0]);
}

#[test]
fn test_reconstruct_paeth_tie_value() {
  // row 2, pixel 1: a = 0, b = 100, c = 0, predicts b.
  // row 2, pixel 2: a = b = c = 100, predicts a.
  #[rustfmt::skip]
  let mut data = [
    0, 100, 100, 100, 100, 100, 100,
    4, 0, 0, 0, 10, 10, 10,
  ];
  reconstruct_in_place(&mut data, &rgb_header(2, 2)).unwrap();
  assert_eq!(&data[8..11], &[100, 100, 100]);
  assert_eq!(&data[11..14], &[110, 110, 110]);
}

#[test]
fn test_reconstruct_up_and_average() {
  #[rustfmt::skip]
  let mut data = [
    0, 255, 255, 255, 0, 2, 4,
    2, 1, 1, 1, 1, 1, 1,
    3, 0, 0, 0, 0, 0, 0,
  ];
  reconstruct_in_place(&mut data, &rgb_header(2, 3)).unwrap();
  // Up wraps around
  assert_eq!(&data[8..14], &[0, 0, 0, 1, 3, 5]);
  // Average: first pixel is b/2, second is (a + b)/2 rounded down
  assert_eq!(&data[15..18], &[0, 0, 0]);
  assert_eq!(&data[18..21], &[0, 1, 2]);
  //
  #[rustfmt::skip]
  let mut data = [
    0, 255, 255, 255, 255, 255, 255,
    3, 0, 0, 0, 0, 0, 0,
  ];
  reconstruct_in_place(&mut data, &rgb_header(2, 2)).unwrap();
  assert_eq!(&data[8..11], &[127, 127, 127]);
  // (127 + 255) / 2 = 191, with no 8-bit overflow in the sum
  assert_eq!(&data[11..14], &[191, 191, 191]);
}

#[test]
fn test_reconstruct_first_row_treats_above_as_zero() {
  let mut up = [2, 7, 8, 9];
  reconstruct_in_place(&mut up, &rgb_header(1, 1)).unwrap();
  assert_eq!(up, [0, 7, 8, 9]);
  let mut avg = [3, 8, 8, 8, 8, 8, 8];
  reconstruct_in_place(&mut avg, &rgb_header(2, 1)).unwrap();
  assert_eq!(avg, [0, 8, 8, 8, 12, 12, 12]);
  let mut paeth = [4, 8, 8, 8, 1, 1, 1];
  reconstruct_in_place(&mut paeth, &rgb_header(2, 1)).unwrap();
  assert_eq!(paeth, [0, 8, 8, 8, 9, 9, 9]);
}

#[test]
fn test_reconstruct_rejects_bad_filter_and_size() {
  let mut data = [0, 1, 2, 3, 5, 1, 2, 3];
  assert_eq!(
    reconstruct_in_place(&mut data, &rgb_header(1, 2)),
    Err(PngError::InvalidFilterType(5))
  );
  let mut short = [0, 1, 2];
  assert_eq!(reconstruct_in_place(&mut short, &rgb_header(1, 1)), Err(PngError::CompressionError));
}

#[test]
fn test_reconstruct_is_repeatable() {
  let mut data = [1, 1, 2, 3, 1, 1, 1, 2, 0, 0, 0, 9, 9, 9];
  reconstruct_in_place(&mut data, &rgb_header(2, 2)).unwrap();
  let once = data;
  reconstruct_in_place(&mut data, &rgb_header(2, 2)).unwrap();
  assert_eq!(once, data);
}

#[cfg(feature = "alloc")]
#[test]
fn test_reconstruct_scanlines_drops_filter_bytes() {
  let data = alloc::vec![0, 1, 2, 3, 4, 5, 6, 2, 1, 1, 1, 1, 1, 1];
  let pixels = reconstruct_scanlines(data, &rgb_header(2, 2)).unwrap();
  assert_eq!(pixels, [1, 2, 3, 4, 5, 6, 2, 3, 4, 5, 6, 7]);
  // zero width: each line is only a filter byte
  let pixels = reconstruct_scanlines(alloc::vec![0, 4, 1], &rgb_header(0, 3)).unwrap();
  assert!(pixels.is_empty());
  assert_eq!(
    reconstruct_scanlines(alloc::vec![0, 9], &rgb_header(0, 2)),
    Err(PngError::InvalidFilterType(9))
  );
}
