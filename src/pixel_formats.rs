//! Module for pixel formats.
//!
//! The decoder itself works purely in bytes: one byte per channel, channels
//! interleaved, rows packed top to bottom with no padding. These types let you
//! view that byte buffer as whole pixels instead, without copying (see
//! [`DecodedImage::as_rgb8`](crate::png::DecodedImage::as_rgb8) and
//! [`DecodedImage::as_rgba8`](crate::png::DecodedImage::as_rgba8)).
//!
//! Both types have an alignment of 1, so any byte slice of the right length
//! can be cast to a slice of them.

use bytemuck::{Pod, Zeroable};

/// An RGB value, 8-bits per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGB8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

/// An 8-bits per channel RGBA pixel.
///
/// The alpha channel is straight (not premultiplied), as PNG stores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Pod, Zeroable)]
#[repr(C)]
#[allow(missing_docs)]
pub struct RGBA8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}
impl From<RGB8> for RGBA8 {
  #[inline]
  fn from(RGB8 { r, g, b }: RGB8) -> Self {
    Self { r, g, b, a: 255 }
  }
}

#[test]
fn test_pixel_layouts_are_packed() {
  assert_eq!(core::mem::size_of::<RGB8>(), 3);
  assert_eq!(core::mem::align_of::<RGB8>(), 1);
  assert_eq!(core::mem::size_of::<RGBA8>(), 4);
  assert_eq!(core::mem::align_of::<RGBA8>(), 1);
  let px: &[RGB8] = bytemuck::cast_slice(&[1_u8, 2, 3, 4, 5, 6]);
  assert_eq!(px, &[RGB8 { r: 1, g: 2, b: 3 }, RGB8 { r: 4, g: 5, b: 6 }]);
  assert_eq!(RGBA8::from(px[0]), RGBA8 { r: 1, g: 2, b: 3, a: 255 });
}
