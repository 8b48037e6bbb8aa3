use miniz_oxide::deflate::compress_to_vec_zlib;
use trupng::png::*;
use walkdir::WalkDir;

fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8]) {
  out.extend_from_slice(&(data.len() as u32).to_be_bytes());
  out.extend_from_slice(tag);
  out.extend_from_slice(data);
  out.extend_from_slice(&png_crc_of(*tag, data).to_be_bytes());
}

fn ihdr(w: u32, h: u32, color_type: u8) -> [u8; 13] {
  let mut out = [0; 13];
  out[..4].copy_from_slice(&w.to_be_bytes());
  out[4..8].copy_from_slice(&h.to_be_bytes());
  out[8] = 8;
  out[9] = color_type;
  out
}

/// Builds a PNG around already filtered scanline bytes, splitting the zlib
/// stream into IDAT chunks of at most `idat_len` bytes.
fn png_from_filtered(
  w: u32, h: u32, color_type: u8, filtered: &[u8], idat_len: usize,
) -> Vec<u8> {
  let z = compress_to_vec_zlib(filtered, 6);
  let mut out = PNG_SIGNATURE.to_vec();
  push_chunk(&mut out, b"IHDR", &ihdr(w, h, color_type));
  push_chunk(&mut out, b"gAMA", &45455_u32.to_be_bytes());
  for part in z.chunks(idat_len.max(1)) {
    push_chunk(&mut out, b"IDAT", part);
  }
  push_chunk(&mut out, b"IEND", &[]);
  out
}

/// Filters raw pixel rows the way an encoder would, using the given filter
/// type for each row in turn.
fn filter_image(raw: &[u8], stride: usize, bpp: usize, filters: &[u8]) -> Vec<u8> {
  let mut out = Vec::new();
  for (y, row) in raw.chunks_exact(stride).enumerate() {
    let f = filters[y % filters.len()];
    out.push(f);
    for x in 0..stride {
      let a = if x >= bpp { row[x - bpp] } else { 0 };
      let b = if y > 0 { raw[(y - 1) * stride + x] } else { 0 };
      let c = if y > 0 && x >= bpp { raw[(y - 1) * stride + x - bpp] } else { 0 };
      let predicted = match f {
        0 => 0,
        1 => a,
        2 => b,
        3 => ((a as u16 + b as u16) / 2) as u8,
        4 => paeth_predict(a, b, c),
        _ => unreachable!(),
      };
      out.push(row[x].wrapping_sub(predicted));
    }
  }
  out
}

fn small_rgb_png() -> Vec<u8> {
  png_from_filtered(1, 1, 2, &[0, 200, 100, 50], 1024)
}

#[test]
fn test_decode_single_pixel() {
  let image = decode_png(&small_rgb_png()).unwrap();
  assert_eq!((image.width(), image.height(), image.component_count()), (1, 1, 3));
  assert_eq!(image.pixels(), &[200, 100, 50]);
  assert_eq!(image.as_rgb8(), Some(&[trupng::RGB8 { r: 200, g: 100, b: 50 }][..]));
  assert_eq!(image.as_rgba8(), None);
}

#[test]
fn test_decode_sub_row() {
  let png = png_from_filtered(2, 1, 2, &[1, 10, 20, 30, 5, 5, 5], 1024);
  let image = decode_png(&png).unwrap();
  assert_eq!(image.pixels(), &[10, 20, 30, 15, 25, 35]);
  assert_eq!(image.pixel(1, 0), Some(&[15, 25, 35][..]));
  assert_eq!(image.pixel(2, 0), None);
}

#[test]
fn test_decode_paeth_tie() {
  #[rustfmt::skip]
  let filtered = [
    0, 100, 100, 100, 100, 100, 100,
    4, 0, 0, 0, 10, 10, 10,
  ];
  let image = decode_png(&png_from_filtered(2, 2, 2, &filtered, 1024)).unwrap();
  assert_eq!(image.pixel(1, 1), Some(&[110, 110, 110][..]));
}

#[test]
fn test_decode_every_filter_type() {
  for (color_type, bpp) in [(2_u8, 3_usize), (6, 4)] {
    let (w, h) = (9_u32, 11_u32);
    let stride = w as usize * bpp;
    let raw = super::rand_bytes(stride * h as usize);
    let filtered = filter_image(&raw, stride, bpp, &[0, 1, 2, 3, 4, 4, 3, 2, 1]);
    // also split the zlib stream over lots of small IDAT chunks
    for idat_len in [1, 5, 4096] {
      let png = png_from_filtered(w, h, color_type, &filtered, idat_len);
      let image = decode_png(&png).unwrap();
      assert_eq!(image.pixels(), &raw[..], "color_type: {color_type}, idat_len: {idat_len}");
      assert_eq!(image.pixels().len(), w as usize * h as usize * bpp);
      assert_eq!(image.rows().len(), h as usize);
      assert!(image.rows().all(|row| row.len() == stride));
    }
  }
}

#[test]
fn test_decode_rgba_view() {
  let png = png_from_filtered(2, 1, 6, &[0, 1, 2, 3, 4, 5, 6, 7, 8], 1024);
  let image = decode_png(&png).unwrap();
  assert_eq!(image.color_type(), PngColorType::RGBA);
  let px = image.as_rgba8().unwrap();
  assert_eq!(px[1], trupng::RGBA8 { r: 5, g: 6, b: 7, a: 8 });
  assert_eq!(image.into_pixels(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_decode_is_repeatable() {
  let raw = super::rand_bytes(6 * 3 * 3);
  let png = png_from_filtered(6, 3, 2, &filter_image(&raw, 18, 3, &[4, 3]), 10);
  let first = decode_png(&png).unwrap();
  let second = decode_png(&png).unwrap();
  assert_eq!(first.pixels(), &raw[..]);
  assert_eq!(first, second);
}

#[test]
fn test_chunk_edges() {
  // a damaged IDAT after IEND is never looked at
  let mut png = small_rgb_png();
  push_chunk(&mut png, b"IDAT", &[1, 2, 3]);
  let last = png.len() - 1;
  png[last] ^= 0xFF;
  assert_eq!(decode_png(&png).unwrap().pixels(), &[200, 100, 50]);
  // a length field cut short
  let png = small_rgb_png();
  assert_eq!(decode_png(&png[..8 + 25 + 2]), Err(PngError::TruncatedInput));
  // lowercase "iHDR" no longer matches its stored CRC
  let mut png = small_rgb_png();
  png[12] ^= 32;
  assert!(matches!(decode_png(&png), Err(PngError::CrcMismatch { .. })));
}

#[test]
fn test_bit_flips_are_crc_mismatches() {
  let png = small_rgb_png();
  // walk the chunks, flipping bits in each type and payload byte
  let mut offset = 8;
  while offset < png.len() {
    let len = u32::from_be_bytes(png[offset..offset + 4].try_into().unwrap()) as usize;
    let checked = offset + 4..offset + 8 + len;
    for i in checked {
      for bit in [0, 3, 7] {
        let mut damaged = png.clone();
        damaged[i] ^= 1 << bit;
        let err = decode_png(&damaged).unwrap_err();
        assert!(matches!(err, PngError::CrcMismatch { .. }), "byte {i} bit {bit}: {err:?}");
      }
    }
    offset += len + 12;
  }
}

#[test]
fn test_first_chunk_must_be_ihdr() {
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, b"IDAT", &compress_to_vec_zlib(&[0, 1, 2, 3], 6));
  push_chunk(&mut png, b"IHDR", &ihdr(1, 1, 2));
  push_chunk(&mut png, b"IEND", &[]);
  assert_eq!(decode_png(&png), Err(PngError::InvalidBlockOrder));
}

#[test]
fn test_two_headers() {
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, b"IHDR", &ihdr(1, 1, 2));
  push_chunk(&mut png, b"IHDR", &ihdr(1, 1, 2));
  push_chunk(&mut png, b"IDAT", &compress_to_vec_zlib(&[0, 1, 2, 3], 6));
  push_chunk(&mut png, b"IEND", &[]);
  assert_eq!(decode_png(&png), Err(PngError::DuplicateHeaderBlock));
}

#[test]
fn test_unsupported_color_types_and_depths() {
  for color_type in [0, 3, 4] {
    let png = png_from_filtered(1, 1, color_type, &[0, 0], 1024);
    assert_eq!(decode_png(&png), Err(PngError::UnsupportedImageOptions));
  }
  let mut header = ihdr(1, 1, 2);
  header[8] = 16;
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, b"IHDR", &header);
  push_chunk(&mut png, b"IEND", &[]);
  assert_eq!(decode_png(&png), Err(PngError::UnsupportedImageOptions));
}

#[test]
fn test_bad_filter_type() {
  for f in [5, 6, 128, 255] {
    let png = png_from_filtered(1, 2, 2, &[0, 1, 1, 1, f, 2, 2, 2], 1024);
    assert_eq!(decode_png(&png), Err(PngError::InvalidFilterType(f)));
  }
}

#[test]
fn test_wrong_inflate_size() {
  // one byte short, one byte long, and no image data at all
  for filtered in [&[0, 1, 2][..], &[0, 1, 2, 3, 4][..]] {
    let png = png_from_filtered(1, 1, 2, filtered, 1024);
    assert_eq!(decode_png(&png), Err(PngError::CompressionError));
  }
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, b"IHDR", &ihdr(1, 1, 2));
  push_chunk(&mut png, b"IEND", &[]);
  assert_eq!(decode_png(&png), Err(PngError::CompressionError));
  // a valid CRC over a broken zlib stream
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, b"IHDR", &ihdr(1, 1, 2));
  push_chunk(&mut png, b"IDAT", &[0x78, 0x9C, 0xFF, 0xFF, 0xFF]);
  push_chunk(&mut png, b"IEND", &[]);
  assert_eq!(decode_png(&png), Err(PngError::CompressionError));
}

#[test]
fn test_truncated_file() {
  let png = small_rgb_png();
  for cut in [9, 20, png.len() - 13, png.len() - 1] {
    assert_eq!(decode_png(&png[..cut]), Err(PngError::TruncatedInput), "cut at {cut}");
  }
  assert_eq!(decode_png(&png[..4]), Err(PngError::InvalidSignature));
}

#[test]
fn test_zero_dimension_images() {
  let image = decode_png(&png_from_filtered(0, 3, 2, &[0, 1, 2], 1024)).unwrap();
  assert_eq!((image.width(), image.height()), (0, 3));
  assert!(image.pixels().is_empty());
  assert_eq!(image.rows().len(), 0);
  let image = decode_png(&png_from_filtered(4, 0, 6, &[], 1024)).unwrap();
  assert!(image.pixels().is_empty());
}

#[test]
fn test_decoder_limits() {
  let png = png_from_filtered(2, 1, 2, &[0; 7], 1024);
  let strict = PngDecoder::with_options(DecodeOptions::new().with_max_dimensions(1, 1));
  assert_eq!(strict.decode(&png), Err(PngError::ImageTooLarge));
  let strict = PngDecoder::with_options(DecodeOptions::new().with_max_pixel_bytes(5));
  assert_eq!(strict.decode(&png), Err(PngError::ImageTooLarge));
  let tiny_window = PngDecoder::with_options(DecodeOptions::new().with_inflate_chunk_len(1));
  assert_eq!(tiny_window.decode(&png).unwrap().pixels(), &[0; 6]);
  // a header that claims far more than the stream holds still fails cleanly
  let mut png = PNG_SIGNATURE.to_vec();
  push_chunk(&mut png, b"IHDR", &ihdr(1 << 20, 1 << 20, 6));
  push_chunk(&mut png, b"IEND", &[]);
  let strict = PngDecoder::with_options(DecodeOptions::new().with_max_pixel_bytes(1 << 24));
  assert_eq!(strict.decode(&png), Err(PngError::ImageTooLarge));
}

struct CountingInflater(std::cell::Cell<usize>);
impl Inflater for CountingInflater {
  fn inflate_to_vec(&self, compressed: &[u8], expected_len: usize) -> PngResult<Vec<u8>> {
    self.0.set(self.0.get() + 1);
    MinizInflater::default().inflate_to_vec(compressed, expected_len)
  }
}

#[test]
fn test_custom_inflater() {
  let decoder =
    PngDecoder::with_inflater(DecodeOptions::default(), CountingInflater(Default::default()));
  assert_eq!(decoder.decode(&small_rgb_png()).unwrap().pixels(), &[200, 100, 50]);
  assert_eq!(decoder.decode(&small_rgb_png()[..3]), Err(PngError::InvalidSignature));
  assert_eq!(decoder.decode(&small_rgb_png()).unwrap().pixels(), &[200, 100, 50]);
  assert_eq!(decoder.decode(&small_rgb_png()).unwrap().height(), 1);
  // a bad signature never gets as far as inflating
  assert_eq!(decoder.inflater().0.get(), 3);
}

#[test]
fn test_decode_never_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(_) => continue,
    };
    let _ = decode_png(&v);
    for _ in RawChunkIter::new(&v) {
      //
    }
  }
  // even totally random data should never panic the decoder!
  for _ in 0..50 {
    let v = super::rand_bytes(256);
    let _ = decode_png(&v);
    let mut with_sig = PNG_SIGNATURE.to_vec();
    with_sig.extend_from_slice(&v);
    let _ = decode_png(&with_sig);
    for _ in RawChunkIter::new(&v) {
      //
    }
  }
  // random damage to a real file
  let png = png_from_filtered(3, 3, 6, &[0; 39], 8);
  for noise in super::rand_bytes(200).chunks_exact(2) {
    let mut damaged = png.clone();
    let i = noise[0] as usize % damaged.len();
    damaged[i] ^= noise[1] | 1;
    assert!(decode_png(&damaged).is_err());
  }
}

#[cfg(feature = "std")]
#[test]
fn test_decode_png_file() {
  let path = std::env::temp_dir().join(format!("trupng-test-{}.png", std::process::id()));
  std::fs::write(&path, small_rgb_png()).unwrap();
  let image = decode_png_file(&path).unwrap();
  std::fs::remove_file(&path).unwrap();
  assert_eq!(image.pixels(), &[200, 100, 50]);
  let missing = decode_png_file(&path).unwrap_err();
  assert_eq!(missing, PngError::Io(std::io::ErrorKind::NotFound));
  assert!(std::error::Error::source(&missing).is_none());
}
