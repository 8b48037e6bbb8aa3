use super::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Checks if the PNG's initial 8 bytes are correct.
///
/// * If this is the case, the rest of the bytes are very likely PNG data.
/// * If this is *not* the case, the rest of the bytes are very likely *not* PNG
///   data.
#[inline]
#[must_use]
pub const fn is_png_header_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

/// Checks the signature and gives back the bytes that follow it.
///
/// ## Failure
/// * [`PngError::InvalidSignature`] if the data is shorter than the signature
///   or the first 8 bytes don't match it.
#[inline]
pub const fn check_signature(bytes: &[u8]) -> PngResult<&[u8]> {
  match bytes {
    [137, 80, 78, 71, 13, 10, 26, 10, rest @ ..] => Ok(rest),
    _ => Err(PngError::InvalidSignature),
  }
}

#[test]
fn test_check_signature() {
  assert_eq!(check_signature(&PNG_SIGNATURE), Ok(&[][..]));
  assert_eq!(check_signature(&[137, 80, 78, 71, 13, 10, 26, 10, 7]), Ok(&[7_u8][..]));
  assert_eq!(check_signature(&PNG_SIGNATURE[..7]), Err(PngError::InvalidSignature));
  assert_eq!(check_signature(b"GIF89a.."), Err(PngError::InvalidSignature));
  assert_eq!(check_signature(&[]), Err(PngError::InvalidSignature));
  // a text-mode transfer turns CRLF into LF, which the signature catches.
  assert!(!is_png_header_correct(&[137, 80, 78, 71, 10, 26, 10, 0]));
}
