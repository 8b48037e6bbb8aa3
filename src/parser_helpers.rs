use crate::png::{PngError, PngResult};

/// Splits `N` bytes off the front of `bytes`.
#[inline]
pub(crate) fn try_pull_byte_array<const N: usize>(bytes: &[u8]) -> PngResult<([u8; N], &[u8])> {
  match bytes.split_first_chunk::<N>() {
    Some((head, tail)) => Ok((*head, tail)),
    None => Err(PngError::TruncatedInput),
  }
}

/// Splits a big-endian `u32` off the front of `bytes`.
#[inline]
pub(crate) fn try_pull_u32_be(bytes: &[u8]) -> PngResult<(u32, &[u8])> {
  let (a, tail) = try_pull_byte_array::<4>(bytes)?;
  Ok((u32::from_be_bytes(a), tail))
}

/// Splits `len` bytes off the front of `bytes`.
#[inline]
pub(crate) fn try_pull_slice(bytes: &[u8], len: usize) -> PngResult<(&[u8], &[u8])> {
  if bytes.len() >= len {
    Ok(bytes.split_at(len))
  } else {
    Err(PngError::TruncatedInput)
  }
}

#[test]
fn test_pulls_never_read_past_the_end() {
  assert_eq!(try_pull_u32_be(&[0, 0, 1, 2, 9]), Ok((258, &[9_u8][..])));
  assert_eq!(try_pull_u32_be(&[0, 0, 1]), Err(PngError::TruncatedInput));
  assert_eq!(try_pull_slice(&[1, 2, 3], 3), Ok((&[1_u8, 2, 3][..], &[][..])));
  assert_eq!(try_pull_slice(&[1, 2, 3], 4), Err(PngError::TruncatedInput));
  assert_eq!(try_pull_byte_array::<0>(&[]), Ok(([], &[][..])));
}
