use core::fmt::Write;

/// An array of bytes expected to contain ascii data.
///
/// There's no actual enforced encoding! The `Debug` and `Display` impls will
/// just `as` cast each byte into a character. This works just as expected for
/// ascii data (`32..=126`), and is still safe for non-ascii data, but you just
/// might get non-printing characters or multi-byte unicode characters.
///
/// PNG chunk type tags are meant to be four ascii letters, but a damaged file
/// can hold anything at all in that position, so this is what the chunk type
/// uses for its `Debug` output.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct AsciiArray<const N: usize>(pub [u8; N]);

impl<const N: usize> AsciiArray<N> {
  /// The bytes as a slice.
  #[inline]
  #[must_use]
  pub const fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

impl<const N: usize> Default for AsciiArray<N> {
  #[inline]
  fn default() -> Self {
    Self([0; N])
  }
}

impl<const N: usize> core::fmt::Debug for AsciiArray<N> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('\"')?;
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    f.write_char('\"')?;
    Ok(())
  }
}
impl<const N: usize> core::fmt::Display for AsciiArray<N> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for ch in self.0.iter().copied().map(|u| u as char) {
      f.write_char(ch)?;
    }
    Ok(())
  }
}

impl<const N: usize> From<[u8; N]> for AsciiArray<N> {
  #[inline]
  fn from(array: [u8; N]) -> Self {
    Self(array)
  }
}

#[test]
fn test_ascii_array_default_is_zeroed() {
  assert_eq!(AsciiArray::<4>::default().0, [0; 4]);
  assert_eq!(AsciiArray::<0>::default().as_bytes(), &[] as &[u8]);
  assert_eq!(AsciiArray::<40>::default().0, [0; 40]);
}
