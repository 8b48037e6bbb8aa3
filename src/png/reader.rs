use super::*;

/// Where a [`ChunkReader`] is in the chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderState {
  /// Nothing read yet, the next chunk must be `IHDR`.
  ExpectFirst,
  /// Past the header, reading until `IEND`.
  Scanning,
  /// `IEND` was seen, nothing more will be read.
  Done,
  /// A chunk failed. The error is kept and given back on every later call.
  Failed(PngError),
}

/// Reads chunks one at a time, collecting the header and the compressed
/// image data.
///
/// Each chunk's CRC is checked before anything else about the chunk is
/// looked at, so a damaged chunk is always reported as a
/// [`PngError::CrcMismatch`] even when its contents would also be wrong in
/// some other way.
///
/// * `IHDR` must come first, and only once.
/// * `IDAT` payloads are appended to the [`CompressedStream`].
/// * `IEND` ends the reading. Anything after it is never looked at.
/// * Any other chunk is checked and skipped.
#[derive(Debug, Clone)]
pub struct ChunkReader<'b> {
  chunks: RawChunkIter<'b>,
  state: ReaderState,
  header: Option<ImageHeader>,
  stream: CompressedStream,
}
impl<'b> ChunkReader<'b> {
  /// Checks the PNG signature and prepares to read the chunks after it.
  #[inline]
  pub fn new(png: &'b [u8]) -> PngResult<Self> {
    Ok(Self {
      chunks: RawChunkIter::from_png_bytes(png)?,
      state: ReaderState::ExpectFirst,
      header: None,
      stream: CompressedStream::new(),
    })
  }

  /// The current state.
  #[inline]
  #[must_use]
  pub const fn state(&self) -> ReaderState {
    self.state
  }

  /// The header, once the first chunk has been read.
  #[inline]
  #[must_use]
  pub const fn header(&self) -> Option<&ImageHeader> {
    self.header.as_ref()
  }

  /// The `IDAT` data collected so far.
  #[inline]
  #[must_use]
  pub const fn compressed_stream(&self) -> &CompressedStream {
    &self.stream
  }

  /// Reads and handles one chunk, returning the state afterwards.
  ///
  /// Once the reader is `Done` this does nothing and stays `Done`. Once it
  /// has `Failed` this returns that same error again.
  pub fn parse_next(&mut self) -> PngResult<ReaderState> {
    match self.state {
      ReaderState::Done => return Ok(ReaderState::Done),
      ReaderState::Failed(e) => return Err(e),
      ReaderState::ExpectFirst | ReaderState::Scanning => (),
    }
    match self.step() {
      Ok(()) => Ok(self.state),
      Err(e) => {
        self.state = ReaderState::Failed(e);
        Err(e)
      }
    }
  }

  fn step(&mut self) -> PngResult<()> {
    // Running out of bytes before IEND counts as truncation too.
    let chunk = self.chunks.next().ok_or(PngError::TruncatedInput)??;
    chunk.verify_crc()?;
    if self.state == ReaderState::ExpectFirst && chunk.chunk_type != ChunkType::IHDR {
      return Err(PngError::InvalidBlockOrder);
    }
    log::trace!("chunk {:?}, {} bytes", chunk.chunk_type, chunk.data.len());
    match chunk.chunk_type {
      ChunkType::IHDR => {
        if self.header.is_some() {
          return Err(PngError::DuplicateHeaderBlock);
        }
        let header = ImageHeader::try_from(chunk.data)?;
        log::debug!("header: {header:?}");
        self.header = Some(header);
        self.state = ReaderState::Scanning;
      }
      ChunkType::IDAT => self.stream.append(chunk.data)?,
      ChunkType::IEND => {
        if !chunk.data.is_empty() {
          log::warn!("IEND has a {} byte payload, ignoring it", chunk.data.len());
        }
        self.state = ReaderState::Done;
      }
      other => {
        if !other.is_ancillary() {
          log::warn!("skipping unsupported critical chunk {other:?}");
        }
      }
    }
    Ok(())
  }

  /// Reads chunks until `IEND`, then gives back the header and the
  /// compressed image data.
  pub fn finish(mut self) -> PngResult<(ImageHeader, CompressedStream)> {
    while self.parse_next()? != ReaderState::Done {}
    let header = self.header.ok_or(PngError::InvalidBlockOrder)?;
    log::debug!(
      "compressed stream: {} bytes from {} IDAT chunks",
      self.stream.len(),
      self.stream.chunk_count()
    );
    Ok((header, self.stream))
  }
}

/// Checks the signature and reads all of the chunks.
///
/// This is the same as [`ChunkReader::new`] followed by
/// [`ChunkReader::finish`].
#[inline]
pub fn scan_chunks(png: &[u8]) -> PngResult<(ImageHeader, CompressedStream)> {
  ChunkReader::new(png)?.finish()
}
