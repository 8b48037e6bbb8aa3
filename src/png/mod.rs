//! Holds all the tools for decoding PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## Automatic Decoding
//!
//! Call [`decode_png`] (or [`decode_png_file`] with the `std` feature) and
//! you get a [`DecodedImage`] or the first [`PngError`] that came up. For
//! limits on the image size, build a [`PngDecoder`] with some
//! [`DecodeOptions`].
//!
//! ## Decoding Step By Step
//!
//! The general format of a PNG is that the information is stored in "chunks".
//! After the 8 byte signature, every chunk is a big-endian length, a 4 byte
//! type tag, the payload, and a CRC of the tag and payload. Only three chunk
//! types matter here:
//! * **Header** (`IHDR`) - The first chunk. Gives the image's dimensions and
//!   pixel format, and so how big every buffer will be.
//! * **Image Data** (`IDAT`) - One or more chunks of compressed data. All of
//!   the compressed data forms a single zlib data stream.
//! * **End** (`IEND`) - The last chunk, lets you know you had the full PNG and
//!   your data wasn't truncated accidentally.
//!
//! Any other chunk is checked and then skipped.
//!
//! 1) [`check_signature`] the bytes.
//! 2) Read the chunks with a [`ChunkReader`], which gives you the
//!    [`ImageHeader`] and the [`CompressedStream`]. If you'd rather just look
//!    at the chunks, use a [`RawChunkIter`].
//! 3) Decompress the stream with an [`Inflater`] into exactly
//!    [`filtered_len`](ImageHeader::filtered_len) bytes. This gives you
//!    *filtered* data, not the final data you want.
//! 4) Call [`reconstruct_in_place`] or [`reconstruct_scanlines`] to undo the
//!    filters.
//!
//! ## Parsing Errors
//!
//! Unlike a lenient decoder, this one is strict about the parts of the format
//! it reads. Every chunk's CRC is checked, the header must come first and
//! only once, and the decompressed data must be exactly the right size. The
//! first problem aborts the decode.

use crate::AsciiArray;
#[cfg(feature = "alloc")]
use crate::{RGB8, RGBA8};

pub use crate::error::{PngError, PngResult};

mod signature;
pub use signature::*;

mod crc32;
pub use crc32::*;

mod chunk;
pub use chunk::*;

mod ihdr;
pub use ihdr::*;

mod unfilter;
pub use unfilter::*;

mod options;
pub use options::*;

#[cfg(feature = "alloc")]
mod idat;
#[cfg(feature = "alloc")]
pub use idat::*;

#[cfg(feature = "alloc")]
mod reader;
#[cfg(feature = "alloc")]
pub use reader::*;

#[cfg(feature = "alloc")]
mod inflate;
#[cfg(feature = "alloc")]
pub use inflate::*;

#[cfg(feature = "alloc")]
mod image;
#[cfg(feature = "alloc")]
pub use image::*;
