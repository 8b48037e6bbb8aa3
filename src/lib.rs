#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! A crate for decoding truecolor PNG data.
//!
//! Only a small subset of PNG is handled: 8 bits per channel, no interlacing,
//! and either RGB or RGBA pixels. That covers the large majority of PNG files
//! that programs actually ship with. Anything outside the subset is rejected
//! with a [`PngError`](png::PngError) rather than decoded badly.
//!
//! If you just want the pixels, call [`decode_png`](png::decode_png) (needs
//! the `alloc` and `miniz_oxide` features). If you want to drive the stages
//! yourself, see the [`png`] module docs.

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub mod pixel_formats;
pub use pixel_formats::*;

pub mod ascii_array;
pub use ascii_array::*;

mod error;
pub use error::*;

mod parser_helpers;

pub mod png;
