//! A library for generating favicon sets, built around a PackBits codec for
//! icon data.
//!
//! # Overview
//!
//! The [`packbits`](packbits/index.html) module implements the byte-oriented
//! run-length scheme that icon formats use to compress raw channel and mask
//! data.  It works on plain byte slices and knows nothing about images:
//!
//! ```
//! let raw = [1, 2, 2, 2, 9];
//! let encoded = favicon_gen::packbits::encode(&raw);
//! assert_eq!(encoded, [0, 1, 0xfe, 2, 0, 9]);
//! assert_eq!(favicon_gen::packbits::decode(&encoded).unwrap(), raw);
//! ```
//!
//! The rest of the crate assembles a favicon set from square PNG images that
//! have already been resized: an ICO file holding the small sizes (see
//! [`IconDir`](struct.IconDir.html)), plus standalone PNG copies named for
//! the platforms that request them (see
//! [`generate_favicon`](fn.generate_favicon.html)).
//!
//! Progress is reported through `tracing` events; install a subscriber to
//! see them.

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod favicon;
pub use self::favicon::{
    generate_favicon, generate_ico, generate_png, FaviconOptions,
};

mod icondir;
pub use self::icondir::{IconDir, IconDirEntry};

pub mod packbits;

mod sizes;
pub use self::sizes::{
    filter_images_by_sizes, png_file_name, required_image_sizes, ImageInfo,
    REQUIRED_ICO_IMAGE_SIZES, REQUIRED_PNG_IMAGE_SIZES,
};
