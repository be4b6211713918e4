/*
 * Copyright (C) 2022 taylor.fish <contact@taylor.fish>
 *
 * This file is part of basen.
 *
 * basen is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * basen is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with basen. If not, see <https://www.gnu.org/licenses/>.
 */

//! Base16, Base32, z-base-32, and Base64 from a single bit-packing engine.
//!
//! Every alphabet is described by an [`Alphabet`] value; the encoder and
//! decoder only ever look at its block shape. Conversions work on
//! caller-supplied buffers and never allocate, so they can be driven
//! chunk by chunk: see [`Encoder::convert`] and [`Decoder::convert`].
//!
//! ```
//! use basen::{decode_to_vec, encode_to_string, BASE64};
//!
//! let s = encode_to_string(&BASE64, b"any carnal pleas");
//! assert_eq!(s, "YW55IGNhcm5hbCBwbGVhcw==");
//! assert_eq!(decode_to_vec(&BASE64, s.as_bytes()), b"any carnal pleas");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

pub mod alphabet;
mod block;
mod cursor;
pub mod decode;
pub mod encode;
pub mod error;
mod iter;
mod length;
mod unit;

#[cfg(feature = "alloc")]
extern crate alloc;

const MAX_SYMBOLS: usize = 64;
const MAX_ENCODING_BLOCK: usize = 5;
const MAX_DECODING_BLOCK: usize = 8;

pub use alphabet::Alphabet;
pub use alphabet::{BASE16_LOWER, BASE16_UPPER};
pub use alphabet::{BASE32, BASE64, BASE64_URL, ZBASE32};

pub use block::{DecodePolicy, Progress};
pub use cursor::{window, window_mut};
pub use error::{AlphabetError, RangeError};
pub use unit::Unit;

pub use decode::{decode_units, ByteDecoder, Decoder};
#[cfg(feature = "alloc")]
pub use decode::decode_to_vec;

pub use encode::{encode_chars, CharEncoder, Encoder};
#[cfg(feature = "alloc")]
pub use encode::{encode_to_string, encode_to_vec};
