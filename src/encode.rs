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

//! Functions and types for encoding bytes as symbols.

use super::alphabet::Alphabet;
use super::block::{self, Progress};
use super::cursor::{window, window_mut};
use super::error::RangeError;
use super::iter::{BaseIterator, Flatten, InspectBaseIterator};
use super::unit::Unit;
use super::MAX_DECODING_BLOCK;

use core::array;
use core::iter::{Fuse, FusedIterator, Take};
use tracing::trace;

#[cfg(feature = "alloc")]
use alloc::{string::String, vec, vec::Vec};

/// Streaming encoder bound to an [`Alphabet`].
///
/// The encoder keeps no state between calls. Each call to
/// [`convert`](Self::convert) reports how much input it consumed; the
/// caller presents the rest again on the next call, along with any new
/// input.
///
/// ```
/// use basen::{Encoder, BASE64};
///
/// let encoder = Encoder::new(&BASE64);
/// let mut out = [0_u8; 8];
///
/// // Without `flush`, the trailing partial block is held back.
/// let p = encoder.convert(b"hello", &mut out, false);
/// assert_eq!((p.input_used, p.output_used, p.completed), (3, 4, false));
///
/// let q = encoder.convert(b"lo", &mut out[p.output_used..], true);
/// assert!(q.completed);
/// assert_eq!(&out, b"aGVsbG8=");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Encoder<'a> {
    alphabet: &'a Alphabet,
}

impl<'a> Encoder<'a> {
    pub const fn new(alphabet: &'a Alphabet) -> Self {
        Self {
            alphabet,
        }
    }

    pub const fn alphabet(&self) -> &'a Alphabet {
        self.alphabet
    }

    /// Encodes as much of `input` into `output` as fits.
    ///
    /// A final partial block is written only if `flush` is true and its
    /// symbols (and padding) fit. Calling with too little output space is
    /// always safe: the unwritten input is simply not counted as used.
    pub fn convert<U: Unit>(
        &self,
        input: &[u8],
        output: &mut [U],
        flush: bool,
    ) -> Progress {
        let progress = block::encode(self.alphabet, input, output, flush);
        trace!(
            bits = self.alphabet.bits_per_symbol(),
            input = input.len(),
            output = output.len(),
            flush,
            input_used = progress.input_used,
            output_used = progress.output_used,
            completed = progress.completed,
            "encode"
        );
        progress
    }

    /// Like [`Self::convert`], over `(offset, count)` windows of `input`
    /// and `output`. Both windows are checked before either buffer is
    /// touched.
    pub fn convert_at<U: Unit>(
        &self,
        input: &[u8],
        input_window: (usize, usize),
        output: &mut [U],
        output_window: (usize, usize),
        flush: bool,
    ) -> Result<Progress, RangeError> {
        let input = window(input, input_window.0, input_window.1)?;
        let output = window_mut(output, output_window.0, output_window.1)?;
        Ok(self.convert(input, output, flush))
    }

    /// Exact number of symbols produced by encoding `input_len` bytes with
    /// `flush` set. Returns `None` on overflow.
    pub fn output_len(&self, input_len: usize) -> Option<usize> {
        self.alphabet.encoded_len(input_len)
    }

    /// Largest amount of input that an output buffer of `output_len`
    /// symbols is guaranteed to absorb without `flush`.
    pub fn max_input_for(&self, output_len: usize) -> usize {
        self.alphabet.max_encodable_len(output_len)
    }
}

/// Encodes `bytes` into a newly allocated vector of symbols.
///
/// # Panics
///
/// Panics if the encoded length overflows `usize`.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_vec<U: Unit>(alphabet: &Alphabet, bytes: &[u8]) -> Vec<U> {
    let len = match alphabet.encoded_len(bytes.len()) {
        Some(len) => len,
        None => panic!("encoded length overflows usize"),
    };
    let mut symbols = vec![U::from_symbol(0); len];
    let progress = block::encode(alphabet, bytes, &mut symbols, true);
    debug_assert!(progress.completed);
    debug_assert_eq!(progress.output_used, len);
    symbols
}

/// Encodes `bytes` into a newly allocated [`String`].
///
/// # Panics
///
/// Panics if the encoded length overflows `usize`.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_string(alphabet: &Alphabet, bytes: &[u8]) -> String {
    let ascii: Vec<u8> = encode_to_vec(alphabet, bytes);

    #[cfg(debug_assertions)]
    let ascii = String::from_utf8(ascii)
        .expect("[debug] encoded data is not valid utf-8 -- this is UB!")
        .into_bytes();

    // SAFETY: Alphabets only contain ASCII symbols and padding.
    unsafe { String::from_utf8_unchecked(ascii) }
}

struct BytesToUnflatSymbols<'a, I> {
    alphabet: &'a Alphabet,
    iter: I,
}

impl<I: InspectBaseIterator> InspectBaseIterator
    for BytesToUnflatSymbols<'_, I>
{
    type Iter = I::Iter;

    fn base_iterator(&self) -> &Self::Iter {
        self.iter.base_iterator()
    }
}

type UnflatSymbols = Take<array::IntoIter<u8, MAX_DECODING_BLOCK>>;

impl<I> Iterator for BytesToUnflatSymbols<'_, I>
where
    I: FusedIterator<Item = u8>,
{
    type Item = UnflatSymbols;

    fn next(&mut self) -> Option<Self::Item> {
        let alphabet = self.alphabet;
        let mut num_bytes = 0_usize;
        let mut acc = 0_u64;
        self.iter.by_ref().take(alphabet.encoding_block_size()).for_each(
            |b| {
                num_bytes += 1;
                acc = (acc << 8) | u64::from(b);
            },
        );

        if num_bytes == 0 {
            return None;
        }

        let bits = alphabet.bits_per_symbol() as usize;
        let count = (num_bytes * 8).div_ceil(bits);
        let acc = acc << (count * bits - num_bytes * 8);
        let mut symbols = [alphabet.padding().unwrap_or(0); MAX_DECODING_BLOCK];
        symbols[..count].iter_mut().rev().zip(0_u32..).for_each(|(s, i)| {
            *s = alphabet.symbol(acc >> (i * bits as u32));
        });
        let len = match alphabet.padding() {
            Some(_) => alphabet.decoding_block_size(),
            None => count,
        };
        Some(IntoIterator::into_iter(symbols).take(len))
    }
}

impl<I: FusedIterator<Item = u8>> FusedIterator for BytesToUnflatSymbols<'_, I> {}

/// Iterator returned by [`encode_chars`].
pub struct CharEncoder<'a, I> {
    alphabet: &'a Alphabet,
    iter: Flatten<BytesToUnflatSymbols<'a, BaseIterator<Fuse<I>>>, UnflatSymbols>,
}

impl<I> Iterator for CharEncoder<'_, I>
where
    I: Iterator<Item = u8>,
{
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(char::from)
    }

    fn fold<B, F>(self, init: B, mut f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.iter.fold(init, |b, s| f(b, char::from(s)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.base_iterator().size_hint();
        let pending = self.iter.pending();
        // The source is always consumed a whole block at a time, so what
        // remains of it starts on a block boundary.
        let encoded = |n| {
            self.alphabet.encoded_len(n).and_then(|n| n.checked_add(pending))
        };
        (encoded(lower).unwrap_or(usize::MAX), upper.and_then(encoded))
    }
}

impl<I: Iterator<Item = u8>> FusedIterator for CharEncoder<'_, I> {}

/// Lazily encodes a sequence of bytes as `char` symbols.
///
/// The end of `bytes` acts as the flush: the output is identical to
/// [`encode_to_string`].
pub fn encode_chars<I>(alphabet: &Alphabet, bytes: I) -> CharEncoder<'_, I::IntoIter>
where
    I: IntoIterator<Item = u8>,
{
    CharEncoder {
        alphabet,
        iter: Flatten::new(BytesToUnflatSymbols {
            alphabet,
            iter: BaseIterator(bytes.into_iter().fuse()),
        }),
    }
}
