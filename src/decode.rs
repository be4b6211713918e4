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

//! Functions and types for decoding symbols back into bytes.
//!
//! Decoding is lenient: anything that is not a symbol of the alphabet,
//! including padding, line breaks, and non-ASCII units, is skipped. Callers
//! that need strict validation must check the input themselves.

use super::alphabet::Alphabet;
use super::block::{self, DecodePolicy, Progress};
use super::cursor::{window, window_mut};
use super::error::RangeError;
use super::iter::{BaseIterator, Flatten, InspectBaseIterator};
use super::unit::Unit;
use super::MAX_ENCODING_BLOCK;

use core::array;
use core::iter::{Fuse, FusedIterator, Take};
use tracing::trace;

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// Streaming decoder bound to an [`Alphabet`] and a [`DecodePolicy`].
///
/// Like [`Encoder`](crate::Encoder), a decoder keeps no state between
/// calls; unconsumed input must be presented again.
///
/// ```
/// use basen::{Decoder, BASE32};
///
/// let decoder = Decoder::new(&BASE32);
/// let mut out = [0_u8; 6];
/// let p = decoder.convert(b"MZXW6YTBOI======", &mut out, true);
/// assert!(p.completed);
/// assert_eq!(&out[..p.output_used], b"foobar");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Decoder<'a> {
    alphabet: &'a Alphabet,
    policy: DecodePolicy,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder with the incremental
    /// [`FlushGatedFinal`](DecodePolicy::FlushGatedFinal) policy.
    pub const fn new(alphabet: &'a Alphabet) -> Self {
        Self::with_policy(alphabet, DecodePolicy::FlushGatedFinal)
    }

    pub const fn with_policy(
        alphabet: &'a Alphabet,
        policy: DecodePolicy,
    ) -> Self {
        Self {
            alphabet,
            policy,
        }
    }

    pub const fn alphabet(&self) -> &'a Alphabet {
        self.alphabet
    }

    pub const fn policy(&self) -> DecodePolicy {
        self.policy
    }

    /// Decodes as much of `input` into `output` as fits.
    ///
    /// A block whose bytes don't fit in `output` is left unconsumed, as is
    /// a short final block that the policy holds back.
    pub fn convert<U: Unit>(
        &self,
        input: &[U],
        output: &mut [u8],
        flush: bool,
    ) -> Progress {
        let progress =
            block::decode(self.alphabet, input, output, flush, self.policy);
        trace!(
            bits = self.alphabet.bits_per_symbol(),
            policy = ?self.policy,
            input = input.len(),
            output = output.len(),
            flush,
            input_used = progress.input_used,
            output_used = progress.output_used,
            completed = progress.completed,
            "decode"
        );
        progress
    }

    /// Like [`Self::convert`], over `(offset, count)` windows of `input`
    /// and `output`. Both windows are checked before either buffer is
    /// touched.
    pub fn convert_at<U: Unit>(
        &self,
        input: &[U],
        input_window: (usize, usize),
        output: &mut [u8],
        output_window: (usize, usize),
        flush: bool,
    ) -> Result<Progress, RangeError> {
        let input = window(input, input_window.0, input_window.1)?;
        let output = window_mut(output, output_window.0, output_window.1)?;
        Ok(self.convert(input, output, flush))
    }

    /// Exact number of bytes that decoding all of `input` produces.
    pub fn output_len<U: Unit>(&self, input: &[U]) -> usize {
        self.alphabet.decoded_len(input)
    }

    /// Upper bound on the bytes decoded from `input_len` units.
    pub fn max_output_len(&self, input_len: usize) -> usize {
        self.alphabet.max_decoded_len(input_len)
    }
}

/// Decodes `symbols` into a newly allocated vector.
///
/// Uses the [`EagerFinal`](DecodePolicy::EagerFinal) policy. The result is
/// sized exactly with [`Alphabet::decoded_len`]. A lone trailing symbol,
/// which can't form a byte, is ignored.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec<U: Unit>(alphabet: &Alphabet, symbols: &[U]) -> Vec<u8> {
    let mut bytes = vec![0; alphabet.decoded_len(symbols)];
    let progress = block::decode(
        alphabet,
        symbols,
        &mut bytes,
        true,
        DecodePolicy::EagerFinal,
    );
    debug_assert_eq!(progress.output_used, bytes.len());
    bytes
}

struct UnitsToUnflatBytes<'a, I> {
    alphabet: &'a Alphabet,
    iter: I,
}

impl<I: InspectBaseIterator> InspectBaseIterator for UnitsToUnflatBytes<'_, I> {
    type Iter = I::Iter;

    fn base_iterator(&self) -> &Self::Iter {
        self.iter.base_iterator()
    }
}

type UnflatBytes = Take<array::IntoIter<u8, MAX_ENCODING_BLOCK>>;

impl<I> Iterator for UnitsToUnflatBytes<'_, I>
where
    I: FusedIterator,
    I::Item: Unit,
{
    type Item = UnflatBytes;

    fn next(&mut self) -> Option<Self::Item> {
        let alphabet = self.alphabet;
        let bits = alphabet.bits_per_symbol() as usize;
        let values = self.iter.by_ref().filter_map(|u| alphabet.value_of(u.code()));
        let mut accepted = 0;
        let acc = values.take(alphabet.decoding_block_size()).fold(0_u64, |acc, v| {
            accepted += 1;
            (acc << bits) | u64::from(v)
        });

        if accepted == 0 {
            return None;
        }

        let size = accepted * bits / 8;
        let acc = acc >> (accepted * bits % 8);
        let mut bytes = [0; MAX_ENCODING_BLOCK];
        bytes[..size].iter_mut().rev().zip(0_u32..).for_each(|(b, i)| {
            *b = (acc >> (i * 8)) as u8;
        });
        Some(IntoIterator::into_iter(bytes).take(size))
    }
}

impl<I> FusedIterator for UnitsToUnflatBytes<'_, I>
where
    I: FusedIterator,
    I::Item: Unit,
{
}

/// Iterator returned by [`decode_units`].
pub struct ByteDecoder<'a, I> {
    alphabet: &'a Alphabet,
    iter: Flatten<UnitsToUnflatBytes<'a, BaseIterator<Fuse<I>>>, UnflatBytes>,
}

impl<I> Iterator for ByteDecoder<'_, I>
where
    I: Iterator,
    I::Item: Unit,
{
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn fold<B, F>(self, init: B, f: F) -> B
    where
        F: FnMut(B, Self::Item) -> B,
    {
        self.iter.fold(init, f)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.iter.base_iterator().size_hint();
        let pending = self.iter.pending();
        (
            // Every remaining unit could be noise.
            pending,
            upper.and_then(|n| {
                self.alphabet.max_decoded_len(n).checked_add(pending)
            }),
        )
    }
}

impl<I> FusedIterator for ByteDecoder<'_, I>
where
    I: Iterator,
    I::Item: Unit,
{
}

/// Lazily decodes a sequence of symbol units.
///
/// The end of `symbols` acts as the flush, so a short final block is
/// decoded. Units outside the alphabet are skipped.
pub fn decode_units<I>(alphabet: &Alphabet, symbols: I) -> ByteDecoder<'_, I::IntoIter>
where
    I: IntoIterator,
    I::Item: Unit,
{
    ByteDecoder {
        alphabet,
        iter: Flatten::new(UnitsToUnflatBytes {
            alphabet,
            iter: BaseIterator(symbols.into_iter().fuse()),
        }),
    }
}
