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

//! Exact output sizes, for pre-allocating buffers.

use super::alphabet::Alphabet;
use super::cursor::window;
use super::error::RangeError;
use super::unit::Unit;

impl Alphabet {
    /// Number of symbols produced by encoding `byte_count` bytes with
    /// `flush` set, padding included. Returns `None` on overflow.
    pub fn encoded_len(&self, byte_count: usize) -> Option<usize> {
        let bytes_per_block = self.encoding_block_size();
        let symbols_per_block = self.decoding_block_size();
        let whole = (byte_count / bytes_per_block).checked_mul(symbols_per_block)?;
        let partial = match (byte_count % bytes_per_block) * 8 {
            0 => 0,
            _ if self.is_padded() => symbols_per_block,
            bits => bits.div_ceil(self.bits_per_symbol() as usize),
        };
        whole.checked_add(partial)
    }

    /// Number of bytes produced by decoding `symbols`. Units outside the
    /// alphabet, padding included, are not counted.
    pub fn decoded_len<U: Unit>(&self, symbols: &[U]) -> usize {
        let valid = symbols
            .iter()
            .filter(|s| self.value_of(s.code()).is_some())
            .count();
        self.bytes_for_symbols(valid)
    }

    /// Like [`Self::decoded_len`], over the `count` units of `symbols`
    /// starting at `offset`.
    pub fn decoded_len_at<U: Unit>(
        &self,
        symbols: &[U],
        offset: usize,
        count: usize,
    ) -> Result<usize, RangeError> {
        window(symbols, offset, count).map(|s| self.decoded_len(s))
    }

    /// Upper bound on the bytes decoded from `symbol_count` units, without
    /// looking at them.
    pub fn max_decoded_len(&self, symbol_count: usize) -> usize {
        self.bytes_for_symbols(symbol_count)
    }

    /// Largest number of input bytes whose whole blocks fit in
    /// `symbol_count` symbols.
    pub fn max_encodable_len(&self, symbol_count: usize) -> usize {
        // A block never has more bytes than symbols, so this can't overflow.
        symbol_count / self.decoding_block_size() * self.encoding_block_size()
    }

    // floor(n * bits / 8), without forming `n * bits`.
    fn bytes_for_symbols(&self, n: usize) -> usize {
        let bits = self.bits_per_symbol() as usize;
        n / 8 * bits + n % 8 * bits / 8
    }
}

#[cfg(test)]
mod tests {
    use crate::alphabet::*;

    #[test]
    fn encoded_lengths() {
        let lens = |a: &Alphabet| {
            (0..=6).map(|n| a.encoded_len(n).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(lens(&BASE16_UPPER), [0, 2, 4, 6, 8, 10, 12]);
        assert_eq!(lens(&BASE32), [0, 8, 8, 8, 8, 8, 16]);
        assert_eq!(lens(&ZBASE32), [0, 2, 4, 5, 7, 8, 10]);
        assert_eq!(lens(&BASE64), [0, 4, 4, 4, 8, 8, 8]);
    }

    #[test]
    fn encoded_len_overflow() {
        assert_eq!(BASE16_LOWER.encoded_len(usize::MAX), None);
        assert_eq!(BASE64.encoded_len(usize::MAX), None);
        assert!(BASE64.encoded_len(usize::MAX / 2).is_some());
    }

    #[test]
    fn decoded_lengths() {
        assert_eq!(BASE64.decoded_len(b"Zm9vYmE="), 5);
        assert_eq!(BASE64.decoded_len(b"Zm9v YmE=\n"), 5);
        assert_eq!(BASE64.decoded_len(&['e', 'g', '=', '=']), 1);
        assert_eq!(BASE32.decoded_len(b"6Q======"), 1);
        assert_eq!(ZBASE32.decoded_len(b"qy"), 1);
        assert_eq!(BASE16_UPPER.decoded_len(b"9c9C"), 2);
        assert_eq!(BASE64.decoded_len::<u8>(&[]), 0);
    }

    #[test]
    fn decoded_len_window() {
        let s = b"xxZm9vxx";
        assert_eq!(BASE64.decoded_len_at(s, 2, 4), Ok(3));
        assert!(BASE64.decoded_len_at(s, 6, 3).is_err());
    }

    #[test]
    fn max_lengths() {
        assert_eq!(BASE64.max_decoded_len(usize::MAX), usize::MAX / 8 * 6 + 5);
        assert_eq!(BASE64.max_encodable_len(11), 6);
        assert_eq!(BASE32.max_encodable_len(16), 10);
        assert_eq!(BASE16_UPPER.max_encodable_len(5), 2);
    }
}
