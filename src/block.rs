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

//! The bit-packing engine shared by every alphabet.
//!
//! A block is `encoding_block_size` bytes on one side and
//! `decoding_block_size` symbols on the other. Whole blocks are packed into
//! a big-endian `u64` accumulator (the widest block, Base32's, is 40 bits)
//! and unpacked a symbol or a byte at a time, most significant first.
//!
//! Neither direction keeps state between calls. When a block can't be
//! finished (not enough output space, or a short final block without
//! `flush`), the input it consumed is given back and the caller presents it
//! again on the next call.

use super::alphabet::Alphabet;
use super::cursor::{Reader, Writer};
use super::unit::Unit;

/// The outcome of one conversion call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Progress {
    /// Number of input units consumed. The caller resumes from here.
    pub input_used: usize,
    /// Number of output units written.
    pub output_used: usize,
    /// Whether all of the input was consumed.
    pub completed: bool,
}

/// How a decoder treats a final block with fewer symbols than a full block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum DecodePolicy {
    /// A short block is decoded only when `flush` is set; otherwise it is
    /// held back until more input arrives. Safe for incremental decoding:
    /// calling repeatedly without `flush` never drops or misaligns data.
    #[default]
    FlushGatedFinal,
    /// A short block is decoded as soon as it yields at least one byte,
    /// regardless of `flush`. A block that yields no bytes (a lone trailing
    /// symbol) is left unconsumed. Meant for decoding a complete buffer in
    /// one call.
    EagerFinal,
}

fn read_be(reader: &mut Reader<'_, u8>, n: usize) -> u64 {
    (0..n).fold(0, |acc, _| (acc << 8) | u64::from(reader.read()))
}

fn write_symbols<U: Unit>(
    alphabet: &Alphabet,
    writer: &mut Writer<'_, U>,
    acc: u64,
    count: usize,
) {
    let bits = alphabet.bits_per_symbol();
    (0..count as u32).rev().for_each(|i| {
        writer.write(U::from_symbol(alphabet.symbol(acc >> (i * bits))));
    });
}

/// Encodes `input` into `output`.
///
/// Whole blocks are always written when they fit. The final partial block
/// (fewer than `encoding_block_size` bytes) is written only when `flush` is
/// set and all of its symbols, padding included, fit in `output`.
pub(crate) fn encode<U: Unit>(
    alphabet: &Alphabet,
    input: &[u8],
    output: &mut [U],
    flush: bool,
) -> Progress {
    let mut reader = Reader::new(input);
    let mut writer = Writer::new(output);
    let bytes_per_block = alphabet.encoding_block_size();
    let symbols_per_block = alphabet.decoding_block_size();

    let blocks = (reader.remaining() / bytes_per_block)
        .min(writer.remaining() / symbols_per_block);
    for _ in 0..blocks {
        let acc = read_be(&mut reader, bytes_per_block);
        write_symbols(alphabet, &mut writer, acc, symbols_per_block);
    }

    // If the loop stopped for lack of output space, `n` is a full block and
    // can't fit either, so it is rolled back below.
    let n = reader.remaining().min(bytes_per_block);
    if n > 0 {
        let mark = reader.position();
        let bits = alphabet.bits_per_symbol() as usize;
        let input_bits = n * 8;
        let count = input_bits.div_ceil(bits);
        let acc = read_be(&mut reader, n) << (count * bits - input_bits);
        let total = match alphabet.padding() {
            Some(_) => symbols_per_block,
            None => count,
        };

        if flush && total <= writer.remaining() {
            write_symbols(alphabet, &mut writer, acc, count);
            if let Some(pad) = alphabet.padding() {
                (count..total).for_each(|_| writer.write(U::from_symbol(pad)));
            }
        } else {
            reader.rewind_to(mark);
        }
    }

    Progress {
        input_used: reader.position(),
        output_used: writer.position(),
        completed: reader.remaining() == 0,
    }
}

/// Decodes `input` into `output`.
///
/// Units that are not symbols of the alphabet (padding, whitespace, any
/// code of 128 or above) are consumed and ignored. Trailing units that are
/// all ignorable are consumed even when `output` is full.
pub(crate) fn decode<U: Unit>(
    alphabet: &Alphabet,
    input: &[U],
    output: &mut [u8],
    flush: bool,
    policy: DecodePolicy,
) -> Progress {
    let mut reader = Reader::new(input);
    let mut writer = Writer::new(output);
    let bits = alphabet.bits_per_symbol() as usize;
    let symbols_per_block = alphabet.decoding_block_size();

    while reader.remaining() > 0 {
        let mark = reader.position();
        let mut acc = 0_u64;
        let mut accepted = 0;
        while accepted < symbols_per_block && reader.remaining() > 0 {
            if let Some(value) = alphabet.value_of(reader.read().code()) {
                acc = (acc << bits) | u64::from(value);
                accepted += 1;
            }
        }

        // Only ignorable units were left, and they're all consumed now.
        if accepted == 0 {
            break;
        }

        let input_bits = accepted * bits;
        let size = input_bits / 8;
        let hold = match policy {
            DecodePolicy::EagerFinal => size == 0,
            DecodePolicy::FlushGatedFinal => {
                accepted != symbols_per_block && !flush
            }
        };
        if hold || size > writer.remaining() {
            reader.rewind_to(mark);
            break;
        }

        let acc = acc >> (input_bits % 8);
        (0..size as u32).rev().for_each(|i| {
            writer.write((acc >> (i * 8)) as u8);
        });
    }

    Progress {
        input_used: reader.position(),
        output_used: writer.position(),
        completed: reader.remaining() == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::{BASE16_LOWER, BASE32, BASE64, ZBASE32};

    fn progress(input_used: usize, output_used: usize, completed: bool) -> Progress {
        Progress {
            input_used,
            output_used,
            completed,
        }
    }

    #[test]
    fn encode_whole_blocks() {
        let mut out = [0_u8; 8];
        let p = encode(&BASE64, b"foobar", &mut out, false);
        assert_eq!(p, progress(6, 8, true));
        assert_eq!(&out, b"Zm9vYmFy");
    }

    #[test]
    fn encode_holds_partial_block_without_flush() {
        let mut out = [0_u8; 8];
        let p = encode(&BASE64, b"fooba", &mut out, false);
        assert_eq!(p, progress(3, 4, false));
        assert_eq!(&out[..4], b"Zm9v");

        let p = encode(&BASE64, b"ba", &mut out, true);
        assert_eq!(p, progress(2, 4, true));
        assert_eq!(&out[..4], b"YmE=");
    }

    #[test]
    fn encode_rolls_back_when_padding_does_not_fit() {
        let mut out = [0_u8; 3];
        let p = encode(&BASE64, b"z", &mut out, true);
        assert_eq!(p, progress(0, 0, false));

        let mut out = [0_u8; 4];
        let p = encode(&BASE64, b"z", &mut out, true);
        assert_eq!(p, progress(1, 4, true));
        assert_eq!(&out, b"eg==");
    }

    #[test]
    fn encode_unpadded_partial_block() {
        let mut out = ['\0'; 2];
        let p = encode(&ZBASE32, &[112], &mut out, true);
        assert_eq!(p, progress(1, 2, true));
        assert_eq!(out, ['q', 'y']);

        // One symbol short of the two needed.
        let p = encode(&ZBASE32, &[112], &mut out[..1], true);
        assert_eq!(p, progress(0, 0, false));
    }

    #[test]
    fn encode_stops_at_output_boundary() {
        let mut out = [0_u16; 10];
        let p = encode(&BASE32, &[0; 12], &mut out, true);
        // One whole block fits; the second block needs 8 more symbols.
        assert_eq!(p, progress(5, 8, false));
    }

    #[test]
    fn encode_empty() {
        let mut out = [0_u8; 0];
        assert_eq!(encode(&BASE32, &[], &mut out, true), progress(0, 0, true));
    }

    #[test]
    fn decode_skips_noise() {
        let mut out = [0_u8; 6];
        let p = decode(
            &BASE64,
            b"Zm9v\r\nYm\xffFy",
            &mut out,
            false,
            DecodePolicy::FlushGatedFinal,
        );
        assert_eq!(p, progress(11, 6, true));
        assert_eq!(&out, b"foobar");
    }

    #[test]
    fn decode_flush_gated_holds_short_block() {
        let mut out = [0_u8; 8];
        let input = b"Zm9vYmE";
        let p = decode(
            &BASE64,
            input,
            &mut out,
            false,
            DecodePolicy::FlushGatedFinal,
        );
        assert_eq!(p, progress(4, 3, false));

        let p = decode(
            &BASE64,
            &input[4..],
            &mut out[3..],
            true,
            DecodePolicy::FlushGatedFinal,
        );
        assert_eq!(p, progress(3, 2, true));
        assert_eq!(&out[..5], b"fooba");
    }

    #[test]
    fn decode_eager_emits_short_block() {
        let mut out = [0_u8; 8];
        let p =
            decode(&BASE64, b"Zm9vYmE", &mut out, false, DecodePolicy::EagerFinal);
        assert_eq!(p, progress(7, 5, true));
        assert_eq!(&out[..5], b"fooba");
    }

    #[test]
    fn decode_lone_trailing_symbol() {
        let mut out = [0_u8; 8];
        let p = decode(&BASE64, b"Zm9vY", &mut out, true, DecodePolicy::EagerFinal);
        assert_eq!(p, progress(4, 3, false));

        let p = decode(
            &BASE64,
            b"Zm9vY",
            &mut out,
            true,
            DecodePolicy::FlushGatedFinal,
        );
        assert_eq!(p, progress(5, 3, true));
    }

    #[test]
    fn decode_rolls_back_when_output_is_full() {
        let mut out = [0_u8; 4];
        let p = decode(
            &BASE64,
            b"Zm9vYmFy",
            &mut out,
            true,
            DecodePolicy::FlushGatedFinal,
        );
        assert_eq!(p, progress(4, 3, false));
        assert_eq!(&out[..3], b"foo");
    }

    #[test]
    fn decode_consumes_trailing_noise_with_full_output() {
        let mut out = [0_u8; 3];
        let p = decode(
            &BASE64,
            b"Zm9v\n",
            &mut out,
            false,
            DecodePolicy::FlushGatedFinal,
        );
        assert_eq!(p, progress(5, 3, true));
    }

    #[test]
    fn decode_hex_either_case() {
        let mut out = [0_u8; 2];
        let p = decode(
            &BASE16_LOWER,
            &['9', 'C', 'a', 'b'],
            &mut out,
            true,
            DecodePolicy::FlushGatedFinal,
        );
        assert_eq!(p, progress(4, 2, true));
        assert_eq!(out, [0x9c, 0xab]);
    }
}
