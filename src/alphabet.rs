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

//! Symbol sets and the predefined RFC 4648 alphabets.

use super::error::AlphabetError;
use super::MAX_SYMBOLS;

use tracing::debug;

const NOT_FOUND: u8 = 0xff;

/// An immutable base-16, base-32, or base-64 symbol set.
///
/// Besides the symbols themselves, an alphabet holds the inverse lookup
/// table used when decoding, the optional padding character, and the block
/// shape implied by its size:
///
/// | symbols | bits per symbol | bytes per block | symbols per block |
/// |---------|-----------------|-----------------|-------------------|
/// | 16      | 4               | 1               | 2                 |
/// | 32      | 5               | 5               | 8                 |
/// | 64      | 6               | 3               | 4                 |
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alphabet {
    symbols: [u8; MAX_SYMBOLS],
    len: u8,
    inverse: [u8; 128],
    padding: Option<u8>,
    bits: u8,
    encoding_block: u8,
    decoding_block: u8,
}

impl Alphabet {
    /// Creates an alphabet from 16, 32, or 64 distinct ASCII symbols and an
    /// optional ASCII padding character.
    pub fn new(
        symbols: &[u8],
        padding: Option<u8>,
    ) -> Result<Self, AlphabetError> {
        Self::build(symbols, padding, false).map_err(|e| {
            debug!(len = symbols.len(), error = %e, "rejected alphabet");
            e
        })
    }

    /// Like [`Self::new`], but decoding also accepts the opposite case of
    /// every letter symbol, as long as that letter is not itself a symbol
    /// or the padding character.
    pub fn new_case_insensitive(
        symbols: &[u8],
        padding: Option<u8>,
    ) -> Result<Self, AlphabetError> {
        Self::build(symbols, padding, true).map_err(|e| {
            debug!(len = symbols.len(), error = %e, "rejected alphabet");
            e
        })
    }

    const fn build(
        symbols: &[u8],
        padding: Option<u8>,
        fold_case: bool,
    ) -> Result<Self, AlphabetError> {
        let (bits, encoding_block, decoding_block) = match symbols.len() {
            16 => (4, 1, 2),
            32 => (5, 5, 8),
            64 => (6, 3, 4),
            n => return Err(AlphabetError::InvalidLength(n)),
        };
        if let Some(p) = padding {
            if p >= 128 {
                return Err(AlphabetError::NonAsciiPadding(p));
            }
        }

        let mut table = [0; MAX_SYMBOLS];
        let mut inverse = [NOT_FOUND; 128];
        let mut i = 0;
        while i < symbols.len() {
            let code = symbols[i];
            if code >= 128 {
                return Err(AlphabetError::NonAsciiSymbol {
                    index: i,
                    code,
                });
            }
            if let Some(p) = padding {
                if p == code {
                    return Err(AlphabetError::PaddingCollision {
                        index: i,
                    });
                }
            }
            if inverse[code as usize] != NOT_FOUND {
                return Err(AlphabetError::DuplicateSymbol {
                    index: i,
                    code,
                });
            }
            inverse[code as usize] = i as u8;
            table[i] = code;
            i += 1;
        }

        // Only fills slots no symbol claimed, so folding never shadows a
        // real symbol.
        let mut i = 0;
        while fold_case && i < symbols.len() {
            let code = symbols[i];
            let twin = if code.is_ascii_uppercase() {
                code.to_ascii_lowercase()
            } else {
                code.to_ascii_uppercase()
            };
            let is_padding = match padding {
                Some(p) => p == twin,
                None => false,
            };
            if twin != code && !is_padding && inverse[twin as usize] == NOT_FOUND
            {
                inverse[twin as usize] = i as u8;
            }
            i += 1;
        }

        Ok(Self {
            symbols: table,
            len: symbols.len() as u8,
            inverse,
            padding,
            bits,
            encoding_block,
            decoding_block,
        })
    }

    const fn predefined(
        symbols: &[u8],
        padding: Option<u8>,
        fold_case: bool,
    ) -> Self {
        match Self::build(symbols, padding, fold_case) {
            Ok(alphabet) => alphabet,
            Err(_) => panic!("invalid predefined alphabet"),
        }
    }

    /// The symbols, in value order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols[..usize::from(self.len)]
    }

    /// The padding character, if this alphabet pads its final block.
    pub const fn padding(&self) -> Option<u8> {
        self.padding
    }

    /// Whether the final block is padded out to a full block of symbols.
    pub const fn is_padded(&self) -> bool {
        self.padding.is_some()
    }

    /// Number of bits carried by one symbol (4, 5, or 6).
    pub const fn bits_per_symbol(&self) -> u32 {
        self.bits as u32
    }

    /// Number of raw bytes in one block.
    pub const fn encoding_block_size(&self) -> usize {
        self.encoding_block as usize
    }

    /// Number of symbols in one block.
    pub const fn decoding_block_size(&self) -> usize {
        self.decoding_block as usize
    }

    /// Looks up the value of a symbol code. Returns `None` for codes that
    /// are not in the alphabet, including the padding character and any
    /// code of 128 or above.
    pub fn value_of(&self, code: u32) -> Option<u8> {
        let value = *self.inverse.get(usize::try_from(code).ok()?)?;
        (value != NOT_FOUND).then_some(value)
    }

    /// The symbol for `value`. Only the low bits of `value` are used.
    pub(crate) fn symbol(&self, value: u64) -> u8 {
        self.symbols[(value as usize) & (usize::from(self.len) - 1)]
    }
}

/// Upper-case hexadecimal. Decoding accepts either case.
pub static BASE16_UPPER: Alphabet =
    Alphabet::predefined(b"0123456789ABCDEF", None, true);

/// Lower-case hexadecimal. Decoding accepts either case.
pub static BASE16_LOWER: Alphabet =
    Alphabet::predefined(b"0123456789abcdef", None, true);

/// RFC 4648 Base32 with `=` padding.
pub static BASE32: Alphabet = Alphabet::predefined(
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567",
    Some(b'='),
    false,
);

/// z-base-32. Never padded.
pub static ZBASE32: Alphabet = Alphabet::predefined(
    b"ybndrfg8ejkmcpqxot1uwisza345h769",
    None,
    false,
);

/// RFC 4648 Base64 with `=` padding.
pub static BASE64: Alphabet = Alphabet::predefined(
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/",
    Some(b'='),
    false,
);

/// RFC 4648 URL- and filename-safe Base64 (`-` and `_`) with `=` padding.
pub static BASE64_URL: Alphabet = Alphabet::predefined(
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_",
    Some(b'='),
    false,
);
