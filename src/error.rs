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

//! Error types.
//!
//! Malformed input is never an error when decoding: characters outside the
//! alphabet are skipped. The only failures are a bad [`Alphabet`] and
//! out-of-bounds buffer windows.
//!
//! [`Alphabet`]: crate::Alphabet

use thiserror::Error;

/// An error encountered while constructing an [`Alphabet`](crate::Alphabet).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum AlphabetError {
    /// The alphabet did not contain exactly 16, 32, or 64 symbols.
    #[error("alphabet must have 16, 32, or 64 symbols, not {0}")]
    InvalidLength(usize),

    /// A symbol was not a 7-bit ASCII character.
    #[error("symbol {code:#04x} at index {index} is not ASCII")]
    NonAsciiSymbol {
        /// Position of the symbol in the alphabet.
        index: usize,
        /// The offending byte.
        code: u8,
    },

    /// A symbol appeared more than once.
    #[error("symbol {code:#04x} at index {index} is a duplicate")]
    DuplicateSymbol {
        /// Position of the second occurrence.
        index: usize,
        /// The repeated byte.
        code: u8,
    },

    /// The padding character was not a 7-bit ASCII character.
    #[error("padding {0:#04x} is not ASCII")]
    NonAsciiPadding(u8),

    /// The padding character is also one of the symbols.
    #[error("padding collides with the symbol at index {index}")]
    PaddingCollision {
        /// Position of the symbol equal to the padding.
        index: usize,
    },
}

/// An `(offset, count)` window that does not fit inside its buffer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("window of {count} units at offset {offset} exceeds buffer of {len}")]
pub struct RangeError {
    /// Requested start of the window.
    pub offset: usize,
    /// Requested length of the window.
    pub count: usize,
    /// Actual length of the buffer.
    pub len: usize,
}
