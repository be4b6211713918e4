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

/// A single element of an encoded symbol buffer.
///
/// Symbols are plain integer codes; an implementation only has to say how
/// to read a code out of a unit and how to build a unit from an ASCII byte.
/// This lets the same engine write into `&mut [u8]`, `&mut [u16]`, or
/// `&mut [char]` without copying.
pub trait Unit: Copy {
    /// The integer code of this unit. Codes of 128 and above never belong
    /// to an alphabet.
    fn code(self) -> u32;

    /// Builds a unit from an ASCII byte (always less than 128).
    fn from_symbol(byte: u8) -> Self;
}

impl Unit for u8 {
    fn code(self) -> u32 {
        u32::from(self)
    }

    fn from_symbol(byte: u8) -> Self {
        debug_assert!(byte.is_ascii());
        byte
    }
}

impl Unit for u16 {
    fn code(self) -> u32 {
        u32::from(self)
    }

    fn from_symbol(byte: u8) -> Self {
        debug_assert!(byte.is_ascii());
        u16::from(byte)
    }
}

impl Unit for char {
    fn code(self) -> u32 {
        u32::from(self)
    }

    fn from_symbol(byte: u8) -> Self {
        debug_assert!(byte.is_ascii());
        char::from(byte)
    }
}
