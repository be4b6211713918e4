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

use super::error::RangeError;

/// Read position over a caller-supplied slice.
///
/// The block core only ever moves forward, except to give back the units of
/// a block it decided not to finish (see [`Self::rewind_to`]).
pub(crate) struct Reader<'a, T> {
    buf: &'a [T],
    pos: usize,
}

impl<'a, T: Copy> Reader<'a, T> {
    pub fn new(buf: &'a [T]) -> Self {
        Self {
            buf,
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns the next unit. Callers check [`Self::remaining`] first.
    pub fn read(&mut self) -> T {
        let item = self.buf[self.pos];
        self.pos += 1;
        item
    }

    /// Un-reads everything after `pos`.
    pub fn rewind_to(&mut self, pos: usize) {
        debug_assert!(pos <= self.pos);
        self.pos = pos;
    }
}

/// Write position over a caller-supplied slice.
pub(crate) struct Writer<'a, T> {
    buf: &'a mut [T],
    pos: usize,
}

impl<'a, T> Writer<'a, T> {
    pub fn new(buf: &'a mut [T]) -> Self {
        Self {
            buf,
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Stores one unit. Callers check [`Self::remaining`] first.
    pub fn write(&mut self, item: T) {
        self.buf[self.pos] = item;
        self.pos += 1;
    }
}

fn check_window(
    offset: usize,
    count: usize,
    len: usize,
) -> Result<core::ops::Range<usize>, RangeError> {
    offset
        .checked_add(count)
        .filter(|&end| end <= len)
        .map(|end| offset..end)
        .ok_or(RangeError {
            offset,
            count,
            len,
        })
}

/// Borrows `count` units of `buf` starting at `offset`, or fails without
/// touching the buffer if the window does not fit.
pub fn window<T>(
    buf: &[T],
    offset: usize,
    count: usize,
) -> Result<&[T], RangeError> {
    check_window(offset, count, buf.len()).map(|range| &buf[range])
}

/// Mutable counterpart of [`window`].
pub fn window_mut<T>(
    buf: &mut [T],
    offset: usize,
    count: usize,
) -> Result<&mut [T], RangeError> {
    check_window(offset, count, buf.len()).map(move |range| &mut buf[range])
}
