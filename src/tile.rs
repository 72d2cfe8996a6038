// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use bitflags::bitflags;

use crate::error::ConfigError;

/// Tile identifier inside a tileset layout. `0` is the empty tile.
pub type TileId = u32;

pub const EMPTY_TILE: TileId = 0;

bitflags! {
    /// Per-tile flags from the tileset metadata table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TileFlags: u32 {
        const IMPASSABLE_DOWN  = 0x0001;
        const IMPASSABLE_LEFT  = 0x0002;
        const IMPASSABLE_RIGHT = 0x0004;
        const IMPASSABLE_UP    = 0x0008;
        /// Drawn above characters; a character may stand behind it.
        const PASSABLE_BEHIND  = 0x0010;
        const LADDER           = 0x0020;
        const BUSH             = 0x0040;
        const COUNTER          = 0x0080;
        const DAMAGE_FLOOR     = 0x0100;
        const TERRAIN_TAG      = 0xF000;
    }
}

impl TileFlags {
    /// Flags for `id` in a tileset flag table. Ids past the end of the table
    /// have no flags.
    pub fn lookup(table: &[u32], id: TileId) -> Self {
        table
            .get(id as usize)
            .map(|&bits| TileFlags::from_bits_retain(bits))
            .unwrap_or(TileFlags::empty())
    }
}

/// Where a tile id lives inside the tileset sheets.
///
/// Upper-layer tiles are split into sets of `ids_per_set` ids, one sheet per
/// set, after `reserved_sets` sheets used by other tile categories. A sheet is
/// two blocks of `block_columns` x `block_rows` tiles side by side, and each
/// block holds `ids_per_set / 2` ids.
///
/// Only constructed through [`TileEncoding::new`] or `Default`, so the
/// divisors below are never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileEncoding {
    reserved_sets: usize,
    ids_per_set: u32,
    block_columns: u32,
    block_rows: u32,
}

impl Default for TileEncoding {
    fn default() -> Self {
        Self {
            reserved_sets: 5,
            ids_per_set: 256,
            block_columns: 8,
            block_rows: 16,
        }
    }
}

impl TileEncoding {
    /// `ids_per_set` must be even and at least 2; the block must not be empty.
    pub fn new(
        reserved_sets: usize,
        ids_per_set: u32,
        block_columns: u32,
        block_rows: u32,
    ) -> Result<Self, ConfigError> {
        if ids_per_set < 2 || ids_per_set % 2 != 0 || block_columns == 0 || block_rows == 0 {
            return Err(ConfigError::InvalidEncoding);
        }
        Ok(Self {
            reserved_sets,
            ids_per_set,
            block_columns,
            block_rows,
        })
    }

    pub fn reserved_sets(&self) -> usize {
        self.reserved_sets
    }

    pub fn ids_per_set(&self) -> u32 {
        self.ids_per_set
    }

    pub fn block_columns(&self) -> u32 {
        self.block_columns
    }

    pub fn block_rows(&self) -> u32 {
        self.block_rows
    }

    pub fn ids_per_block(&self) -> u32 {
        self.ids_per_set / 2
    }

    /// Index of the tileset sheet holding `id`.
    pub fn set_number(&self, id: TileId) -> usize {
        self.reserved_sets.saturating_add((id / self.ids_per_set) as usize)
    }

    /// Column and row of `id` inside its sheet, in tiles.
    pub fn cell(&self, id: TileId) -> (u32, u32) {
        let column = (id / self.ids_per_block()) % 2 * self.block_columns + id % self.block_columns;
        let row = (id % self.ids_per_set / self.block_columns) % self.block_rows;
        (column, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_past_table_end_is_empty() {
        let table = [0, 0x10];
        assert!(TileFlags::lookup(&table, 1).contains(TileFlags::PASSABLE_BEHIND));
        assert_eq!(TileFlags::lookup(&table, 40), TileFlags::empty());
    }

    #[test]
    fn test_lookup_keeps_unknown_bits() {
        let table = [0x0210];
        let flags = TileFlags::lookup(&table, 0);
        assert!(flags.contains(TileFlags::PASSABLE_BEHIND));
        assert_eq!(flags.bits(), 0x0210);
    }

    #[test]
    fn test_encoding_rejects_zero_divisors() {
        for (ids, columns, rows) in [(0, 8, 16), (1, 8, 16), (255, 8, 16), (256, 0, 16), (256, 8, 0)] {
            assert!(
                matches!(TileEncoding::new(5, ids, columns, rows), Err(ConfigError::InvalidEncoding)),
                "{ids}/{columns}/{rows} should be rejected"
            );
        }
        assert_eq!(TileEncoding::new(5, 256, 8, 16).unwrap(), TileEncoding::default());
    }

    #[test]
    fn test_custom_encoding_cells() {
        let encoding = TileEncoding::new(2, 64, 4, 8).unwrap();
        assert_eq!(encoding.set_number(63), 2);
        assert_eq!(encoding.set_number(64), 3);
        // second block starts at id 32
        assert_eq!(encoding.cell(33), (5, 0));
        assert_eq!(encoding.cell(70), (2, 1));
    }

    #[test]
    fn test_default_encoding_sets() {
        let encoding = TileEncoding::default();
        assert_eq!(encoding.set_number(5), 5);
        assert_eq!(encoding.set_number(255), 5);
        assert_eq!(encoding.set_number(256), 6);
        assert_eq!(encoding.set_number(1023), 8);
    }

    #[test]
    fn test_default_encoding_cells() {
        let encoding = TileEncoding::default();
        assert_eq!(encoding.cell(0), (0, 0));
        assert_eq!(encoding.cell(5), (5, 0));
        assert_eq!(encoding.cell(9), (1, 1));
        // second block starts at id 128, right half of the sheet
        assert_eq!(encoding.cell(128), (8, 0));
        assert_eq!(encoding.cell(135), (15, 0));
        assert_eq!(encoding.cell(255), (15, 15));
        // next set wraps back to the top left
        assert_eq!(encoding.cell(256), (0, 0));
        assert_eq!(encoding.cell(300), (4, 5));
    }
}
