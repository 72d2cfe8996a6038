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

pub mod map;
pub mod passage;

use crate::tile::TileId;

pub const TILE_SIZE: u32 = 48;
pub const LAYER_COUNT: usize = 4;

/// Something placed on the map that may occupy a tile, like a door or a
/// signboard drawn from the tileset.
pub trait MapEvent {
    /// Tile drawn for this event, `0` when it is drawn from a character sheet.
    fn tile_id(&self) -> TileId;

    /// Whether the event stands at `(x, y)` and is not passing through.
    fn pos_nt(&self, x: i32, y: i32) -> bool;
}

/// Read-only view of the loaded map.
pub trait MapData {
    type Event: MapEvent;

    /// Flag bitmask per tile id.
    fn tileset_flags(&self) -> &[u32];

    /// Tiles stacked at `(x, y)`, topmost layer first.
    fn layered_tiles(&self, x: i32, y: i32) -> Vec<TileId>;

    fn events(&self) -> &[Self::Event];
}
