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

use crate::maps::{LAYER_COUNT, MapData, MapEvent};
use crate::position::{Direction, TilePosition};
use crate::tile::{EMPTY_TILE, TileId};

/// An event placed on a [`GameMap`]. Drawn either from the tileset
/// (`tile_id > 0`) or from a character sheet.
#[derive(Clone, Debug)]
pub struct MapObject {
    pub position: TilePosition,
    pub tile_id: TileId,
    pub through: bool,
    pub character_name: String,
    pub character_index: u32,
    pub direction: Direction,
    pub pattern: u32,
}

impl MapObject {
    pub fn tile(position: TilePosition, tile_id: TileId) -> Self {
        Self {
            position,
            tile_id,
            through: false,
            character_name: String::new(),
            character_index: 0,
            direction: Direction::Down,
            pattern: 1,
        }
    }

    pub fn character(position: TilePosition, name: &str, index: u32) -> Self {
        Self {
            position,
            tile_id: EMPTY_TILE,
            through: false,
            character_name: name.to_string(),
            character_index: index,
            direction: Direction::Down,
            pattern: 1,
        }
    }

    pub fn with_through(mut self, through: bool) -> Self {
        self.through = through;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

impl MapEvent for MapObject {
    fn tile_id(&self) -> TileId {
        self.tile_id
    }

    fn pos_nt(&self, x: i32, y: i32) -> bool {
        self.position.x == x && self.position.y == y && !self.through
    }
}

/// In-memory map: `LAYER_COUNT` upper layers of tile ids, a tileset flag
/// table and a list of events.
#[derive(Clone, Debug)]
pub struct GameMap {
    width: i32,
    height: i32,
    layers: Vec<TileId>,
    flags: Vec<u32>,
    pub objects: Vec<MapObject>,
}

impl GameMap {
    pub fn new(width: i32, height: i32, flags: Vec<u32>) -> Self {
        let cells = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            layers: vec![EMPTY_TILE; cells * LAYER_COUNT],
            flags,
            objects: Vec::new(),
        }
    }

    fn index(&self, x: i32, y: i32, z: usize) -> Option<usize> {
        if !TilePosition::new(x, y).is_valid(self.width, self.height) || z >= LAYER_COUNT {
            return None;
        }
        Some((z * self.height as usize + y as usize) * self.width as usize + x as usize)
    }

    pub fn tile_id(&self, x: i32, y: i32, z: usize) -> TileId {
        self.index(x, y, z).map(|i| self.layers[i]).unwrap_or(EMPTY_TILE)
    }

    pub fn set_tile(&mut self, x: i32, y: i32, z: usize, id: TileId) {
        if let Some(i) = self.index(x, y, z) {
            self.layers[i] = id;
        }
    }

    pub fn add_event(&mut self, object: MapObject) {
        self.objects.push(object);
    }

    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        TilePosition::new(x, y).is_valid(self.width, self.height)
            && !self.objects.iter().any(|o| o.pos_nt(x, y))
    }
}

impl MapData for GameMap {
    type Event = MapObject;

    fn tileset_flags(&self) -> &[u32] {
        &self.flags
    }

    fn layered_tiles(&self, x: i32, y: i32) -> Vec<TileId> {
        if !TilePosition::new(x, y).is_valid(self.width, self.height) {
            return Vec::new();
        }
        (0..LAYER_COUNT).rev().map(|z| self.tile_id(x, y, z)).collect()
    }

    fn events(&self) -> &[MapObject] {
        &self.objects
    }
}
