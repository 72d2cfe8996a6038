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

use std::collections::HashMap;

use macroquad::texture::{Image, load_image};
use tracing::debug;

use crate::error::SheetError;
use crate::graphics::surface::PixelRect;
use crate::position::Direction;
use crate::tile::{TileEncoding, TileId};

/// Sheets the silhouette pass reads from. Anything not yet loaded answers
/// `None` and is skipped for the frame.
pub trait SheetSource {
    /// Tileset sheet number `set`.
    fn tileset_sheet(&self, set: usize) -> Option<&Image>;

    fn character_sheet(&self, name: &str) -> Option<&Image>;

    fn is_big_character(&self, name: &str) -> bool {
        is_big_character_name(name)
    }
}

/// Big sheets hold a single character and are marked with a `$` in the
/// leading run of `!`/`$` characters of their name.
pub fn is_big_character_name(name: &str) -> bool {
    name.chars()
        .take_while(|c| matches!(c, '!' | '$'))
        .any(|c| c == '$')
}

/// Tile grid of a character sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    /// One character: 3 patterns x 4 directions.
    Big,
    /// Eight characters, four per row, each a 3 x 4 block.
    Small,
}

impl SheetLayout {
    pub fn of(big: bool) -> Self {
        if big { SheetLayout::Big } else { SheetLayout::Small }
    }

    pub fn grid(self) -> (u32, u32) {
        match self {
            SheetLayout::Big => (3, 4),
            SheetLayout::Small => (12, 8),
        }
    }

    /// Size of one frame on a `sheet_w` x `sheet_h` sheet.
    pub fn frame_size(self, sheet_w: u32, sheet_h: u32) -> (u32, u32) {
        let (columns, rows) = self.grid();
        (sheet_w / columns, sheet_h / rows)
    }

    /// Frame column and row for character `index` facing `direction` at
    /// walk `pattern`. `index` is ignored on big sheets.
    pub fn cell(self, index: u32, pattern: u32, direction: Direction) -> (u32, u32) {
        let n = match self {
            SheetLayout::Big => 0,
            SheetLayout::Small => index,
        };
        (n % 4 * 3 + pattern, n / 4 * 4 + direction.sheet_row())
    }

    pub fn source_rect(self, sheet_w: u32, sheet_h: u32, index: u32, pattern: u32, direction: Direction) -> PixelRect {
        let (w, h) = self.frame_size(sheet_w, sheet_h);
        let (column, row) = self.cell(index, pattern, direction);
        PixelRect::new((column * w) as i32, (row * h) as i32, w, h)
    }
}

/// Sheet number and source rectangle of `id` on the tileset sheets.
pub fn tile_source(encoding: &TileEncoding, id: TileId, tile_w: u32, tile_h: u32) -> (usize, PixelRect) {
    let (column, row) = encoding.cell(id);
    let rect = PixelRect::new((column * tile_w) as i32, (row * tile_h) as i32, tile_w, tile_h);
    (encoding.set_number(id), rect)
}

/// Sheets kept in memory, keyed by tileset number and character name.
#[derive(Default)]
pub struct SheetCache {
    tilesets: HashMap<usize, Image>,
    characters: HashMap<String, Image>,
}

impl SheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tileset(&mut self, set: usize, image: Image) {
        self.tilesets.insert(set, image);
    }

    pub fn insert_character(&mut self, name: &str, image: Image) {
        self.characters.insert(name.to_string(), image);
    }

    pub async fn load_tileset(&mut self, set: usize, path: &str) -> Result<(), SheetError> {
        let image = load_image(path).await.map_err(|e| SheetError::Load {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        debug!(set, path, width = image.width, height = image.height, "tileset sheet loaded");
        self.insert_tileset(set, image);
        Ok(())
    }

    pub async fn load_character(&mut self, name: &str, path: &str) -> Result<(), SheetError> {
        let image = load_image(path).await.map_err(|e| SheetError::Load {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let layout = SheetLayout::of(is_big_character_name(name));
        let (columns, rows) = layout.grid();
        if image.width as u32 % columns != 0 || image.height as u32 % rows != 0 {
            return Err(SheetError::UnevenGrid {
                name: name.to_string(),
                width: image.width as u32,
                height: image.height as u32,
                columns,
                rows,
            });
        }
        debug!(name, path, width = image.width, height = image.height, "character sheet loaded");
        self.insert_character(name, image);
        Ok(())
    }
}

impl SheetSource for SheetCache {
    fn tileset_sheet(&self, set: usize) -> Option<&Image> {
        self.tilesets.get(&set)
    }

    fn character_sheet(&self, name: &str) -> Option<&Image> {
        self.characters.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::surface::Surface;

    #[test]
    fn test_big_character_names() {
        assert!(is_big_character_name("$BigMonster"));
        assert!(is_big_character_name("!$Door"));
        assert!(is_big_character_name("$!Gate"));
        assert!(!is_big_character_name("!Chest"));
        assert!(!is_big_character_name("Actor1"));
        assert!(!is_big_character_name("Actor$1"));
        assert!(!is_big_character_name(""));
    }

    #[test]
    fn test_frame_sizes() {
        assert_eq!(SheetLayout::Big.frame_size(144, 192), (48, 48));
        assert_eq!(SheetLayout::Small.frame_size(576, 384), (48, 48));
    }

    #[test]
    fn test_small_sheet_first_character_facing_down() {
        assert_eq!(SheetLayout::Small.cell(0, 1, Direction::Down), (1, 0));
        assert_eq!(
            SheetLayout::Small.source_rect(576, 384, 0, 1, Direction::Down),
            PixelRect::new(48, 0, 48, 48)
        );
    }

    #[test]
    fn test_small_sheet_second_row_characters() {
        // index 5 is the second character of the lower row
        assert_eq!(SheetLayout::Small.cell(5, 2, Direction::Up), (5, 7));
        assert_eq!(SheetLayout::Small.cell(3, 0, Direction::Right), (9, 2));
    }

    #[test]
    fn test_big_sheet_ignores_index() {
        for index in 0..8 {
            assert_eq!(SheetLayout::Big.cell(index, 2, Direction::Left), (2, 1));
        }
        assert_eq!(
            SheetLayout::Big.source_rect(144, 192, 6, 0, Direction::Up),
            PixelRect::new(0, 144, 48, 48)
        );
    }

    #[test]
    fn test_tile_source_uses_encoding() {
        let encoding = TileEncoding::default();
        assert_eq!(tile_source(&encoding, 5, 48, 48), (5, PixelRect::new(240, 0, 48, 48)));
        assert_eq!(tile_source(&encoding, 130, 48, 48), (5, PixelRect::new(480, 0, 48, 48)));
        assert_eq!(tile_source(&encoding, 264, 32, 32), (6, PixelRect::new(0, 32, 32, 32)));
    }

    #[test]
    fn test_cache_lookup() {
        let mut cache = SheetCache::new();
        cache.insert_tileset(5, Surface::new(8, 8).into_image());
        cache.insert_character("$Ghost", Surface::new(3, 4).into_image());

        assert!(cache.tileset_sheet(5).is_some());
        assert!(cache.tileset_sheet(6).is_none());
        assert!(cache.character_sheet("$Ghost").is_some());
        assert!(cache.character_sheet("Actor1").is_none());
        assert!(cache.is_big_character("$Ghost"));
    }
}
