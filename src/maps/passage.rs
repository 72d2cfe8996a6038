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

use crate::maps::{MapData, MapEvent};
use crate::tile::{EMPTY_TILE, TileFlags, TileId};

/// Tiles at `(x, y)` a character can stand behind.
///
/// Tiles drawn by events come first, then the static layers in the order the
/// map reports them. No bounds checks happen here; a map answers empty for
/// cells it does not have.
pub fn back_side_passage_tiles<M: MapData>(map: &M, x: i32, y: i32) -> Vec<TileId> {
    let flags = map.tileset_flags();

    map.events()
        .iter()
        .filter(|event| event.tile_id() > 0)
        .filter(|event| event.pos_nt(x, y))
        .map(|event| event.tile_id())
        .chain(map.layered_tiles(x, y))
        .filter(|&id| id != EMPTY_TILE && TileFlags::lookup(flags, id).contains(TileFlags::PASSABLE_BEHIND))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::map::{GameMap, MapObject};
    use crate::position::TilePosition;

    fn flags_with_behind(ids: &[TileId]) -> Vec<u32> {
        let mut flags = vec![0u32; 1024];
        for &id in ids {
            flags[id as usize] |= TileFlags::PASSABLE_BEHIND.bits();
        }
        flags
    }

    #[test]
    fn test_empty_map_has_no_tiles() {
        let map = GameMap::new(4, 4, vec![0; 1024]);
        assert!(back_side_passage_tiles(&map, 1, 1).is_empty());
    }

    #[test]
    fn test_only_flagged_tiles_are_returned() {
        let mut map = GameMap::new(4, 4, flags_with_behind(&[20]));
        map.set_tile(1, 1, 0, 10);
        map.set_tile(1, 1, 2, 20);
        map.set_tile(1, 1, 3, 30);

        assert_eq!(back_side_passage_tiles(&map, 1, 1), vec![20]);
    }

    #[test]
    fn test_zero_is_never_returned_even_if_flagged() {
        let mut map = GameMap::new(2, 2, flags_with_behind(&[0, 7]));
        map.set_tile(0, 0, 1, 7);

        let tiles = back_side_passage_tiles(&map, 0, 0);
        assert_eq!(tiles, vec![7]);
    }

    #[test]
    fn test_events_come_before_layers() {
        let mut map = GameMap::new(3, 3, flags_with_behind(&[5, 9, 12]));
        map.set_tile(2, 1, 0, 9);
        map.add_event(MapObject::tile(TilePosition::new(2, 1), 5));
        map.add_event(MapObject::tile(TilePosition::new(2, 1), 12));

        assert_eq!(back_side_passage_tiles(&map, 2, 1), vec![5, 12, 9]);
    }

    #[test]
    fn test_events_elsewhere_or_passing_through_are_ignored() {
        let mut map = GameMap::new(3, 3, flags_with_behind(&[5]));
        map.add_event(MapObject::tile(TilePosition::new(0, 0), 5));
        map.add_event(MapObject::tile(TilePosition::new(1, 1), 5).with_through(true));
        map.add_event(MapObject::character(TilePosition::new(1, 1), "Actor1", 0));

        assert!(back_side_passage_tiles(&map, 1, 1).is_empty());
        assert_eq!(back_side_passage_tiles(&map, 0, 0), vec![5]);
    }

    #[test]
    fn test_out_of_range_coordinates_do_not_panic() {
        let mut map = GameMap::new(2, 2, flags_with_behind(&[3]));
        map.set_tile(1, 1, 0, 3);

        assert!(back_side_passage_tiles(&map, -1, 0).is_empty());
        assert!(back_side_passage_tiles(&map, 2, 1).is_empty());
        assert!(back_side_passage_tiles(&map, 500, -500).is_empty());
    }

    #[test]
    fn test_ids_past_flag_table_are_filtered() {
        let mut map = GameMap::new(2, 2, vec![0x10; 8]);
        map.set_tile(0, 0, 0, 4000);
        map.set_tile(0, 0, 1, 6);

        assert_eq!(back_side_passage_tiles(&map, 0, 0), vec![6]);
    }

    #[test]
    fn test_query_is_repeatable() {
        let mut map = GameMap::new(3, 3, flags_with_behind(&[5, 9]));
        map.set_tile(1, 2, 3, 9);
        map.add_event(MapObject::tile(TilePosition::new(1, 2), 5));

        let first = back_side_passage_tiles(&map, 1, 2);
        let second = back_side_passage_tiles(&map, 1, 2);
        assert_eq!(first, second);
    }
}
