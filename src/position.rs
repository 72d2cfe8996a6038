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

/// Facing of a map character, numbered like a keypad (2 = down, 8 = up).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Down = 2,
    Left = 4,
    Right = 6,
    Up = 8,
}

impl Direction {
    pub fn keypad(self) -> u32 {
        self as u32
    }

    /// Row of this facing inside a character's 4-row block on a sheet.
    pub fn sheet_row(self) -> u32 {
        (self.keypad() - 2) / 2
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
        }
    }
}

/// Map coordinate in tile units. Signed, since the camera may sit left of or
/// above the map origin.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
}

impl TilePosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing the point `(x, y)` given in fractional tile units.
    pub fn floor(x: f32, y: f32) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
        }
    }

    pub fn is_valid(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < width && self.y < height
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_rows_follow_keypad_order() {
        assert_eq!(Direction::Down.sheet_row(), 0);
        assert_eq!(Direction::Left.sheet_row(), 1);
        assert_eq!(Direction::Right.sheet_row(), 2);
        assert_eq!(Direction::Up.sheet_row(), 3);
    }

    #[test]
    fn test_floor_rounds_toward_lower_tile() {
        assert_eq!(TilePosition::floor(2.75, 0.0), TilePosition::new(2, 0));
        assert_eq!(TilePosition::floor(-0.5, 3.2), TilePosition::new(-1, 3));
    }
}
