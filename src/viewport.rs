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

/// Scroll position of the map view, in fractional tiles.
pub trait Camera {
    fn display_x(&self) -> f32;
    fn display_y(&self) -> f32;
}

/// Size of the visible screen area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Tiles covering the viewport plus one of margin on each axis, so a view
    /// scrolled by a fraction of a tile still has its edges covered.
    pub fn tile_grid(&self, tile_w: u32, tile_h: u32) -> (u32, u32) {
        (self.width.div_ceil(tile_w) + 1, self.height.div_ceil(tile_h) + 1)
    }
}

/// Camera that follows a target and stays inside the map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapCamera {
    pub display_x: f32,
    pub display_y: f32,
}

impl MapCamera {
    pub fn new(display_x: f32, display_y: f32) -> Self {
        Self { display_x, display_y }
    }

    /// Centers on the tile position `(x, y)`, clamped so the view does not
    /// leave a `map_w` x `map_h` map.
    pub fn center(&mut self, x: f32, y: f32, map_w: i32, map_h: i32, screen_tiles: (f32, f32)) {
        let max_x = (map_w as f32 - screen_tiles.0).max(0.0);
        let max_y = (map_h as f32 - screen_tiles.1).max(0.0);
        self.display_x = (x - (screen_tiles.0 - 1.0) / 2.0).clamp(0.0, max_x);
        self.display_y = (y - (screen_tiles.1 - 1.0) / 2.0).clamp(0.0, max_y);
    }
}

impl Camera for MapCamera {
    fn display_x(&self) -> f32 {
        self.display_x
    }

    fn display_y(&self) -> f32 {
        self.display_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_grid_adds_margin() {
        assert_eq!(ViewportSize::new(816, 624).tile_grid(48, 48), (18, 14));
        assert_eq!(ViewportSize::new(48, 48).tile_grid(48, 48), (2, 2));
        // partial tiles round up before the margin is added
        assert_eq!(ViewportSize::new(100, 50).tile_grid(48, 48), (4, 3));
    }

    #[test]
    fn test_center_clamps_to_map() {
        let mut camera = MapCamera::default();
        camera.center(10.0, 10.0, 40, 30, (17.0, 13.0));
        assert_eq!((camera.display_x, camera.display_y), (2.0, 4.0));

        camera.center(0.0, 0.0, 40, 30, (17.0, 13.0));
        assert_eq!((camera.display_x, camera.display_y), (0.0, 0.0));

        camera.center(39.0, 29.0, 40, 30, (17.0, 13.0));
        assert_eq!((camera.display_x, camera.display_y), (23.0, 17.0));
    }
}
