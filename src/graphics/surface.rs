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

use macroquad::texture::Image;

/// Straight-alpha RGBA pixel.
pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        PixelRect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        PixelRect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    pub fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(PixelRect::new(x, y, (right - x) as u32, (bottom - y) as u32))
    }
}

/// How a drawn source pixel combines with the pixel already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source painted over the destination.
    #[default]
    SourceOver,
    /// Source color, kept only where the destination is opaque.
    SourceIn,
    /// Destination color, kept only where the source is opaque.
    DestinationIn,
}

impl BlendMode {
    /// Modes that erase the destination wherever nothing was drawn.
    fn clears_outside(self) -> bool {
        matches!(self, BlendMode::SourceIn | BlendMode::DestinationIn)
    }

    pub fn blend(self, src: Rgba, dst: Rgba) -> Rgba {
        match self {
            BlendMode::SourceOver => source_over(src, dst),
            BlendMode::SourceIn => match mul_alpha(src[3], dst[3]) {
                0 => TRANSPARENT,
                a => [src[0], src[1], src[2], a],
            },
            BlendMode::DestinationIn => match mul_alpha(dst[3], src[3]) {
                0 => TRANSPARENT,
                a => [dst[0], dst[1], dst[2], a],
            },
        }
    }
}

fn mul_alpha(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

fn source_over(src: Rgba, dst: Rgba) -> Rgba {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let blend = |s: u8, d: u8| -> u8 {
        let out = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
        out.round().clamp(0.0, 255.0) as u8
    };

    [
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

fn image_pixel(image: &Image, x: i32, y: i32) -> Rgba {
    if x < 0 || y < 0 || x >= image.width as i32 || y >= image.height as i32 {
        return TRANSPARENT;
    }
    let i = (y as usize * image.width as usize + x as usize) * 4;
    [image.bytes[i], image.bytes[i + 1], image.bytes[i + 2], image.bytes[i + 3]]
}

/// Off-screen RGBA raster. Drawing never touches the GPU; the owner uploads
/// the pixels when the surface is marked dirty.
pub struct Surface {
    image: Image,
    dirty: bool,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u16, height: u16) -> Self {
        Self::from_image(Image {
            bytes: vec![0; width as usize * height as usize * 4],
            width,
            height,
        })
    }

    pub fn from_image(image: Image) -> Self {
        Self { image, dirty: false }
    }

    pub fn width(&self) -> u32 {
        self.image.width as u32
    }

    pub fn height(&self) -> u32 {
        self.image.height as u32
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width(), self.height())
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn into_image(self) -> Image {
        self.image
    }

    /// Pixel at `(x, y)`, transparent outside the surface.
    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        image_pixel(&self.image, x, y)
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        self.image.bytes.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba) {
        let i = (y as usize * self.image.width as usize + x as usize) * 4;
        self.image.bytes[i..i + 4].copy_from_slice(&color);
    }

    pub fn clear(&mut self) {
        self.image.bytes.fill(0);
    }

    pub fn clear_rect(&mut self, rect: PixelRect) {
        if let Some(area) = rect.intersect(&self.bounds()) {
            for y in area.y..area.bottom() {
                for x in area.x..area.right() {
                    self.put(x, y, TRANSPARENT);
                }
            }
        }
    }

    /// Blends `source(x, y)` into every pixel of `region`. For modes that
    /// clear outside, pixels not in `region` become transparent.
    fn composite<F>(&mut self, region: Option<PixelRect>, mode: BlendMode, source: F)
    where
        F: Fn(i32, i32) -> Rgba,
    {
        if mode.clears_outside() {
            for y in 0..self.height() as i32 {
                for x in 0..self.width() as i32 {
                    if !region.is_some_and(|r| r.contains(x, y)) {
                        self.put(x, y, TRANSPARENT);
                    }
                }
            }
        }

        let Some(region) = region else {
            return;
        };

        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                let blended = mode.blend(source(x, y), self.pixel(x, y));
                self.put(x, y, blended);
            }
        }
    }

    /// Draws `src_rect` of `src` with its top left corner at `(dx, dy)`.
    /// The part of `src_rect` outside `src` and the part of the destination
    /// outside this surface are skipped.
    pub fn draw_sub_image(&mut self, src: &Image, src_rect: PixelRect, dx: i32, dy: i32, mode: BlendMode) {
        let src_bounds = PixelRect::new(0, 0, src.width as u32, src.height as u32);
        let (ox, oy) = (src_rect.x - dx, src_rect.y - dy);
        let region = src_rect
            .intersect(&src_bounds)
            .map(|r| r.translate(-ox, -oy))
            .and_then(|r| r.intersect(&self.bounds()));

        self.composite(region, mode, |x, y| image_pixel(src, x + ox, y + oy));
    }

    /// Draws all of `src` at the origin.
    pub fn draw_surface(&mut self, src: &Surface, mode: BlendMode) {
        self.draw_sub_image(&src.image, src.bounds(), 0, 0, mode);
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba, mode: BlendMode) {
        let region = rect.intersect(&self.bounds());
        self.composite(region, mode, |_, _| color);
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and resets it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    fn solid(width: u16, height: u16, color: Rgba) -> Surface {
        let mut surface = Surface::new(width, height);
        surface.fill_rect(surface.bounds(), color, BlendMode::SourceOver);
        surface
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = Surface::new(4, 3);
        assert_eq!(surface.width(), 4);
        assert_eq!(surface.height(), 3);
        assert!(surface.pixels().all(|p| p == TRANSPARENT));
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_rect_intersection() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(5, -3, 10, 5);
        assert_eq!(a.intersect(&b), Some(PixelRect::new(5, 0, 5, 2)));
        assert_eq!(a.intersect(&PixelRect::new(10, 0, 4, 4)), None);
    }

    #[test]
    fn test_source_over_blend() {
        assert_eq!(BlendMode::SourceOver.blend(RED, BLUE), RED);
        assert_eq!(BlendMode::SourceOver.blend(TRANSPARENT, BLUE), BLUE);

        let half_red = [255, 0, 0, 128];
        assert_eq!(BlendMode::SourceOver.blend(half_red, TRANSPARENT), half_red);

        let mixed = BlendMode::SourceOver.blend(half_red, BLUE);
        assert_eq!(mixed[3], 255);
        assert!(mixed[0] > 120 && mixed[0] < 135);
        assert!(mixed[2] > 120 && mixed[2] < 135);
    }

    #[test]
    fn test_in_blends() {
        assert_eq!(BlendMode::SourceIn.blend(RED, BLUE), RED);
        assert_eq!(BlendMode::SourceIn.blend(RED, TRANSPARENT), TRANSPARENT);
        assert_eq!(BlendMode::SourceIn.blend([0, 0, 0, 128], BLUE), [0, 0, 0, 128]);

        assert_eq!(BlendMode::DestinationIn.blend(RED, BLUE), BLUE);
        assert_eq!(BlendMode::DestinationIn.blend(TRANSPARENT, BLUE), TRANSPARENT);
        assert_eq!(BlendMode::DestinationIn.blend([9, 9, 9, 128], BLUE), [0, 0, 255, 128]);
    }

    #[test]
    fn test_draw_sub_image_copies_region() {
        let mut sheet = Surface::new(4, 4);
        sheet.fill_rect(PixelRect::new(2, 2, 2, 2), RED, BlendMode::SourceOver);
        let sheet = sheet.into_image();

        let mut target = Surface::new(3, 3);
        target.draw_sub_image(&sheet, PixelRect::new(2, 2, 2, 2), 1, 0, BlendMode::SourceOver);

        assert_eq!(target.pixel(1, 0), RED);
        assert_eq!(target.pixel(2, 1), RED);
        assert_eq!(target.pixel(0, 0), TRANSPARENT);
        assert_eq!(target.pixel(1, 2), TRANSPARENT);
    }

    #[test]
    fn test_draw_clips_at_both_ends() {
        let sheet = solid(4, 4, RED).into_image();

        let mut target = Surface::new(3, 3);
        // source rect hangs off the sheet, destination hangs off the target
        target.draw_sub_image(&sheet, PixelRect::new(2, 2, 4, 4), -1, 1, BlendMode::SourceOver);

        let opaque: Vec<(i32, i32)> = (0..3)
            .flat_map(|y| (0..3).map(move |x| (x, y)))
            .filter(|&(x, y)| target.pixel(x, y) == RED)
            .collect();
        assert_eq!(opaque, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_draw_fully_outside_is_noop_for_source_over() {
        let sheet = solid(2, 2, RED).into_image();
        let mut target = solid(2, 2, BLUE);
        target.draw_sub_image(&sheet, PixelRect::new(0, 0, 2, 2), 10, 10, BlendMode::SourceOver);
        assert!(target.pixels().all(|p| p == BLUE));
    }

    #[test]
    fn test_destination_in_stencils() {
        let mut mask = Surface::new(4, 1);
        mask.fill_rect(PixelRect::new(1, 0, 2, 1), RED, BlendMode::SourceOver);

        let mut target = solid(4, 1, BLUE);
        target.draw_surface(&mask, BlendMode::DestinationIn);

        assert_eq!(target.pixel(0, 0), TRANSPARENT);
        assert_eq!(target.pixel(1, 0), BLUE);
        assert_eq!(target.pixel(2, 0), BLUE);
        assert_eq!(target.pixel(3, 0), TRANSPARENT);
    }

    #[test]
    fn test_source_in_fill_takes_shape_of_destination() {
        let mut target = Surface::new(3, 1);
        target.fill_rect(PixelRect::new(1, 0, 1, 1), RED, BlendMode::SourceOver);
        target.fill_rect(target.bounds(), [0, 0, 0, 128], BlendMode::SourceIn);

        assert_eq!(target.pixel(0, 0), TRANSPARENT);
        assert_eq!(target.pixel(1, 0), [0, 0, 0, 128]);
        assert_eq!(target.pixel(2, 0), TRANSPARENT);
    }

    #[test]
    fn test_in_modes_clear_outside_drawn_area() {
        let mut target = solid(3, 1, BLUE);
        target.fill_rect(PixelRect::new(0, 0, 1, 1), RED, BlendMode::SourceIn);

        assert_eq!(target.pixel(0, 0), RED);
        assert_eq!(target.pixel(1, 0), TRANSPARENT);
        assert_eq!(target.pixel(2, 0), TRANSPARENT);
    }

    #[test]
    fn test_clear_and_clear_rect() {
        let mut target = solid(3, 3, BLUE);
        target.clear_rect(PixelRect::new(1, 1, 5, 5));
        assert_eq!(target.pixel(0, 0), BLUE);
        assert_eq!(target.pixel(2, 2), TRANSPARENT);

        target.clear();
        assert!(target.pixels().all(|p| p == TRANSPARENT));
    }

    #[test]
    fn test_dirty_flag() {
        let mut surface = Surface::new(1, 1);
        surface.mark_dirty();
        assert!(surface.is_dirty());
        assert!(surface.take_dirty());
        assert!(!surface.take_dirty());
    }
}
