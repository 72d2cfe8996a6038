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

use tracing::{debug, trace, warn};

use crate::character::SceneSprite;
use crate::config::{SilhouetteColor, SilhouetteConfig};
use crate::graphics::sheets::{SheetLayout, SheetSource, tile_source};
use crate::graphics::surface::{BlendMode, Surface};
use crate::maps::MapData;
use crate::maps::passage::back_side_passage_tiles;
use crate::position::TilePosition;
use crate::tile::TileEncoding;
use crate::viewport::{Camera, ViewportSize};

/// Depth of the silhouette layer among the tilemap's children. Upper-layer
/// tiles sit at 4, so the silhouette shows through them; animations and
/// anything else at 8 or above still cover it.
pub const SILHOUETTE_Z: i32 = 8;

/// Everything one silhouette pass reads.
pub struct Frame<'a, M, S, C> {
    pub map: &'a M,
    pub sheets: &'a S,
    pub camera: &'a C,
    /// Sprites of the tilemap layer, in any order.
    pub sprites: &'a [SceneSprite<'a>],
}

/// Draws characters hidden behind back-side passage tiles as flat colored
/// silhouettes.
///
/// Each frame the mask surface receives every visible back-side tile and the
/// output surface every on-screen character. The output is then cut down to
/// the mask and painted with the silhouette color.
pub struct SilhouetteCompositor {
    mask: Surface,
    output: Surface,
    tile_w: u32,
    tile_h: u32,
    viewport: ViewportSize,
    color: SilhouetteColor,
    encoding: TileEncoding,
}

impl SilhouetteCompositor {
    pub fn create_silhouette(viewport: ViewportSize, tile_w: u32, tile_h: u32, config: &SilhouetteConfig) -> Self {
        Self::new(viewport, tile_w, tile_h, config.color_or_default(), config.tile_encoding_or_default())
    }

    pub fn new(
        viewport: ViewportSize,
        tile_w: u32,
        tile_h: u32,
        color: SilhouetteColor,
        encoding: TileEncoding,
    ) -> Self {
        let wanted_w = viewport.width.saturating_add(tile_w);
        let wanted_h = viewport.height.saturating_add(tile_h);
        let width = wanted_w.min(u16::MAX as u32) as u16;
        let height = wanted_h.min(u16::MAX as u32) as u16;
        if wanted_w > width as u32 || wanted_h > height as u32 {
            warn!(wanted_w, wanted_h, width, height, "silhouette surfaces clamped to the largest image size");
        }
        debug!(width, height, z = SILHOUETTE_Z, "silhouette surfaces allocated");

        Self {
            mask: Surface::new(width, height),
            output: Surface::new(width, height),
            tile_w,
            tile_h,
            viewport,
            color,
            encoding,
        }
    }

    pub fn output(&self) -> &Surface {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut Surface {
        &mut self.output
    }

    pub fn mask(&self) -> &Surface {
        &self.mask
    }

    pub fn color(&self) -> SilhouetteColor {
        self.color
    }

    pub fn z(&self) -> i32 {
        SILHOUETTE_Z
    }

    pub fn update_silhouette<M, S, C>(&mut self, frame: &Frame<'_, M, S, C>)
    where
        M: MapData,
        S: SheetSource,
        C: Camera,
    {
        self.output.clear();
        self.mask.clear();

        let tiles = self.draw_mask(frame);
        let characters = self.draw_characters(frame);

        self.output.draw_surface(&self.mask, BlendMode::DestinationIn);
        let bounds = self.output.bounds();
        self.output.fill_rect(bounds, self.color.rgba(), BlendMode::SourceIn);

        self.output.mark_dirty();
        trace!(tiles, characters, "silhouette frame composed");
    }

    fn draw_mask<M, S, C>(&mut self, frame: &Frame<'_, M, S, C>) -> usize
    where
        M: MapData,
        S: SheetSource,
        C: Camera,
    {
        let (columns, rows) = self.viewport.tile_grid(self.tile_w, self.tile_h);
        let display_x = frame.camera.display_x();
        let display_y = frame.camera.display_y();
        let mut drawn = 0;

        for i in 0..rows {
            for j in 0..columns {
                let cell = TilePosition::floor(j as f32 + display_x, i as f32 + display_y);
                let dx = ((cell.x as f32 - display_x) * self.tile_w as f32).round() as i32;
                let dy = ((cell.y as f32 - display_y) * self.tile_h as f32).round() as i32;

                for id in back_side_passage_tiles(frame.map, cell.x, cell.y) {
                    let (set, source) = tile_source(&self.encoding, id, self.tile_w, self.tile_h);
                    let Some(sheet) = frame.sheets.tileset_sheet(set) else {
                        trace!(set, id, "tileset sheet not loaded, tile skipped");
                        continue;
                    };
                    self.mask.draw_sub_image(sheet, source, dx, dy, BlendMode::SourceOver);
                    drawn += 1;
                }
            }
        }

        drawn
    }

    fn draw_characters<M, S, C>(&mut self, frame: &Frame<'_, M, S, C>) -> usize
    where
        S: SheetSource,
    {
        let mut drawn = 0;

        for character in frame.sprites.iter().filter_map(|s| s.silhouette_character()) {
            let name = character.character_name();
            let Some(sheet) = frame.sheets.character_sheet(name) else {
                trace!(name, "character sheet not loaded, character skipped");
                continue;
            };

            let layout = SheetLayout::of(frame.sheets.is_big_character(name));
            let source = layout.source_rect(
                sheet.width as u32,
                sheet.height as u32,
                character.character_index(),
                character.pattern(),
                character.direction(),
            );
            let dx = (character.screen_x() - source.w as f32 / 2.0).round() as i32;
            let dy = (character.screen_y() - source.h as f32).round() as i32;

            self.output.draw_sub_image(sheet, source, dx, dy, BlendMode::SourceOver);
            drawn += 1;
        }

        drawn
    }
}
