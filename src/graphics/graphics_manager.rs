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

use macroquad::prelude::*;

use crate::config::SilhouetteConfig;
use crate::graphics::sheets::SheetSource;
use crate::graphics::silhouette::{Frame, SilhouetteCompositor};
use crate::maps::MapData;
use crate::viewport::{Camera, ViewportSize};

/// GPU side of the silhouette layer: owns the compositor and the texture its
/// output is uploaded to.
pub struct GraphicsManager {
    compositor: SilhouetteCompositor,
    silhouette_texture: Texture2D,
}

impl GraphicsManager {
    /// Needs a live graphics context.
    pub fn create_silhouette(viewport: ViewportSize, tile_w: u32, tile_h: u32, config: &SilhouetteConfig) -> Self {
        let compositor = SilhouetteCompositor::create_silhouette(viewport, tile_w, tile_h, config);
        let silhouette_texture = Texture2D::from_image(compositor.output().image());
        silhouette_texture.set_filter(FilterMode::Nearest);

        Self {
            compositor,
            silhouette_texture,
        }
    }

    /// Recomposes the silhouette and uploads it if it changed. Call once per
    /// frame, after characters and the camera have moved.
    pub fn update_silhouette<M, S, C>(&mut self, frame: &Frame<'_, M, S, C>)
    where
        M: MapData,
        S: SheetSource,
        C: Camera,
    {
        self.compositor.update_silhouette(frame);

        let output = self.compositor.output_mut();
        if output.take_dirty() {
            self.silhouette_texture.update(output.image());
        }
    }

    /// Draws the layer with its origin at `offset`, the screen position of
    /// the map view.
    pub fn draw_silhouette(&self, offset: Vec2) {
        draw_texture(&self.silhouette_texture, offset.x, offset.y, WHITE);
    }
}
