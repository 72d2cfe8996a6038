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

use macroquad::prelude::*;
extern crate rand as external_rand;
use external_rand::{Rng, thread_rng};
use tracing::{info, warn};

use character_silhouette::graphics::graphics_manager::GraphicsManager;
use character_silhouette::graphics::sheets::{SheetCache, SheetLayout, SheetSource, tile_source};
use character_silhouette::graphics::surface::{BlendMode, PixelRect, Rgba, Surface};
use character_silhouette::maps::map::{GameMap, MapObject};
use character_silhouette::maps::{MapData, TILE_SIZE};
use character_silhouette::position::{Direction, TilePosition};
use character_silhouette::tile::{TileEncoding, TileFlags, TileId};
use character_silhouette::viewport::MapCamera;
use character_silhouette::{CharacterSnapshot, Frame, SceneSprite, SilhouetteConfig, SpriteKind, ViewportSize};

use crate::input::{Input, KeyboardAction};

const MAP_WIDTH: i32 = 26;
const MAP_HEIGHT: i32 = 20;
const ROOF_TILE: TileId = 5;
const TREE_TILE: TileId = 9;
const SIGN_TILE: TileId = 12;
const ACTOR_SHEET: &str = "Actor1";
const CONFIG_PATH: &str = "assets/silhouette.json";
const MOVE_SPEED: f32 = 4.0; // tiles per second
const WANDER_CHANCE: f64 = 0.01;

struct Walker {
    object: MapObject,
    real_x: f32,
    real_y: f32,
    anim_count: f32,
    wander: bool,
}

impl Walker {
    fn new(position: TilePosition, index: u32, wander: bool) -> Self {
        Self {
            object: MapObject::character(position, ACTOR_SHEET, index),
            real_x: position.x as f32,
            real_y: position.y as f32,
            anim_count: 0.0,
            wander,
        }
    }

    fn is_moving(&self) -> bool {
        self.real_x != self.object.position.x as f32 || self.real_y != self.object.position.y as f32
    }

    fn update(&mut self, dt: f32) {
        let step = MOVE_SPEED * dt;
        let approach = |real: f32, target: i32| {
            let target = target as f32;
            if (target - real).abs() <= step { target } else { real + step * (target - real).signum() }
        };
        self.real_x = approach(self.real_x, self.object.position.x);
        self.real_y = approach(self.real_y, self.object.position.y);

        if self.is_moving() {
            self.anim_count += dt * MOVE_SPEED * 2.0;
            self.object.pattern = [1, 2, 1, 0][self.anim_count as usize % 4];
        } else {
            self.anim_count = 0.0;
            self.object.pattern = 1;
        }
    }

    fn snapshot(&self, camera: &MapCamera, view: ViewportSize) -> CharacterSnapshot {
        CharacterSnapshot::project(
            &self.object,
            (self.real_x, self.real_y),
            (camera.display_x, camera.display_y),
            (TILE_SIZE, TILE_SIZE),
            (view.width, view.height),
        )
    }
}

pub struct GameState {
    map: GameMap,
    walkers: Vec<Walker>,
    camera: MapCamera,
    view: ViewportSize,
    sheets: SheetCache,
    encoding: TileEncoding,
    textures: HashMap<String, Texture2D>,
    tileset_textures: HashMap<usize, Texture2D>,
    graphics: GraphicsManager,
    silhouette_color: Color,
    show_silhouette: bool,
}

impl GameState {
    fn can_enter(&self, walker: usize, target: TilePosition) -> bool {
        self.map.is_passable(target.x, target.y)
            && self
                .walkers
                .iter()
                .enumerate()
                .all(|(i, w)| i == walker || w.object.position != target)
    }

    fn try_move(&mut self, walker: usize, direction: Direction) {
        if self.walkers[walker].is_moving() {
            return;
        }
        self.walkers[walker].object.direction = direction;
        let target = self.walkers[walker].object.position.step(direction);
        if self.can_enter(walker, target) {
            self.walkers[walker].object.position = target;
        }
    }

    fn update(&mut self, direction: Option<Direction>, dt: f32) {
        if let Some(direction) = direction {
            self.try_move(0, direction);
        }

        let mut rng = thread_rng();
        for i in 1..self.walkers.len() {
            if self.walkers[i].wander && rng.gen_bool(WANDER_CHANCE) {
                let direction = [Direction::Down, Direction::Left, Direction::Right, Direction::Up][rng.gen_range(0..4)];
                self.try_move(i, direction);
            }
        }

        for walker in &mut self.walkers {
            walker.update(dt);
        }

        let screen_tiles = (
            self.view.width as f32 / TILE_SIZE as f32,
            self.view.height as f32 / TILE_SIZE as f32,
        );
        let player = &self.walkers[0];
        self.camera.center(player.real_x, player.real_y, MAP_WIDTH, MAP_HEIGHT, screen_tiles);
    }

    fn update_silhouette(&mut self, snapshots: &[CharacterSnapshot]) {
        let mut sprites: Vec<SceneSprite> = snapshots.iter().map(|s| SceneSprite::character(s)).collect();
        // the sign is drawn from the tileset and never gets a silhouette
        sprites.push(SceneSprite { kind: SpriteKind::TileCharacter, visible: true });

        let frame = Frame {
            map: &self.map,
            sheets: &self.sheets,
            camera: &self.camera,
            sprites: &sprites,
        };
        self.graphics.update_silhouette(&frame);
    }

    fn draw_tile(&self, id: TileId, x: i32, y: i32) {
        let (set, source) = tile_source(&self.encoding, id, TILE_SIZE, TILE_SIZE);
        let Some(texture) = self.tileset_textures.get(&set) else {
            return;
        };
        let tile = TILE_SIZE as f32;
        draw_texture_ex(
            texture,
            (x as f32 - self.camera.display_x) * tile,
            (y as f32 - self.camera.display_y) * tile,
            WHITE,
            DrawTextureParams {
                source: Some(Rect::new(source.x as f32, source.y as f32, source.w as f32, source.h as f32)),
                ..Default::default()
            },
        );
    }

    fn visible_cells(&self) -> Vec<TilePosition> {
        let (columns, rows) = self.view.tile_grid(TILE_SIZE, TILE_SIZE);
        let mut cells = Vec::new();
        for i in 0..rows {
            for j in 0..columns {
                cells.push(TilePosition::floor(j as f32 + self.camera.display_x, i as f32 + self.camera.display_y));
            }
        }
        cells
    }

    fn draw(&self, snapshots: &[CharacterSnapshot]) {
        clear_background(BLACK);
        let tile = TILE_SIZE as f32;

        for cell in self.visible_cells() {
            if !cell.is_valid(MAP_WIDTH, MAP_HEIGHT) {
                continue;
            }
            let shade = if (cell.x + cell.y) % 2 == 0 { 0.42 } else { 0.46 };
            draw_rectangle(
                (cell.x as f32 - self.camera.display_x) * tile,
                (cell.y as f32 - self.camera.display_y) * tile,
                tile,
                tile,
                Color::new(0.2, shade, 0.2, 1.0),
            );
        }

        let mut ordered: Vec<&CharacterSnapshot> = snapshots.iter().collect();
        ordered.sort_by(|a, b| a.screen_y.total_cmp(&b.screen_y));
        for snapshot in ordered {
            self.draw_character(snapshot);
        }

        // upper layers and tile events cover the characters
        for cell in self.visible_cells() {
            for id in self.map.layered_tiles(cell.x, cell.y).into_iter().rev() {
                if id != 0 {
                    self.draw_tile(id, cell.x, cell.y);
                }
            }
        }
        for object in self.map.events() {
            if object.tile_id > 0 {
                self.draw_tile(object.tile_id, object.position.x, object.position.y);
            }
        }

        if self.show_silhouette {
            self.graphics.draw_silhouette(vec2(0.0, 0.0));
        }

        draw_text(
            &format!("arrows: move   S: silhouettes {}", if self.show_silhouette { "on" } else { "off" }),
            30.0,
            20.0,
            24.0,
            WHITE,
        );
        // swatch of the configured color over white, so a translucent color still reads
        draw_rectangle(8.0, 6.0, 16.0, 16.0, WHITE);
        draw_rectangle(8.0, 6.0, 16.0, 16.0, self.silhouette_color);
    }

    fn draw_character(&self, snapshot: &CharacterSnapshot) {
        let (Some(texture), Some(sheet)) = (
            self.textures.get(&snapshot.name),
            self.sheets.character_sheet(&snapshot.name),
        ) else {
            return;
        };
        let layout = SheetLayout::of(self.sheets.is_big_character(&snapshot.name));
        let source = layout.source_rect(
            sheet.width as u32,
            sheet.height as u32,
            snapshot.index,
            snapshot.pattern,
            snapshot.direction,
        );
        draw_texture_ex(
            texture,
            snapshot.screen_x - source.w as f32 / 2.0,
            snapshot.screen_y - source.h as f32,
            WHITE,
            DrawTextureParams {
                source: Some(Rect::new(source.x as f32, source.y as f32, source.w as f32, source.h as f32)),
                ..Default::default()
            },
        );
    }
}

fn build_map() -> GameMap {
    let mut flags = vec![0u32; 1024];
    for id in [ROOF_TILE, TREE_TILE, SIGN_TILE] {
        flags[id as usize] = TileFlags::PASSABLE_BEHIND.bits();
    }

    let mut map = GameMap::new(MAP_WIDTH, MAP_HEIGHT, flags);
    for y in 4..8 {
        for x in 6..13 {
            map.set_tile(x, y, 3, ROOF_TILE);
        }
    }
    for (x, y) in [(3, 12), (4, 12), (17, 5), (18, 6), (20, 14), (9, 15)] {
        map.set_tile(x, y, 2, TREE_TILE);
    }
    map.add_event(MapObject::tile(TilePosition::new(15, 10), SIGN_TILE));
    map
}

/// One tileset sheet laid out for `encoding` with the roof, tree and sign
/// tiles painted at their cells.
fn generated_tileset(encoding: &TileEncoding) -> Image {
    let tile = TILE_SIZE as i32;
    let sheet_w = (TILE_SIZE * 2 * encoding.block_columns()).min(u16::MAX as u32) as u16;
    let sheet_h = (TILE_SIZE * encoding.block_rows()).min(u16::MAX as u32) as u16;
    let mut sheet = Surface::new(sheet_w, sheet_h);
    let origin = |id: TileId| tile_source(encoding, id, TILE_SIZE, TILE_SIZE).1;

    let roof = origin(ROOF_TILE);
    sheet.fill_rect(roof, [120, 52, 40, 255], BlendMode::SourceOver);
    for stripe in (0..tile).step_by(8) {
        sheet.fill_rect(PixelRect::new(roof.x, roof.y + stripe, roof.w, 2), [80, 30, 25, 255], BlendMode::SourceOver);
    }

    let tree = origin(TREE_TILE);
    sheet.fill_rect(PixelRect::new(tree.x + 20, tree.y + 30, 8, 18), [90, 60, 30, 255], BlendMode::SourceOver);
    sheet.fill_rect(PixelRect::new(tree.x + 6, tree.y + 2, 36, 30), [30, 110, 40, 255], BlendMode::SourceOver);

    let sign = origin(SIGN_TILE);
    sheet.fill_rect(PixelRect::new(sign.x + 21, sign.y + 24, 6, 24), [90, 60, 30, 255], BlendMode::SourceOver);
    sheet.fill_rect(PixelRect::new(sign.x + 6, sign.y + 8, 36, 20), [170, 130, 80, 255], BlendMode::SourceOver);

    sheet.into_image()
}

/// Small sheet with eight differently colored figures.
fn generated_character_sheet() -> Image {
    let (frame_w, frame_h) = (TILE_SIZE as i32, TILE_SIZE as i32);
    let mut sheet = Surface::new((TILE_SIZE * 12) as u16, (TILE_SIZE * 8) as u16);
    let palette: [Rgba; 8] = [
        [60, 90, 200, 255],
        [200, 60, 60, 255],
        [220, 180, 40, 255],
        [140, 70, 180, 255],
        [40, 160, 160, 255],
        [230, 120, 30, 255],
        [120, 120, 120, 255],
        [240, 240, 240, 255],
    ];

    for (index, body) in palette.into_iter().enumerate() {
        for direction in [Direction::Down, Direction::Left, Direction::Right, Direction::Up] {
            for pattern in 0..3u32 {
                let (column, row) = SheetLayout::Small.cell(index as u32, pattern, direction);
                let (x, y) = (column as i32 * frame_w, row as i32 * frame_h);
                let stride = pattern as i32 - 1;

                sheet.fill_rect(PixelRect::new(x + 16, y + 4, 16, 14), [240, 200, 170, 255], BlendMode::SourceOver);
                sheet.fill_rect(PixelRect::new(x + 12, y + 18, 24, 18), body, BlendMode::SourceOver);
                sheet.fill_rect(PixelRect::new(x + 15 + stride * 2, y + 36, 6, 10), [50, 40, 40, 255], BlendMode::SourceOver);
                sheet.fill_rect(PixelRect::new(x + 27 - stride * 2, y + 36, 6, 10), [50, 40, 40, 255], BlendMode::SourceOver);
                let eyes = match direction {
                    Direction::Down => Some((x + 19, x + 26)),
                    Direction::Left => Some((x + 17, x + 17)),
                    Direction::Right => Some((x + 28, x + 28)),
                    Direction::Up => None,
                };
                if let Some((left, right)) = eyes {
                    sheet.fill_rect(PixelRect::new(left, y + 9, 3, 3), [20, 20, 20, 255], BlendMode::SourceOver);
                    sheet.fill_rect(PixelRect::new(right, y + 9, 3, 3), [20, 20, 20, 255], BlendMode::SourceOver);
                }
            }
        }
    }

    sheet.into_image()
}

async fn load_config() -> SilhouetteConfig {
    match load_string(CONFIG_PATH).await {
        Ok(text) => SilhouetteConfig::from_json(&text).unwrap_or_else(|e| {
            warn!(path = CONFIG_PATH, error = %e, "invalid configuration, using defaults");
            SilhouetteConfig::default()
        }),
        Err(_) => {
            info!(path = CONFIG_PATH, "no configuration file, using defaults");
            SilhouetteConfig::default()
        }
    }
}

/// Sets holding the demo's upper-layer tiles, deduplicated.
fn demo_sets(encoding: &TileEncoding) -> Vec<usize> {
    let mut sets: Vec<usize> = [ROOF_TILE, TREE_TILE, SIGN_TILE]
        .into_iter()
        .map(|id| encoding.set_number(id))
        .collect();
    sets.sort_unstable();
    sets.dedup();
    sets
}

async fn load_sheets(encoding: &TileEncoding) -> SheetCache {
    let mut sheets = SheetCache::new();

    let first = encoding.set_number(ROOF_TILE);
    if let Err(e) = sheets.load_tileset(first, "assets/tilesets/upper.png").await {
        info!(error = %e, "using generated tileset");
        for set in demo_sets(encoding) {
            sheets.insert_tileset(set, generated_tileset(encoding));
        }
    }
    if let Err(e) = sheets.load_character(ACTOR_SHEET, "assets/characters/Actor1.png").await {
        info!(error = %e, "using generated character sheet");
        sheets.insert_character(ACTOR_SHEET, generated_character_sheet());
    }
    sheets
}

pub async fn run() {
    let config = load_config().await;
    let encoding = config.tile_encoding_or_default();
    let view = ViewportSize::new(screen_width() as u32, screen_height() as u32);

    let sheets = load_sheets(&encoding).await;
    let mut tileset_textures = HashMap::new();
    for set in demo_sets(&encoding) {
        let Some(tileset) = sheets.tileset_sheet(set) else {
            warn!(set, "tileset sheet missing");
            continue;
        };
        let texture = Texture2D::from_image(tileset);
        texture.set_filter(FilterMode::Nearest);
        tileset_textures.insert(set, texture);
    }

    let mut textures = HashMap::new();
    if let Some(sheet) = sheets.character_sheet(ACTOR_SHEET) {
        let texture = Texture2D::from_image(sheet);
        texture.set_filter(FilterMode::Nearest);
        textures.insert(ACTOR_SHEET.to_string(), texture);
    }

    let mut game = GameState {
        map: build_map(),
        walkers: vec![
            Walker::new(TilePosition::new(9, 10), 0, false),
            Walker::new(TilePosition::new(8, 6), 1, true),
            Walker::new(TilePosition::new(17, 8), 4, true),
            Walker::new(TilePosition::new(4, 13), 6, true),
        ],
        camera: MapCamera::default(),
        view,
        sheets,
        encoding,
        textures,
        tileset_textures,
        graphics: GraphicsManager::create_silhouette(view, TILE_SIZE, TILE_SIZE, &config),
        silhouette_color: config.color_or_default().to_color(),
        show_silhouette: true,
    };
    info!(width = view.width, height = view.height, "map scene ready");

    loop {
        let input = Input::poll();
        match input.keyboard_action {
            KeyboardAction::Quit => break,
            KeyboardAction::ToggleSilhouette => game.show_silhouette = !game.show_silhouette,
            _ => {}
        }

        game.update(input.direction, get_frame_time());

        let snapshots: Vec<CharacterSnapshot> = game
            .walkers
            .iter()
            .map(|w| w.snapshot(&game.camera, game.view))
            .collect();
        game.update_silhouette(&snapshots);
        game.draw(&snapshots);

        next_frame().await;
    }
}
