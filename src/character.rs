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

use crate::maps::map::MapObject;
use crate::position::Direction;

/// Pixels a character sprite is lifted above the bottom of its tile.
pub const SHIFT_Y: f32 = 6.0;

/// A character walking on the map, as seen by the renderer this frame.
pub trait MapCharacter {
    /// Character sheet name; empty when the character has no sheet.
    fn character_name(&self) -> &str;
    fn character_index(&self) -> u32;
    /// Walk-cycle frame, `0..=2`.
    fn pattern(&self) -> u32;
    fn direction(&self) -> Direction;
    /// Horizontal center of the sprite in screen pixels.
    fn screen_x(&self) -> f32;
    /// Bottom of the sprite in screen pixels.
    fn screen_y(&self) -> f32;
    fn is_near_the_screen(&self) -> bool;
}

/// What a sprite in the tilemap layer draws.
#[derive(Clone, Copy)]
pub enum SpriteKind<'a> {
    /// A character drawn from a character sheet.
    Character(&'a dyn MapCharacter),
    /// A character drawn from the tileset instead of a sheet.
    TileCharacter,
    Other,
}

#[derive(Clone, Copy)]
pub struct SceneSprite<'a> {
    pub kind: SpriteKind<'a>,
    pub visible: bool,
}

impl<'a> SceneSprite<'a> {
    pub fn character(character: &'a dyn MapCharacter) -> Self {
        Self { kind: SpriteKind::Character(character), visible: true }
    }

    /// The character to silhouette, if this sprite draws one from a sheet and
    /// is on screen.
    pub fn silhouette_character(&self) -> Option<&'a dyn MapCharacter> {
        match self.kind {
            SpriteKind::Character(character)
                if self.visible
                    && !character.character_name().is_empty()
                    && character.is_near_the_screen() =>
            {
                Some(character)
            }
            _ => None,
        }
    }
}

/// Screen-space state of a character, fixed for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterSnapshot {
    pub name: String,
    pub index: u32,
    pub pattern: u32,
    pub direction: Direction,
    pub screen_x: f32,
    pub screen_y: f32,
    pub near_screen: bool,
}

impl CharacterSnapshot {
    /// Projects a map object at fractional tile position `(real_x, real_y)`
    /// into a `view_w` x `view_h` viewport scrolled to `(display_x, display_y)`.
    pub fn project(
        object: &MapObject,
        real: (f32, f32),
        display: (f32, f32),
        tile_size: (u32, u32),
        view: (u32, u32),
    ) -> Self {
        let (tw, th) = (tile_size.0 as f32, tile_size.1 as f32);
        let (gw, gh) = (view.0 as f32, view.1 as f32);
        let scrolled_x = real.0 - display.0;
        let scrolled_y = real.1 - display.1;

        let px = scrolled_x * tw + tw / 2.0 - gw / 2.0;
        let py = scrolled_y * th + th / 2.0 - gh / 2.0;

        Self {
            name: object.character_name.clone(),
            index: object.character_index,
            pattern: object.pattern,
            direction: object.direction,
            screen_x: (scrolled_x * tw + tw / 2.0).round(),
            screen_y: (scrolled_y * th + th - SHIFT_Y).round(),
            near_screen: px.abs() <= gw && py.abs() <= gh,
        }
    }
}

impl MapCharacter for CharacterSnapshot {
    fn character_name(&self) -> &str {
        &self.name
    }

    fn character_index(&self) -> u32 {
        self.index
    }

    fn pattern(&self) -> u32 {
        self.pattern
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn screen_x(&self) -> f32 {
        self.screen_x
    }

    fn screen_y(&self) -> f32 {
        self.screen_y
    }

    fn is_near_the_screen(&self) -> bool {
        self.near_screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::TilePosition;

    fn actor() -> MapObject {
        MapObject::character(TilePosition::new(3, 2), "Actor1", 1).with_direction(Direction::Left)
    }

    #[test]
    fn test_projection_centers_on_tile() {
        let snapshot = CharacterSnapshot::project(&actor(), (3.0, 2.0), (1.0, 0.0), (48, 48), (480, 480));

        assert_eq!(snapshot.screen_x, 2.0 * 48.0 + 24.0);
        assert_eq!(snapshot.screen_y, 3.0 * 48.0 - SHIFT_Y);
        assert_eq!(snapshot.direction, Direction::Left);
        assert!(snapshot.near_screen);
    }

    #[test]
    fn test_far_characters_are_not_near_the_screen() {
        let snapshot = CharacterSnapshot::project(&actor(), (40.0, 2.0), (0.0, 0.0), (48, 48), (480, 480));
        assert!(!snapshot.near_screen);
    }

    #[test]
    fn test_silhouette_character_filters() {
        let on_screen = CharacterSnapshot::project(&actor(), (3.0, 2.0), (0.0, 0.0), (48, 48), (480, 480));
        let mut nameless = on_screen.clone();
        nameless.name.clear();
        let mut far = on_screen.clone();
        far.near_screen = false;

        assert!(SceneSprite::character(&on_screen).silhouette_character().is_some());
        assert!(SceneSprite::character(&nameless).silhouette_character().is_none());
        assert!(SceneSprite::character(&far).silhouette_character().is_none());

        let hidden = SceneSprite { kind: SpriteKind::Character(&on_screen), visible: false };
        assert!(hidden.silhouette_character().is_none());

        let tile = SceneSprite { kind: SpriteKind::TileCharacter, visible: true };
        assert!(tile.silhouette_character().is_none());
        let other = SceneSprite { kind: SpriteKind::Other, visible: true };
        assert!(other.silhouette_character().is_none());
    }
}
