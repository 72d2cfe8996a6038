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

//! Silhouettes for map characters hidden behind back-side passage tiles.
//!
//! [`maps::passage::back_side_passage_tiles`] finds the tiles a character can
//! stand behind, and [`graphics::silhouette::SilhouetteCompositor`] turns the
//! characters standing there into a flat colored overlay once per frame.

pub mod character;
pub mod config;
pub mod error;
pub mod graphics;
pub mod maps;
pub mod position;
pub mod tile;
pub mod viewport;

pub use character::{CharacterSnapshot, MapCharacter, SceneSprite, SpriteKind};
pub use config::{SilhouetteColor, SilhouetteConfig};
pub use error::{ConfigError, SheetError};
pub use graphics::silhouette::{Frame, SILHOUETTE_Z, SilhouetteCompositor};
pub use maps::passage::back_side_passage_tiles;
pub use maps::{MapData, MapEvent};
pub use viewport::{Camera, ViewportSize};
