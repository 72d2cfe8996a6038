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

use character_silhouette::position::Direction;
use macroquad::prelude::*;
use once_cell::sync::Lazy;
use std::sync::Mutex;

#[derive(Clone, PartialEq)]
pub enum KeyboardAction {
    None,
    Move,
    ToggleSilhouette,
    Quit,
}

const DIRECTION_KEYS: [(KeyCode, KeyCode, Direction); 4] = [
    (KeyCode::Down, KeyCode::Kp2, Direction::Down),
    (KeyCode::Left, KeyCode::Kp4, Direction::Left),
    (KeyCode::Right, KeyCode::Kp6, Direction::Right),
    (KeyCode::Up, KeyCode::Kp8, Direction::Up),
];

pub struct Input {
    keyboard_action: KeyboardAction,
    direction_intention: Option<Direction>,
    // most recently pressed direction that is still held
    held: Vec<Direction>,
}

pub struct InputSnapshot {
    pub keyboard_action: KeyboardAction,
    pub direction: Option<Direction>,
}

impl Input {
    fn handle_keyboard_input(&mut self) {
        for (key, keypad, direction) in DIRECTION_KEYS {
            let down = is_key_down(key) || is_key_down(keypad);
            let listed = self.held.contains(&direction);
            if down && !listed {
                self.held.push(direction);
            } else if !down && listed {
                self.held.retain(|&d| d != direction);
            }
        }

        let mut keyboard_action = KeyboardAction::None;
        let direction = self.held.last().copied();

        if direction.is_some() {
            keyboard_action = KeyboardAction::Move;
        }
        if is_key_pressed(KeyCode::S) {
            keyboard_action = KeyboardAction::ToggleSilhouette;
        }
        if is_key_pressed(KeyCode::Escape) {
            keyboard_action = KeyboardAction::Quit;
        }

        self.keyboard_action = keyboard_action;
        self.direction_intention = direction;
    }

    pub fn poll() -> InputSnapshot {
        let mut input = match INPUT.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        input.handle_keyboard_input();
        InputSnapshot {
            keyboard_action: input.keyboard_action.clone(),
            direction: input.direction_intention,
        }
    }
}

static INPUT: Lazy<Mutex<Input>> = Lazy::new(|| {
    Mutex::new(Input {
        keyboard_action: KeyboardAction::None,
        direction_intention: None,
        held: Vec::new(),
    })
});
