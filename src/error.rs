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

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Color component {component} out of range in {color:?}")]
    ComponentOutOfRange { component: &'static str, color: String },

    #[error("Tile encoding needs an even, non-zero set size and a non-empty block")]
    InvalidEncoding,

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sheet loading errors.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Failed to load sheet {path}: {message}")]
    Load { path: String, message: String },

    #[error("Sheet {name} is {width}x{height}, not divisible into a {columns}x{rows} grid")]
    UnevenGrid {
        name: String,
        width: u32,
        height: u32,
        columns: u32,
        rows: u32,
    },
}
