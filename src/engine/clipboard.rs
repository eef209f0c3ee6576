// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The internal copy buffer.
//!
//! Copy takes a shallow snapshot of the current single selection; paste
//! falls back to this buffer whenever the OS clipboard yields no image.

use crate::models::object::{FloatingText, ImageObject};

/// How far a pasted duplicate is offset from its source.
pub const PASTE_OFFSET: f32 = 20.0;

/// A copied scene object, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CopiedObject {
    Image(ImageObject),
    Text(FloatingText),
}
