// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Errors surfaced by the editor engine.
//!
//! Nothing here is fatal: every failure degrades to "no state change",
//! optionally with a user-visible notice.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// The supplied bytes could not be decoded as an image. The scene is
    /// left unchanged.
    #[error("could not decode image: {0}")]
    ImageDecodeFailed(String),

    /// The system clipboard was denied or held no image. Callers fall back
    /// to the internal copy buffer without involving the user.
    #[error("system clipboard unavailable")]
    ClipboardUnavailable,

    /// Export was requested with nothing selected.
    #[error("nothing selected to export")]
    EmptyExportSelection,
}
