// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! History system for undo/redo functionality.
//!
//! A single snapshot stack with a cursor: undo and redo move the cursor,
//! and recording a new snapshot after an undo discards the redo tail.

use crate::models::scene::Scene;

pub struct History {
    /// Snapshots, oldest first. Always holds at least the seed entry.
    entries: Vec<Scene>,
    /// Index of the entry matching the live scene.
    cursor: usize,
    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create a history seeded with the pristine state.
    pub fn new(initial: Scene) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            max_size: 50, // Keep last 50 states
        }
    }

    /// Record the state after a committed change, discarding any redo tail.
    pub fn snapshot(&mut self, scene: &Scene) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(scene.clone());
        // Limit history size
        if self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Undo: step back and return the state to restore, if any.
    pub fn undo(&mut self) -> Option<Scene> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Redo: step forward and return the state to restore, if any.
    pub fn redo(&mut self) -> Option<Scene> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of entries currently held, including the seed state.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::object::{FloatingText, ObjectId, Point, TextStyle};

    fn text_scene(label: &str) -> Scene {
        let mut scene = Scene::new();
        scene.add_text(FloatingText {
            id: ObjectId(1),
            position: Point::new(0.0, 0.0),
            width: 10.0,
            height: 10.0,
            rotation: 0.0,
            text: label.to_string(),
            style: TextStyle::default(),
            lines: vec![label.to_string()],
        });
        scene
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new(Scene::new());
        let a = text_scene("a");
        let b = text_scene("b");
        history.snapshot(&a);
        history.snapshot(&b);

        assert_eq!(history.undo(), Some(a.clone()));
        assert_eq!(history.redo(), Some(b.clone()));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_at_seed_is_noop() {
        let mut history = History::new(Scene::new());
        assert!(history.undo().is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_snapshot_after_undo_truncates_redo() {
        let mut history = History::new(Scene::new());
        let a = text_scene("a");
        let b = text_scene("b");
        let c = text_scene("c");
        history.snapshot(&a);
        history.snapshot(&b);
        history.undo();
        history.snapshot(&c);

        // The branch holding `b` is gone.
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(a));
        assert_eq!(history.redo(), Some(c));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(Scene::new());
        for i in 0..60 {
            history.snapshot(&text_scene(&i.to_string()));
        }
        // Cursor stays on the newest entry and undo still works.
        assert!(history.can_undo());
        let restored = history.undo().unwrap();
        assert_eq!(restored.texts[0].text, "58");
    }
}
