// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Selection state.
//!
//! A single selection and a marquee group selection are mutually
//! exclusive; establishing one clears the other. Selection is ephemeral
//! view state and is never part of a history snapshot.

use crate::models::object::ObjectId;

/// Target of a single selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Image(ObjectId),
    Text(ObjectId),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection {
    #[default]
    None,
    Single(Target),
    Group {
        images: Vec<ObjectId>,
        texts: Vec<ObjectId>,
    },
}

impl Selection {
    /// Select one object, collapsing any group selection.
    pub fn select(&mut self, target: Target) {
        *self = Selection::Single(target);
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// Replace the selection with a marquee result. An empty result clears
    /// the selection outright.
    pub fn set_group(&mut self, images: Vec<ObjectId>, texts: Vec<ObjectId>) {
        if images.is_empty() && texts.is_empty() {
            *self = Selection::None;
        } else {
            *self = Selection::Group { images, texts };
        }
    }

    pub fn single_image(&self) -> Option<ObjectId> {
        match self {
            Selection::Single(Target::Image(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn single_text(&self) -> Option<ObjectId> {
        match self {
            Selection::Single(Target::Text(id)) => Some(*id),
            _ => None,
        }
    }

    /// Number of members in the group selection (0 unless a group is active).
    pub fn group_len(&self) -> usize {
        match self {
            Selection::Group { images, texts } => images.len() + texts.len(),
            _ => 0,
        }
    }

    pub fn is_group_member(&self, target: Target) -> bool {
        match (self, target) {
            (Selection::Group { images, .. }, Target::Image(id)) => images.contains(&id),
            (Selection::Group { texts, .. }, Target::Text(id)) => texts.contains(&id),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_group_are_exclusive() {
        let mut sel = Selection::None;
        sel.set_group(vec![ObjectId(1), ObjectId(2)], vec![]);
        assert_eq!(sel.group_len(), 2);

        sel.select(Target::Image(ObjectId(1)));
        assert_eq!(sel.group_len(), 0);
        assert_eq!(sel.single_image(), Some(ObjectId(1)));

        sel.set_group(vec![], vec![ObjectId(3)]);
        assert_eq!(sel.single_image(), None);
        assert!(sel.is_group_member(Target::Text(ObjectId(3))));
    }

    #[test]
    fn test_empty_group_clears_selection() {
        let mut sel = Selection::Single(Target::Text(ObjectId(7)));
        sel.set_group(vec![], vec![]);
        assert_eq!(sel, Selection::None);
    }

    #[test]
    fn test_group_membership() {
        let sel = Selection::Group {
            images: vec![ObjectId(1)],
            texts: vec![ObjectId(2)],
        };
        assert!(sel.is_group_member(Target::Image(ObjectId(1))));
        assert!(!sel.is_group_member(Target::Image(ObjectId(2))));
        assert!(sel.is_group_member(Target::Text(ObjectId(2))));
    }
}
