use crate::{error::GalleryError, types::ImageVariant};

use super::step::{HistoryBound, Step};

/// Linear undo/redo history of the variants produced for one selected image.
///
/// The variant at the cursor is the one currently displayed. Pushing after
/// stepping back discards everything after the cursor; that redo branch cannot
/// be recovered.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    sequence: Vec<ImageVariant>,
    cursor: Option<usize>,
}

impl EditHistory {
    /// Creates an uninitialized history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history already initialized with `base`.
    pub fn with_base(base: ImageVariant) -> Self {
        let mut history = Self::new();
        history.initialize(base);
        history
    }

    /// Replaces the whole history with `[base]`, cursor on it.
    pub fn initialize(&mut self, base: ImageVariant) {
        self.sequence = vec![base];
        self.cursor = Some(0);
    }

    /// Records a new edit after the cursor, dropping any redo entries.
    pub fn push(&mut self, variant: ImageVariant) -> Result<(), GalleryError> {
        let cursor = self.cursor.ok_or(GalleryError::UninitializedHistory)?;
        let keep = cursor + 1;
        if keep < self.sequence.len() {
            log::debug!(
                "Discarding {} redo entries from edit history",
                self.sequence.len() - keep
            );
            self.sequence.truncate(keep);
        }
        self.sequence.push(variant);
        self.cursor = Some(self.sequence.len() - 1);
        Ok(())
    }

    /// Moves one entry towards the base image.
    pub fn step_back(&mut self) -> Step {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                Step::Moved(self.sequence[cursor - 1].clone())
            }
            _ => Step::NoOp(HistoryBound::Oldest),
        }
    }

    /// Moves one entry towards the latest edit.
    pub fn step_forward(&mut self) -> Step {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.sequence.len() => {
                self.cursor = Some(cursor + 1);
                Step::Moved(self.sequence[cursor + 1].clone())
            }
            _ => Step::NoOp(HistoryBound::Newest),
        }
    }

    /// The variant under the cursor.
    pub fn current(&self) -> Result<&ImageVariant, GalleryError> {
        self.cursor
            .and_then(|cursor| self.sequence.get(cursor))
            .ok_or(GalleryError::UninitializedHistory)
    }

    pub fn size(&self) -> usize {
        self.sequence.len()
    }

    /// `None` until [`EditHistory::initialize`] has been called.
    pub fn cursor_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_initialized(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(cursor) if cursor + 1 < self.sequence.len())
    }

    /// All entries in chronological edit order.
    pub fn entries(&self) -> &[ImageVariant] {
        &self.sequence
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn variant(tag: &str) -> ImageVariant {
        ImageVariant::from_bytes(tag.as_bytes().to_vec())
    }

    fn tags(history: &EditHistory) -> Vec<String> {
        history
            .entries()
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect()
    }

    #[test]
    fn new_history_is_uninitialized() {
        let mut history = EditHistory::new();
        assert_eq!(history.size(), 0);
        assert_eq!(history.cursor_index(), None);
        assert!(matches!(
            history.current(),
            Err(GalleryError::UninitializedHistory)
        ));
        assert!(matches!(
            history.push(variant("A")),
            Err(GalleryError::UninitializedHistory)
        ));
        assert_eq!(history.step_back(), Step::NoOp(HistoryBound::Oldest));
        assert_eq!(history.step_forward(), Step::NoOp(HistoryBound::Newest));
        assert_eq!(history.size(), 0);
    }

    #[test]
    fn initialize_always_resets() {
        let mut history = EditHistory::with_base(variant("A"));
        history.push(variant("B")).expect("push");
        history.push(variant("C")).expect("push");
        history.step_back();

        history.initialize(variant("X"));
        assert_eq!(tags(&history), vec!["X"]);
        assert_eq!(history.cursor_index(), Some(0));
        assert_eq!(history.current().expect("current"), &variant("X"));
    }

    #[test]
    fn push_at_end_grows_and_tracks_cursor() {
        let mut history = EditHistory::with_base(variant("A"));
        for (i, tag) in ["B", "C", "D"].iter().enumerate() {
            history.push(variant(tag)).expect("push");
            assert_eq!(history.size(), i + 2);
            assert_eq!(history.cursor_index(), Some(history.size() - 1));
        }
    }

    #[test]
    fn push_after_undo_truncates_redo_branch() {
        let mut history = EditHistory::with_base(variant("A"));
        history.push(variant("B")).expect("push");
        history.push(variant("C")).expect("push");

        assert_eq!(history.step_back(), Step::Moved(variant("B")));
        assert_eq!(history.step_back(), Step::Moved(variant("A")));
        history.push(variant("D")).expect("push");

        assert_eq!(tags(&history), vec!["A", "D"]);
        assert_eq!(history.cursor_index(), Some(1));
        assert!(!history.can_redo());
        assert_eq!(history.step_forward(), Step::NoOp(HistoryBound::Newest));
    }

    #[test]
    fn stepping_past_either_end_is_noop() {
        let mut history = EditHistory::with_base(variant("A"));
        history.push(variant("B")).expect("push");

        assert_eq!(history.step_forward(), Step::NoOp(HistoryBound::Newest));
        assert_eq!(history.cursor_index(), Some(1));

        history.step_back();
        assert_eq!(history.step_back(), Step::NoOp(HistoryBound::Oldest));
        assert_eq!(history.cursor_index(), Some(0));
        assert_eq!(history.size(), 2);

        assert_eq!(history.step_forward(), Step::Moved(variant("B")));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Init(u8),
        Push(u8),
        Back,
        Forward,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u8>().prop_map(Op::Init),
            any::<u8>().prop_map(Op::Push),
            Just(Op::Back),
            Just(Op::Forward),
        ]
    }

    proptest! {
        #[test]
        fn cursor_invariant_holds(ops in prop::collection::vec(op_strategy(), 0..64)) {
            let mut history = EditHistory::new();
            for op in ops {
                let before = (history.size(), history.cursor_index());
                match op {
                    Op::Init(tag) => history.initialize(ImageVariant::from_bytes(vec![tag])),
                    Op::Push(tag) => {
                        let result = history.push(ImageVariant::from_bytes(vec![tag]));
                        match before.1 {
                            Some(cursor) => {
                                prop_assert!(result.is_ok());
                                prop_assert_eq!(history.size(), cursor + 2);
                            }
                            None => prop_assert!(result.is_err()),
                        }
                    }
                    Op::Back => {
                        if history.step_back().is_noop() {
                            prop_assert_eq!((history.size(), history.cursor_index()), before);
                        }
                    }
                    Op::Forward => {
                        if history.step_forward().is_noop() {
                            prop_assert_eq!((history.size(), history.cursor_index()), before);
                        }
                    }
                }

                match history.cursor_index() {
                    None => prop_assert_eq!(history.size(), 0),
                    Some(cursor) => {
                        prop_assert!(history.size() > 0);
                        prop_assert!(cursor < history.size());
                        prop_assert_eq!(history.current().ok(), history.entries().get(cursor));
                    }
                }
            }
        }
    }
}
