use std::collections::HashMap;

use crate::{
    error_log::ErrorLog,
    history::EditHistory,
    types::{ImageId, ImageRef, ImageVariant},
};

use super::pending::EditQueue;

/// What the user is currently editing.
#[derive(Debug, Clone, Default)]
pub enum Selection {
    #[default]
    None,
    Selected {
        image: ImageRef,
        history: EditHistory,
    },
}

impl Selection {
    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            Selection::Selected { image, .. } => Some(image),
            Selection::None => None,
        }
    }

    pub fn history(&self) -> Option<&EditHistory> {
        match self {
            Selection::Selected { history, .. } => Some(history),
            Selection::None => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected { .. })
    }
}

/// Everything the controller knows about the gallery.
///
/// The selection (and with it the whole edit history) is replaced, never
/// merged, when another image is selected. `generation` increases on every
/// such replacement so responses issued for an older selection can be told
/// apart.
#[derive(Debug, Default)]
pub struct GalleryState {
    pub(super) images: Vec<ImageRef>,
    pub(super) cache: HashMap<ImageId, ImageVariant>,
    pub(super) selection: Selection,
    pub(super) generation: u64,
    pub(super) errors: ErrorLog,
    pub(super) queue: EditQueue,
}

impl GalleryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageRef> {
        self.images.iter().find(|image| image.id == id)
    }

    /// Base variant fetched for `id`, if any.
    pub fn cached(&self, id: ImageId) -> Option<&ImageVariant> {
        self.cache.get(&id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// Installs a fresh selection with `[base]` as its history.
    pub(super) fn select(&mut self, image: ImageRef, base: ImageVariant) {
        self.generation += 1;
        self.queue.reset();
        self.selection = Selection::Selected {
            image,
            history: EditHistory::with_base(base),
        };
    }

    /// Drops the selection. Returns whether something was selected.
    pub(super) fn deselect(&mut self) -> bool {
        let was_selected = self.selection.is_selected();
        self.generation += 1;
        self.queue.reset();
        self.selection = Selection::None;
        was_selected
    }
}
