//! Display capability used by the gallery controller.
//!
//! The controller only issues requests; rasterizing, writing files or updating
//! a UI is up to the [`Renderer`] implementation.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{ImageId, ImageVariant};

/// Where a variant should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayTarget {
    /// The main editing pane showing the selected image.
    Editor,
    /// The gallery thumbnail of a stored image.
    Thumbnail(ImageId),
}

pub trait Renderer: Send + Sync {
    fn display(&self, variant: &ImageVariant, target: &DisplayTarget);

    /// Blanks a target, e.g. after its image was deleted.
    fn clear(&self, _target: &DisplayTarget) {}
}

impl<T: Renderer + ?Sized> Renderer for Arc<T> {
    fn display(&self, variant: &ImageVariant, target: &DisplayTarget) {
        (**self).display(variant, target)
    }

    fn clear(&self, target: &DisplayTarget) {
        (**self).clear(target)
    }
}

/// A request received by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderRequest {
    Display {
        target: DisplayTarget,
        variant: ImageVariant,
    },
    Clear(DisplayTarget),
}

/// Renderer that keeps every request in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    requests: Mutex<Vec<RenderRequest>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<RenderRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.guard().clone()
    }

    /// Variants displayed on `target`, oldest first.
    pub fn displayed_on(&self, target: DisplayTarget) -> Vec<ImageVariant> {
        self.guard()
            .iter()
            .filter_map(|request| match request {
                RenderRequest::Display { target: t, variant } if *t == target => {
                    Some(variant.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl Renderer for RecordingRenderer {
    fn display(&self, variant: &ImageVariant, target: &DisplayTarget) {
        self.guard().push(RenderRequest::Display {
            target: *target,
            variant: variant.clone(),
        });
    }

    fn clear(&self, target: &DisplayTarget) {
        self.guard().push(RenderRequest::Clear(*target));
    }
}
