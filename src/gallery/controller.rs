use std::collections::HashMap;

use futures::future::join_all;
use tokio::sync::broadcast;

use crate::{
    client::{AlgorithmParams, ImageService, Upload, VariantSource},
    error::GalleryError,
    error_log::{ErrorLog, ErrorRecord},
    history::{EditHistory, HistoryBound, Step},
    render::{DisplayTarget, Renderer},
    types::{ImageId, ImageRef, ImageSize, ImageVariant},
};

use super::{
    events::GalleryEvent,
    pending::{ApplyOutcome, Completion, PendingEdit, Release},
    state::{GalleryState, Selection},
};

const EVENT_CAPACITY: usize = 64;

/// Drives the gallery: selection, algorithm application, undo/redo and the
/// list of stored images.
///
/// Every mutating operation takes `&mut self`, so operations driven through
/// the controller run one after another. Callers that want several algorithm
/// requests in flight use [`begin_apply`](Self::begin_apply),
/// [`PendingEdit::run`] and [`finish_apply`](Self::finish_apply); results are
/// then applied in the order the requests were begun, and results for an
/// earlier selection are dropped. An [`undo`](Self::undo) or
/// [`redo`](Self::redo) issued while requests are outstanding waits for them.
pub struct GalleryController<S, R> {
    service: S,
    renderer: R,
    state: GalleryState,
    events: broadcast::Sender<GalleryEvent>,
}

impl<S: ImageService, R: Renderer> GalleryController<S, R> {
    pub fn new(service: S, renderer: R) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            service,
            renderer,
            state: GalleryState::new(),
            events,
        }
    }

    /// Receives every change made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.events.subscribe()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn images(&self) -> &[ImageRef] {
        self.state.images()
    }

    pub fn selection(&self) -> &Selection {
        self.state.selection()
    }

    pub fn history(&self) -> Option<&EditHistory> {
        self.state.selection.history()
    }

    /// Variant shown in the editor.
    pub fn current_variant(&self) -> Option<&ImageVariant> {
        self.history().and_then(|history| history.current().ok())
    }

    /// Size of the variant shown in the editor, as `width*height*channels`.
    ///
    /// Width and height come from the displayed variant so they follow crops
    /// and resizes; the channel count is the one listed by the server. Falls
    /// back to the listed size when the variant header cannot be read.
    pub fn current_size(&self) -> Option<ImageSize> {
        let listed = self.state.selection.image()?.size;
        match self.current_variant().and_then(ImageVariant::dimensions) {
            Some((width, height)) => Some(ImageSize {
                width,
                height,
                ..listed
            }),
            None => Some(listed),
        }
    }

    /// Algorithm requests and queued navigations not yet applied.
    pub fn pending_edits(&self) -> u64 {
        self.state.queue.outstanding()
    }

    pub fn errors(&self) -> &ErrorLog {
        self.state.errors()
    }

    pub fn clear_errors(&mut self) {
        if self.state.errors.clear() > 0 {
            self.emit(GalleryEvent::ErrorsCleared);
        }
    }

    fn emit(&self, event: GalleryEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn report(&mut self, context: &str, err: &GalleryError) {
        log::warn!("{context}: {err}");
        self.record(ErrorRecord::from_error(err));
    }

    fn record(&mut self, record: ErrorRecord) {
        self.state.errors.push(record.clone());
        self.emit(GalleryEvent::ErrorReported(record));
    }

    fn emit_history(&self) {
        if let Some(history) = self.state.selection.history() {
            if let Some(cursor) = history.cursor_index() {
                self.emit(GalleryEvent::HistoryChanged {
                    size: history.size(),
                    cursor,
                });
            }
        }
    }

    /// Fetches the image list and every base variant, then shows the
    /// thumbnails. Returns the number of listed images, or `None` when the
    /// list itself could not be fetched.
    pub async fn refresh_list(&mut self) -> Option<usize> {
        let images = match self.service.list_images().await {
            Ok(images) => images,
            Err(err) => {
                self.report("Failed to fetch image list", &err);
                return None;
            }
        };

        let service = &self.service;
        let fetches = images.iter().map(|image| async move {
            let result = service
                .get_image(image.id, None, VariantSource::Stored)
                .await;
            (image.id, result)
        });
        let results = join_all(fetches).await;

        let mut cache = HashMap::with_capacity(results.len());
        for (id, result) in results {
            match result {
                Ok(variant) => {
                    self.renderer
                        .display(&variant, &DisplayTarget::Thumbnail(id));
                    cache.insert(id, variant);
                }
                Err(err) => self.report(&format!("Failed to fetch image {id}"), &err),
            }
        }

        let count = images.len();
        let selected = self.state.selection.image().map(|image| image.id);
        self.state.images = images;
        self.state.cache = cache;
        self.emit(GalleryEvent::ListRefreshed { count });

        if let Some(id) = selected {
            if self.state.image(id).is_none() {
                log::info!("Selected image {id} is no longer listed");
                self.clear_selection();
            }
        }
        Some(count)
    }

    /// Starts editing `id`, reusing its cached base variant when available.
    /// Returns `false` (and records why) when the image cannot be selected.
    pub async fn select_image(&mut self, id: ImageId) -> bool {
        let Some(image) = self.state.image(id).cloned() else {
            self.record(ErrorRecord::new(format!("Error : Unknown image {id}")));
            return false;
        };

        let cached = self.state.cache.get(&id).cloned();
        let base = match cached {
            Some(variant) => variant,
            None => match self
                .service
                .get_image(id, None, VariantSource::Stored)
                .await
            {
                Ok(variant) => {
                    self.state.cache.insert(id, variant.clone());
                    variant
                }
                Err(err) => {
                    self.report(&format!("Failed to fetch image {id}"), &err);
                    return false;
                }
            },
        };

        log::debug!("Selecting image {id} ({} bytes)", base.len());
        self.renderer.display(&base, &DisplayTarget::Editor);
        self.state.select(image, base);
        self.emit(GalleryEvent::Selected(id));
        self.emit_history();
        true
    }

    fn clear_selection(&mut self) {
        if self.state.deselect() {
            self.renderer.clear(&DisplayTarget::Editor);
            self.emit(GalleryEvent::SelectionCleared);
        }
    }

    /// Applies an algorithm to the selected image and, on success, records and
    /// shows the result.
    ///
    /// With `chained` the variant currently displayed is processed; otherwise
    /// the server's stored image is. Recorded errors are kept until
    /// [`clear_errors`](Self::clear_errors).
    pub async fn apply_algorithm(
        &mut self,
        params: AlgorithmParams,
        chained: bool,
    ) -> ApplyOutcome {
        let Some(pending) = self.begin_apply(params, chained) else {
            return ApplyOutcome::NoSelection;
        };
        let result = pending.run(&self.service).await;
        self.finish_apply(pending, result)
    }

    /// Issues a ticket for an algorithm request against the current selection.
    pub fn begin_apply(&mut self, params: AlgorithmParams, chained: bool) -> Option<PendingEdit> {
        let Selection::Selected { image, history } = &self.state.selection else {
            log::debug!("Ignoring algorithm request without a selection");
            return None;
        };
        let chained_from = if chained {
            history.current().ok().cloned()
        } else {
            None
        };
        let image = image.id;
        let seq = self.state.queue.issue();
        Some(PendingEdit {
            generation: self.state.generation,
            seq,
            image,
            params,
            chained_from,
        })
    }

    /// Feeds the service's answer for `pending` back into the gallery.
    pub fn finish_apply(
        &mut self,
        pending: PendingEdit,
        result: Result<ImageVariant, GalleryError>,
    ) -> ApplyOutcome {
        if pending.generation != self.state.generation {
            log::debug!(
                "Dropping stale result for image {} (generation {} != {})",
                pending.image,
                pending.generation,
                self.state.generation
            );
            return ApplyOutcome::Stale;
        }

        match self.state.queue.complete(pending.seq, Completion::Edit(result)) {
            Release::Stale => ApplyOutcome::Stale,
            Release::Held => ApplyOutcome::Queued,
            Release::Ready(completions) => self.release(completions),
        }
    }

    /// Gives up on a ticket so later results are not held back by it.
    pub fn cancel_apply(&mut self, pending: PendingEdit) {
        if pending.generation != self.state.generation {
            return;
        }
        log::debug!("Cancelling algorithm request for image {}", pending.image);
        if let Release::Ready(completions) =
            self.state.queue.complete(pending.seq, Completion::Cancelled)
        {
            self.release(completions);
        }
    }

    /// Applies released completions in order and returns the first one's
    /// outcome.
    fn release(&mut self, completions: Vec<Completion>) -> ApplyOutcome {
        let mut first = None;
        for completion in completions {
            let outcome = self.apply_completion(completion);
            first.get_or_insert(outcome);
        }
        first.unwrap_or(ApplyOutcome::Stale)
    }

    fn apply_completion(&mut self, completion: Completion) -> ApplyOutcome {
        let variant = match completion {
            Completion::Cancelled => return ApplyOutcome::Stale,
            Completion::Navigate(bound) => {
                return match self.step_history(bound) {
                    Step::Moved(_) => ApplyOutcome::Applied,
                    Step::NoOp(_) | Step::Queued => ApplyOutcome::Stale,
                };
            }
            Completion::Edit(Ok(variant)) => variant,
            Completion::Edit(Err(err)) => {
                self.report("Algorithm request failed", &err);
                return ApplyOutcome::Failed;
            }
        };
        let Selection::Selected { history, .. } = &mut self.state.selection else {
            return ApplyOutcome::Stale;
        };
        if let Err(err) = history.push(variant.clone()) {
            log::error!("Edit history rejected a new variant: {err}");
            return ApplyOutcome::Failed;
        }
        self.renderer.display(&variant, &DisplayTarget::Editor);
        self.emit_history();
        ApplyOutcome::Applied
    }

    /// Shows the previous variant of the selected image.
    pub fn undo(&mut self) -> Step {
        self.navigate(HistoryBound::Oldest)
    }

    /// Shows the next variant of the selected image.
    pub fn redo(&mut self) -> Step {
        self.navigate(HistoryBound::Newest)
    }

    fn navigate(&mut self, bound: HistoryBound) -> Step {
        if !self.state.selection.is_selected() {
            return Step::NoOp(bound);
        }
        if self.state.queue.outstanding() == 0 {
            return self.step_history(bound);
        }

        let seq = self.state.queue.issue();
        log::debug!(
            "Queueing navigation towards {bound:?} behind {} pending requests",
            self.state.queue.outstanding() - 1
        );
        if let Release::Ready(completions) =
            self.state.queue.complete(seq, Completion::Navigate(bound))
        {
            self.release(completions);
        }
        Step::Queued
    }

    fn step_history(&mut self, bound: HistoryBound) -> Step {
        let Selection::Selected { history, .. } = &mut self.state.selection else {
            return Step::NoOp(bound);
        };
        let outcome = match bound {
            HistoryBound::Oldest => history.step_back(),
            HistoryBound::Newest => history.step_forward(),
        };
        if let Step::Moved(variant) = &outcome {
            self.renderer.display(variant, &DisplayTarget::Editor);
            self.emit_history();
        }
        outcome
    }

    /// Deletes `id` on the server. The selection is dropped and the list
    /// refreshed whether or not the delete succeeded.
    pub async fn delete_image(&mut self, id: ImageId) -> bool {
        let deleted = match self.service.delete_image(id).await {
            Ok(()) => true,
            Err(err) => {
                self.report(&format!("Failed to delete image {id}"), &err);
                false
            }
        };

        self.clear_selection();
        if self.state.cache.remove(&id).is_some() {
            self.renderer.clear(&DisplayTarget::Thumbnail(id));
        }
        self.refresh_list().await;
        deleted
    }

    /// Adds an image to the gallery and refreshes the list on success.
    pub async fn upload_image(&mut self, upload: Upload) -> bool {
        match self.service.upload_image(upload).await {
            Ok(()) => {
                self.refresh_list().await;
                true
            }
            Err(err) => {
                self.report("Failed to upload image", &err);
                false
            }
        }
    }

    /// Stores the variant currently shown in the editor as a new image.
    pub async fn save_current_as(&mut self, name: Option<String>) -> bool {
        let Some(variant) = self.current_variant().cloned() else {
            self.record(ErrorRecord::new("Error : No image selected"));
            return false;
        };
        self.upload_image(Upload::new(variant, name)).await
    }
}
