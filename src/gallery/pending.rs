use std::collections::BTreeMap;

use crate::{
    client::{AlgorithmParams, ImageService, VariantSource},
    error::GalleryError,
    history::HistoryBound,
    types::{ImageId, ImageVariant},
};

/// What happened to one algorithm application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result was pushed to the history and displayed.
    Applied,
    /// The service failed; the error was recorded and the history is untouched.
    Failed,
    /// The response belonged to an earlier selection and was dropped.
    Stale,
    /// An earlier request is still outstanding; this result will be applied
    /// right after it.
    Queued,
    /// Nothing was selected.
    NoSelection,
}

/// An algorithm request issued for the selection of a given generation.
///
/// Obtained from [`GalleryController::begin_apply`](super::GalleryController::begin_apply)
/// and handed back to `finish_apply` with the service's answer.
#[derive(Debug, Clone)]
pub struct PendingEdit {
    pub(super) generation: u64,
    pub(super) seq: u64,
    pub(super) image: ImageId,
    pub(super) params: AlgorithmParams,
    pub(super) chained_from: Option<ImageVariant>,
}

impl PendingEdit {
    pub fn image(&self) -> ImageId {
        self.image
    }

    pub fn params(&self) -> &AlgorithmParams {
        &self.params
    }

    pub fn is_chained(&self) -> bool {
        self.chained_from.is_some()
    }

    pub fn source(&self) -> VariantSource<'_> {
        match &self.chained_from {
            Some(variant) => VariantSource::Chained(variant),
            None => VariantSource::Stored,
        }
    }

    /// Sends the request. Does not touch the gallery state.
    pub async fn run<S: ImageService + ?Sized>(
        &self,
        service: &S,
    ) -> Result<ImageVariant, GalleryError> {
        service
            .get_image(self.image, Some(&self.params), self.source())
            .await
    }
}

/// Work waiting for its turn in the queue.
#[derive(Debug)]
pub(super) enum Completion {
    /// Answer to an algorithm request.
    Edit(Result<ImageVariant, GalleryError>),
    /// The caller gave up on the request.
    Cancelled,
    /// Undo (towards `Oldest`) or redo (towards `Newest`) issued behind
    /// outstanding requests.
    Navigate(HistoryBound),
}

pub(super) enum Release {
    /// Slot already released or skipped by a reset.
    Stale,
    /// Waiting on an earlier ticket.
    Held,
    /// Completions to apply now, in ticket order; the first is the caller's.
    Ready(Vec<Completion>),
}

/// Hands out ticket numbers and releases completions in issue order.
///
/// Algorithm requests and the navigations issued after them share one
/// sequence, so their effects land in the order they were invoked.
#[derive(Debug, Default)]
pub(super) struct EditQueue {
    next_ticket: u64,
    next_to_finish: u64,
    held: BTreeMap<u64, Completion>,
}

impl EditQueue {
    pub(super) fn issue(&mut self) -> u64 {
        let seq = self.next_ticket;
        self.next_ticket += 1;
        seq
    }

    /// Forgets every outstanding ticket.
    pub(super) fn reset(&mut self) {
        if !self.held.is_empty() {
            log::debug!("Dropping {} held edit results", self.held.len());
        }
        self.held.clear();
        self.next_to_finish = self.next_ticket;
    }

    pub(super) fn outstanding(&self) -> u64 {
        self.next_ticket - self.next_to_finish
    }

    pub(super) fn complete(&mut self, seq: u64, completion: Completion) -> Release {
        if seq < self.next_to_finish || seq >= self.next_ticket || self.held.contains_key(&seq) {
            return Release::Stale;
        }
        if seq > self.next_to_finish {
            self.held.insert(seq, completion);
            return Release::Held;
        }

        let mut ready = vec![completion];
        self.next_to_finish += 1;
        while let Some(next) = self.held.remove(&self.next_to_finish) {
            ready.push(next);
            self.next_to_finish += 1;
        }
        Release::Ready(ready)
    }
}
