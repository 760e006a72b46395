use crate::types::ImageVariant;

/// End of the history a navigation request ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBound {
    /// Already showing the oldest variant
    Oldest,
    /// Already showing the newest variant
    Newest,
}

/// Result of stepping through the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The cursor moved; the variant now current.
    Moved(ImageVariant),
    /// Nothing changed.
    NoOp(HistoryBound),
    /// Deferred until earlier algorithm requests are applied. The history
    /// itself never returns this.
    Queued,
}

impl Step {
    pub fn variant(&self) -> Option<&ImageVariant> {
        match self {
            Step::Moved(variant) => Some(variant),
            Step::NoOp(_) | Step::Queued => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Step::NoOp(_))
    }
}
