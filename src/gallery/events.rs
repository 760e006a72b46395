use crate::{error_log::ErrorRecord, types::ImageId};

/// Change notifications published by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryEvent {
    /// The image list was fetched again.
    ListRefreshed { count: usize },
    /// A new image is being edited; its history holds only the base variant.
    Selected(ImageId),
    /// Nothing is selected any more.
    SelectionCleared,
    /// The edit history grew or its cursor moved.
    HistoryChanged { size: usize, cursor: usize },
    ErrorReported(ErrorRecord),
    ErrorsCleared,
}
