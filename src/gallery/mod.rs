//! Gallery state controller.
//!
//! Owns the image list, the base-variant cache and the edit history of the
//! selected image, and turns user actions into service calls and display
//! requests.

mod controller;
mod events;
mod pending;
mod state;


pub use controller::GalleryController;
pub use events::GalleryEvent;
pub use pending::{ApplyOutcome, PendingEdit};
pub use state::{GalleryState, Selection};
