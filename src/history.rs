#[path = "history/stack.rs"]
mod stack;

#[path = "history/step.rs"]
mod step;

pub use stack::EditHistory;
pub use step::{HistoryBound, Step};
