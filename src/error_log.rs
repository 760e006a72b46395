//! Accumulating list of user-facing error messages.
//!
//! Failures from the image service never propagate into the history or the
//! controller state; they end up here as display-only records until the user
//! (or the next operation) clears them.

use chrono::{DateTime, Utc};

use crate::error::{ErrorCategory, GalleryError};

/// One message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub category: Option<ErrorCategory>,
    pub status: Option<u16>,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            category: None,
            status: None,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// Converts an error into the record the UI displays.
    pub fn from_error(err: &GalleryError) -> Self {
        Self {
            category: err.category(),
            status: err.status(),
            message: err.user_message(),
            at: Utc::now(),
        }
    }
}

/// Append-only message list with an explicit clear.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.records.len();
        self.records.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accumulate_until_cleared() {
        let mut log = ErrorLog::new();
        log.push(ErrorRecord::from_error(&GalleryError::transport(400)));
        log.push(ErrorRecord::from_error(&GalleryError::transport(404)));

        assert_eq!(log.len(), 2);
        let messages: Vec<_> = log.messages().collect();
        assert_eq!(messages[0], "Error : Invalid parameters");
        assert!(messages[1].contains("doesn't exist"));

        assert_eq!(log.clear(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn record_keeps_status_and_category() {
        let record = ErrorRecord::from_error(&GalleryError::transport(500));
        assert_eq!(record.status, Some(500));
        assert_eq!(record.category, Some(ErrorCategory::ServerError));
    }

    #[test]
    fn plain_record_has_no_category() {
        let record = ErrorRecord::new("Error : Unknown image 7");
        assert!(record.category.is_none());
        assert!(record.status.is_none());
    }
}
