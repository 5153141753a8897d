//! Collects selected items into a file list and report rows.

use crate::models::media::{MediaItem, SyncRow};
use crate::models::transfer::{Destination, TransferRequest};
use crate::Result;

/// Files to transfer and rows to report, in selection order.
#[derive(Debug, Default, Clone)]
pub struct Collection {
    pub files: Vec<String>,
    pub rows: Vec<SyncRow>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item: its first file, plus a row for episodes and movies.
    ///
    /// Items without a file are ignored.
    pub fn push(&mut self, item: &MediaItem) {
        let Some(file) = item.primary_file() else {
            return;
        };
        self.files.push(file.to_string());
        if let Some(row) = SyncRow::for_item(item) {
            self.rows.push(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Turn the collected files into a transfer request.
    pub fn into_transfer(self, destination: Destination) -> Result<TransferRequest> {
        TransferRequest::new(self.files, destination)
    }
}

impl<'a> FromIterator<&'a MediaItem> for Collection {
    fn from_iter<I: IntoIterator<Item = &'a MediaItem>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for item in iter {
            collection.push(item);
        }
        collection
    }
}
