//! Stateless upload control.

use super::selection::{FileSelection, JSON_MIME_TYPE};

/// File picker contract: accepts JSON, allows multi-select, forwards events.
pub struct UploadControl<H>
where
    H: FnMut(FileSelection),
{
    handler: H,
}

impl<H> UploadControl<H>
where
    H: FnMut(FileSelection),
{
    /// Value for the picker's `accept` filter.
    pub const ACCEPT: &'static str = JSON_MIME_TYPE;
    /// Whether the picker allows selecting several files at once.
    pub const MULTIPLE: bool = true;

    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    /// Hands the selection to the handler unchanged.
    pub fn select(&mut self, selection: FileSelection) {
        (self.handler)(selection);
    }
}
