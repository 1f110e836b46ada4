use crate::document::Document;
use crate::selection::Selection;

/// Context for command execution, borrowing the model a command mutates
#[derive(Debug)]
pub struct CommandContext<'a> {
    /// The document being edited
    pub document: &'a mut Document,
    /// The current selection, kept consistent with the document
    pub selection: &'a mut Selection,
}

impl<'a> CommandContext<'a> {
    pub fn new(document: &'a mut Document, selection: &'a mut Selection) -> Self {
        Self { document, selection }
    }
}
