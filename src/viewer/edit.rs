//! Cell editing sessions.

use super::{DataProvider, SheetView};
use crate::cell::{CellHandle, EmptyCell, SheetCell};
use crate::types::CellIndex;

/// The editor placed over a content cell.
#[derive(Debug)]
pub(crate) struct EditSession {
    index: CellIndex,
    editor: CellHandle,
}

impl<P: DataProvider> SheetView<P> {
    /// Open an editor over the content cell at `index`.
    ///
    /// A running session ends first. Invalid indices are ignored.
    pub fn edit_cell_at(&mut self, index: CellIndex) {
        if !self.is_valid(index) {
            tracing::trace!(target: "sheetview::lifecycle", ?index, "edit of invalid index ignored");
            return;
        }
        self.end_edit_cell();

        let mut editor: CellHandle = match self.provider.editor_for(index, &mut self.cells) {
            Some(editor) => editor,
            None => Box::new(EmptyCell::default()),
        };
        let frame = self.frame_for(index);
        let state = editor.state_mut();
        state.index = index;
        state.frame = frame;

        tracing::debug!(target: "sheetview::lifecycle", ?index, "editing began");
        self.editing = Some(EditSession { index, editor });
    }

    /// Close the running editor and pass it to `did_end_editing`.
    ///
    /// Without a listener the editor goes back to its reuse pool.
    pub fn end_edit_cell(&mut self) {
        let Some(EditSession { index, editor }) = self.editing.take() else {
            return;
        };
        tracing::debug!(target: "sheetview::lifecycle", ?index, "editing ended");
        if let Some(mut editor) = self.events.end_editing(index, editor) {
            editor.retire();
            self.cells.recycle(editor);
        }
    }

    /// Index being edited, if any.
    pub fn editing_index(&self) -> Option<CellIndex> {
        self.editing.as_ref().map(|session| session.index)
    }

    pub fn editor(&self) -> Option<&dyn SheetCell> {
        self.editing.as_ref().map(|session| session.editor.as_ref())
    }
}
