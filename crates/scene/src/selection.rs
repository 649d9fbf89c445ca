use crate::hotspot::HotspotId;

/// Outcome of feeding a pick result into the selection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// A different hotspot is now selected.
    Selected(HotspotId),
    /// The hit hotspot was already selected.
    Reselected(HotspotId),
    /// Nothing was hit; the previous selection stays as it was.
    Unchanged,
}

/// Single-hotspot selection.
///
/// Only a pick result (or an explicit `clear` from the info panel) changes it.
/// A miss deliberately leaves the current selection in place.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<HotspotId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<HotspotId> {
        self.selected
    }

    pub fn is_selected(&self, id: HotspotId) -> bool {
        self.selected == Some(id)
    }

    pub fn apply_pick(&mut self, hit: Option<HotspotId>) -> SelectionChange {
        let Some(id) = hit else {
            return SelectionChange::Unchanged;
        };
        if self.selected == Some(id) {
            return SelectionChange::Reselected(id);
        }
        self.selected = Some(id);
        SelectionChange::Selected(id)
    }

    /// Returns the previously selected hotspot, if any.
    pub fn clear(&mut self) -> Option<HotspotId> {
        self.selected.take()
    }
}
