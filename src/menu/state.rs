//! Menu states.

use crate::params::{Field, WaveformParams};

/// Result shown after a save attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Cancelled,
    Failed,
}

impl SaveOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveOutcome::Saved => "OK",
            SaveOutcome::Cancelled => "CANCELLED",
            SaveOutcome::Failed => "FAILED",
        }
    }
}

/// Where the operator is in the menu.
///
/// The working copy only exists inside `Edit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    /// Cursor on a field.
    Select(Field),
    /// Field being edited on a scratch copy of the live params.
    Edit { field: Field, working: WaveformParams },
    /// Waiting for a long aux press (save) or any encoder event (abort).
    ConfirmSave,
    /// Save outcome on screen for `steps_left` more menu steps.
    SaveResult { outcome: SaveOutcome, steps_left: u16 },
    /// Remote save acknowledged, on screen for `steps_left` more menu steps.
    RemoteSaved { steps_left: u16 },
}

impl MenuState {
    pub const INITIAL: Self = MenuState::Select(Field::Shape);

    /// Field under the cursor, if any.
    pub fn field(&self) -> Option<Field> {
        match *self {
            MenuState::Select(field) | MenuState::Edit { field, .. } => Some(field),
            _ => None,
        }
    }

    #[inline]
    pub fn is_editing(&self) -> bool {
        matches!(self, MenuState::Edit { .. })
    }

    /// Timed state that ignores operator input.
    #[inline]
    pub fn is_dwell(&self) -> bool {
        matches!(self, MenuState::SaveResult { .. } | MenuState::RemoteSaved { .. })
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::INITIAL
    }
}
