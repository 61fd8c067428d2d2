//! Menu transition function.
//!
//! One [`Menu::step`] per menu tick (every `MENU_DIVIDER` fast ticks).
//! The menu never touches live params directly: it returns a [`MenuAction`]
//! and the controller applies it (commit, resynthesis, persistence).
//!
//! ```text
//!         inc/dec                 inc/dec
//!   ┌──────────────┐        ┌──────────────┐
//!   ▼              │        ▼              │
//! Select(X) ──confirm──▶ Edit(X) ──confirm/cancel──▶ Select(X)
//!   │
//!   └──aux confirm──▶ ConfirmSave ──aux long──▶ SaveResult(Saved)
//!                          └──encoder event──▶ SaveResult(Cancelled)
//!                                                   │ dwell
//!                                                   ▼
//!                                             Select(Shape)
//! ```

use super::remote::RemoteFrame;
use super::screen;
use super::state::{MenuState, SaveOutcome};
use crate::config::TimingConfig;
use crate::hal::Display;
use crate::input::InputAggregator;
use crate::params::{Field, WaveformParams};

/// Side effect requested by a menu step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    None,
    /// Copy `field` from `working` into the live params.
    Commit { field: Field, working: WaveformParams },
    /// Persist these params (magic already stamped), then report via
    /// [`Menu::finish_save`].
    Save(WaveformParams),
    /// Save screen left by an encoder event.
    SaveAborted,
}

/// Operator menu.
pub struct Menu {
    state: MenuState,
    dirty: bool,
    remote_lock: bool,
    save_dwell_steps: u16,
    remote_dwell_steps: u16,
}

impl Menu {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            state: MenuState::INITIAL,
            dirty: true,
            remote_lock: false,
            save_dwell_steps: timing.dwell_steps(timing.save_dwell_ticks),
            remote_dwell_steps: timing.dwell_steps(timing.remote_ack_dwell_ticks),
        }
    }

    #[inline]
    pub fn state(&self) -> &MenuState {
        &self.state
    }

    /// Screen needs a redraw.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_remote_locked(&self) -> bool {
        self.remote_lock
    }

    /// While locked, local input is drained without effect.
    ///
    /// Locking abandons an edit in progress.
    pub fn set_remote_lock(&mut self, locked: bool) {
        if locked {
            self.abandon_edit();
        }
        if self.remote_lock != locked {
            self.remote_lock = locked;
            self.dirty = true;
        }
    }

    /// Go back to `Select(Shape)`, dropping any edit in progress.
    pub fn reset(&mut self) {
        self.transition(MenuState::INITIAL);
    }

    /// Advance one menu tick.
    pub fn step(&mut self, input: &mut InputAggregator, live: &WaveformParams) -> MenuAction {
        if let Some(next) = self.tick_dwell() {
            input.clear_all();
            if let Some(next) = next {
                self.transition(next);
            }
            return MenuAction::None;
        }

        if self.remote_lock {
            input.clear_all();
            return MenuAction::None;
        }

        match self.state {
            MenuState::Select(field) => self.step_select(field, input, live),
            MenuState::Edit { field, working } => self.step_edit(field, working, input),
            MenuState::ConfirmSave => self.step_confirm_save(input, live),
            MenuState::SaveResult { .. } | MenuState::RemoteSaved { .. } => MenuAction::None,
        }
    }

    /// Report the result of a [`MenuAction::Save`]. Restarts the result dwell.
    pub fn finish_save(&mut self, outcome: SaveOutcome) {
        self.transition(MenuState::SaveResult {
            outcome,
            steps_left: self.save_dwell_steps,
        });
    }

    /// Apply a remote message to `live`, abandoning any edit in progress.
    ///
    /// Returns true when the frame asks for a save. The caller persists
    /// `live` and reports the result through [`Menu::finish_remote_save`].
    pub fn apply_remote(&mut self, frame: &RemoteFrame, live: &mut WaveformParams) -> bool {
        frame.apply_to(live);
        self.abandon_edit();
        self.dirty = true;
        frame.save
    }

    /// Report the write result of a remote save and build the ack frame.
    ///
    /// The ack carries `save: true` only when the write succeeded. A failed
    /// write shows the save failure screen instead of the acknowledgment.
    pub fn finish_remote_save(&mut self, saved: bool, live: &WaveformParams) -> RemoteFrame {
        if saved {
            self.transition(MenuState::RemoteSaved {
                steps_left: self.remote_dwell_steps,
            });
        } else {
            self.finish_save(SaveOutcome::Failed);
        }
        RemoteFrame::from_params(live, saved)
    }

    /// Redraw if dirty. Returns true when something was drawn.
    pub fn render<D: Display + ?Sized>(&mut self, display: &mut D, live: &WaveformParams) -> bool {
        if !self.dirty {
            return false;
        }
        screen::draw(display, &self.state, live, self.remote_lock);
        self.dirty = false;
        true
    }

    /// Count down a dwell state.
    ///
    /// `None`: not a dwell state. `Some(None)`: still dwelling.
    /// `Some(Some(next))`: dwell over.
    fn tick_dwell(&mut self) -> Option<Option<MenuState>> {
        let steps_left = match &mut self.state {
            MenuState::SaveResult { steps_left, .. } | MenuState::RemoteSaved { steps_left } => steps_left,
            _ => return None,
        };

        *steps_left = steps_left.saturating_sub(1);
        if *steps_left == 0 {
            Some(Some(MenuState::INITIAL))
        } else {
            Some(None)
        }
    }

    fn step_select(&mut self, field: Field, input: &mut InputAggregator, live: &WaveformParams) -> MenuAction {
        if input.aux_button().is_confirm() {
            input.aux_button_mut().clear_confirm();
            self.transition(MenuState::ConfirmSave);
            return MenuAction::None;
        }
        // A long aux press only means something in ConfirmSave.
        input.aux_button_mut().clear_cancel();

        if input.increment() {
            input.clear_rotation();
            self.transition(MenuState::Select(field.next()));
        } else if input.decrement() {
            input.clear_rotation();
            self.transition(MenuState::Select(field.prev()));
        } else if input.encoder_button().is_confirm() {
            input.encoder_button_mut().clear_confirm();
            self.transition(MenuState::Edit { field, working: *live });
        } else if input.encoder_button().is_cancel() {
            input.encoder_button_mut().clear_cancel();
        }

        MenuAction::None
    }

    fn step_edit(&mut self, field: Field, mut working: WaveformParams, input: &mut InputAggregator) -> MenuAction {
        let aux = input.aux_button_mut();
        aux.clear_confirm();
        aux.clear_cancel();

        if input.increment() || input.decrement() {
            let detent = if input.increment() { 1 } else { -1 };
            input.clear_rotation();
            working.adjust(field, detent);
            self.transition(MenuState::Edit { field, working });
            MenuAction::None
        } else if input.encoder_button().is_confirm() {
            input.encoder_button_mut().clear_confirm();
            self.transition(MenuState::Select(field));
            MenuAction::Commit { field, working }
        } else if input.encoder_button().is_cancel() {
            input.encoder_button_mut().clear_cancel();
            self.transition(MenuState::Select(field));
            MenuAction::None
        } else {
            MenuAction::None
        }
    }

    fn step_confirm_save(&mut self, input: &mut InputAggregator, live: &WaveformParams) -> MenuAction {
        if input.aux_button().is_cancel() {
            let aux = input.aux_button_mut();
            aux.clear_cancel();
            aux.clear_confirm();
            // Optimistic: the controller overrides via finish_save.
            self.finish_save(SaveOutcome::Saved);
            let mut record = *live;
            record.magic = crate::params::MAGIC;
            return MenuAction::Save(record);
        }

        if input.any_encoder_event() {
            input.clear_rotation();
            let button = input.encoder_button_mut();
            button.clear_confirm();
            button.clear_cancel();
            self.finish_save(SaveOutcome::Cancelled);
            return MenuAction::SaveAborted;
        }

        // A second short aux press does nothing here.
        input.aux_button_mut().clear_confirm();
        MenuAction::None
    }

    /// Leave `Edit` without committing; the working copy is dropped.
    fn abandon_edit(&mut self) {
        if let MenuState::Edit { field, .. } = self.state {
            self.transition(MenuState::Select(field));
        }
    }

    fn transition(&mut self, next: MenuState) {
        self.state = next;
        self.dirty = true;
    }
}
