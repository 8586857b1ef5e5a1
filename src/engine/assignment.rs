//! # Assignment State Machine
//!
//! ```text
//! Normal ──start(action)──▶ Awaiting(action) ──capture(id)──▶ Normal
//!                                │                             (bind id → action,
//!                                └──────cancel()──────▶ Normal  cooldown = assignment window)
//! ```
//!
//! There is no timeout; `Awaiting` lasts until an identifier is captured or
//! the assignment is cancelled.

use tracing::{debug, info};

use super::state::{EngineState, Mode};
use crate::controller::InputIdentifier;
use crate::mapping::{ActionName, MappingTable};

/// Default debounce window after a capture, in ticks
pub const DEFAULT_ASSIGNMENT_COOLDOWN_TICKS: u32 = 50;

/// Enters `Awaiting(action)`. While already awaiting, retargets the pending action.
pub fn start_assignment(state: &mut EngineState, action: ActionName) {
    if let Mode::Awaiting { pending } = state.mode {
        debug!("Replacing pending assignment for {}", pending);
    }
    info!("Waiting for input to bind to {}", action);
    state.mode = Mode::Awaiting { pending: action };
}

/// Returns to `Normal` without binding. Returns `false` if nothing was pending.
pub fn cancel_assignment(state: &mut EngineState) -> bool {
    match state.mode {
        Mode::Awaiting { pending } => {
            info!("Assignment for {} cancelled", pending);
            state.mode = Mode::Normal;
            true
        }
        Mode::Normal => false,
    }
}

/// Binds `identifier` to the pending action and returns to `Normal`.
///
/// Returns the bound action, or `None` when not awaiting (the state is left
/// untouched).
pub fn capture(
    state: &mut EngineState,
    table: &mut MappingTable,
    identifier: InputIdentifier,
    cooldown_ticks: u32,
) -> Option<ActionName> {
    let Mode::Awaiting { pending } = state.mode else {
        return None;
    };

    table.bind(identifier, pending);
    state.mode = Mode::Normal;
    state.cooldown.set(cooldown_ticks);
    info!("Bound {} to {}", identifier, pending);
    Some(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_enters_awaiting() {
        let mut state = EngineState::new();
        start_assignment(&mut state, ActionName::TabKey);
        assert_eq!(
            state.mode,
            Mode::Awaiting {
                pending: ActionName::TabKey
            }
        );
    }

    #[test]
    fn test_start_while_awaiting_retargets() {
        let mut state = EngineState::new();
        start_assignment(&mut state, ActionName::TabKey);
        start_assignment(&mut state, ActionName::EnterKey);
        assert_eq!(
            state.mode,
            Mode::Awaiting {
                pending: ActionName::EnterKey
            }
        );
    }

    #[test]
    fn test_capture_binds_and_returns_to_normal() {
        let mut state = EngineState::new();
        let mut table = MappingTable::new();
        start_assignment(&mut state, ActionName::TabKey);

        let id = InputIdentifier::button(0, 3);
        let bound = capture(&mut state, &mut table, id, DEFAULT_ASSIGNMENT_COOLDOWN_TICKS);

        assert_eq!(bound, Some(ActionName::TabKey));
        assert_eq!(table.resolve(&id), Some(ActionName::TabKey));
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.cooldown.remaining(), 50);
    }

    #[test]
    fn test_capture_in_normal_mode_does_nothing() {
        let mut state = EngineState::new();
        let mut table = MappingTable::new();

        let bound = capture(&mut state, &mut table, InputIdentifier::button(0, 3), 50);

        assert_eq!(bound, None);
        assert!(table.is_empty());
        assert_eq!(state, EngineState::new());
    }

    #[test]
    fn test_cancel_returns_to_normal_without_binding() {
        let mut state = EngineState::new();
        start_assignment(&mut state, ActionName::LeftClick);

        assert!(cancel_assignment(&mut state));
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.cooldown.remaining(), 0);
    }

    #[test]
    fn test_cancel_in_normal_mode_is_noop() {
        let mut state = EngineState::new();
        assert!(!cancel_assignment(&mut state));
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn test_capture_hat_identifier() {
        let mut state = EngineState::new();
        let mut table = MappingTable::new();
        start_assignment(&mut state, ActionName::ScrollDown);

        let id = InputIdentifier::hat(1, 0, -1);
        capture(&mut state, &mut table, id, 50);
        assert_eq!(table.resolve(&id), Some(ActionName::ScrollDown));
    }
}
