//! # Action Dispatcher
//!
//! Executes discrete actions against the [`OutputSink`].
//!
//! | Action | Output |
//! |--------|--------|
//! | Left / Right / Middle Click | button down + up |
//! | Hold Click (Drag) | left down on first use, left up on the next |
//! | Windows / Enter / Tab Key | key tap |
//! | Close App | left up, then exit |
//! | Scroll Up / Down | never dispatched (held-state only) |
//!
//! A dispatch is refused while the cooldown is running or an assignment is
//! pending. Output failures are logged and do not stop the tick loop.

use tracing::{debug, warn};

use super::state::EngineState;
use crate::error::Result;
use crate::mapping::ActionName;
use crate::output::{KeyTap, MouseButton, OutputSink};

/// Default debounce window after a dispatch, in ticks
pub const DEFAULT_DISPATCH_COOLDOWN_TICKS: u32 = 15;

/// Result of a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The action ran and the cooldown was restarted.
    Dispatched,
    /// Cooldown active, assignment pending, or a continuous action.
    Refused,
    /// Close App ran; the loop should stop.
    Exit,
}

/// Runs `action` if the engine is allowed to dispatch.
pub fn dispatch(
    state: &mut EngineState,
    output: &mut dyn OutputSink,
    action: ActionName,
    cooldown_ticks: u32,
) -> DispatchOutcome {
    if state.cooldown.is_active() {
        debug!(
            "Dispatch of {} refused, cooldown {} tick(s)",
            action,
            state.cooldown.remaining()
        );
        return DispatchOutcome::Refused;
    }
    if state.mode.is_awaiting() || action.is_continuous() {
        return DispatchOutcome::Refused;
    }

    debug!("Dispatching {}", action);
    let outcome = match action {
        ActionName::LeftClick => report(action, click(output, MouseButton::Left)),
        ActionName::RightClick => report(action, click(output, MouseButton::Right)),
        ActionName::MiddleClick => report(action, click(output, MouseButton::Middle)),
        ActionName::DragToggle => toggle_drag(state, output),
        ActionName::WindowsKey => report(action, output.tap_key(KeyTap::Meta)),
        ActionName::EnterKey => report(action, output.tap_key(KeyTap::Enter)),
        ActionName::TabKey => report(action, output.tap_key(KeyTap::Tab)),
        ActionName::CloseApp => {
            release_mouse(state, output);
            DispatchOutcome::Exit
        }
        ActionName::ScrollUp | ActionName::ScrollDown => return DispatchOutcome::Refused,
    };

    state.cooldown.set(cooldown_ticks);
    outcome
}

/// Releases the left button so no drag stays stuck. Used on every exit path.
pub fn release_mouse(state: &mut EngineState, output: &mut dyn OutputSink) {
    if let Err(e) = output.mouse_button(MouseButton::Left, false) {
        warn!("Failed to release left button: {}", e);
    }
    state.drag_active = false;
}

fn click(output: &mut dyn OutputSink, button: MouseButton) -> Result<()> {
    output.mouse_button(button, true)?;
    output.mouse_button(button, false)
}

fn toggle_drag(state: &mut EngineState, output: &mut dyn OutputSink) -> DispatchOutcome {
    let press = !state.drag_active;
    match output.mouse_button(MouseButton::Left, press) {
        Ok(()) => state.drag_active = press,
        Err(e) => warn!("Drag toggle failed: {}", e),
    }
    DispatchOutcome::Dispatched
}

fn report(action: ActionName, result: Result<()>) -> DispatchOutcome {
    if let Err(e) = result {
        warn!("{} failed: {}", action, e);
    }
    DispatchOutcome::Dispatched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::Mode;
    use crate::output::mocks::{OutputCall, RecordingOutput};
    use crate::output::MockOutputSink;
    use mockall::predicate::eq;

    const COOLDOWN: u32 = DEFAULT_DISPATCH_COOLDOWN_TICKS;

    #[test]
    fn test_left_click_presses_and_releases() {
        let mut mock = MockOutputSink::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_mouse_button()
            .with(eq(MouseButton::Left), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        mock.expect_mouse_button()
            .with(eq(MouseButton::Left), eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut state = EngineState::new();
        let outcome = dispatch(&mut state, &mut mock, ActionName::LeftClick, COOLDOWN);

        assert_eq!(outcome, DispatchOutcome::Dispatched);
        assert_eq!(state.cooldown.remaining(), 15);
    }

    #[test]
    fn test_key_actions_tap_keys() {
        for (action, key) in [
            (ActionName::WindowsKey, KeyTap::Meta),
            (ActionName::EnterKey, KeyTap::Enter),
            (ActionName::TabKey, KeyTap::Tab),
        ] {
            let mut mock = MockOutputSink::new();
            mock.expect_tap_key().with(eq(key)).times(1).returning(|_| Ok(()));

            let mut state = EngineState::new();
            assert_eq!(
                dispatch(&mut state, &mut mock, action, COOLDOWN),
                DispatchOutcome::Dispatched
            );
        }
    }

    #[test]
    fn test_right_and_middle_click() {
        let mut output = RecordingOutput::new();
        let mut state = EngineState::new();
        dispatch(&mut state, &mut output, ActionName::RightClick, COOLDOWN);
        state.cooldown.set(0);
        dispatch(&mut state, &mut output, ActionName::MiddleClick, COOLDOWN);

        assert_eq!(
            output.take(),
            vec![
                OutputCall::Button(MouseButton::Right, true),
                OutputCall::Button(MouseButton::Right, false),
                OutputCall::Button(MouseButton::Middle, true),
                OutputCall::Button(MouseButton::Middle, false),
            ]
        );
    }

    #[test]
    fn test_refused_while_cooldown_active() {
        let mut mock = MockOutputSink::new();
        mock.expect_mouse_button().times(0);

        let mut state = EngineState::new();
        state.cooldown.set(3);
        let outcome = dispatch(&mut state, &mut mock, ActionName::LeftClick, COOLDOWN);

        assert_eq!(outcome, DispatchOutcome::Refused);
        assert_eq!(state.cooldown.remaining(), 3);
    }

    #[test]
    fn test_refused_while_awaiting() {
        let mut output = RecordingOutput::new();
        let mut state = EngineState::new();
        state.mode = Mode::Awaiting {
            pending: ActionName::TabKey,
        };

        let outcome = dispatch(&mut state, &mut output, ActionName::EnterKey, COOLDOWN);
        assert_eq!(outcome, DispatchOutcome::Refused);
        assert!(output.calls.is_empty());
    }

    #[test]
    fn test_scroll_actions_are_never_dispatched() {
        let mut output = RecordingOutput::new();
        let mut state = EngineState::new();

        for action in [ActionName::ScrollUp, ActionName::ScrollDown] {
            assert_eq!(
                dispatch(&mut state, &mut output, action, COOLDOWN),
                DispatchOutcome::Refused
            );
        }
        assert!(output.calls.is_empty());
        assert!(!state.cooldown.is_active());
    }

    #[test]
    fn test_drag_toggle_pairs_restore_state() {
        let mut output = RecordingOutput::new();
        let mut state = EngineState::new();

        for n in 1..=6 {
            state.cooldown.set(0);
            dispatch(&mut state, &mut output, ActionName::DragToggle, COOLDOWN);
            // Odd count leaves the button held
            assert_eq!(state.drag_active, n % 2 == 1);
        }

        assert_eq!(
            output.take()[..2],
            [
                OutputCall::Button(MouseButton::Left, true),
                OutputCall::Button(MouseButton::Left, false),
            ]
        );
    }

    #[test]
    fn test_failed_drag_press_keeps_flag() {
        let mut output = RecordingOutput::failing();
        let mut state = EngineState::new();

        let outcome = dispatch(&mut state, &mut output, ActionName::DragToggle, COOLDOWN);
        assert_eq!(outcome, DispatchOutcome::Dispatched);
        assert!(!state.drag_active);
        assert_eq!(state.cooldown.remaining(), 15);
    }

    #[test]
    fn test_output_failure_still_restarts_cooldown() {
        let mut output = RecordingOutput::failing();
        let mut state = EngineState::new();

        let outcome = dispatch(&mut state, &mut output, ActionName::LeftClick, COOLDOWN);
        assert_eq!(outcome, DispatchOutcome::Dispatched);
        assert_eq!(state.cooldown.remaining(), 15);
        // Press failed, so the release was never attempted
        assert_eq!(output.calls.len(), 1);
    }

    #[test]
    fn test_close_app_releases_drag_and_exits() {
        let mut output = RecordingOutput::new();
        let mut state = EngineState::new();
        dispatch(&mut state, &mut output, ActionName::DragToggle, COOLDOWN);
        assert!(state.drag_active);
        output.take();

        state.cooldown.set(0);
        let outcome = dispatch(&mut state, &mut output, ActionName::CloseApp, COOLDOWN);

        assert_eq!(outcome, DispatchOutcome::Exit);
        assert!(!state.drag_active);
        assert_eq!(output.take(), vec![OutputCall::Button(MouseButton::Left, false)]);
    }

    #[test]
    fn test_release_mouse_tolerates_failure() {
        let mut output = RecordingOutput::failing();
        let mut state = EngineState::new();
        state.drag_active = true;

        release_mouse(&mut state, &mut output);
        assert!(!state.drag_active);
    }
}
