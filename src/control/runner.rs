//! The main polling loop.

use tokio::sync::watch;
use tracing::{debug, info};

use super::{ControlInbox, Scheduler};
use crate::controller::InputBackend;
use crate::engine::{Engine, StatusSnapshot, TickOutcome};
use crate::output::OutputSink;

/// Number of ticks between debug heartbeat messages
const HEARTBEAT_TICKS: u64 = 7500;

/// Runs the engine until an exit is requested or dispatched.
///
/// Each period: queued commands, then queued signals, then one tick, then the
/// status is published. Returns the number of ticks run. Held output is
/// released before returning.
pub async fn run_loop(
    engine: &mut Engine,
    backend: &mut dyn InputBackend,
    output: &mut dyn OutputSink,
    inbox: &mut ControlInbox,
    scheduler: &mut Scheduler,
    status: &watch::Sender<StatusSnapshot>,
) -> u64 {
    info!(
        "Starting polling loop at {} ms per tick",
        scheduler.period().as_millis()
    );

    let mut ticks: u64 = 0;
    'run: loop {
        scheduler.next().await;

        for command in inbox.drain_commands() {
            debug!("Command {:?}", command);
            engine.handle_command(command);
        }

        for signal in inbox.drain_signals() {
            if engine.handle_signal(signal, output) == TickOutcome::Exit {
                break 'run;
            }
        }

        let outcome = engine.tick(backend, output);
        ticks += 1;
        publish(status, engine.status());

        if outcome == TickOutcome::Exit {
            break;
        }
        if ticks % HEARTBEAT_TICKS == 0 {
            debug!("{} ticks, {}", ticks, engine.status().connection_label());
        }
    }

    engine.shutdown(output);
    publish(status, engine.status());
    info!("Polling loop stopped after {} ticks", ticks);
    ticks
}

fn publish(tx: &watch::Sender<StatusSnapshot>, snapshot: &StatusSnapshot) {
    tx.send_if_modified(|current| {
        if current == snapshot {
            false
        } else {
            *current = snapshot.clone();
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{channel, Command, Signal};
    use crate::controller::mocks::FakeInput;
    use crate::controller::InputIdentifier;
    use crate::engine::Tuning;
    use crate::mapping::ActionName;
    use crate::output::mocks::{OutputCall, RecordingOutput};
    use crate::output::MouseButton;
    use crate::store::autostart::mocks::FakeAutostart;
    use crate::store::mocks::RecordingSink;
    use crate::store::{Settings, SettingsSnapshot};

    fn engine_with(snapshot: SettingsSnapshot, sink: &RecordingSink) -> Engine {
        Engine::new(
            snapshot,
            Tuning::default(),
            Box::new(sink.clone()),
            Box::new(FakeAutostart::new()),
        )
    }

    #[tokio::test]
    async fn test_request_exit_stops_loop() {
        let sink = RecordingSink::new();
        let mut engine = engine_with(SettingsSnapshot::default(), &sink);
        let mut backend = FakeInput::with_devices(1);
        let mut output = RecordingOutput::new();
        let (handle, mut inbox) = channel();
        let mut scheduler = Scheduler::from_millis(1);
        let (status_tx, status_rx) = watch::channel(StatusSnapshot::default());

        handle.send_command(Command::SetSpeed(40));
        handle.send_signal(Signal::Show);
        handle.send_signal(Signal::RequestExit);

        let ticks = run_loop(
            &mut engine,
            &mut backend,
            &mut output,
            &mut inbox,
            &mut scheduler,
            &status_tx,
        )
        .await;

        // Exit arrived before the first tick
        assert_eq!(ticks, 0);
        assert_eq!(engine.settings().speed(), 40);
        assert_eq!(sink.count(), 1);
        assert!(status_rx.borrow().visible);
        assert_eq!(output.calls, vec![OutputCall::Button(MouseButton::Left, false)]);
    }

    #[tokio::test]
    async fn test_close_app_binding_stops_loop() {
        let sink = RecordingSink::new();
        let snapshot = SettingsSnapshot {
            mapping: vec![(InputIdentifier::button(0, 9), ActionName::CloseApp)],
            settings: Settings::default(),
        };
        let mut engine = engine_with(snapshot, &sink);
        let mut backend = FakeInput::with_devices(1);
        backend.queue(Vec::new());
        backend.queue(Vec::new());
        backend.press(0, 9);
        let mut output = RecordingOutput::new();
        let (_handle, mut inbox) = channel();
        let mut scheduler = Scheduler::from_millis(1);
        let (status_tx, status_rx) = watch::channel(StatusSnapshot::default());

        let ticks = run_loop(
            &mut engine,
            &mut backend,
            &mut output,
            &mut inbox,
            &mut scheduler,
            &status_tx,
        )
        .await;

        assert_eq!(ticks, 3);
        assert_eq!(status_rx.borrow().last_action, Some(ActionName::CloseApp));
        assert_eq!(status_rx.borrow().connected_devices, 1);
        assert_eq!(output.calls, vec![OutputCall::Button(MouseButton::Left, false)]);
    }

    #[tokio::test]
    async fn test_assignment_through_commands() {
        let sink = RecordingSink::new();
        let mut engine = engine_with(SettingsSnapshot::default(), &sink);
        let mut backend = FakeInput::with_devices(1);
        backend.press(0, 3);
        backend.queue(Vec::new());
        let mut output = RecordingOutput::new();
        let (handle, mut inbox) = channel();
        let mut scheduler = Scheduler::from_millis(1);
        let (status_tx, _status_rx) = watch::channel(StatusSnapshot::default());

        handle.send_command(Command::StartAssignment(ActionName::TabKey));

        // Bind on the first tick, exit a few ticks later
        handle.send_command(Command::SetScrollSpeed(20));
        let exit = tokio::spawn({
            let handle = handle.clone();
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                handle.send_signal(Signal::RequestExit);
            }
        });

        run_loop(
            &mut engine,
            &mut backend,
            &mut output,
            &mut inbox,
            &mut scheduler,
            &status_tx,
        )
        .await;
        exit.await.unwrap();

        assert_eq!(
            engine.table().resolve(&InputIdentifier::button(0, 3)),
            Some(ActionName::TabKey)
        );
        let saved = sink.last().unwrap();
        assert_eq!(saved.mapping, vec![(InputIdentifier::button(0, 3), ActionName::TabKey)]);
        assert_eq!(saved.settings.scroll_speed(), 20);
    }

    #[test]
    fn test_publish_skips_unchanged_status() {
        let (tx, mut rx) = watch::channel(StatusSnapshot::default());

        publish(&tx, &StatusSnapshot::default());
        assert!(!rx.has_changed().unwrap());

        let snapshot = StatusSnapshot {
            connected_devices: 1,
            ..StatusSnapshot::default()
        };
        publish(&tx, &snapshot);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().connected_devices, 1);
    }
}
