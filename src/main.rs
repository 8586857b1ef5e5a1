//! # GamePad to Mouse
//!
//! Control the mouse pointer, mouse buttons and a few keys with any game
//! controller.
//!
//! Left stick moves the pointer; buttons and the d-pad are bound to actions
//! at runtime from the console (`assign Left Click`, then press a button).
//! Bindings and speeds are saved to the settings file on every change.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::BufReader;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use gamepad_mouse::config::{Config, LoggingConfig, DEFAULT_CONFIG_PATH};
use gamepad_mouse::control::console::run_console;
use gamepad_mouse::control::{self, run_loop, Scheduler, Signal};
use gamepad_mouse::controller::EvdevBackend;
use gamepad_mouse::engine::{Engine, Tuning};
use gamepad_mouse::output::VirtualPointer;
use gamepad_mouse::store::{JsonFileStore, PersistenceWorker, XdgAutostart};

/// File name prefix of the daily log files
const LOG_FILE_PREFIX: &str = "gamepad-mouse.log";

/// How long runtime shutdown waits for blocking tasks
const SHUTDOWN_TIMEOUT_MS: u64 = 200;

/// Main entry point for GamePad to Mouse
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, default `config/default.toml`)
///    - Set up logging
///    - Load the settings store and create the virtual pointer
///
/// 2. **Main Loop**
///    - Tick the engine every `tick_interval_ms`
///    - Console commands and Ctrl+C arrive over the control channels
///
/// 3. **Graceful Shutdown**
///    - Release the mouse
///    - Flush pending settings writes
///
/// # Errors
///
/// Returns error if:
/// - The configuration file exists but is invalid
/// - `/dev/uinput` cannot be opened (no permission)
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO gamepad_mouse: GamePad to Mouse v0.1.0 starting...
/// INFO gamepad_mouse::output::uinput: Created virtual pointer device "GamePad to Mouse Virtual Pointer"
/// INFO gamepad_mouse::controller::enumerator: 1 controller(s) active
/// INFO gamepad_mouse::control::runner: Starting polling loop at 8 ms per tick
/// ```
fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let result = runtime.block_on(run());

    // A pending stdin read cannot be cancelled; don't wait for it
    runtime.shutdown_timeout(Duration::from_millis(SHUTDOWN_TIMEOUT_MS));
    result
}

async fn run() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Invalid configuration in {}", config_path))?;

    let _log_guard = init_logging(&config.logging)?;

    info!("GamePad to Mouse v{} starting...", env!("CARGO_PKG_VERSION"));

    // Settings store
    let store_path = config
        .store_path()
        .context("No user config directory; set [store] path")?;
    let store = JsonFileStore::new(&store_path);
    let snapshot = store.load();
    info!("Settings file: {}", store_path.display());

    // Without the virtual pointer there is nothing to do
    let mut output = VirtualPointer::create().context("Cannot create the virtual pointer")?;
    let mut backend = EvdevBackend::new(&config.input.input_dir);

    let worker = PersistenceWorker::spawn(store);
    let autostart_dir = config
        .autostart_dir()
        .context("No user config directory; set [autostart] dir")?;
    let exec = std::env::current_exe().context("Cannot locate the running executable")?;
    let autostart = XdgAutostart::new(autostart_dir, config.autostart.app_name.clone(), exec);

    let mut engine = Engine::new(
        snapshot,
        Tuning::from(&config),
        Box::new(worker.sink()),
        Box::new(autostart),
    );

    let (control, mut inbox) = control::channel();
    let (status_tx, status_rx) = watch::channel(engine.status().clone());

    // Console on stdin
    tokio::spawn({
        let control = control.clone();
        async move {
            let stdin = BufReader::new(tokio::io::stdin());
            if let Err(e) = run_console(stdin, tokio::io::stdout(), control, status_rx).await {
                warn!("Console stopped: {}", e);
            }
        }
    });

    // Handle Ctrl+C for graceful shutdown
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, shutting down...");
                control.send_signal(Signal::RequestExit);
            }
            Err(e) => warn!("Cannot listen for Ctrl+C: {}", e),
        }
    });

    info!("Type \"help\" for commands, Ctrl+C to exit");

    let mut scheduler = Scheduler::from_millis(config.engine.tick_interval_ms);
    let ticks = run_loop(
        &mut engine,
        &mut backend,
        &mut output,
        &mut inbox,
        &mut scheduler,
        &status_tx,
    )
    .await;

    // Drops the engine's sink so the worker can finish
    drop(engine);
    worker.shutdown().await;

    info!("Total ticks: {}", ticks);
    Ok(())
}

/// Logs to stdout, or to a daily file when `log_dir` is set.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// must be held until exit so buffered file output is flushed.
fn init_logging(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.log_dir.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    }

    let log_dir = Path::new(&logging.log_dir);
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Cannot create log directory {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        assert_eq!(DEFAULT_CONFIG_PATH, "config/default.toml");
    }

    #[test]
    fn test_default_tick_rate() {
        // 8 ms per tick is 125 ticks per second
        let config = Config::default();
        assert_eq!(config.engine.tick_interval_ms, 8);
        assert_eq!(1000 / config.engine.tick_interval_ms, 125);
    }

    #[test]
    fn test_cooldowns_in_seconds() {
        // Dispatch cooldown ~120 ms, assignment cooldown ~400 ms at 125 Hz
        let tuning = Tuning::from(&Config::default());
        assert_eq!(tuning.dispatch_cooldown_ticks as u64 * 8, 120);
        assert_eq!(tuning.assignment_cooldown_ticks as u64 * 8, 400);
    }

    #[test]
    fn test_log_file_prefix() {
        assert!(LOG_FILE_PREFIX.ends_with(".log"));
    }
}
