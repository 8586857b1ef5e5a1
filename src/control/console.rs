//! # Control Console
//!
//! Line commands read from stdin (or any async reader):
//!
//! | Line | Effect |
//! |------|--------|
//! | `assign <Action Name>` | start assignment, e.g. `assign Tab Key` |
//! | `cancel` | cancel a pending assignment |
//! | `speed <n>` | pointer speed, clamped to 5..=100 |
//! | `scroll <n>` | scroll speed, clamped to 1..=50 |
//! | `autostart on\|off` | start at login |
//! | `show` | show signal |
//! | `status` | print the current status |
//! | `help` | list commands |
//! | `exit` / `quit` | request exit |
//!
//! Bad lines are reported on the writer and otherwise ignored. End of input
//! stops the console but not the application.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tracing::{debug, info};

use super::{Command, ControlHandle, Signal};
use crate::engine::StatusSnapshot;
use crate::error::Result;
use crate::mapping::{ActionName, UnknownActionError};

const HELP: &str = "\
Commands:
  assign <Action Name>   bind the next controller input to an action
  cancel                 cancel a pending assignment
  speed <5-100>          pointer speed
  scroll <1-50>          scroll speed
  autostart on|off       start at login
  show                   show the status window
  status                 print the current status
  exit                   release the mouse and quit
Actions: Left Click, Right Click, Middle Click, Hold Click (Drag), Scroll Up,
  Scroll Down, Windows Key, Enter Key, Tab Key, Close App
";

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleRequest {
    Command(Command),
    Signal(Signal),
    Status,
    Help,
}

/// Why a console line was rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("not a number: {0}")]
    InvalidNumber(String),

    #[error(transparent)]
    UnknownAction(#[from] UnknownActionError),
}

/// Parses one line. Blank lines yield `Ok(None)`.
///
/// # Examples
///
/// ```
/// use gamepad_mouse::control::console::{parse_line, ConsoleRequest};
/// use gamepad_mouse::control::Command;
/// use gamepad_mouse::mapping::ActionName;
///
/// let request = parse_line("assign tab key").unwrap();
/// assert_eq!(
///     request,
///     Some(ConsoleRequest::Command(Command::StartAssignment(ActionName::TabKey)))
/// );
/// ```
pub fn parse_line(line: &str) -> std::result::Result<Option<ConsoleRequest>, ConsoleError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let request = match word.to_ascii_lowercase().as_str() {
        "assign" => {
            if rest.is_empty() {
                return Err(ConsoleError::Usage("assign <Action Name>"));
            }
            let action: ActionName = rest.parse()?;
            ConsoleRequest::Command(Command::StartAssignment(action))
        }
        "cancel" => ConsoleRequest::Command(Command::CancelAssignment),
        "speed" => ConsoleRequest::Command(Command::SetSpeed(parse_number(rest, "speed <n>")?)),
        "scroll" => ConsoleRequest::Command(Command::SetScrollSpeed(parse_number(rest, "scroll <n>")?)),
        "autostart" => match rest.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => ConsoleRequest::Command(Command::SetAutostart(true)),
            "off" | "false" | "0" => ConsoleRequest::Command(Command::SetAutostart(false)),
            _ => return Err(ConsoleError::Usage("autostart on|off")),
        },
        "show" => ConsoleRequest::Signal(Signal::Show),
        "status" => ConsoleRequest::Status,
        "help" | "?" => ConsoleRequest::Help,
        "exit" | "quit" => ConsoleRequest::Signal(Signal::RequestExit),
        _ => return Err(ConsoleError::UnknownCommand(word.to_string())),
    };
    Ok(Some(request))
}

fn parse_number(text: &str, usage: &'static str) -> std::result::Result<i64, ConsoleError> {
    if text.is_empty() {
        return Err(ConsoleError::Usage(usage));
    }
    text.parse()
        .map_err(|_| ConsoleError::InvalidNumber(text.to_string()))
}

/// Reads lines until end of input or an exit request.
///
/// # Errors
///
/// Returns error if reading or writing fails.
pub async fn run_console<R, W>(
    reader: R,
    mut writer: W,
    control: ControlHandle,
    status: watch::Receiver<StatusSnapshot>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let reply = match parse_line(&line) {
            Ok(None) => None,
            Ok(Some(ConsoleRequest::Command(command))) => {
                if !control.send_command(command) {
                    break;
                }
                None
            }
            Ok(Some(ConsoleRequest::Signal(signal))) => {
                let sent = control.send_signal(signal);
                if !sent || signal == Signal::RequestExit {
                    break;
                }
                None
            }
            Ok(Some(ConsoleRequest::Status)) => {
                let text = status.borrow().to_string();
                Some(format!("{}\n", text))
            }
            Ok(Some(ConsoleRequest::Help)) => Some(HELP.to_string()),
            Err(e) => {
                debug!("Rejected console line {:?}: {}", line, e);
                Some(format!("error: {}\n", e))
            }
        };

        if let Some(text) = reply {
            writer.write_all(text.as_bytes()).await?;
            writer.flush().await?;
        }
    }

    info!("Console closed");
    Ok(())
}
