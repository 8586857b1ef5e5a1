//! Read-only status published once per tick.

use std::fmt;

use super::state::Mode;
use crate::controller::InputIdentifier;
use crate::mapping::ActionName;
use crate::store::Settings;

/// What a front end needs to display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    pub connected_devices: usize,
    /// Last classified identifier, including ones captured by an assignment
    pub last_identifier: Option<InputIdentifier>,
    /// Last action that was dispatched
    pub last_action: Option<ActionName>,
    pub mode: Mode,
    pub drag_active: bool,
    pub settings: Settings,
    pub bindings: Vec<(InputIdentifier, ActionName)>,
    /// Raised by the show signal, never lowered by the engine
    pub visible: bool,
}

impl StatusSnapshot {
    /// "No Controller Found" or "N Controller(s) Active".
    #[must_use]
    pub fn connection_label(&self) -> String {
        if self.connected_devices == 0 {
            "No Controller Found".to_string()
        } else {
            format!("{} Controller(s) Active", self.connected_devices)
        }
    }

    fn identifier_for(&self, action: ActionName) -> Option<InputIdentifier> {
        self.bindings
            .iter()
            .find(|(_, bound)| *bound == action)
            .map(|(id, _)| *id)
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.connection_label())?;
        match self.last_identifier {
            Some(id) => writeln!(f, "Last input:  {}", id)?,
            None => writeln!(f, "Last input:  -")?,
        }
        match self.last_action {
            Some(action) => writeln!(f, "Last action: {}", action)?,
            None => writeln!(f, "Last action: -")?,
        }
        writeln!(f, "Mode:        {}", self.mode)?;
        writeln!(f, "Drag:        {}", if self.drag_active { "held" } else { "off" })?;
        writeln!(
            f,
            "Speed:       {} (scroll {}), autostart {}",
            self.settings.speed(),
            self.settings.scroll_speed(),
            if self.settings.autostart { "on" } else { "off" }
        )?;
        write!(f, "Bindings:")?;
        for action in ActionName::ALL {
            match self.identifier_for(action) {
                Some(id) => write!(f, "\n  {:<18} {}", action.label(), id)?,
                None => write!(f, "\n  {:<18} Unassigned", action.label())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_label() {
        let mut status = StatusSnapshot::default();
        assert_eq!(status.connection_label(), "No Controller Found");

        status.connected_devices = 2;
        assert_eq!(status.connection_label(), "2 Controller(s) Active");
    }

    #[test]
    fn test_display_lists_bindings() {
        let status = StatusSnapshot {
            connected_devices: 1,
            last_identifier: Some(InputIdentifier::button(0, 3)),
            last_action: Some(ActionName::TabKey),
            bindings: vec![(InputIdentifier::button(0, 3), ActionName::TabKey)],
            ..StatusSnapshot::default()
        };

        let text = status.to_string();
        assert!(text.starts_with("1 Controller(s) Active\n"));
        assert!(text.contains("Last input:  ID0_BTN3"));
        assert!(text.contains("Last action: Tab Key"));
        assert!(text.contains("  Tab Key            ID0_BTN3"));
        assert!(text.contains("  Left Click         Unassigned"));
    }

    #[test]
    fn test_display_without_bindings() {
        let text = StatusSnapshot::default().to_string();
        assert!(text.contains("Last input:  -"));
        assert_eq!(text.matches("Unassigned").count(), ActionName::ALL.len());
        assert!(text.ends_with("Close App          Unassigned"));
    }
}
