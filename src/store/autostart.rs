//! # Autostart Registration
//!
//! Start-at-login through an XDG autostart entry: a `.desktop` file in
//! `$XDG_CONFIG_HOME/autostart` (usually `~/.config/autostart`).
//!
//! Enabling writes the entry, disabling removes it. Removing an entry that
//! does not exist is not an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{GamepadMouseError, Result};

/// Registers or unregisters the application for start at login.
pub trait AutostartRegistrar: Send {
    /// # Errors
    ///
    /// Returns error if the registration could not be changed.
    fn set_enabled(&self, enabled: bool) -> Result<()>;
}

/// XDG `.desktop` autostart entry
#[derive(Debug, Clone)]
pub struct XdgAutostart {
    dir: PathBuf,
    app_name: String,
    exec: PathBuf,
}

impl XdgAutostart {
    pub fn new(dir: impl AsRef<Path>, app_name: impl Into<String>, exec: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            app_name: app_name.into(),
            exec: exec.as_ref().to_path_buf(),
        }
    }

    /// `<user config dir>/autostart`, if a config dir exists.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("autostart"))
    }

    /// Path of the `.desktop` entry
    #[must_use]
    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(format!("{}.desktop", self.app_name))
    }

    fn entry_contents(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name={name}\n\
             Comment=Control the mouse with a game controller\n\
             Exec=\"{exec}\"\n\
             Terminal=false\n\
             X-GNOME-Autostart-enabled=true\n",
            name = self.app_name,
            exec = self.exec.display(),
        )
    }
}

impl AutostartRegistrar for XdgAutostart {
    fn set_enabled(&self, enabled: bool) -> Result<()> {
        let path = self.entry_path();
        let autostart_err =
            |e: io::Error| GamepadMouseError::Autostart(format!("{}: {}", path.display(), e));

        if enabled {
            fs::create_dir_all(&self.dir).map_err(autostart_err)?;
            fs::write(&path, self.entry_contents()).map_err(autostart_err)?;
            info!("Autostart enabled ({})", path.display());
        } else {
            match fs::remove_file(&path) {
                Ok(()) => info!("Autostart disabled ({})", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(autostart_err(e)),
            }
        }
        Ok(())
    }
}
