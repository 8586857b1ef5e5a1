//! # JSON Settings File
//!
//! Reads and writes the settings record as a pretty-printed JSON object:
//!
//! ```json
//! {
//!     "mapping": {
//!         "ID0_BTN3": "Tab Key",
//!         "ID0_HAT(0, 1)": "Scroll Up"
//!     },
//!     "speed": 15,
//!     "scroll_speed": 10,
//!     "autostart": false
//! }
//! ```
//!
//! Unknown identifiers or action names are skipped individually; a file that
//! is not valid JSON (or has wrongly typed fields) is ignored as a whole.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{Settings, SettingsSnapshot, DEFAULT_SCROLL_SPEED, DEFAULT_SPEED};
use crate::controller::InputIdentifier;
use crate::error::{GamepadMouseError, Result};
use crate::mapping::ActionName;

/// Directory under the user config dir holding the settings file
pub const STORE_DIR_NAME: &str = "GamePadToMouse";
/// Settings file name
pub const STORE_FILE_NAME: &str = "config.json";

/// `<user config dir>/GamePadToMouse/config.json`, if a config dir exists.
#[must_use]
pub fn default_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(STORE_DIR_NAME).join(STORE_FILE_NAME))
}

fn default_speed() -> i64 { DEFAULT_SPEED as i64 }
fn default_scroll_speed() -> i64 { DEFAULT_SCROLL_SPEED as i64 }

/// On-disk layout
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    mapping: Map<String, Value>,

    #[serde(default = "default_speed")]
    speed: i64,

    #[serde(default = "default_scroll_speed")]
    scroll_speed: i64,

    #[serde(default)]
    autostart: bool,
}

impl From<&SettingsSnapshot> for StoredRecord {
    fn from(snapshot: &SettingsSnapshot) -> Self {
        let mapping = snapshot
            .mapping
            .iter()
            .map(|(id, action)| (id.to_string(), Value::String(action.label().to_string())))
            .collect();

        Self {
            mapping,
            speed: snapshot.settings.speed() as i64,
            scroll_speed: snapshot.settings.scroll_speed() as i64,
            autostart: snapshot.settings.autostart,
        }
    }
}

impl StoredRecord {
    fn into_snapshot(self) -> SettingsSnapshot {
        let mut mapping = Vec::with_capacity(self.mapping.len());
        for (key, value) in self.mapping {
            let identifier: InputIdentifier = match key.parse() {
                Ok(id) => id,
                Err(e) => {
                    warn!("Skipping stored binding: {}", e);
                    continue;
                }
            };
            let action = match value.as_str().map(str::parse::<ActionName>) {
                Some(Ok(action)) => action,
                Some(Err(e)) => {
                    warn!("Skipping stored binding for {}: {}", key, e);
                    continue;
                }
                None => {
                    warn!("Skipping stored binding for {}: action is not a string", key);
                    continue;
                }
            };
            mapping.push((identifier, action));
        }

        SettingsSnapshot {
            mapping,
            settings: Settings::new(self.speed, self.scroll_speed, self.autostart),
        }
    }
}

/// Settings file at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a valid record.
    pub fn try_load(&self) -> Result<SettingsSnapshot> {
        let contents = fs::read_to_string(&self.path)?;
        let record: StoredRecord = serde_json::from_str(&contents)?;
        Ok(record.into_snapshot())
    }

    /// Loads the settings file, falling back to defaults on any problem.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_mouse::store::{JsonFileStore, SettingsSnapshot};
    ///
    /// let store = JsonFileStore::new("/nonexistent/config.json");
    /// assert_eq!(store.load(), SettingsSnapshot::default());
    /// ```
    #[must_use]
    pub fn load(&self) -> SettingsSnapshot {
        match self.try_load() {
            Ok(snapshot) => {
                info!(
                    "Loaded {} binding(s) from {}",
                    snapshot.mapping.len(),
                    self.path.display()
                );
                snapshot
            }
            Err(GamepadMouseError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!("No settings file at {}, using defaults", self.path.display());
                SettingsSnapshot::default()
            }
            Err(e) => {
                warn!("Ignoring settings file {}: {}", self.path.display(), e);
                SettingsSnapshot::default()
            }
        }
    }

    /// Writes the full record, creating the parent directory if needed.
    ///
    /// The file is written next to its destination and renamed over it, so a
    /// crash mid-write never leaves a truncated file behind.
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be written.
    pub fn save(&self, snapshot: &SettingsSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let record = StoredRecord::from(snapshot);
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record.serialize(&mut serializer)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &buf)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
