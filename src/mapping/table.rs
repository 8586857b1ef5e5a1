//! # Mapping Table
//!
//! Ordered bindings from [`InputIdentifier`] to [`ActionName`].
//!
//! ## Uniqueness
//!
//! Each action is bound to at most one identifier: [`MappingTable::bind`]
//! first removes every entry whose value is the action being bound.
//!
//! The reverse direction is not validated. Binding an identifier that already
//! resolves to a *different* action overwrites that entry in place, so the
//! other action silently loses its binding rather than being reported or
//! moved. Entries for identifiers whose device is gone are kept as-is; they
//! simply never match again.

use super::action::ActionName;
use crate::controller::InputIdentifier;

/// Bindings in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<(InputIdentifier, ActionName)>,
}

impl MappingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table by binding each pair in order.
    ///
    /// Later pairs win, exactly as if `bind` had been called for each.
    pub fn from_entries(entries: impl IntoIterator<Item = (InputIdentifier, ActionName)>) -> Self {
        let mut table = Self::new();
        for (identifier, action) in entries {
            table.bind(identifier, action);
        }
        table
    }

    /// Binds `identifier` to `action`.
    ///
    /// Any previous identifier for `action` is unbound. An existing entry for
    /// `identifier` keeps its position; new identifiers are appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamepad_mouse::controller::InputIdentifier;
    /// use gamepad_mouse::mapping::{ActionName, MappingTable};
    ///
    /// let mut table = MappingTable::new();
    /// table.bind(InputIdentifier::button(0, 1), ActionName::LeftClick);
    /// table.bind(InputIdentifier::button(0, 2), ActionName::LeftClick);
    ///
    /// assert_eq!(table.resolve(&InputIdentifier::button(0, 1)), None);
    /// assert_eq!(table.resolve(&InputIdentifier::button(0, 2)), Some(ActionName::LeftClick));
    /// ```
    pub fn bind(&mut self, identifier: InputIdentifier, action: ActionName) {
        self.entries.retain(|(_, bound)| *bound != action);

        match self.entries.iter_mut().find(|(id, _)| *id == identifier) {
            Some(entry) => entry.1 = action,
            None => self.entries.push((identifier, action)),
        }
    }

    /// Action bound to `identifier`, if any.
    #[must_use]
    pub fn resolve(&self, identifier: &InputIdentifier) -> Option<ActionName> {
        self.entries
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, action)| *action)
    }

    /// Identifier currently bound to `action`, if any.
    #[must_use]
    pub fn identifier_for(&self, action: ActionName) -> Option<InputIdentifier> {
        self.entries
            .iter()
            .find(|(_, bound)| *bound == action)
            .map(|(id, _)| *id)
    }

    /// Button bindings of one device, for held-state polling.
    ///
    /// Returns `(button index, action)` pairs; hat bindings are skipped.
    #[must_use]
    pub fn held_bindings_for(&self, device: usize) -> Vec<(u16, ActionName)> {
        self.entries
            .iter()
            .filter_map(|(id, action)| match *id {
                InputIdentifier::Button { device: d, button } if d == device => Some((button, *action)),
                _ => None,
            })
            .collect()
    }

    /// All bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(InputIdentifier, ActionName)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
