//! # Mapping Module
//!
//! Logical actions and the learnable table binding controller inputs to them.

pub mod action;
pub mod table;

pub use action::{ActionName, UnknownActionError};
pub use table::MappingTable;
