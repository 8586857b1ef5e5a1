//! # GamePad to Mouse Library
//!
//! Drive the mouse pointer, mouse buttons and a handful of keys from any
//! connected game controller.
//!
//! The library provides the real-time polling engine: device enumeration,
//! input classification, a learnable button→action mapping table, the
//! assignment state machine, the action dispatcher and the continuous analog
//! driver. OS access goes through the [`controller::InputBackend`] and
//! [`output::OutputSink`] traits so the engine can be driven without hardware.

pub mod config;
pub mod control;
pub mod controller;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod output;
pub mod store;
