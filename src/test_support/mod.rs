//! Shared helpers for unit tests.

#![allow(clippy::unwrap_used)]

mod doubles;

pub use doubles::{Probe, RecordingFile, ScriptedConnection};
